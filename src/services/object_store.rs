//! Disk-backed object store for uploaded hotel images.
//!
//! Payloads live under `base_path/{bucket}/{key}`. Writes go through a
//! temporary file and are fsynced before being renamed into place, so a
//! partially written payload is never visible under its final key.

use bytes::Bytes;
use std::{
    io::{self, ErrorKind},
    path::PathBuf,
};
use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use uuid::Uuid;

const MAX_OBJECT_KEY_LEN: usize = 1024;
const BUCKET_NAME_MIN_LEN: usize = 3;
const BUCKET_NAME_MAX_LEN: usize = 63;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("bucket `{name}` invalid: {reason}")]
    InvalidBucketName { name: String, reason: String },
    #[error("invalid object key")]
    InvalidObjectKey,
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Stores image payloads on local disk beneath a single configured bucket.
///
/// The surface is intentionally tiny: hotels only ever write new objects.
/// Nothing reads objects back through this service; downloads are served
/// elsewhere.
#[derive(Clone, Debug)]
pub struct ObjectStore {
    base_path: PathBuf,
    bucket: String,
}

impl ObjectStore {
    /// Create a store rooted at `base_path` for the named bucket.
    ///
    /// The bucket name comes from configuration, so it is validated once
    /// here rather than on every write.
    pub fn new(base_path: impl Into<PathBuf>, bucket: impl Into<String>) -> StorageResult<Self> {
        let bucket = bucket.into();
        ensure_bucket_name_safe(&bucket)?;
        Ok(Self {
            base_path: base_path.into(),
            bucket,
        })
    }

    /// Directory holding this bucket's objects.
    pub fn bucket_root(&self) -> PathBuf {
        self.base_path.join(&self.bucket)
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.bucket_root().join(key)
    }

    /// Basic key validation to avoid trivial path traversal vectors.
    ///
    /// Rejects empty or overlong keys, keys that begin with `/` or contain
    /// `..`, and keys with control characters or backslashes.
    fn ensure_key_safe(&self, key: &str) -> StorageResult<()> {
        if key.is_empty() || key.len() > MAX_OBJECT_KEY_LEN {
            return Err(StorageError::InvalidObjectKey);
        }
        if key.starts_with('/') || key.contains("..") {
            return Err(StorageError::InvalidObjectKey);
        }
        if key
            .bytes()
            .any(|b| b.is_ascii_control() || b == b'\\' || b == b'\0')
        {
            return Err(StorageError::InvalidObjectKey);
        }
        Ok(())
    }

    /// Write an object durably under `key`.
    ///
    /// Bytes go to a temporary file first, are flushed and fsynced, then
    /// renamed into the final location. The temp file is removed on any
    /// failure. Overwrites an existing object with the same key.
    pub async fn put_object(&self, key: &str, data: Bytes) -> StorageResult<()> {
        self.ensure_key_safe(key)?;

        let file_path = self.object_path(key);
        let parent = file_path
            .parent()
            .map(PathBuf::from)
            .ok_or_else(|| StorageError::Io(io::Error::other("object path missing parent")))?;
        fs::create_dir_all(&parent).await?;

        let tmp_path = parent.join(format!(".tmp-{}", Uuid::new_v4()));
        let mut file = File::create(&tmp_path).await?;

        if let Err(err) = write_and_sync(&mut file, &data).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StorageError::Io(err));
        }

        if let Err(err) = fs::rename(&tmp_path, &file_path).await {
            if err.kind() == ErrorKind::AlreadyExists {
                fs::remove_file(&file_path).await?;
                fs::rename(&tmp_path, &file_path).await?;
            } else {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(StorageError::Io(err));
            }
        }

        Ok(())
    }
}

async fn write_and_sync(file: &mut File, data: &[u8]) -> io::Result<()> {
    file.write_all(data).await?;
    file.flush().await?;
    file.sync_all().await
}

/// Validate bucket name format.
///
/// Enforces S3-like naming rules: 3-63 characters, lowercase letters, digits,
/// dots, and hyphens only, starting and ending with a letter or digit, no
/// consecutive dots or dot-hyphen combinations.
fn ensure_bucket_name_safe(name: &str) -> StorageResult<()> {
    let invalid = |reason: &str| StorageError::InvalidBucketName {
        name: name.to_string(),
        reason: reason.into(),
    };

    let len = name.len();
    if len < BUCKET_NAME_MIN_LEN || len > BUCKET_NAME_MAX_LEN {
        return Err(invalid("must be between 3 and 63 characters"));
    }

    if !name
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '.' | '-'))
    {
        return Err(invalid(
            "allowed characters are lowercase letters, digits, dots, and hyphens",
        ));
    }

    if name.starts_with('.') || name.ends_with('.') || name.starts_with('-') || name.ends_with('-')
    {
        return Err(invalid("must start and end with a lowercase letter or digit"));
    }

    if name.contains("..") || name.contains("-.") || name.contains(".-") {
        return Err(invalid(
            "cannot contain consecutive dots or dot-hyphen combinations",
        ));
    }

    Ok(())
}
