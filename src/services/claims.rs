//! Identity claims extracted from the `Authorization` header.
//!
//! The gateway in front of this service is responsible for verifying token
//! signatures; here the payload segment is only decoded, never verified.
//! A missing or empty header yields default claims so that anonymous listing
//! queries still resolve to a (useless) default identity instead of failing.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const DEFAULT_USER_ID: &str = "defaultUserId";
const DEFAULT_USERNAME: &str = "defaultUsername";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is not a three-segment JWT")]
    Malformed,
    #[error("token payload is not valid base64url")]
    InvalidEncoding,
    #[error("token payload is not a valid claim set")]
    InvalidPayload,
}

/// Claims carried by a Cognito-style id token.
///
/// `cognito:groups` is kept as a raw JSON value: Cognito emits an array of
/// group names, but tokens with a single bare string occur in the wild and
/// both shapes must pass the membership check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdTokenClaims {
    #[serde(default)]
    pub sub: Option<String>,

    #[serde(default, rename = "cognito:username")]
    pub username: Option<String>,

    #[serde(default, rename = "cognito:groups")]
    pub groups: Option<Value>,
}

impl IdTokenClaims {
    /// Decode claims from a raw `Authorization` header value.
    ///
    /// - `None` or an empty string yields default claims.
    /// - An optional `Bearer ` prefix is stripped.
    /// - The payload (second dot-separated segment) is base64url decoded and
    ///   parsed as JSON. The signature segment is ignored.
    pub fn from_authorization(header: Option<&str>) -> Result<Self, TokenError> {
        let raw = match header {
            Some(value) if !value.trim().is_empty() => value.trim(),
            _ => return Ok(Self::default()),
        };

        let token = raw.strip_prefix("Bearer ").unwrap_or(raw);

        let mut segments = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed);
        };

        let decoded = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::InvalidEncoding)?;

        serde_json::from_slice(&decoded).map_err(|_| TokenError::InvalidPayload)
    }

    /// Subject identifier, used as the partition key for listing queries.
    pub fn user_id(&self) -> &str {
        self.sub.as_deref().unwrap_or(DEFAULT_USER_ID)
    }

    /// Cognito username, the owner recorded on created hotels.
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(DEFAULT_USERNAME)
    }

    /// Whether the group claim contains `group`.
    ///
    /// Accepts both a bare string claim and an array of strings.
    pub fn is_in_group(&self, group: &str) -> bool {
        match &self.groups {
            Some(Value::String(s)) => s == group,
            Some(Value::Array(items)) => items
                .iter()
                .any(|item| matches!(item, Value::String(s) if s == group)),
            _ => false,
        }
    }
}
