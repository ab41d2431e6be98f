use anyhow::{Context, Result, bail};
use clap::Parser;
use std::env;

const SUPPORTED_REGIONS: [&str; 8] = [
    "local",
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "ap-southeast-1",
    "ap-northeast-1",
];

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage_dir: String,
    pub database_url: String,
    pub bucket_name: String,
    pub region: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Hotel listing API")]
pub struct Args {
    /// Host to bind to (overrides HOTEL_API_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides HOTEL_API_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where image payloads are stored (overrides HOTEL_API_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<String>,

    /// Database URL (overrides HOTEL_API_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Bucket name for uploaded images (overrides HOTEL_API_BUCKET)
    #[arg(long)]
    pub bucket_name: Option<String>,

    /// Deployment region identifier (overrides HOTEL_API_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();

        let env_host = env::var("HOTEL_API_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("HOTEL_API_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing HOTEL_API_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading HOTEL_API_PORT"),
        };
        let env_storage =
            env::var("HOTEL_API_STORAGE_DIR").unwrap_or_else(|_| "./data/objects".into());
        let env_db = env::var("HOTEL_API_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/meta/hotel_api.db".into());
        let env_bucket = env::var("HOTEL_API_BUCKET").unwrap_or_else(|_| "hotel-images".into());
        let env_region = env::var("HOTEL_API_REGION").unwrap_or_else(|_| "local".into());

        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            storage_dir: args.storage_dir.unwrap_or(env_storage),
            database_url: args.database_url.unwrap_or(env_db),
            bucket_name: args.bucket_name.unwrap_or(env_bucket),
            region: args.region.unwrap_or(env_region).to_lowercase(),
        };
        cfg.ensure_region_valid()?;

        Ok((cfg, args.migrate))
    }

    /// Validate region string against SUPPORTED_REGIONS. Case-insensitive.
    fn ensure_region_valid(&self) -> Result<()> {
        if SUPPORTED_REGIONS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(&self.region))
        {
            Ok(())
        } else {
            bail!("region `{}` is not supported", self.region)
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
