//! Configuration module
//!
//! Process configuration is read once from the environment into an explicit `Config`
//! value that is handed to every constructor that needs it. Nothing here is global.

use std::env;
use std::path::PathBuf;

use crate::constants::BYTES_PER_MB;
use crate::models::UploadKind;

// Common constants
const SERVER_PORT: u16 = 8091;
const DB_MAX_CONNECTIONS: u32 = 5;
const DB_TIMEOUT_SECS: u64 = 30;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;
const MAX_VIDEO_SIZE_MB: usize = 1024;

/// Server, database and authentication settings.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    /// Host name used when building local asset URLs.
    pub public_host: String,
    pub jwt_secret: String,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
}

/// Storage destinations and upload limits.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub assets_root: PathBuf,
    pub s3_bucket: String,
    pub s3_region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub s3_endpoint: Option<String>,
    pub max_thumbnail_size_bytes: usize,
    pub max_video_size_bytes: usize,
    /// Directory for intermediate video buffers; the system temp dir when unset.
    pub upload_temp_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub upload: UploadConfig,
}

fn required(name: &str) -> Result<String, anyhow::Error> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("{} must be set", name))
}

fn mb_to_bytes(name: &str, mb: usize) -> Result<usize, anyhow::Error> {
    mb.checked_mul(BYTES_PER_MB)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MB", name, mb))
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse::<u16>()
            .unwrap_or(SERVER_PORT);

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| DB_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .unwrap_or(DB_MAX_CONNECTIONS);

        let db_timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| DB_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .unwrap_or(DB_TIMEOUT_SECS);

        let max_thumbnail_size_mb = env::var("MAX_THUMBNAIL_SIZE_MB")
            .unwrap_or_else(|_| MAX_THUMBNAIL_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_THUMBNAIL_SIZE_MB);

        let max_video_size_mb = env::var("MAX_VIDEO_SIZE_MB")
            .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_VIDEO_SIZE_MB);

        let max_thumbnail_size_bytes =
            mb_to_bytes("MAX_THUMBNAIL_SIZE_MB", max_thumbnail_size_mb)?;
        let max_video_size_bytes = mb_to_bytes("MAX_VIDEO_SIZE_MB", max_video_size_mb)?;

        let s3_region = env::var("S3_REGION")
            .or_else(|_| env::var("AWS_REGION"))
            .map_err(|_| anyhow::anyhow!("S3_REGION or AWS_REGION must be set"))?;

        let config = Config {
            base: BaseConfig {
                server_port,
                public_host: env::var("PUBLIC_HOST").unwrap_or_else(|_| "localhost".to_string()),
                jwt_secret: required("JWT_SECRET")?,
                environment,
                database_url: required("DATABASE_URL")?,
                db_max_connections,
                db_timeout_seconds,
            },
            upload: UploadConfig {
                assets_root: env::var("ASSETS_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./assets")),
                s3_bucket: required("S3_BUCKET")?,
                s3_region,
                s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
                max_thumbnail_size_bytes,
                max_video_size_bytes,
                upload_temp_dir: env::var("UPLOAD_TEMP_DIR").ok().map(PathBuf::from),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.base.database_url.starts_with("postgres://")
            && !self.base.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a postgres:// or postgresql:// URL"
            ));
        }

        if self.upload.max_thumbnail_size_bytes == 0 || self.upload.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }

        if let Some(ref endpoint) = self.upload.s3_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "S3_ENDPOINT must start with http:// or https://"
                ));
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.base.jwt_secret
    }

    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.base.db_timeout_seconds
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    /// Base URL the local backend prefixes asset keys with.
    pub fn assets_base_url(&self) -> String {
        format!(
            "http://{}:{}{}",
            self.base.public_host,
            self.base.server_port,
            crate::constants::ASSETS_PATH
        )
    }

    /// Maximum request body accepted for the given upload kind.
    pub fn max_upload_bytes(&self, kind: UploadKind) -> usize {
        match kind {
            UploadKind::Thumbnail => self.upload.max_thumbnail_size_bytes,
            UploadKind::Video => self.upload.max_video_size_bytes,
        }
    }
}
