//! Configuration module
//!
//! Storage configuration for the asset router: the CDN object store, the
//! application-local file store and per-category upload ceilings.

use std::env;

use crate::models::AssetCategory;

const DEFAULT_CDN_FOLDER: &str = "aula";
const DEFAULT_CDN_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOCAL_STORAGE_PATH: &str = "uploads";
const DEFAULT_LOCAL_STORAGE_BASE_URL: &str = "http://localhost:3000/uploads";
const MAX_IMAGE_SIZE_MB: usize = 10;
const MAX_DOCUMENT_SIZE_MB: usize = 10;
const MAX_VIDEO_SIZE_MB: usize = 100;

/// CDN object store configuration
#[derive(Clone, Debug)]
pub struct CdnConfig {
    pub bucket: Option<String>,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub endpoint: Option<String>,
    /// Public base URL served by the CDN (e.g. "https://cdn.example.edu")
    pub public_url: Option<String>,
    /// Logical folder every image is uploaded under
    pub folder: String,
    pub timeout_secs: u64,
}

/// Application-local file store configuration
#[derive(Clone, Debug)]
pub struct LocalStoreConfig {
    pub path: String,
    /// Root URL the application serves the store under
    pub base_url: String,
}

/// Upper bounds applied on top of each purpose's own limit
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub max_image_size_bytes: usize,
    pub max_document_size_bytes: usize,
    pub max_video_size_bytes: usize,
}

impl UploadLimits {
    pub fn ceiling_for(&self, category: AssetCategory) -> Option<usize> {
        match category {
            AssetCategory::Image => Some(self.max_image_size_bytes),
            AssetCategory::Document => Some(self.max_document_size_bytes),
            AssetCategory::Video => Some(self.max_video_size_bytes),
            AssetCategory::Unsupported => None,
        }
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_image_size_bytes: MAX_IMAGE_SIZE_MB * 1024 * 1024,
            max_document_size_bytes: MAX_DOCUMENT_SIZE_MB * 1024 * 1024,
            max_video_size_bytes: MAX_VIDEO_SIZE_MB * 1024 * 1024,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub cdn: CdnConfig,
    pub local: LocalStoreConfig,
    pub limits: UploadLimits,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn is_absolute_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| non_empty(lookup(key));

        let size_mb = |key: &str, default: usize| -> Result<usize, anyhow::Error> {
            let mb = match var(key) {
                Some(raw) => raw
                    .parse::<usize>()
                    .map_err(|_| anyhow::anyhow!("{} must be a whole number of megabytes", key))?,
                None => default,
            };
            mb.checked_mul(1024 * 1024)
                .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MB", key, mb))
        };

        let cdn = CdnConfig {
            bucket: var("AULA_CDN_BUCKET"),
            region: var("AULA_CDN_REGION").or_else(|| var("AWS_REGION")),
            endpoint: var("AULA_CDN_ENDPOINT"),
            public_url: var("AULA_CDN_PUBLIC_URL").map(|u| u.trim_end_matches('/').to_string()),
            folder: var("AULA_CDN_FOLDER")
                .map(|f| f.trim_matches('/').to_string())
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| DEFAULT_CDN_FOLDER.to_string()),
            timeout_secs: match var("AULA_CDN_TIMEOUT_SECS") {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| anyhow::anyhow!("AULA_CDN_TIMEOUT_SECS must be a valid number"))?,
                None => DEFAULT_CDN_TIMEOUT_SECS,
            },
        };

        let local = LocalStoreConfig {
            path: var("LOCAL_STORAGE_PATH").unwrap_or_else(|| DEFAULT_LOCAL_STORAGE_PATH.to_string()),
            base_url: var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LOCAL_STORAGE_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        };

        let limits = UploadLimits {
            max_image_size_bytes: size_mb("MAX_IMAGE_SIZE_MB", MAX_IMAGE_SIZE_MB)?,
            max_document_size_bytes: size_mb("MAX_DOCUMENT_SIZE_MB", MAX_DOCUMENT_SIZE_MB)?,
            max_video_size_bytes: size_mb("MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB)?,
        };

        let config = Config {
            environment: var("ENVIRONMENT")
                .or_else(|| var("APP_ENV"))
                .unwrap_or_else(|| "development".to_string()),
            cdn,
            local,
            limits,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !is_absolute_http_url(&self.local.base_url) {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_BASE_URL must be an absolute http(s) URL"
            ));
        }

        if let Some(ref public_url) = self.cdn.public_url {
            if !is_absolute_http_url(public_url) {
                return Err(anyhow::anyhow!(
                    "AULA_CDN_PUBLIC_URL must be an absolute http(s) URL"
                ));
            }
        }

        if self.cdn.public_url.as_deref() == Some(self.local.base_url.as_str()) {
            return Err(anyhow::anyhow!(
                "AULA_CDN_PUBLIC_URL and LOCAL_STORAGE_BASE_URL must differ"
            ));
        }

        if self.is_production() && self.cdn.bucket.is_none() {
            return Err(anyhow::anyhow!(
                "AULA_CDN_BUCKET must be set in production"
            ));
        }

        if self.limits.max_image_size_bytes == 0
            || self.limits.max_document_size_bytes == 0
            || self.limits.max_video_size_bytes == 0
        {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }

        Ok(())
    }
}
