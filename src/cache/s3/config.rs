//! S3 cache configuration

use serde::{Deserialize, Serialize};

/// Settings for the memory + S3 backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3CacheConfig {
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Prepended verbatim to every object key
    #[serde(default)]
    pub prefix: String,
    /// Custom endpoint (MinIO, LocalStack); path-style addressing is used when set
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
}

impl Default for S3CacheConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: default_region(),
            prefix: String::new(),
            endpoint: None,
            access_key: None,
            secret_key: None,
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl S3CacheConfig {
    /// Explicit credentials, when both halves are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.access_key.as_deref(), self.secret_key.as_deref()) {
            (Some(ak), Some(sk)) => Some((ak, sk)),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.bucket.is_empty() {
            return Err("s3.bucket cannot be empty when the s3 backend is selected".to_string());
        }
        if self.region.is_empty() {
            return Err("s3.region cannot be empty".to_string());
        }
        match (&self.access_key, &self.secret_key) {
            (Some(_), None) | (None, Some(_)) => Err(
                "s3.access_key and s3.secret_key must be set together".to_string(),
            ),
            _ => Ok(()),
        }
    }
}
