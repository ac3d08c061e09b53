use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default access policy for a bucket's objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// One named bucket entry from the credentials file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketConfig {
    pub region: String,
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    /// The bucket name doubles as a custom domain.
    #[serde(default, rename = "cname")]
    pub use_custom_domain: bool,
}

/// Parsed `~/.s3up-credentials.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsFile {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default)]
    pub buckets: HashMap<String, BucketConfig>,
}

impl CredentialsFile {
    pub fn trace_loaded(&self) {
        info!(buckets_count = self.buckets.len(), "Loaded credentials file");
        for (alias, bucket) in &self.buckets {
            debug!(
                alias = %alias,
                name = %bucket.name,
                region = %bucket.region,
                cname = bucket.use_custom_domain,
                "Configured bucket"
            );
        }
    }
}

/// Per-run options taken from the command line. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Skip the public-read ACL.
    pub private: bool,
    /// Inject the unix timestamp into every key.
    pub add_timestamp: bool,
    /// Alias of the bucket entry to upload into.
    pub target_bucket: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            private: false,
            add_timestamp: false,
            target_bucket: "default".to_string(),
        }
    }
}

impl RunOptions {
    /// Whether uploads into `bucket` go out without a public ACL.
    pub fn is_private_for(&self, bucket: &BucketConfig) -> bool {
        self.private || bucket.visibility == Visibility::Private
    }
}
