use std::fs;
use std::path::{Path, PathBuf};

use s3up_core::config::{BucketConfig, CredentialsFile};
use s3up_core::error::ConfigError;
use tracing::{error, info};

/// File name of the credentials file inside the user's home directory.
pub const CREDENTIALS_FILE_NAME: &str = ".s3up-credentials.toml";

/// `~/.s3up-credentials.toml` for the current user.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    match dirs::home_dir() {
        Some(home) => Ok(home.join(CREDENTIALS_FILE_NAME)),
        None => {
            error!("Could not determine home directory");
            Err(ConfigError::NoHomeDir)
        }
    }
}

/// Reads and parses the TOML credentials file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CredentialsFile, ConfigError> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading credentials from file");

    let content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read credentials file");
            return Err(ConfigError::Read {
                path: path_ref.to_path_buf(),
                source: e,
            });
        }
    };

    let conf: CredentialsFile = match toml::from_str(&content) {
        Ok(conf) => conf,
        Err(e) => {
            error!(error = %e, config_path = ?path_ref, "Failed to parse credentials TOML");
            return Err(ConfigError::Parse {
                path: path_ref.to_path_buf(),
                source: e,
            });
        }
    };

    conf.trace_loaded();
    Ok(conf)
}

/// Looks up the bucket entry registered under `alias`.
pub fn select_bucket(conf: &CredentialsFile, alias: &str) -> Result<BucketConfig, ConfigError> {
    match conf.buckets.get(alias) {
        Some(bucket) => {
            info!(alias, name = %bucket.name, region = %bucket.region, "Selected bucket");
            Ok(bucket.clone())
        }
        None => {
            error!(alias, "Bucket missing from credentials file");
            Err(ConfigError::MissingBucket(alias.to_string()))
        }
    }
}
