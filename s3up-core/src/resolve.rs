//! Content resolution: turn an identifier into bytes plus key and content type.
//!
//! An identifier is tried as a local path first. When nothing exists at that
//! path and it carries an `http://` or `https://` prefix it is fetched through
//! the [`RemoteFetcher`]. Anything else is reported as not found.

use std::io::ErrorKind;

use tracing::{debug, info, warn};

use crate::contract::{ObjectInfo, RemoteFetcher};
use crate::error::UploadError;
use crate::key::{build_key, content_type_for};

const URL_PREFIXES: [&str; 2] = ["http://", "https://"];

pub fn is_url(identifier: &str) -> bool {
    URL_PREFIXES
        .iter()
        .any(|prefix| identifier.starts_with(prefix))
}

/// Resolve `identifier` into an [`ObjectInfo`].
pub async fn resolve(
    identifier: &str,
    add_timestamp: bool,
    fetcher: &dyn RemoteFetcher,
) -> Result<ObjectInfo, UploadError> {
    let content = match tokio::fs::metadata(identifier).await {
        Ok(_) => read_local(identifier).await?,
        Err(_) if is_url(identifier) => {
            println!("{identifier} is not a local file, will attempt to fetch it as an URL");
            fetch_remote(identifier, fetcher).await?
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(identifier, "No local file and not a URL");
            return Err(UploadError::NotFound(identifier.to_string()));
        }
        Err(e) => {
            warn!(error = ?e, identifier, "Failed to stat local path");
            return Err(UploadError::Io {
                path: identifier.to_string(),
                source: e,
            });
        }
    };

    Ok(build_object_info(content, identifier, add_timestamp))
}

fn build_object_info(content: Vec<u8>, identifier: &str, add_timestamp: bool) -> ObjectInfo {
    ObjectInfo {
        content,
        key: build_key(identifier, add_timestamp),
        content_type: content_type_for(identifier),
    }
}

async fn read_local(path: &str) -> Result<Vec<u8>, UploadError> {
    match tokio::fs::read(path).await {
        Ok(content) => {
            debug!(path, size = content.len(), "Read local file");
            Ok(content)
        }
        Err(e) => {
            warn!(error = ?e, path, "Failed to read local file");
            Err(UploadError::Io {
                path: path.to_string(),
                source: e,
            })
        }
    }
}

async fn fetch_remote(url: &str, fetcher: &dyn RemoteFetcher) -> Result<Vec<u8>, UploadError> {
    info!(url, "Fetching remote content");
    let response = fetcher.get(url).await.map_err(|e| {
        warn!(error = ?e, url, "Remote fetch failed");
        UploadError::Network {
            url: url.to_string(),
            source: e,
        }
    })?;

    if response.status != 200 {
        warn!(status = response.status, url, "Remote fetch returned non-OK status");
        return Err(UploadError::NotFound(url.to_string()));
    }

    debug!(url, size = response.body.len(), "Fetched remote content");
    Ok(response.body)
}
