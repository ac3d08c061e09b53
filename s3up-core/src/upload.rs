//! A single upload: resolve one identifier and PUT it into the target bucket.

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use crate::config::{BucketConfig, RunOptions};
use crate::contract::{ObjectAcl, ObjectStore, PutObjectRequest, RemoteFetcher};
use crate::error::UploadError;
use crate::resolve::resolve;
use crate::url::build_url;

/// Read-only state shared by every upload task in a run.
#[derive(Clone)]
pub struct UploadContext {
    pub options: RunOptions,
    pub bucket: BucketConfig,
    pub store: Arc<dyn ObjectStore>,
    pub fetcher: Arc<dyn RemoteFetcher>,
}

impl UploadContext {
    pub fn new(
        options: RunOptions,
        bucket: BucketConfig,
        store: Arc<dyn ObjectStore>,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Self {
        Self {
            options,
            bucket,
            store,
            fetcher,
        }
    }

    fn is_private(&self) -> bool {
        self.options.is_private_for(&self.bucket)
    }
}

/// Outcome of one identifier's upload.
#[derive(Debug)]
pub struct UploadResult {
    pub identifier: String,
    /// Storage key, known once the identifier resolved.
    pub key: Option<String>,
    /// Final URL on success.
    pub outcome: Result<String, UploadError>,
}

impl UploadResult {
    pub fn failed(identifier: impl Into<String>, key: Option<String>, err: UploadError) -> Self {
        Self {
            identifier: identifier.into(),
            key,
            outcome: Err(err),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn url(&self) -> Option<&str> {
        self.outcome.as_ref().ok().map(String::as_str)
    }

    pub fn error(&self) -> Option<&UploadError> {
        self.outcome.as_ref().err()
    }
}

/// Resolve and upload `identifier`. Every failure is folded into the result.
pub async fn upload(identifier: String, ctx: &UploadContext) -> UploadResult {
    let span = info_span!("upload", identifier = %identifier);
    upload_inner(identifier, ctx).instrument(span).await
}

async fn upload_inner(identifier: String, ctx: &UploadContext) -> UploadResult {
    let obj = match resolve(&identifier, ctx.options.add_timestamp, ctx.fetcher.as_ref()).await {
        Ok(obj) => obj,
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "Failed to resolve content");
            return UploadResult::failed(identifier, None, e);
        }
    };

    let private = ctx.is_private();
    let key = obj.key;
    let req = PutObjectRequest {
        bucket: ctx.bucket.name.clone(),
        key: key.clone(),
        body: obj.content,
        content_type: obj.content_type,
        acl: (!private).then_some(ObjectAcl::PublicRead),
    };

    info!(
        bucket = %req.bucket,
        key = %req.key,
        size = req.body.len(),
        private,
        "Putting object"
    );

    match ctx.store.put_object(req).await {
        Ok(()) => {
            let url = build_url(&key, &ctx.bucket, private);
            info!(url = %url, "Upload succeeded");
            UploadResult {
                identifier,
                key: Some(key),
                outcome: Ok(url),
            }
        }
        Err(e) => {
            warn!(error = %e, key = %key, "PUT failed");
            UploadResult::failed(identifier, Some(key), UploadError::Storage(e))
        }
    }
}
