//! # contract: seams between the upload pipeline and the outside world
//!
//! This module defines the two capabilities the pipeline consumes and the plain
//! data that flows through them:
//!
//! - [`ObjectStore`]: store a byte body under a key in a bucket (the S3 PUT).
//! - [`RemoteFetcher`]: fetch the body behind an `http(s)://` identifier.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`; with the `test-export-mocks` feature
//!   (on by default) `MockObjectStore` and `MockRemoteFetcher` are public so the
//!   CLI crate and integration tests can drive the pipeline without a network.
//!
//! ## Adding New Destinations
//! - Implement [`ObjectStore`] for the destination and hand it to the dispatcher.
//! - Convert upstream errors into the boxed error type; the upload task wraps
//!   them into [`crate::error::UploadError::Storage`].

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Boxed error returned across the trait seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A resolved object, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Full body of the local file or remote resource.
    pub content: Vec<u8>,
    /// Storage key derived from the identifier's base name.
    pub key: String,
    /// Content type inferred from the extension. `None` when unknown.
    pub content_type: Option<String>,
}

/// Canned access policy attached to an uploaded object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectAcl {
    PublicRead,
}

impl ObjectAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectAcl::PublicRead => "public-read",
        }
    }
}

/// Everything the storage client needs for a single PUT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    /// `None` leaves the bucket's default policy in charge.
    pub acl: Option<ObjectAcl>,
}

/// Status and body of a remote GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Storage capability: persist a body under a key.
///
/// Implemented by the S3 client in the CLI crate and by mocks in tests.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `req.body` under `req.key` in `req.bucket`.
    async fn put_object(&self, req: PutObjectRequest) -> Result<(), BoxError>;
}

/// Remote fetch capability: GET a URL.
///
/// Transport failures are errors; any HTTP status, including 4xx/5xx, is a
/// successful fetch whose status the caller inspects.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchResponse, BoxError>;
}
