//! [`ObjectStore`] implementation on top of the AWS S3 SDK.
//!
//! The client is built once per run from the static keys in the credentials
//! file and the selected bucket's region, then shared by every upload task.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use s3up_core::contract::{BoxError, ObjectAcl, ObjectStore, PutObjectRequest};
use tracing::{debug, warn};

pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub async fn new(access_key_id: &str, secret_access_key: &str, region: &str) -> Self {
        let credentials = Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "s3up-credentials-file",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .load()
            .await;

        debug!(region, "Initialised S3 client");
        Self {
            client: Client::new(&aws_config),
        }
    }
}

fn canned_acl(acl: ObjectAcl) -> ObjectCannedAcl {
    ObjectCannedAcl::from(acl.as_str())
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, req: PutObjectRequest) -> Result<(), BoxError> {
        let mut put = self
            .client
            .put_object()
            .bucket(&req.bucket)
            .key(&req.key)
            .body(ByteStream::from(req.body))
            .set_content_type(req.content_type);

        if let Some(acl) = req.acl {
            put = put.acl(canned_acl(acl));
        }

        match put.send().await {
            Ok(_) => Ok(()),
            Err(e) => {
                let message = DisplayErrorContext(&e).to_string();
                warn!(bucket = %req.bucket, key = %req.key, error = %message, "S3 PutObject failed");
                Err(message.into())
            }
        }
    }
}
