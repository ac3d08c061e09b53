use crate::config::BucketConfig;

/// Externally reachable URL for `key` in `bucket`.
///
/// Private objects always use the regional path-style endpoint, custom domain or not.
pub fn build_url(key: &str, bucket: &BucketConfig, private: bool) -> String {
    if private {
        format!(
            "https://s3-{}.amazonaws.com/{}/{}",
            bucket.region, bucket.name, key
        )
    } else {
        build_public_url(key, bucket)
    }
}

fn build_public_url(key: &str, bucket: &BucketConfig) -> String {
    if bucket.use_custom_domain {
        format!("http://{}/{}", bucket.name, key)
    } else {
        format!("http://{}.s3.amazonaws.com/{}", bucket.name, key)
    }
}
