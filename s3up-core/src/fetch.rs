use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::contract::{BoxError, FetchResponse, RemoteFetcher};

/// [`RemoteFetcher`] backed by a shared `reqwest` client.
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, BoxError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();
        debug!(url, status, size = body.len(), "GET completed");
        Ok(FetchResponse { status, body })
    }
}
