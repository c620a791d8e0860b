use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use url::Url;

use crate::error::{Error, Result};

/// Fetches the body behind a fully built request URL.
///
/// One attempt per call; no retries.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("avwx-rs/", env!("CARGO_PKG_VERSION"))),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let res = self.http.get(url.clone()).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(status_error(status, res.text().await.ok()));
        }

        Ok(res.bytes().await?.to_vec())
    }
}

/// A non-success status, with as much of the body as could be read.
fn status_error(status: StatusCode, body: Option<String>) -> Error {
    let body = body.as_deref().map_or_else(|| "<unreadable body>".to_string(), truncate_body);
    Error::Transport(format!("request failed with status {status}: {body}"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
