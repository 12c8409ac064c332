//! Minimal HTTP/1 client used to scrape text endpoints.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt as _, Empty};
use hyper::Request;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("only http:// URLs are supported: {0}")]
    OnlyHttpSupported(String),

    #[error("http request build failed: {0}")]
    RequestBuild(#[from] http::Error),

    #[error("http request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),

    #[error("http request timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to read response body: {0}")]
    BodyRead(#[from] hyper::Error),

    #[error("unexpected http status {0}")]
    Status(u16),
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client<HttpConnector, Empty<Bytes>>,
    timeout: Option<Duration>,
}

impl Default for HttpClient {
    fn default() -> Self {
        // The OS-level TCP connect timeout can be very long (tens of seconds); an
        // unreachable metrics endpoint should fail promptly.
        Self::new(Some(Duration::from_secs(3)), Some(Duration::from_secs(30)))
    }
}

impl HttpClient {
    #[must_use]
    pub fn new(connect_timeout: Option<Duration>, timeout: Option<Duration>) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(connect_timeout);

        let inner = Client::builder(TokioExecutor::new()).build(connector);

        Self { inner, timeout }
    }

    /// GETs `url` and returns the body as (lossy) UTF-8. Non-2xx statuses are
    /// errors.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let parsed = url::Url::parse(url).map_err(|_| Error::InvalidUrl(url.to_string()))?;
        if parsed.scheme() != "http" {
            return Err(Error::OnlyHttpSupported(url.to_string()));
        }

        let uri: hyper::Uri = url
            .parse()
            .map_err(|_| Error::InvalidUrl(url.to_string()))?;
        let req = Request::get(uri).body(Empty::<Bytes>::new())?;

        let res = match self.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, self.inner.request(req)).await {
                Ok(res) => res?,
                Err(_) => return Err(Error::Timeout(timeout)),
            },
            None => self.inner.request(req).await?,
        };

        let (parts, body) = res.into_parts();
        if !parts.status.is_success() {
            return Err(Error::Status(parts.status.as_u16()));
        }

        let body = body.collect().await?.to_bytes();
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
