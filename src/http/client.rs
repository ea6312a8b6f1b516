use crate::error::Result;
use hyper::body::Bytes;
use hyper::client::HttpConnector;
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Method, Request, StatusCode};
use log::info;

/// Status and full body of a response.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// HTTP client posting JSON payloads.
#[derive(Clone)]
pub struct Client {
    inner: hyper::Client<HttpConnector>,
    verbose: bool,
}

impl Client {
    pub fn new(verbose: bool) -> Self {
        Self {
            inner: hyper::Client::new(),
            verbose,
        }
    }

    /// POST `body` to `url` as `application/json` and read the whole reply.
    pub async fn post(&self, url: &str, body: Vec<u8>) -> Result<Reply> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))?;
        let response = self.inner.request(request).await?;
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await?;
        if self.verbose {
            info!("client: {}", status);
        }
        Ok(Reply { status, body })
    }
}
