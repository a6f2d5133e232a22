//! The single network seam of the client layer.

use crate::error::AppError;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, error};

/// One outbound GET, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub content_type: Option<String>,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            content_type: Some("application/json".to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and hands back whatever the server answered.
///
/// Implementations report network failures as `NetworkTimeout` or
/// `NetworkConnection` so the session can tell them apart from everything
/// else. HTTP status handling is left to the caller.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, AppError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, AppError> {
        (**self).send(request)
    }
}

/// Blocking reqwest client with a per-request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout_seconds: u64) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, AppError> {
        let mut builder = self.client.get(&request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().map_err(|e| classify(&request.url, e))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        let body = response.text().map_err(|e| {
            error!("Failed to read response text from URL {}: {}", request.url, e);
            classify(&request.url, e)
        })?;
        debug!("Response status: {status}, length: {} bytes", body.len());

        Ok(HttpResponse {
            status,
            body,
            content_type,
        })
    }
}

fn classify(url: &str, e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::network_timeout(url)
    } else if e.is_connect() || is_dropped_connection(&e) {
        AppError::network_connection(url, e.to_string())
    } else {
        AppError::ApiFetch(e)
    }
}

/// The peer accepted the connection and then reset or closed it before a
/// complete response arrived.
fn is_dropped_connection(e: &reqwest::Error) -> bool {
    if e.is_builder() || e.is_decode() || e.is_redirect() || e.status().is_some() {
        return false;
    }
    if e.is_request() {
        return true;
    }
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        if cause.is::<std::io::Error>() {
            return true;
        }
        source = cause.source();
    }
    false
}
