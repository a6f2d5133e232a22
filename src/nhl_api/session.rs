//! Request construction, retry and response decoding shared by every
//! resource client.

use super::retry::RetryPolicy;
use super::transport::{HttpRequest, HttpResponse, Transport};
use crate::constants::api::{DEFAULT_BASE_URL, STATS_BASE_URL, USER_AGENT};
use crate::error::AppError;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error, info, instrument};

/// Logical name of an API origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BaseUrl {
    #[default]
    Default,
    Stats,
}

impl BaseUrl {
    pub const ALL: [BaseUrl; 2] = [BaseUrl::Default, BaseUrl::Stats];

    pub fn name(self) -> &'static str {
        match self {
            BaseUrl::Default => "default",
            BaseUrl::Stats => "stats",
        }
    }
}

impl FromStr for BaseUrl {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(BaseUrl::Default),
            "stats" => Ok(BaseUrl::Stats),
            _ => Err(AppError::config_error(format!(
                "base_url_type must be one of ['default', 'stats'], got '{s}'"
            ))),
        }
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Origin table, fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrls {
    default: String,
    stats: String,
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, STATS_BASE_URL)
    }
}

impl BaseUrls {
    pub fn new(default: impl Into<String>, stats: impl Into<String>) -> Self {
        Self {
            default: default.into().trim_end_matches('/').to_string(),
            stats: stats.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn resolve(&self, base: BaseUrl) -> &str {
        match base {
            BaseUrl::Default => &self.default,
            BaseUrl::Stats => &self.stats,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
    Text,
}

impl FromStr for ResponseFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ResponseFormat::Json),
            "text" => Ok(ResponseFormat::Text),
            other => Err(AppError::config_error(format!(
                "response_type must be 'json' or 'text', got: {other}"
            ))),
        }
    }
}

/// Decoded response body. No schema is imposed on JSON payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn into_json(self) -> Result<Value, AppError> {
        match self {
            Payload::Json(value) => Ok(value),
            Payload::Text(_) => Err(AppError::config_error(
                "expected a JSON payload but the request asked for text",
            )),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Payload::Json(value) => value.to_string(),
            Payload::Text(text) => text,
        }
    }
}

/// Path on one of the API origins plus its query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub base: BaseUrl,
    pub query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            base: BaseUrl::Default,
            query: Vec::new(),
        }
    }

    pub fn stats(path: impl Into<String>) -> Self {
        Self {
            base: BaseUrl::Stats,
            ..Self::new(path)
        }
    }

    pub fn with_query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn url(&self, urls: &BaseUrls) -> String {
        format!("{}{}", urls.resolve(self.base), self.path)
    }
}

/// Shared connection state: transport, origins, default headers and retry policy.
#[derive(Debug)]
pub struct NhlSession<T: Transport> {
    transport: T,
    base_urls: BaseUrls,
    headers: Vec<(String, String)>,
    retry: RetryPolicy,
    verbose: bool,
}

impl<T: Transport> NhlSession<T> {
    pub fn new(transport: T, base_urls: BaseUrls) -> Self {
        Self {
            transport,
            base_urls,
            headers: default_headers(),
            retry: RetryPolicy::default(),
            verbose: false,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn base_urls(&self) -> &BaseUrls {
        &self.base_urls
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issues one GET and decodes the body.
    ///
    /// Connection failures and timeouts are retried under the session's
    /// [`RetryPolicy`]. A non-2xx status is terminal.
    pub fn get(&self, endpoint: &Endpoint, format: ResponseFormat) -> Result<Payload, AppError> {
        let url = endpoint.url(&self.base_urls);
        let response = self.fetch(endpoint)?;
        match format {
            ResponseFormat::Text => Ok(Payload::Text(response.body)),
            ResponseFormat::Json => decode_json(&response.body, &url).map(Payload::Json),
        }
    }

    /// Issues one GET and returns the successful response undecoded, with
    /// its status and content type.
    #[instrument(skip(self), fields(base = %endpoint.base, path = %endpoint.path))]
    pub fn fetch(&self, endpoint: &Endpoint) -> Result<HttpResponse, AppError> {
        if !endpoint.path.starts_with('/') {
            return Err(AppError::config_error(format!(
                "endpoint path must start with '/', got '{}'",
                endpoint.path
            )));
        }

        let request = HttpRequest {
            url: endpoint.url(&self.base_urls),
            query: endpoint.query.clone(),
            headers: self.headers.clone(),
        };

        if self.verbose {
            info!("Making request: {}", request.url);
        } else {
            debug!("Making request: {}", request.url);
        }

        let response = self
            .retry
            .run(&request.url, || self.transport.send(&request))?;

        if !response.is_success() {
            error!("HTTP {} (URL: {})", response.status, request.url);
            return Err(AppError::from_status(response.status, request.url));
        }
        Ok(response)
    }

    pub fn get_json(&self, endpoint: &Endpoint) -> Result<Value, AppError> {
        self.get(endpoint, ResponseFormat::Json)?.into_json()
    }

    pub fn get_text(&self, endpoint: &Endpoint) -> Result<String, AppError> {
        self.get(endpoint, ResponseFormat::Text).map(Payload::into_text)
    }

    /// String-keyed entry point. Both names are checked before any request
    /// is built.
    pub fn get_named(
        &self,
        path: &str,
        response_format: &str,
        base_url_name: &str,
        query: &[(&str, &str)],
    ) -> Result<Payload, AppError> {
        let base: BaseUrl = base_url_name.parse()?;
        let format: ResponseFormat = response_format.parse()?;
        let endpoint = query.iter().fold(
            Endpoint {
                base,
                ..Endpoint::new(path)
            },
            |endpoint, (name, value)| endpoint.with_query(name, value),
        );
        self.get(&endpoint, format)
    }
}

fn default_headers() -> Vec<(String, String)> {
    vec![
        ("Accept".to_string(), "application/json".to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
        ("User-Agent".to_string(), USER_AGENT.to_string()),
    ]
}

fn decode_json(body: &str, url: &str) -> Result<Value, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::api_no_data("Response body is empty", url));
    }
    serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse API response: {} (URL: {})", e, url);
        let preview: String = body.chars().take(200).collect();
        debug!("Response text (first 200 chars): {preview}");
        AppError::api_malformed_json(e.to_string(), url)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::StubTransport;
    use serde_json::json;

    fn session(stub: StubTransport) -> NhlSession<StubTransport> {
        NhlSession::new(stub, BaseUrls::new("http://web.test", "http://stats.test/rest"))
            .with_retry_policy(RetryPolicy::immediate(5))
    }

    #[test]
    fn test_base_url_names() {
        assert_eq!("default".parse::<BaseUrl>().unwrap(), BaseUrl::Default);
        assert_eq!("STATS".parse::<BaseUrl>().unwrap(), BaseUrl::Stats);
        assert!(matches!("statz".parse::<BaseUrl>(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_base_urls_trim_trailing_slash() {
        let urls = BaseUrls::new("http://a.test/", "http://b.test/rest/");
        assert_eq!(Endpoint::new("/v1/season").url(&urls), "http://a.test/v1/season");
        assert_eq!(Endpoint::stats("/en/team").url(&urls), "http://b.test/rest/en/team");
    }

    #[test]
    fn test_every_registered_base_resolves_to_its_origin() {
        let stub = StubTransport::new();
        stub.push_json(json!({}));
        stub.push_json(json!({}));
        let session = session(stub);

        for base in BaseUrl::ALL {
            session
                .get_named("/ping", "json", base.name(), &[])
                .unwrap();
        }

        let urls: Vec<String> = session
            .transport()
            .requests()
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(urls, vec!["http://web.test/ping", "http://stats.test/rest/ping"]);
    }

    #[test]
    fn test_unknown_base_url_fails_before_network() {
        let session = session(StubTransport::panicking());
        let err = session.get_named("/v1/season", "json", "legacy", &[]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_unknown_response_format_fails_before_network() {
        let session = session(StubTransport::panicking());
        let err = session.get_named("/v1/season", "xml", "default", &[]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_default_headers_are_sent() {
        let stub = StubTransport::new();
        stub.push_json(json!([]));
        let session = session(stub);
        session.get_json(&Endpoint::new("/v1/season")).unwrap();

        let request = session.transport().last_request().unwrap();
        assert!(request.headers.contains(&("Accept".to_string(), "application/json".to_string())));
        assert!(request
            .headers
            .contains(&("User-Agent".to_string(), "nhl-api-client/1.0.0".to_string())));
    }

    #[test]
    fn test_retry_then_success_calls_transport_three_times() {
        let stub = StubTransport::new();
        stub.push_error(AppError::network_timeout("http://web.test/v1/season"));
        stub.push_error(AppError::network_connection("http://web.test/v1/season", "reset"));
        stub.push_json(json!([20232024, 20242025]));
        let session = session(stub);

        let value = session.get_json(&Endpoint::new("/v1/season")).unwrap();
        assert_eq!(value, json!([20232024, 20242025]));
        assert_eq!(session.transport().call_count(), 3);
    }

    #[test]
    fn test_http_error_status_is_terminal() {
        let stub = StubTransport::new();
        stub.push_status(503, "");
        stub.push_json(json!({}));
        let session = session(stub);

        let err = session.get_json(&Endpoint::new("/v1/season")).unwrap_err();
        assert!(matches!(err, AppError::ApiServiceUnavailable { status: 503, .. }));
        assert_eq!(session.transport().call_count(), 1);
    }

    #[test]
    fn test_text_format_returns_raw_body() {
        let stub = StubTransport::new();
        stub.push_status(200, "not json at all");
        let session = session(stub);

        let text = session.get_text(&Endpoint::new("/robots.txt")).unwrap();
        assert_eq!(text, "not json at all");
    }

    #[test]
    fn test_malformed_and_empty_json() {
        let stub = StubTransport::new();
        stub.push_status(200, "<html>");
        stub.push_status(200, "  ");
        let session = session(stub);

        assert!(matches!(
            session.get_json(&Endpoint::new("/a")),
            Err(AppError::ApiMalformedJson { .. })
        ));
        assert!(matches!(
            session.get_json(&Endpoint::new("/b")),
            Err(AppError::ApiNoData { .. })
        ));
    }

    #[test]
    fn test_query_params_are_forwarded() {
        let stub = StubTransport::new();
        stub.push_json(json!({}));
        let session = session(stub);
        session
            .get_named("/v1/skater-stats-leaders/current", "json", "default", &[("limit", "10")])
            .unwrap();

        let request = session.transport().last_request().unwrap();
        assert_eq!(request.query, vec![("limit".to_string(), "10".to_string())]);
    }

    #[test]
    fn test_relative_path_is_rejected() {
        let session = session(StubTransport::panicking());
        let err = session.get_json(&Endpoint::new("v1/season")).unwrap_err();
        assert!(err.is_preflight());
    }
}
