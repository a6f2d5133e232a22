use crate::error::AppError;
use crate::nhl_api::transport::{HttpRequest, HttpResponse, Transport};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Scripted transport for exercising the client layer without a network.
///
/// Responses are served in the order they were pushed. Every request is
/// recorded so tests can assert on URLs, query strings and call counts.
#[derive(Debug, Default)]
pub struct StubTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, AppError>>>,
    requests: RefCell<Vec<HttpRequest>>,
    calls: Cell<usize>,
    panic_on_send: bool,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that fails the test if anything reaches it
    pub fn panicking() -> Self {
        Self {
            panic_on_send: true,
            ..Self::default()
        }
    }

    pub fn push_json(&self, value: Value) {
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse::ok(value.to_string())));
    }

    pub fn push_status(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
            content_type: None,
        }));
    }

    pub fn push_error(&self, error: AppError) {
        self.responses.borrow_mut().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }

    /// URLs requested so far, with query pairs appended in `?a=b&c=d` form
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| {
                if r.query.is_empty() {
                    r.url.clone()
                } else {
                    let query: Vec<String> =
                        r.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
                    format!("{}?{}", r.url, query.join("&"))
                }
            })
            .collect()
    }
}

impl Transport for StubTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, AppError> {
        if self.panic_on_send {
            panic!("no request expected, got GET {}", request.url);
        }
        self.calls.set(self.calls.get() + 1);
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response left for GET {}", request.url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            url: url.to_string(),
            query: vec![("limit".to_string(), "5".to_string())],
            headers: vec![],
        }
    }

    #[test]
    fn test_stub_serves_in_order_and_records() {
        let stub = StubTransport::new();
        stub.push_json(json!({"a": 1}));
        stub.push_status(404, "");

        assert_eq!(stub.send(&request("http://x/1")).unwrap().status, 200);
        assert_eq!(stub.send(&request("http://x/2")).unwrap().status, 404);
        assert_eq!(stub.call_count(), 2);
        assert_eq!(stub.requested_urls(), vec!["http://x/1?limit=5", "http://x/2?limit=5"]);
    }

    #[test]
    #[should_panic(expected = "no request expected")]
    fn test_panicking_stub_rejects_requests() {
        let _ = StubTransport::panicking().send(&request("http://x/1"));
    }
}
