//! The HTTP client facade.
//!
//! # Design
//! `ApiClient` holds only its base URL, default headers and a transport, and
//! carries no mutable state between calls. `request` is split into three
//! steps: `build_request` produces an `HttpRequest`, the transport executes
//! it, and `parse_response` decodes the body and normalizes failures. Build
//! and parse are pure, so the error policy can be tested without a server.
//!
//! Construct one client and pass it by reference; there is no global
//! instance. Session state lives in the transport's cookie store.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::body::ResponseBody;
use crate::config::{ClientConfig, ConfigError};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

/// Per-call options for `ApiClient::request`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    /// Serialized as JSON when present.
    pub body: Option<Value>,
    /// Merged over the client's default headers.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `data` into the JSON body.
    pub fn with_json<B: Serialize + ?Sized>(self, data: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_value(data).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.with_body(body))
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Client for the DataFair backend.
#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    base_url: String,
    default_headers: Vec<(String, String)>,
    transport: T,
}

impl ApiClient<UreqTransport> {
    /// Client for `base_url` with the default timeout.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::from_config(&ClientConfig::new(base_url))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_transport(config, UreqTransport::new(config.timeout())))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        let mut default_headers = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
        merge_headers(
            &mut default_headers,
            config
                .default_headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_headers,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_request(&self, path: &str, options: &RequestOptions) -> Result<HttpRequest, ApiError> {
        let mut headers = self.default_headers.clone();
        merge_headers(&mut headers, options.headers.iter().cloned());

        let body = options
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;

        Ok(HttpRequest {
            method: options.method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        })
    }

    /// Decode `response` and map non-2xx statuses to `ApiError`.
    ///
    /// 401, 403, 404 and 500 map to fixed variants regardless of the body.
    /// Other failures take their message from the body's `error` field, then
    /// from a plain-text body, then fall back to naming the status.
    pub fn parse_response(&self, response: &HttpResponse) -> Result<ResponseBody, ApiError> {
        if response.is_success() {
            return ResponseBody::decode(response);
        }
        let message = match response.status {
            401 | 403 | 404 | 500 => None,
            // An undecodable error body still yields a status error.
            _ => ResponseBody::decode(response)
                .ok()
                .and_then(|body| body.error_message()),
        };
        Err(ApiError::from_status(response.status, message))
    }

    /// Build, send and parse one request.
    pub fn request(&self, path: &str, options: RequestOptions) -> Result<ResponseBody, ApiError> {
        let request = self.build_request(path, &options)?;
        debug!(method = %request.method, path, "API request");

        let result = self
            .transport
            .execute(&request)
            .map_err(ApiError::from)
            .and_then(|response| {
                debug!(status = response.status, path, "API response");
                self.parse_response(&response)
            });

        if let Err(err) = &result {
            warn!(method = %request.method, path, status = ?err.status_code(), error = %err, "API request failed");
        }
        result
    }

    pub fn get(&self, path: &str) -> Result<ResponseBody, ApiError> {
        self.request(path, RequestOptions::new(HttpMethod::Get))
    }

    pub fn post<B: Serialize + ?Sized>(&self, path: &str, data: &B) -> Result<ResponseBody, ApiError> {
        self.request(path, RequestOptions::new(HttpMethod::Post).with_json(data)?)
    }

    pub fn put<B: Serialize + ?Sized>(&self, path: &str, data: &B) -> Result<ResponseBody, ApiError> {
        self.request(path, RequestOptions::new(HttpMethod::Put).with_json(data)?)
    }

    pub fn delete(&self, path: &str) -> Result<ResponseBody, ApiError> {
        self.request(path, RequestOptions::new(HttpMethod::Delete))
    }
}

/// Replace same-named headers (case-insensitive), append the rest.
fn merge_headers(target: &mut Vec<(String, String)>, extra: impl IntoIterator<Item = (String, String)>) {
    for (name, value) in extra {
        match target.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(&name)) {
            Some(existing) => existing.1 = value,
            None => target.push((name, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::TransportError;
    use crate::testing::{json_response, text_response, MockTransport};

    const BASE_URL: &str = "http://localhost:5000";

    fn client(transport: &MockTransport) -> ApiClient<&MockTransport> {
        ApiClient::with_transport(&ClientConfig::new(BASE_URL), transport)
    }

    fn parse(status: u16, response: HttpResponse) -> Result<ResponseBody, ApiError> {
        let transport = MockTransport::default();
        let mut response = response;
        response.status = status;
        client(&transport).parse_response(&response)
    }

    #[test]
    fn build_request_defaults_to_get_with_json_content_type() {
        let transport = MockTransport::default();
        let req = client(&transport)
            .build_request("/auth/check", &RequestOptions::default())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:5000/auth/check");
        assert_eq!(
            req.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn option_headers_merge_over_defaults() {
        let transport = MockTransport::default();
        let options = RequestOptions::new(HttpMethod::Post)
            .with_header("content-type", "text/plain")
            .with_header("X-Trace", "abc");
        let req = client(&transport).build_request("/x", &options).unwrap();
        assert_eq!(
            req.headers,
            vec![
                ("Content-Type".to_string(), "text/plain".to_string()),
                ("X-Trace".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn configured_default_headers_are_sent() {
        let transport = MockTransport::default();
        let config = ClientConfig::new("http://localhost:5000/").with_header("X-Client", "cli");
        let client = ApiClient::with_transport(&config, &transport);
        let req = client.build_request("/api/earnings", &RequestOptions::default()).unwrap();
        assert_eq!(req.url, "http://localhost:5000/api/earnings");
        assert_eq!(req.header("x-client"), Some("cli"));
        assert_eq!(req.header("content-type"), Some("application/json"));
    }

    #[test]
    fn post_serializes_body_as_json() {
        let transport = MockTransport::with_responses(vec![json_response(200, json!({"ok": true}))]);
        client(&transport)
            .post("/api/payout", &json!({"amount": 10.5, "method": "paypal"}))
            .unwrap();

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, HttpMethod::Post);
        let body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"amount": 10.5, "method": "paypal"}));
    }

    #[test]
    fn put_and_delete_fix_their_methods() {
        let transport = MockTransport::with_responses(vec![
            json_response(200, json!({})),
            json_response(200, json!({})),
        ]);
        let c = client(&transport);
        c.put("/auth/profile", &json!({"first_name": "Ada"})).unwrap();
        c.delete("/api/data-permissions/3").unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Put);
        assert!(sent[0].body.is_some());
        assert_eq!(sent[1].method, HttpMethod::Delete);
        assert!(sent[1].body.is_none());
    }

    #[test]
    fn success_returns_json_unchanged() {
        let value = json!({"user": {"id": 1}, "list": [1, "two", null]});
        let body = parse(200, json_response(200, value.clone())).unwrap();
        assert_eq!(body, ResponseBody::Json(value));
    }

    #[test]
    fn success_returns_text_unchanged() {
        let body = parse(200, text_response(200, "  pong\n")).unwrap();
        assert_eq!(body, ResponseBody::Text("  pong\n".to_string()));
    }

    #[test]
    fn unauthorized_ignores_body() {
        let err = parse(401, json_response(401, json!({"error": "Invalid email or password"}))).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(err.to_string(), "Unauthorized – please login");
        assert_eq!(err.status_code(), Some(401));
    }

    #[test]
    fn mapped_statuses_take_precedence_over_body() {
        let err = parse(403, text_response(403, "nope")).unwrap_err();
        assert_eq!(err.to_string(), "Forbidden – insufficient permissions");
        let err = parse(404, json_response(404, json!({"error": "Activity not found"}))).unwrap_err();
        assert_eq!(err.to_string(), "Not found");
        let err = parse(500, json_response(500, json!({"error": "boom"}))).unwrap_err();
        assert_eq!(err.to_string(), "Server error");
    }

    #[test]
    fn unmapped_status_uses_error_field() {
        let err = parse(422, json_response(422, json!({"error": "Invalid input"}))).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input");
        assert_eq!(err.status_code(), Some(422));
    }

    #[test]
    fn unmapped_status_uses_text_body() {
        let err = parse(400, text_response(400, "bad request")).unwrap_err();
        assert_eq!(err.to_string(), "bad request");
    }

    #[test]
    fn unmapped_status_uses_json_string_body() {
        let err = parse(422, json_response(422, json!("bad request"))).unwrap_err();
        assert_eq!(err.to_string(), "bad request");
        assert_eq!(err.status_code(), Some(422));
    }

    #[test]
    fn malformed_success_body_keeps_status() {
        let mut malformed = text_response(200, "{");
        malformed.headers = vec![("content-type".into(), "application/json".into())];
        let err = parse(200, malformed).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization { .. }));
        assert_eq!(err.status_code(), Some(200));
    }

    #[test]
    fn unmapped_status_without_message_names_status() {
        let err = parse(409, json_response(409, json!({"success": false}))).unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 409");

        let mut malformed = text_response(502, "{");
        malformed.headers = vec![("content-type".into(), "application/json".into())];
        let err = parse(502, malformed).unwrap_err();
        assert_eq!(err.status_code(), Some(502));
    }

    #[test]
    fn transport_failure_has_no_status() {
        let transport = MockTransport::failing(TransportError::Connection("refused".into()));
        let err = client(&transport).get("/auth/check").unwrap_err();
        assert!(matches!(err, ApiError::Transport(TransportError::Connection(_))));
        assert_eq!(err.status_code(), None);
    }
}
