//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only place the client performs I/O. `ApiClient` builds
//! the request and interprets the response, so tests can swap in a transport
//! that records requests and replays canned responses.
//!
//! `UreqTransport` keeps a cookie store on its agent. Session cookies set by
//! `/auth/login` are replayed on every following request, which is how the
//! backend authenticates callers; no token header is ever added.
//!
//! Success bodies are read up to ureq's default limit (10 MiB); a larger body
//! is a `TransportError`. Error bodies are truncated to `ERROR_BODY_LIMIT`
//! bytes instead, so an oversized error page still reports its status.

use std::io::Read;
use std::time::Duration;

use ureq::RequestBuilder;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Bytes kept from a non-2xx response body.
pub const ERROR_BODY_LIMIT: usize = 64 * 1024;

/// Executes one HTTP round-trip.
///
/// Non-2xx statuses are responses, not errors: implementations return them
/// as `HttpResponse` and leave interpretation to the client.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent with a cookie store.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            // Status codes are interpreted by the client.
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
        };

        let mut response = result.map_err(map_ureq_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = if (200..300).contains(&status) {
            response.body_mut().read_to_string().map_err(map_ureq_error)?
        } else {
            let mut bytes = Vec::new();
            response
                .body_mut()
                .with_config()
                .limit(u64::MAX)
                .reader()
                .take(ERROR_BODY_LIMIT as u64)
                .read_to_end(&mut bytes)
                .map_err(|e| TransportError::Connection(e.to_string()))?;
            String::from_utf8_lossy(&bytes).into_owned()
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn map_ureq_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::HostNotFound => TransportError::Connection("host not found".to_string()),
        ureq::Error::ConnectionFailed => TransportError::Connection("connection failed".to_string()),
        ureq::Error::Io(e) => TransportError::Connection(e.to_string()),
        other => TransportError::Other(other.to_string()),
    }
}
