//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Records every request and replays queued responses in order.
#[derive(Debug, Default)]
pub struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
}

impl MockTransport {
    pub fn with_responses(responses: Vec<HttpResponse>) -> Self {
        Self {
            requests: Mutex::default(),
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
        }
    }

    pub fn failing(error: TransportError) -> Self {
        Self {
            requests: Mutex::default(),
            responses: Mutex::new(VecDeque::from([Err(error)])),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// JSON bodies of the recorded requests, `Null` for body-less ones.
    pub fn bodies(&self) -> Vec<Value> {
        self.requests()
            .iter()
            .map(|r| {
                r.body
                    .as_deref()
                    .map(|b| serde_json::from_str(b).unwrap())
                    .unwrap_or(Value::Null)
            })
            .collect()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no response queued".to_string())))
    }
}

pub fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: body.to_string(),
    }
}

pub fn text_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_string(), "text/plain; charset=utf-8".to_string())],
        body: body.to_string(),
    }
}
