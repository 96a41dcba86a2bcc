// src/probe/fakes.rs
// =============================================================================
// In-memory transport for tests.
//
// ScriptedTransport answers from a table of URL -> canned reply and records
// every request it sees, so aggregation and plan logic can be tested without
// a network. URLs without a scripted reply get a connection error.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::transport::{Transport, TransportRequest, TransportResponse};
use crate::error::TransportError;

#[derive(Debug, Clone)]
pub enum Reply {
    Response(TransportResponse),
    Timeout,
    Refused,
}

/// A request as the fake saw it: URL and the User-Agent it carried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub url: String,
    pub user_agent: String,
}

#[derive(Debug, Default, Clone)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<HashMap<String, Reply>>>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, url: &str, reply: Reply) -> Self {
        self.replies.lock().unwrap().insert(url.to_string(), reply);
        self
    }

    // 200 at `url`, with optional extra response headers
    pub fn ok(self, url: &str, body: &str, headers: &[(&'static str, &'static str)]) -> Self {
        self.reply(url, Reply::Response(response(200, url, body, headers)))
    }

    pub fn status(self, url: &str, status: u16) -> Self {
        self.reply(url, Reply::Response(response(status, url, "", &[])))
    }

    /// Every request seen so far (clones share the log)
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

pub fn response(
    status: u16,
    url: &str,
    body: &str,
    headers: &[(&'static str, &'static str)],
) -> TransportResponse {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    TransportResponse {
        status,
        headers: map,
        body: body.as_bytes().to_vec(),
        final_url: url.to_string(),
        history: Vec::new(),
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let user_agent = request
            .headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.seen.lock().unwrap().push(SeenRequest {
            url: request.url.clone(),
            user_agent,
        });

        let reply = self.replies.lock().unwrap().get(&request.url).cloned();
        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Timeout) => Err(TransportError::Timeout),
            Some(Reply::Refused) | None => {
                Err(TransportError::Connect("connection refused".to_string()))
            }
        }
    }
}
