use std::cell::RefCell;

use futures::future::{ self, LocalBoxFuture };
use futures::FutureExt;

use crate::api::{ ApiRequest, RawResponse, Transport };
use crate::error::ApiError;

enum Reply {
    Response(RawResponse),
    NetworkFailure(String),
}

/// Transport that records every request and answers with a canned reply.
pub struct MockTransport {
    reply: Reply,
    requests: RefCell<Vec<ApiRequest>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn respond(status: u16, status_text: &str, body: &str) -> Self {
        Self {
            reply: Reply::Response(RawResponse {
                status,
                status_text: status_text.to_string(),
                body: body.as_bytes().to_vec(),
            }),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn ok(body: &str) -> Self {
        Self::respond(200, "OK", body)
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Reply::NetworkFailure(message.to_string()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.borrow().last().cloned()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'_, Result<RawResponse, ApiError>> {
        self.requests.borrow_mut().push(request);
        let reply = match &self.reply {
            Reply::Response(response) => Ok(response.clone()),
            Reply::NetworkFailure(message) => Err(ApiError::Network(message.clone())),
        };
        future::ready(reply).boxed_local()
    }
}
