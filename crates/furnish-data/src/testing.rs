//! Test doubles for the transport and delay seams.

use crate::{Delay, FetchError, HttpRequest, Response, Transport};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Replays queued responses in order and records every request.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Response, FetchError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: Result<Response, FetchError>) -> &Self {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
        self
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.push(Ok(Response::from_json(status, &body)))
    }

    pub fn push_status(&self, status: u16) -> &Self {
        self.push(Ok(Response::new(status, Default::default(), Vec::new())))
    }

    pub fn push_error(&self, error: FetchError) -> &Self {
        self.push(Err(error))
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    /// Responses still queued.
    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|queue| queue.len()).unwrap_or(0)
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<Response, FetchError> {
        let url = request.url.clone();
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| {
                Err(FetchError::RequestError(format!(
                    "no mock response queued for {}",
                    url
                )))
            })
    }
}

/// Records requested sleeps without waiting.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .map(|sleeps| sleeps.clone())
            .unwrap_or_default()
    }
}

#[async_trait(?Send)]
impl Delay for RecordingDelay {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut sleeps) = self.sleeps.lock() {
            sleeps.push(duration);
        }
    }
}
