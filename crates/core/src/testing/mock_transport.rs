//! Mock transport with scripted responses.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::transport::{Transport, TransportError, TransportRequest};

/// Mock implementation of [`Transport`].
///
/// Responses are consumed in the order they were scripted; every request is
/// recorded for assertions. An unscripted request fails instead of hanging.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next response body.
    pub fn push_response(&self, body: impl Into<Vec<u8>>) {
        self.responses.lock().unwrap().push_back(Ok(body.into()));
    }

    /// Script the next response as a transport failure.
    pub fn push_error(&self, err: TransportError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    /// All requests seen so far, in order.
    pub fn recorded_requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, request: TransportRequest) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Client("no scripted response".to_string())))
    }
}
