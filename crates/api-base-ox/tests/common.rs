#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use api_base_ox::{
    ApiClient, ApiError, HttpRequest, RequestState, Transport, TransportResponse, async_trait,
};

/// Transport that records requests and replays a canned response
#[derive(Debug)]
pub struct RecordingTransport {
    status: u16,
    body: &'static str,
    pub requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new(status: u16, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<TransportResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        Ok(TransportResponse::new(self.status, self.body))
    }
}

/// Transport that never reaches a server
#[derive(Debug)]
pub struct UnreachableTransport;

#[async_trait]
impl Transport for UnreachableTransport {
    async fn send(&self, request: HttpRequest) -> Result<TransportResponse, ApiError> {
        Err(ApiError::InvalidHeader(format!("unreachable: {}", request.url)))
    }
}

/// Mail-delivery style client used to exercise the hooks
#[derive(Debug)]
pub struct MailClient {
    pub state: RequestState,
    pub token: String,
    pub json: bool,
    pub events: Vec<&'static str>,
}

impl MailClient {
    pub fn new(transport: Arc<dyn Transport>, debug: bool) -> Self {
        Self::with_base_uri("https://api.mail.test", transport, debug)
    }

    pub fn with_base_uri(
        base_uri: impl Into<String>,
        transport: Arc<dyn Transport>,
        debug: bool,
    ) -> Self {
        Self {
            state: RequestState::builder()
                .base_uri(base_uri)
                .debug(debug)
                .transport(transport)
                .build(),
            token: "server-token".to_string(),
            json: true,
            events: Vec::new(),
        }
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }
}

impl ApiClient for MailClient {
    fn state(&self) -> &RequestState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RequestState {
        &mut self.state
    }

    fn configure_headers(&mut self) {
        self.events.push("configure_headers");
        let token = self.token.clone();
        let json = self.json;
        let headers = self.state.headers_mut();
        headers.clear();
        headers.insert("Accept".into(), "application/json".into());
        headers.insert("X-Server-Token".into(), token);
        if json {
            headers.insert("Content-Type".into(), "application/json".into());
        }
    }

    fn clear(&mut self) {
        self.events.push("clear");
        self.state.reset();
    }
}
