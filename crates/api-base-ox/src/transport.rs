use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    Method,
    header::{HeaderMap, HeaderName, HeaderValue},
};

use crate::{
    error::ApiError,
    params,
    request_builder::{HttpRequest, RequestBody},
};

/// Status code and raw body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a built request and returns the raw response.
///
/// Implementations must not interpret the status code: non-2xx responses are
/// returned as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<TransportResponse, ApiError>;
}

/// [`Transport`] backed by a `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    fn build(&self, request: HttpRequest) -> Result<reqwest::RequestBuilder, ApiError> {
        let method = Method::try_from(&request.method)?;
        let mut req = self.client.request(method, &request.url);

        // Body first: `form` sets its own content type, caller headers win.
        req = match request.body {
            Some(RequestBody::Json(json)) => req.body(json),
            Some(RequestBody::Form(payload)) => req.form(&params::to_pairs(&payload)),
            None => req,
        };

        Ok(req.headers(header_map(&request.headers)?))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<TransportResponse, ApiError> {
        log::debug!("sending {} {}", request.method, request.url);

        let res = self.build(request)?.send().await?;
        let status = res.status().as_u16();
        let body = res.bytes().await?;

        Ok(TransportResponse { status, body })
    }
}

fn header_map<'a>(
    headers: impl IntoIterator<Item = (&'a String, &'a String)>,
) -> Result<HeaderMap, ApiError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ApiError::InvalidHeader(format!("{name}: {value}")))?;
        map.insert(name, value);
    }
    Ok(map)
}
