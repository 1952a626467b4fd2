use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::ApiError,
    method::HttpMethod,
    params::Params,
    request_builder::{RequestState, is_status_ok},
    transport::TransportResponse,
};

/// Base behaviour shared by thin API clients.
///
/// Implementors own a [`RequestState`] and may override the two hooks:
/// [`configure_headers`](Self::configure_headers) runs at the start of every
/// [`build_request`](Self::build_request) and [`clear`](Self::clear) runs once
/// per [`fetch`](Self::fetch), after the response arrived and before its
/// status is looked at.
#[async_trait]
pub trait ApiClient: Send {
    fn state(&self) -> &RequestState;

    fn state_mut(&mut self) -> &mut RequestState;

    /// Set headers for the next call. Defaults to no headers.
    fn configure_headers(&mut self) {
        self.state_mut().headers_mut().clear();
    }

    /// Reset per-call state once a call completed.
    fn clear(&mut self) {
        self.state_mut().reset();
    }

    /// Prepare the next call and return `self` for chaining into `fetch`.
    ///
    /// For `GET`, empty entries of `body` are dropped and the rest is appended
    /// to `route` as a query string. Otherwise `body` is sent as JSON when the
    /// configured `Content-Type` is `application/json`, and form-encoded as-is
    /// when it is not. A `Custom` spelling of a known verb is treated as
    /// that verb.
    fn build_request(&mut self, route: &str, body: Params, method: HttpMethod) -> &mut Self
    where
        Self: Sized,
    {
        self.configure_headers();
        self.state_mut().prepare(route, body, method);
        self
    }

    /// Send the built request and decode its JSON body.
    ///
    /// A body that is not valid JSON decodes to `Value::Null`. Statuses
    /// outside `[200, 300)` become [`ApiError::Response`] unless the state is
    /// in debug mode, in which case the decoded body is returned as-is.
    async fn fetch(&mut self) -> Result<Value, ApiError> {
        let prepared = self.state_mut().take_request();
        let outcome = match prepared {
            Ok(request) => {
                let transport = self.state().transport();
                transport.send(request).await
            }
            Err(e) => Err(e),
        };

        self.clear();

        let TransportResponse { status, body } = outcome?;
        let decoded = decode_body(status, &body);

        if !is_status_ok(status) && !self.state().is_debug() {
            return Err(ApiError::response(status, decoded));
        }

        Ok(decoded)
    }

    /// `build_request` followed by `fetch`.
    async fn request(
        &mut self,
        route: &str,
        body: Params,
        method: HttpMethod,
    ) -> Result<Value, ApiError>
    where
        Self: Sized,
    {
        self.build_request(route, body, method).fetch().await
    }
}

/// Bytes of an undecodable body echoed to the debug log
const PREVIEW_LEN: usize = 256;

fn decode_body(status: u16, body: &[u8]) -> Value {
    match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            if !body.is_empty() {
                log::warn!(
                    "HTTP {status} body is not valid JSON ({e}, {} bytes)",
                    body.len()
                );
                log::debug!("HTTP {status} body starts with: {}", preview(body));
            }
            Value::Null
        }
    }
}

fn preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(&body[..body.len().min(PREVIEW_LEN)]);
    if body.len() > PREVIEW_LEN {
        format!("{text}...")
    } else {
        text.into_owned()
    }
}
