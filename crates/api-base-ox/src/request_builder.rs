use std::{collections::HashMap, fmt, sync::Arc};

use bon::Builder;
use serde_json::Value;

use crate::{
    error::ApiError,
    method::HttpMethod,
    params::{self, Params},
    transport::{ReqwestTransport, Transport},
};

const CONTENT_TYPE: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Returns whether `code` is in `[200, 300)`.
pub fn is_status_ok(code: u16) -> bool {
    (200..300).contains(&code)
}

/// Body of a built request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized JSON, sent verbatim
    Json(String),
    /// Raw payload, sent form-urlencoded by the transport
    Form(Params),
}

/// Fully assembled request handed to a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Per-client request state.
///
/// `base_uri`, `debug` and the transport are fixed at construction. Route,
/// method, headers and body describe the call currently being built and are
/// overwritten by every `build_request`.
#[derive(Builder)]
pub struct RequestState {
    #[builder(into)]
    base_uri: String,
    /// Return error bodies as-is instead of converting non-2xx responses
    #[builder(default)]
    debug: bool,
    #[builder(default = Arc::new(ReqwestTransport::default()) as Arc<dyn Transport>)]
    transport: Arc<dyn Transport>,
    /// Sent as `User-Agent` unless the header hook sets one
    #[builder(into)]
    user_agent: Option<String>,
    #[builder(skip)]
    route: Option<String>,
    #[builder(skip)]
    method: Option<HttpMethod>,
    #[builder(skip)]
    headers: HashMap<String, String>,
    #[builder(skip)]
    body: Option<RequestBody>,
    /// Set by `prepare`, consumed by `take_request`
    #[builder(skip)]
    ready: bool,
}

impl fmt::Debug for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestState")
            .field("base_uri", &self.base_uri)
            .field("debug", &self.debug)
            .field("user_agent", &self.user_agent)
            .field("route", &self.route)
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("ready", &self.ready)
            .field("transport", &"<Transport>")
            .finish()
    }
}

impl RequestState {
    /// State for `base_uri` using the default reqwest transport.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self::builder().base_uri(base_uri).build()
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Effective route of the built request, query string included
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn method(&self) -> Option<&HttpMethod> {
        self.method.as_ref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Whether the header hook asked for JSON bodies
    pub fn is_json(&self) -> bool {
        self.header(CONTENT_TYPE) == Some(JSON_CONTENT_TYPE)
    }

    /// Set route, method and body for the next call.
    ///
    /// Headers must already be configured: the JSON branch depends on them.
    pub fn prepare(&mut self, route: &str, body: Params, method: HttpMethod) {
        let method = method.normalize();
        if method.is_get() {
            self.route = Some(params::append_query(route, &params::filter_empty(&body)));
            self.body = None;
        } else if self.is_json() {
            self.route = Some(route.to_string());
            self.body = Some(RequestBody::Json(Value::Object(body).to_string()));
        } else {
            self.route = Some(route.to_string());
            self.body = Some(RequestBody::Form(body));
        }
        self.method = Some(method);
        self.ready = true;

        log::debug!(
            "built {} {} (body: {})",
            self.method.as_ref().map_or("?", HttpMethod::as_str),
            self.route.as_deref().unwrap_or_default(),
            match &self.body {
                None => "none",
                Some(RequestBody::Json(_)) => "json",
                Some(RequestBody::Form(_)) => "form",
            }
        );
    }

    /// Snapshot of the built request, `None` until `prepare` succeeded.
    pub fn to_request(&self) -> Option<HttpRequest> {
        let route = self.route.as_ref()?;
        let method = self.method.clone()?;

        let mut headers = self.headers.clone();
        if let Some(user_agent) = &self.user_agent {
            if find_header(&headers, "User-Agent").is_none() {
                headers.insert("User-Agent".to_string(), user_agent.clone());
            }
        }

        Some(HttpRequest {
            method,
            url: format!("{}{}", self.base_uri, route),
            headers,
            body: self.body.clone(),
        })
    }

    /// Hand out the built request once.
    ///
    /// Fails with [`ApiError::NotBuilt`] if nothing was prepared since the
    /// last call.
    pub fn take_request(&mut self) -> Result<HttpRequest, ApiError> {
        if !self.ready {
            return Err(ApiError::NotBuilt);
        }
        self.ready = false;
        self.to_request().ok_or(ApiError::NotBuilt)
    }

    /// Drop headers and body of the last call.
    ///
    /// Route and method stay readable until the next `prepare` overwrites them.
    pub fn reset(&mut self) {
        self.headers.clear();
        self.body = None;
    }
}

fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
