use std::{convert::Infallible, fmt, str::FromStr};

use reqwest::Method;
use strum::AsRefStr;

use crate::ApiError;

/// HTTP method for a request
///
/// The set is open: anything not listed is carried as [`HttpMethod::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Custom(String),
}

impl HttpMethod {
    pub fn is_get(&self) -> bool {
        self.as_str().eq_ignore_ascii_case("GET")
    }

    /// Fold a `Custom` spelling of a known verb into its named variant.
    #[must_use]
    pub fn normalize(self) -> Self {
        match self {
            HttpMethod::Custom(verb) => HttpMethod::from(verb.as_str()),
            other => other,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Custom(verb) => verb,
            other => other.as_ref(),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = match s.to_ascii_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "HEAD" => HttpMethod::Head,
            "OPTIONS" => HttpMethod::Options,
            _ => HttpMethod::Custom(s.to_string()),
        };
        Ok(method)
    }
}

impl From<&str> for HttpMethod {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(method) => method,
            Err(never) => match never {},
        }
    }
}

impl TryFrom<&HttpMethod> for Method {
    type Error = ApiError;

    fn try_from(method: &HttpMethod) -> Result<Self, Self::Error> {
        Ok(match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
            HttpMethod::Custom(verb) => Method::from_bytes(verb.as_bytes())
                .map_err(|_| ApiError::InvalidMethod(verb.clone()))?,
        })
    }
}
