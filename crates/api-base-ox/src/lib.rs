#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Base abstractions for thin HTTP API client wrappers
//!
//! A concrete client owns a [`RequestState`], implements [`ApiClient`] and
//! overrides the two hooks it cares about: [`ApiClient::configure_headers`]
//! and [`ApiClient::clear`]. Request assembly, the transport call, JSON
//! decoding and status-code checking are shared.
//!
//! # Example
//!
//! ```rust,no_run
//! use api_base_ox::{ApiClient, HttpMethod, Params, RequestState};
//!
//! struct Postmark {
//!     state: RequestState,
//!     token: String,
//! }
//!
//! impl ApiClient for Postmark {
//!     fn state(&self) -> &RequestState {
//!         &self.state
//!     }
//!
//!     fn state_mut(&mut self) -> &mut RequestState {
//!         &mut self.state
//!     }
//!
//!     fn configure_headers(&mut self) {
//!         let token = self.token.clone();
//!         let headers = self.state_mut().headers_mut();
//!         headers.clear();
//!         headers.insert("Content-Type".into(), "application/json".into());
//!         headers.insert("X-Postmark-Server-Token".into(), token);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Postmark {
//!         state: RequestState::new("https://api.postmarkapp.com"),
//!         token: "server-token".to_string(),
//!     };
//!
//!     let servers = client
//!         .build_request("/servers", Params::new(), HttpMethod::Get)
//!         .fetch()
//!         .await?;
//!     println!("{servers}");
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod method;
pub mod params;
pub mod request_builder;
pub mod transport;

pub use client::ApiClient;
pub use error::ApiError;
pub use method::HttpMethod;
pub use params::Params;
pub use request_builder::{HttpRequest, RequestBody, RequestState, is_status_ok};
pub use transport::{ReqwestTransport, Transport, TransportResponse};

/// Re-export common types for convenience
pub use async_trait::async_trait;
pub use serde_json::{Value, json};
