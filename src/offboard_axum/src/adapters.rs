//! Axum framework adapters.
//!
//! `InboundRequest` and `ResponseBuilder` are defined in `offboard_core`; they
//! are implemented here on newtype wrappers to get around the orphan rule.
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │  offboard_core::InboundRequest (trait)     │
//! └────────────────┬───────────────────────────┘
//!                  │
//!                  ▼
//! ┌────────────────────────────────────────────┐
//! │  AxumRequest(http::request::Parts)         │
//! │  impl InboundRequest for AxumRequest { }   │
//! └────────────────────────────────────────────┘
//! ```
//!
//! The request wrapper holds only the head of the request: the body is read
//! separately by the route, before the handler runs.

use axum::body::Body;
use axum::http::{Response, StatusCode, request::Parts};
use offboard_core::{InboundRequest, ResponseBuilder};

/// Newtype wrapper around the head of an Axum request.
#[repr(transparent)]
pub struct AxumRequest(pub Parts);

impl From<Parts> for AxumRequest {
    fn from(parts: Parts) -> Self {
        AxumRequest(parts)
    }
}

impl InboundRequest for AxumRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.0.headers.get(name)?.to_str().ok()
    }

    fn method(&self) -> &str {
        self.0.method.as_str()
    }

    fn path(&self) -> &str {
        self.0.uri.path()
    }
}

/// Wrapper around Axum's response builder.
pub struct AxumResponseBuilder {
    builder: axum::http::response::Builder,
    body: Option<String>,
}

impl AxumResponseBuilder {
    pub fn new() -> Self {
        Self {
            builder: Response::builder(),
            body: None,
        }
    }
}

impl Default for AxumResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseBuilder for AxumResponseBuilder {
    type Response = Response<Body>;

    fn status(mut self, code: u16) -> Self {
        self.builder = self.builder.status(code);
        self
    }

    fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    fn json_body(mut self, body: serde_json::Value) -> Self {
        self.builder = self.builder.header("content-type", "application/json");
        self.body = Some(body.to_string());
        self
    }

    fn build(self) -> Self::Response {
        let body = self.body.unwrap_or_default();
        self.builder.body(Body::from(body)).unwrap_or_else(|e| {
            // Only reachable with an invalid status code or header.
            tracing::error!(error = %e, "Failed to build response");
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        })
    }
}

/// Helper function to create an Axum response builder
pub fn response_builder() -> AxumResponseBuilder {
    AxumResponseBuilder::new()
}
