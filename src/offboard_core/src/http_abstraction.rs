//! Framework-agnostic HTTP abstraction traits.
//!
//! The deletion handler never sees a framework type directly. Web frameworks
//! implement these traits on newtype wrappers of their own request and
//! response-builder types:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  offboard_core: Defines HTTP traits      │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  offboard_axum: Newtype wrappers         │
//! │  struct AxumRequest(http::request::Parts)│
//! │  impl InboundRequest for AxumRequest { } │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  handle_delete_user is generic over      │
//! │  InboundRequest + ResponseBuilder        │
//! └──────────────────────────────────────────┘
//! ```

/// Read access to the parts of an inbound request the handler needs.
///
/// Header lookup must be case-insensitive (per HTTP spec). Returns `None` if
/// the header doesn't exist or isn't valid UTF-8.
pub trait InboundRequest {
    fn header(&self, name: &str) -> Option<&str>;

    /// The HTTP method (GET, POST, etc.)
    fn method(&self) -> &str;

    fn path(&self) -> &str;
}

/// Builder for the framework's response type.
///
/// ```ignore
/// builder
///     .status(200)
///     .json_body(json!({ "ok": true }))
///     .build()
/// ```
pub trait ResponseBuilder: Sized {
    /// The final response type produced by this builder
    type Response;

    fn status(self, code: u16) -> Self;

    fn header(self, name: &str, value: &str) -> Self;

    /// Set a JSON body and the `Content-Type: application/json` header.
    fn json_body(self, body: serde_json::Value) -> Self;

    fn build(self) -> Self::Response;
}

/// Shorthands for the two body shapes the deletion endpoint produces.
///
/// Automatically implemented for every `ResponseBuilder`.
pub trait ResponseHelpers: ResponseBuilder {
    /// `{"error": code}` with the given status.
    fn error_code(self, status: u16, code: &str) -> Self::Response {
        self.status(status)
            .json_body(serde_json::json!({ "error": code }))
            .build()
    }

    /// `{"ok": false, "error": code, "details": details}` with the given status.
    fn failure_with_details(self, status: u16, code: &str, details: &str) -> Self::Response {
        self.status(status)
            .json_body(serde_json::json!({
                "ok": false,
                "error": code,
                "details": details,
            }))
            .build()
    }

    /// `200 {"ok": true}`
    fn acknowledged(self) -> Self::Response {
        self.status(200)
            .json_body(serde_json::json!({ "ok": true }))
            .build()
    }
}

// Blanket implementation for all ResponseBuilder types
impl<T: ResponseBuilder> ResponseHelpers for T {}
