//! Request descriptors.

use bytes::Bytes;
use http::Method;

/// `application/json`
pub const APPLICATION_JSON: &str = "application/json";
/// `text/plain`
pub const TEXT_PLAIN: &str = "text/plain";

/// Everything the transport executor needs for one HTTP round trip.
///
/// The path is appended verbatim to the configured host, so it already
/// carries any locator or `fields` query. The `Content-Type` header is only
/// sent when a body is present.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method.
    pub method: Method,

    /// The path, including any query string.
    pub path: String,

    /// The `Accept` header value.
    pub accept: &'static str,

    /// The `Content-Type` header value, used only with a body.
    pub content_type: &'static str,

    /// The raw request body.
    pub body: Option<Bytes>,
}

impl Request {
    /// Creates a body-less JSON request.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            accept: APPLICATION_JSON,
            content_type: APPLICATION_JSON,
            body: None,
        }
    }

    /// Creates a request carrying a `text/plain` body.
    pub fn text(method: Method, path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            accept: TEXT_PLAIN,
            content_type: TEXT_PLAIN,
            body: Some(Bytes::from(value.into())),
        }
    }

    /// Overrides the `Accept` header.
    pub fn accept(mut self, accept: &'static str) -> Self {
        self.accept = accept;
        self
    }

    /// Sets the body and its content type.
    pub fn body(mut self, content_type: &'static str, body: impl Into<Bytes>) -> Self {
        self.content_type = content_type;
        self.body = Some(body.into());
        self
    }
}
