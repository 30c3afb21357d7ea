//! HTTP response builder.
//!
//! Responses carry a status, headers, and a body; the transport layer is
//! responsible for putting them on the wire.

use serde::Serialize;

use super::{Headers, StatusCode};

/// An HTTP response produced by the middleware pipeline.
///
/// # Examples
///
/// ```
/// use reqstash::http::{Response, StatusCode};
///
/// let response = Response::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body("done");
///
/// assert_eq!(response.status(), StatusCode::Ok);
/// assert_eq!(response.body_bytes(), b"done");
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Vec<u8>,
}

impl Response {
    /// Creates a new response with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Creates a response with a JSON body and `Content-Type: application/json`.
    ///
    /// If `body` cannot be serialized the response degrades to a plain
    /// `500 Internal Server Error`; pipeline stages stay total.
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => Self::new(status)
                .header("Content-Type", "application/json")
                .body_vec(bytes),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize JSON response body");
                Self::new(StatusCode::InternalServerError).body("response serialization failed")
            }
        }
    }

    /// Appends a response header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Appends a header in-place. Intended for middleware that decorates a
    /// response received from downstream without consuming it.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name, value);
    }

    /// Sets the response body from a string.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into().into_bytes();
        self
    }

    /// Sets the response body from raw bytes.
    #[must_use]
    pub fn body_vec(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the body bytes.
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn plain_body() {
        let r = Response::new(StatusCode::Created).body("made");
        assert_eq!(r.status().as_u16(), 201);
        assert_eq!(r.body_bytes(), b"made");
    }

    #[test]
    fn json_body_sets_content_type() {
        let r = Response::json(StatusCode::Ok, &json!({"ready": true}));
        assert_eq!(r.headers().get("content-type"), Some("application/json"));
        let decoded: Value = serde_json::from_slice(r.body_bytes()).unwrap();
        assert_eq!(decoded, json!({"ready": true}));
    }

    #[test]
    fn decorate_in_place() {
        let mut r = Response::new(StatusCode::Ok);
        r.add_header("X-Request-Id", "r-1");
        assert_eq!(r.headers().get("x-request-id"), Some("r-1"));
    }
}
