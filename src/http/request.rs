//! An already-parsed HTTP request.
//!
//! The transport layer (an external collaborator) parses wire bytes and hands
//! the pipeline a finished [`Request`]. This crate only builds and reads them.

use bytes::Bytes;

use super::{Headers, Method};

/// An incoming HTTP request, as seen by the middleware pipeline.
///
/// Constructed with the builder methods; there is no parsing here.
///
/// # Examples
///
/// ```
/// use reqstash::http::{Method, Request};
///
/// let request = Request::new(Method::Post, "/orders")
///     .header("Content-Type", "application/json")
///     .body(r#"{"sku":"A-1"}"#);
///
/// assert_eq!(request.method(), &Method::Post);
/// assert_eq!(request.path(), "/orders");
/// assert_eq!(request.headers().get("content-type"), Some("application/json"));
/// ```
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    headers: Headers,
    body: Bytes,
}

impl Request {
    /// Creates a request with the given method and path, no headers, and an
    /// empty body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Appends a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the raw body bytes.
    pub fn body_bytes(&self) -> &Bytes {
        &self.body
    }
}
