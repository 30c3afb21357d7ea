//! Request-scoped key/value stash.
//!
//! A [`Store`] lives on a [`Context`](crate::context::Context) for the
//! duration of one request. Handlers early in the middleware chain stash
//! named values; handlers further down read them with [`Store::get`] or
//! consume them exactly once with [`Store::take`], without the values ever
//! appearing in function signatures.
//!
//! Lookups come in two flavors:
//!
//! - **strict** ([`get`](Store::get), [`take`](Store::take)) — a miss is a
//!   contract violation (a handler ran out of order) and returns a
//!   [`StoreError`] that maps to a `404` for the pipeline's error stage.
//! - **non-strict** ([`get_opt`](Store::get_opt), [`take_opt`](Store::take_opt))
//!   — a miss is an expected outcome and returns `None`.
//!
//! Payloads are [`serde_json::Value`]s. When the caller knows the concrete
//! shape, [`get_as`](Store::get_as) and [`take_as`](Store::take_as)
//! deserialize into a named type and fail loudly on a mismatch instead of
//! casting blindly.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

use crate::http::{Response, StatusCode};

pub mod middleware;

pub use middleware::StoreInit;

/// Errors raised by strict and typed stash lookups.
///
/// Every variant carries the offending key for diagnostics and maps to a
/// fixed HTTP status / machine-readable code pair via [`status`](Self::status)
/// and [`code`](Self::code), so a generic error-handling stage can turn it
/// into a client-facing response without inspecting variants.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A strict lookup missed. Maps to `404` / `NOT_FOUND`.
    #[error("key `{key}` is not found in the request store")]
    KeyNotFound { key: String },

    /// The key was present but its payload does not deserialize into the
    /// requested type. Maps to `500` / `BAD_PAYLOAD`.
    #[error("payload under key `{key}` does not match the requested type")]
    Payload {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// The HTTP status an outer error handler should answer with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::KeyNotFound { .. } => StatusCode::NotFound,
            Self::Payload { .. } => StatusCode::InternalServerError,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::KeyNotFound { .. } => "NOT_FOUND",
            Self::Payload { .. } => "BAD_PAYLOAD",
        }
    }

    /// The key the failed lookup asked for.
    pub fn key(&self) -> &str {
        match self {
            Self::KeyNotFound { key } | Self::Payload { key, .. } => key,
        }
    }

    /// Renders the error as a JSON response for the client:
    ///
    /// ```json
    /// {"error": {"code": "NOT_FOUND", "key": "user", "status": 404}}
    /// ```
    pub fn into_response(self) -> Response {
        let status = self.status();
        Response::json(
            status,
            &json!({
                "error": {
                    "code": self.code(),
                    "key": self.key(),
                    "status": status.as_u16(),
                }
            }),
        )
    }
}

impl From<StoreError> for Response {
    fn from(err: StoreError) -> Self {
        err.into_response()
    }
}

/// The per-request key/value stash.
///
/// Keys are unique; re-insertion overwrites. The store is owned exclusively
/// by one request's [`Context`](crate::context::Context) and is dropped with
/// it — nothing survives the request.
///
/// # Examples
///
/// ```
/// use reqstash::store::Store;
/// use serde_json::json;
///
/// let mut store = Store::new();
/// store.set("user", json!({"id": 1}));
///
/// assert_eq!(store.get("user").unwrap(), &json!({"id": 1}));
///
/// let user = store.take("user").unwrap();
/// assert_eq!(user, json!({"id": 1}));
/// assert!(store.get_opt("user").is_none());
/// ```
#[derive(Debug, Default)]
pub struct Store {
    entries: HashMap<String, Value>,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stashes `value` under `key`, overwriting any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        tracing::trace!(key = %key, "stash set");
        self.entries.insert(key, value.into());
    }

    /// Strict lookup: returns the value, leaving it in the store.
    ///
    /// # Errors
    ///
    /// [`StoreError::KeyNotFound`] when `key` was never stashed (or was
    /// already consumed by [`take`](Self::take)).
    pub fn get(&self, key: &str) -> Result<&Value, StoreError> {
        self.entries.get(key).ok_or_else(|| StoreError::KeyNotFound {
            key: key.to_owned(),
        })
    }

    /// Non-strict lookup: returns `None` on a miss instead of an error.
    pub fn get_opt(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Strict typed lookup: deserializes the stashed value into `T`,
    /// leaving it in the store.
    ///
    /// # Errors
    ///
    /// - [`StoreError::KeyNotFound`] on a miss.
    /// - [`StoreError::Payload`] when the value does not deserialize into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        let value = self.get(key)?;
        serde_json::from_value(value.clone()).map_err(|source| StoreError::Payload {
            key: key.to_owned(),
            source,
        })
    }

    /// Strict one-time consumption: returns the value and removes it, so the
    /// next lookup for `key` misses. The removal happens only on a hit.
    ///
    /// # Errors
    ///
    /// [`StoreError::KeyNotFound`] on a miss.
    pub fn take(&mut self, key: &str) -> Result<Value, StoreError> {
        let value = self
            .entries
            .remove(key)
            .ok_or_else(|| StoreError::KeyNotFound {
                key: key.to_owned(),
            })?;
        tracing::trace!(key = %key, "stash take");
        Ok(value)
    }

    /// Non-strict one-time consumption: removes and returns the value on a
    /// hit, `None` on a miss.
    pub fn take_opt(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Strict typed consumption. The entry is removed only when it both
    /// exists and deserializes into `T`; a payload mismatch leaves the store
    /// untouched.
    ///
    /// # Errors
    ///
    /// - [`StoreError::KeyNotFound`] on a miss.
    /// - [`StoreError::Payload`] when the value does not deserialize into `T`.
    pub fn take_as<T: DeserializeOwned>(&mut self, key: &str) -> Result<T, StoreError> {
        let decoded = self.get_as(key)?;
        self.entries.remove(key);
        Ok(decoded)
    }

    /// Returns `true` if `key` is currently stashed.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stashed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stashed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry. Used by the defensive reset in
    /// [`StoreInit`](middleware::StoreInit).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn set_then_get_returns_value_unchanged() {
        let mut store = Store::new();
        store.set("user", json!({"id": 1}));
        assert_eq!(store.get("user").unwrap(), &json!({"id": 1}));
        // get leaves the entry in place
        assert!(store.contains("user"));
    }

    #[test]
    fn strict_get_miss_carries_key() {
        let store = Store::new();
        let err = store.get("session").unwrap_err();
        assert!(matches!(&err, StoreError::KeyNotFound { key } if key == "session"));
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.status().as_u16(), 404);
    }

    #[test]
    fn non_strict_get_miss_is_none() {
        let store = Store::new();
        assert!(store.get_opt("never-set").is_none());
    }

    #[test]
    fn take_consumes_exactly_once() {
        let mut store = Store::new();
        store.set("token", json!("abc123"));

        let taken = store.take("token").unwrap();
        assert_eq!(taken, json!("abc123"));
        assert!(store.get_opt("token").is_none());
        assert!(store.take("token").is_err());
    }

    #[test]
    fn non_strict_take_miss_is_none() {
        let mut store = Store::new();
        assert!(store.take_opt("missing").is_none());
    }

    #[test]
    fn strict_take_miss_maps_to_not_found() {
        let mut store = Store::new();
        let err = store.take("missing").unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.status().as_u16(), 404);
        assert_eq!(err.key(), "missing");
    }

    #[test]
    fn reinsertion_overwrites() {
        let mut store = Store::new();
        store.set("count", json!(1));
        store.set("count", json!(2));
        assert_eq!(store.get("count").unwrap(), &json!(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = Store::new();
        store.set("a", json!(1));
        store.set("b", json!(2));
        store.clear();
        assert!(store.is_empty());
        assert!(store.get_opt("a").is_none());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u64,
    }

    #[test]
    fn typed_get_round_trips() {
        let mut store = Store::new();
        store.set("user", json!({"id": 1}));
        let user: User = store.get_as("user").unwrap();
        assert_eq!(user, User { id: 1 });
        // typed read does not consume
        assert!(store.contains("user"));
    }

    #[test]
    fn typed_get_rejects_mismatched_payload() {
        let mut store = Store::new();
        store.set("user", json!("not an object"));
        let err = store.get_as::<User>("user").unwrap_err();
        assert_eq!(err.code(), "BAD_PAYLOAD");
        assert_eq!(err.status().as_u16(), 500);
        assert_eq!(err.key(), "user");
    }

    #[test]
    fn typed_take_leaves_entry_on_mismatch() {
        let mut store = Store::new();
        store.set("user", json!(42));
        assert!(store.take_as::<User>("user").is_err());
        // the entry is still there for a corrected read
        assert!(store.contains("user"));

        store.set("user", json!({"id": 9}));
        let user: User = store.take_as("user").unwrap();
        assert_eq!(user, User { id: 9 });
        assert!(!store.contains("user"));
    }

    #[test]
    fn error_response_shape() {
        let err = StoreError::KeyNotFound {
            key: "user".to_owned(),
        };
        let response = err.into_response();
        assert_eq!(response.status().as_u16(), 404);

        let body: Value = serde_json::from_slice(response.body_bytes()).unwrap();
        assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
        assert_eq!(body["error"]["key"], json!("user"));
        assert_eq!(body["error"]["status"], json!(404));
    }
}
