//! Per-request context — the ambient object handlers pass down the chain.
//!
//! A [`Context`] wraps the incoming [`Request`] and owns exactly one
//! [`Store`]. The store is created as part of context construction, so every
//! context that reaches a handler already carries a usable (empty) stash —
//! there is no "store not initialized" state to defend against at call sites.

use crate::Request;
use crate::store::Store;

/// The per-request ambient object flowing through the middleware chain.
///
/// Moved by value from middleware to middleware via
/// [`Next::run`](crate::middleware::Next::run); exclusive ownership by one
/// request's sequential chain is the concurrency model, so no locking is
/// involved and stash contents survive `.await` points between handlers.
pub struct Context {
    request: Request,
    store: Store,
}

impl Context {
    /// Creates a context for `request` with a fresh, empty store attached.
    pub fn new(request: Request) -> Self {
        Self {
            request,
            store: Store::new(),
        }
    }

    /// Returns the incoming request.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Read access to the request's stash.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Write access to the request's stash.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Empties the store, discarding every stashed entry.
    ///
    /// Used by [`StoreInit`](crate::store::StoreInit) as a defensive reset
    /// for recycled context objects that may carry stale entries.
    pub fn reset_store(&mut self) {
        self.store.clear();
    }

    /// Deserializes the request body as JSON into `T`.
    pub fn json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_slice(self.request.body_bytes())
    }
}
