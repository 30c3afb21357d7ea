//! # reqstash
//!
//! A request-scoped key/value stash for async middleware pipelines.
//!
//! One handler stashes a value under a name; any later handler in the same
//! request's chain reads it ([`Store::get`]) or consumes it exactly once
//! ([`Store::take`]) — no threading values through function signatures. The
//! stash lives on the per-request [`Context`](context::Context) and dies with
//! it: nothing is shared across requests.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use reqstash::{Response, StatusCode, context::Context};
//! use reqstash::middleware::{MiddlewareHandler, Next, from_middleware};
//! use reqstash::store::StoreInit;
//!
//! # async fn run(ctx: Context) {
//! let producer: MiddlewareHandler = Arc::new(|mut ctx: Context, next: Next| {
//!     Box::pin(async move {
//!         ctx.store_mut().set("user", json!({"id": 1}));
//!         next.run(ctx).await
//!     })
//! });
//!
//! let consumer: MiddlewareHandler = Arc::new(|mut ctx: Context, _next: Next| {
//!     Box::pin(async move {
//!         match ctx.store_mut().take("user") {
//!             Ok(user) => Response::json(StatusCode::Ok, &user),
//!             Err(err) => err.into_response(),
//!         }
//!     })
//! });
//!
//! let chain = vec![from_middleware(Arc::new(StoreInit)), producer, consumer];
//! let response = Next::new(chain).run(ctx).await;
//! # }
//! ```
//!
//! A strict lookup that misses maps to a `404` JSON error body, ready for a
//! generic error-handling stage; non-strict lookups (`get_opt`, `take_opt`)
//! return `None` instead.

pub mod context;
pub mod http;
pub mod middleware;
pub mod store;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use context::Context;
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use store::{Store, StoreError, StoreInit};
