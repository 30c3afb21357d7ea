//! Pipeline wiring for the request stash.

use std::{future::Future, pin::Pin};

use crate::Response;
use crate::context::Context;
use crate::middleware::{Middleware, Next};

/// Middleware that prepares the request stash for the rest of the chain.
///
/// Wire `StoreInit` as an early pipeline step, before any handler calls into
/// the stash. It replaces the context's store with a fresh empty one — a
/// defensive reset for recycled context objects that may still carry entries
/// from a previous use — and then delegates to `next` exactly once,
/// unconditionally. It never fails and never short-circuits.
///
/// Contexts built with [`Context::new`] already arrive with an empty store,
/// so on a non-recycled context the reset is a no-op.
pub struct StoreInit;

impl Middleware for StoreInit {
    fn handle(&self, mut ctx: Context, next: Next) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        ctx.reset_store();
        Box::pin(async move { next.run(ctx).await })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::{Value, json};

    use super::*;
    use crate::http::{Method, Request, StatusCode};
    use crate::middleware::{MiddlewareHandler, from_middleware};

    fn ctx() -> Context {
        Context::new(Request::new(Method::Get, "/"))
    }

    #[tokio::test]
    async fn init_resets_a_recycled_store() {
        let mut recycled = ctx();
        recycled.store_mut().set("stale", json!("from a previous use"));

        let probe: MiddlewareHandler = Arc::new(|ctx: Context, _next: Next| {
            Box::pin(async move {
                assert!(ctx.store().get_opt("stale").is_none());
                Response::new(StatusCode::Ok)
            })
        });

        let chain = vec![from_middleware(Arc::new(StoreInit)), probe];
        let response = Next::new(chain).run(recycled).await;
        assert_eq!(response.status(), StatusCode::Ok);
    }

    #[tokio::test]
    async fn init_calls_next_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);

        let probe: MiddlewareHandler = Arc::new(move |_ctx: Context, _next: Next| {
            let counted = Arc::clone(&counted);
            Box::pin(async move {
                counted.fetch_add(1, Ordering::SeqCst);
                Response::new(StatusCode::NoContent)
            })
        });

        let chain = vec![from_middleware(Arc::new(StoreInit)), probe];
        Next::new(chain).run(ctx()).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    // Full chain: init → a producer stashes a value → a consumer takes it
    // and answers. This is the signature-free handoff the stash exists for.
    #[tokio::test]
    async fn value_flows_from_producer_to_consumer() {
        let producer: MiddlewareHandler = Arc::new(|mut ctx: Context, next: Next| {
            Box::pin(async move {
                ctx.store_mut().set("user", json!({"id": 1}));
                next.run(ctx).await
            })
        });

        let consumer: MiddlewareHandler = Arc::new(|mut ctx: Context, _next: Next| {
            Box::pin(async move {
                match ctx.store_mut().take("user") {
                    Ok(user) => Response::json(StatusCode::Ok, &user),
                    Err(err) => err.into_response(),
                }
            })
        });

        let chain = vec![from_middleware(Arc::new(StoreInit)), producer, consumer];
        let response = Next::new(chain).run(ctx()).await;

        assert_eq!(response.status(), StatusCode::Ok);
        let body: Value = serde_json::from_slice(response.body_bytes()).unwrap();
        assert_eq!(body, json!({"id": 1}));
    }

    #[tokio::test]
    async fn strict_miss_surfaces_as_404() {
        let consumer: MiddlewareHandler = Arc::new(|mut ctx: Context, _next: Next| {
            Box::pin(async move {
                match ctx.store_mut().take("missing") {
                    Ok(value) => Response::json(StatusCode::Ok, &value),
                    Err(err) => err.into_response(),
                }
            })
        });

        let chain = vec![from_middleware(Arc::new(StoreInit)), consumer];
        let response = Next::new(chain).run(ctx()).await;

        assert_eq!(response.status().as_u16(), 404);
        let body: Value = serde_json::from_slice(response.body_bytes()).unwrap();
        assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
        assert_eq!(body["error"]["key"], json!("missing"));
    }

    #[tokio::test]
    async fn stash_survives_await_points_between_handlers() {
        let producer: MiddlewareHandler = Arc::new(|mut ctx: Context, next: Next| {
            Box::pin(async move {
                ctx.store_mut().set("token", json!("abc123"));
                tokio::task::yield_now().await;
                next.run(ctx).await
            })
        });

        let consumer: MiddlewareHandler = Arc::new(|ctx: Context, _next: Next| {
            Box::pin(async move {
                assert_eq!(ctx.store().get("token").unwrap(), &json!("abc123"));
                Response::new(StatusCode::Ok)
            })
        });

        let chain = vec![from_middleware(Arc::new(StoreInit)), producer, consumer];
        let response = Next::new(chain).run(ctx()).await;
        assert_eq!(response.status(), StatusCode::Ok);
    }
}
