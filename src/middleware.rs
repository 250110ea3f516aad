//! Middleware layer.
//!
//! Middleware intercepts requests on their way to a handler. Each stage
//! receives the request and a [`Next`] continuation, and either delegates
//! downstream (optionally running more logic after the continuation
//! returns) or short-circuits with a terminal [`Response`] of its own.
//!
//! Built-ins:
//! - [`Trace`] — per-request log line with method, path, status, latency
//! - [`ValidateUuidParam`] — rejects malformed UUID path parameters with 400
//! - [`Cors`] — unconditional `access-control-allow-origin: *`

use std::sync::Arc;
use std::time::Instant;

use http::{Method, StatusCode};
use tracing::info;
use uuid::Uuid;

use crate::handler::{BoxFuture, BoxedHandler};
use crate::request::Request;
use crate::response::Response;

/// A single stage of the request pipeline.
///
/// Implementations must not block; run the continuation with
/// `next.run(req)` inside the returned future, or drop it to short-circuit.
pub trait Middleware<S>: Send + Sync + 'static {
    fn handle(&self, req: Request, next: Next<S>) -> BoxFuture;
}

/// The remainder of the pipeline: every stage not yet run, then the route
/// handler itself.
///
/// `Next` is consumed by [`run`](Next::run); a stage that never calls it
/// terminates the request with its own response.
pub struct Next<S> {
    pub(crate) chain: Vec<Arc<dyn Middleware<S>>>,
    pub(crate) index: usize,
    pub(crate) endpoint: BoxedHandler<S>,
    pub(crate) state: S,
}

impl<S: Clone + Send + Sync + 'static> Next<S> {
    /// Passes control to the next stage, or to the handler once the chain
    /// is exhausted.
    pub fn run(self, req: Request) -> BoxFuture {
        let Next { chain, index, endpoint, state } = self;
        match chain.get(index).cloned() {
            Some(stage) => stage.handle(req, Next { chain, index: index + 1, endpoint, state }),
            None => endpoint.call(state, req),
        }
    }
}

// ── Trace ─────────────────────────────────────────────────────────────────────

/// Logs one line per request: method, path, response status, and the time
/// the *entire* downstream chain took — validation and handler included.
///
/// Never alters the request and never short-circuits.
pub struct Trace;

impl<S: Clone + Send + Sync + 'static> Middleware<S> for Trace {
    fn handle(&self, req: Request, next: Next<S>) -> BoxFuture {
        let label = format!("{} {}", req.method(), req.path());
        Box::pin(async move {
            let start = Instant::now();
            let res = next.run(req).await;
            info!(
                status = res.status_code().as_u16(),
                elapsed_us = start.elapsed().as_micros() as u64,
                "{label}",
            );
            res
        })
    }
}

// ── ValidateUuidParam ─────────────────────────────────────────────────────────

/// Rejects requests whose named path parameter is not a well-formed
/// hyphenated UUID, answering `400 {"error": "Invalid project Id"}` before
/// any handler runs. Mount it on the id-carrying route pattern only.
pub struct ValidateUuidParam {
    param: &'static str,
}

impl ValidateUuidParam {
    pub fn new(param: &'static str) -> Self {
        Self { param }
    }

    fn is_well_formed(value: &str) -> bool {
        // `Uuid::try_parse` also accepts the 32-char simple form; route ids
        // are always hyphenated, so pin the length too.
        value.len() == 36 && Uuid::try_parse(value).is_ok()
    }
}

impl<S: Clone + Send + Sync + 'static> Middleware<S> for ValidateUuidParam {
    fn handle(&self, req: Request, next: Next<S>) -> BoxFuture {
        // A missing parameter is treated as malformed, same as a bad one.
        let ok = req.param(self.param).is_some_and(Self::is_well_formed);
        if ok {
            next.run(req)
        } else {
            Box::pin(async { Response::error(StatusCode::BAD_REQUEST, "Invalid project Id") })
        }
    }
}

// ── Cors ──────────────────────────────────────────────────────────────────────

/// Unconditionally permits cross-origin requests.
///
/// Stamps `access-control-allow-origin: *` on every response and answers
/// preflight `OPTIONS` requests directly with 204.
pub struct Cors;

const ALLOW_ORIGIN: (&str, &str) = ("access-control-allow-origin", "*");

impl<S: Clone + Send + Sync + 'static> Middleware<S> for Cors {
    fn handle(&self, req: Request, next: Next<S>) -> BoxFuture {
        if req.method() == Method::OPTIONS {
            return Box::pin(async {
                Response::status(StatusCode::NO_CONTENT)
                    .with_header(ALLOW_ORIGIN.0, ALLOW_ORIGIN.1)
                    .with_header("access-control-allow-methods", "GET, POST, PUT, DELETE, OPTIONS")
                    .with_header("access-control-allow-headers", "content-type")
            });
        }
        Box::pin(async move {
            next.run(req).await.with_header(ALLOW_ORIGIN.0, ALLOW_ORIGIN.1)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;
    use http::HeaderMap;

    use super::*;
    use crate::handler::Handler;

    fn request(method: Method, uri: &str, params: &[(&str, &str)]) -> Request {
        let params = params.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Request::new(method, &uri.parse().unwrap(), HeaderMap::new(), Bytes::new(), params)
    }

    /// A `Next` whose endpoint answers 200 `"reached"` and has no further stages.
    fn endpoint_next() -> Next<()> {
        async fn reached(_state: (), _req: Request) -> Response {
            Response::status(StatusCode::OK).with_header("x-endpoint", "reached")
        }
        Next { chain: Vec::new(), index: 0, endpoint: reached.into_boxed_handler(), state: () }
    }

    #[tokio::test]
    async fn trace_delegates_and_preserves_response() {
        let req = request(Method::GET, "/projects", &[]);
        let res = Trace.handle(req, endpoint_next()).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.header("x-endpoint"), Some("reached"));
    }

    #[tokio::test]
    async fn validator_passes_well_formed_ids() {
        let id = crate::store::mint_id();
        let req = request(Method::DELETE, "/projects/x", &[("id", &id)]);
        let res = ValidateUuidParam::new("id").handle(req, endpoint_next()).await;
        assert_eq!(res.header("x-endpoint"), Some("reached"));
    }

    #[tokio::test]
    async fn validator_short_circuits_malformed_ids() {
        for bad in ["not-a-uuid", "", "123", "d9428888d01211d1b2458c2fcab00000"] {
            let req = request(Method::DELETE, "/projects/x", &[("id", bad)]);
            let res = ValidateUuidParam::new("id").handle(req, endpoint_next()).await;
            assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(res.header("x-endpoint"), None);
            let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
            assert_eq!(body, serde_json::json!({"error": "Invalid project Id"}));
        }
    }

    #[tokio::test]
    async fn validator_rejects_missing_param() {
        let req = request(Method::DELETE, "/projects/x", &[]);
        let res = ValidateUuidParam::new("id").handle(req, endpoint_next()).await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cors_stamps_allow_origin() {
        let req = request(Method::GET, "/projects", &[]);
        let res = Cors.handle(req, endpoint_next()).await;
        assert_eq!(res.header("access-control-allow-origin"), Some("*"));
        assert_eq!(res.header("x-endpoint"), Some("reached"));
    }

    #[tokio::test]
    async fn cors_answers_preflight_directly() {
        let req = request(Method::OPTIONS, "/projects", &[]);
        let res = Cors.handle(req, endpoint_next()).await;
        assert_eq!(res.status_code(), StatusCode::NO_CONTENT);
        assert_eq!(res.header("x-endpoint"), None);
    }

    #[tokio::test]
    async fn stages_run_in_mounted_order() {
        // Trace wraps the validator: a short-circuited 400 still flows back
        // through Trace unchanged.
        let next = Next {
            chain: vec![Arc::new(ValidateUuidParam::new("id"))],
            index: 0,
            endpoint: endpoint_next().endpoint,
            state: (),
        };
        let req = request(Method::PUT, "/projects/x", &[("id", "nope")]);
        let res = Trace.handle(req, next).await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(res.header("x-endpoint"), None);
    }
}
