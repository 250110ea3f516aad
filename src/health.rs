//! Built-in health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the pod serve traffic? Failure → pulled from load-balancer. |

use crate::{Request, Response, SharedStore};

/// Liveness probe handler.
///
/// Always returns `200 OK`. If the process can respond to HTTP at all, it
/// is alive — this handler intentionally has no dependencies.
pub async fn liveness(_store: SharedStore, _req: Request) -> Response {
    Response::json(&serde_json::json!({"status": "ok"}))
}

/// Readiness probe handler.
///
/// The store is in-memory and ready the moment the process is, so this is
/// equivalent to liveness here.
pub async fn readiness(_store: SharedStore, _req: Request) -> Response {
    Response::json(&serde_json::json!({"status": "ready"}))
}
