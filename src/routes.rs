//! The `/projects` resource: four CRUD handlers and the router wiring.
//!
//! Status-code quirk, kept deliberately: an unknown project id on PUT or
//! DELETE answers **400**, not 404, with `{"error": "Project not found."}`.
//! Clients depend on that shape, so changing it is a breaking change.

use http::{Method, StatusCode};
use serde::Deserialize;

use crate::health;
use crate::middleware::{Cors, Trace, ValidateUuidParam};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::store::SharedStore;

/// Builds the application router over the given store.
///
/// Pipeline order: CORS, then the timed request log wrapping everything
/// downstream, then UUID validation on id-carrying routes only.
pub fn router(store: SharedStore) -> Router<SharedStore> {
    Router::new(store)
        .layer(Cors)
        .layer(Trace)
        .layer_on("/projects/{id}", ValidateUuidParam::new("id"))
        .on(Method::GET, "/projects", list_projects)
        .on(Method::POST, "/projects", create_project)
        .on(Method::PUT, "/projects/{id}", update_project)
        .on(Method::DELETE, "/projects/{id}", delete_project)
        .on(Method::GET, "/healthz", health::liveness)
        .on(Method::GET, "/readyz", health::readiness)
}

/// Request-body shape shared by create and update.
///
/// Fields are not validated: an absent `title` or `owner` defaults to the
/// empty string and is stored as-is. An unparseable body behaves like an
/// empty one.
#[derive(Debug, Default, Deserialize)]
struct ProjectInput {
    #[serde(default)]
    title: String,
    #[serde(default)]
    owner: String,
}

fn not_found() -> Response {
    // 400 rather than 404 — see the module docs.
    Response::error(StatusCode::BAD_REQUEST, "Project not found.")
}

// GET /projects?title=...
async fn list_projects(store: SharedStore, req: Request) -> Response {
    Response::json(&store.list(req.query("title")))
}

// POST /projects
async fn create_project(store: SharedStore, req: Request) -> Response {
    let input: ProjectInput = req.json().unwrap_or_default();
    Response::json(&store.create(input.title, input.owner))
}

// PUT /projects/{id} — full replacement, id preserved.
async fn update_project(store: SharedStore, req: Request) -> Response {
    // The pipeline validated the id before this handler ran.
    let Some(id) = req.param("id") else { return not_found() };
    let input: ProjectInput = req.json().unwrap_or_default();
    match store.replace(id, input.title, input.owner) {
        Some(project) => Response::json(&project),
        None => not_found(),
    }
}

// DELETE /projects/{id}
async fn delete_project(store: SharedStore, req: Request) -> Response {
    match req.param("id") {
        Some(id) if store.remove(id) => Response::status(StatusCode::NO_CONTENT),
        _ => not_found(),
    }
}
