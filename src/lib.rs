//! # plank
//!
//! A minimal project-tracker HTTP service. One resource, four verbs,
//! everything in memory. Nothing more. Nothing less.
//!
//! ## The contract
//!
//! plank keeps an ordered list of projects for as long as the process
//! lives. Restart it and the list is gone — by design. There is no
//! database, no auth, no pagination. What there *is*:
//!
//! - **CRUD over `/projects`** — list (with `?title=` substring filter),
//!   create, full-replace update, delete
//! - **A middleware pipeline** — each stage delegates downstream via a
//!   [`Next`] continuation or short-circuits with its own response
//! - **Timed request logging** — one structured line per request, bracketing
//!   the whole downstream chain
//! - **UUID route-parameter validation** — malformed ids are rejected with
//!   400 before any handler runs
//! - Radix-tree routing via [`matchit`], async I/O via hyper + tokio,
//!   graceful shutdown on SIGTERM / Ctrl-C
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use plank::{routes, ProjectStore, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = ProjectStore::shared();
//!     let app = routes::router(store);
//!
//!     Server::bind("0.0.0.0:3333").serve(app).await.unwrap();
//! }
//! ```
//!
//! The store is constructed explicitly and injected into the router, so
//! tests build isolated instances and drive [`Router::dispatch`] directly
//! without opening a socket.

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;
mod store;

pub mod health;
pub mod middleware;
pub mod routes;

pub use error::Error;
pub use handler::Handler;
pub use http::{Method, StatusCode};
pub use middleware::{Middleware, Next};
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use server::Server;
pub use store::{mint_id, Project, ProjectStore, SharedStore};
