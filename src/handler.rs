//! Handler trait and type erasure.
//!
//! The router holds handlers of *different* concrete types in a single
//! `HashMap<Method, Tree>`, so every handler is erased behind a trait
//! object. Handlers are stateful: the router clones its shared state `S`
//! (here, the project store) into each call, so no handler touches a
//! process-wide global.
//!
//! The chain from user code to vtable call:
//!
//! ```text
//! async fn list(store: S, req: Request) -> Response { … }
//!        ↓ router.on(Method::GET, "/projects", list)
//! list.into_boxed_handler()                 ← Handler blanket impl
//!        ↓ stored as BoxedHandler<S> = Arc<dyn ErasedHandler<S>>
//! handler.call(state, req)  at request time ← one vtable dispatch
//! ```
//!
//! The only runtime cost per request is one `Arc` clone plus one virtual
//! call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler<S> {
    fn call(&self, state: S, req: Request) -> BoxFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler<S> = Arc<dyn ErasedHandler<S> + Send + Sync + 'static>;

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(state: S, req: Request) -> impl IntoResponse
/// ```
///
/// The trait is sealed: only the blanket impl below can satisfy it.
pub trait Handler<S>: private::Sealed<S> + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler<S>;
}

mod private {
    pub trait Sealed<S> {}
}

impl<S, F, Fut, R> private::Sealed<S> for F
where
    F: Fn(S, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<S, F, Fut, R> Handler<S> for F
where
    S: Send + Sync + 'static,
    F: Fn(S, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler<S> {
        Arc::new(FnHandler(self))
    }
}

/// Newtype wrapper holding a concrete handler `F`, bridging the typed world
/// to the trait-object world.
struct FnHandler<F>(F);

impl<S, F, Fut, R> ErasedHandler<S> for FnHandler<F>
where
    F: Fn(S, Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, state: S, req: Request) -> BoxFuture {
        let fut = (self.0)(state, req);
        Box::pin(async move { fut.await.into_response() })
    }
}
