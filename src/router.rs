//! Radix-tree request router with a middleware pipeline.
//!
//! One tree per HTTP method, O(path-length) lookup via [`matchit`]. On top
//! of the trees sits an ordered middleware chain: global stages run for
//! every request; path-scoped stages run only when their mount pattern
//! matches. Build the router once at startup with its shared state and
//! pass it to [`Server::serve`](crate::Server::serve).

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, Uri};
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::Response;

/// The application router, generic over its shared state `S`.
///
/// `S` is cloned into every handler call; use an `Arc`-backed type. Each
/// registration method returns `self` so calls chain naturally.
pub struct Router<S> {
    state: S,
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    layers: Vec<Arc<dyn Middleware<S>>>,
    scoped: Vec<(MatchitRouter<()>, Arc<dyn Middleware<S>>)>,
    fallback: BoxedHandler<S>,
}

impl<S: Clone + Send + Sync + 'static> Router<S> {
    pub fn new(state: S) -> Self {
        let fallback =
            (|_state: S, _req: Request| async { Response::status(StatusCode::NOT_FOUND) })
                .into_boxed_handler();
        Self {
            state,
            routes: HashMap::new(),
            layers: Vec::new(),
            scoped: Vec::new(),
            fallback,
        }
    }

    /// Registers a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves
    /// them in the handler.
    ///
    /// # Panics
    ///
    /// Panics at startup on an invalid or conflicting route pattern.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Mounts a middleware stage for every request, in registration order.
    /// Global stages always run before path-scoped ones.
    pub fn layer(mut self, stage: impl Middleware<S>) -> Self {
        self.layers.push(Arc::new(stage));
        self
    }

    /// Mounts a middleware stage only on paths matching `pattern`.
    ///
    /// Parameters captured by the pattern are visible to the stage via
    /// `req.param`, whether or not a route matched.
    ///
    /// # Panics
    ///
    /// Panics at startup on an invalid mount pattern.
    pub fn layer_on(mut self, pattern: &str, stage: impl Middleware<S>) -> Self {
        let mut tree = MatchitRouter::new();
        tree.insert(pattern, ())
            .unwrap_or_else(|e| panic!("invalid middleware mount `{pattern}`: {e}"));
        self.scoped.push((tree, Arc::new(stage)));
        self
    }

    /// Routes one request through the middleware pipeline to its handler.
    ///
    /// Unmatched paths flow through the same pipeline to a 404 endpoint, so
    /// logging and CORS stamping cover them too.
    pub async fn dispatch(
        &self,
        method: Method,
        uri: &Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> Response {
        let path = uri.path();
        let mut params = HashMap::new();

        let endpoint = match self.routes.get(&method).and_then(|tree| tree.at(path).ok()) {
            Some(matched) => {
                params.extend(
                    matched.params.iter().map(|(k, v)| (k.to_owned(), v.to_owned())),
                );
                Arc::clone(matched.value)
            }
            None => Arc::clone(&self.fallback),
        };

        let mut chain = self.layers.clone();
        for (tree, stage) in &self.scoped {
            if let Ok(matched) = tree.at(path) {
                // Scope params matter when the scope matched but no route
                // did; a route match for the same pattern wins.
                for (k, v) in matched.params.iter() {
                    params.entry(k.to_owned()).or_insert_with(|| v.to_owned());
                }
                chain.push(Arc::clone(stage));
            }
        }

        let req = Request::new(method, uri, headers, body, params);
        Next { chain, index: 0, endpoint, state: self.state.clone() }.run(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn echo_param(_state: (), req: Request) -> Response {
        let id = req.param("id").unwrap_or("none").to_owned();
        Response::json(&serde_json::json!({ "id": id }))
    }

    async fn dispatch_to(router: &Router<()>, method: Method, uri: &str) -> Response {
        let uri: Uri = uri.parse().unwrap();
        router.dispatch(method, &uri, HeaderMap::new(), Bytes::new()).await
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let router = Router::new(()).on(Method::GET, "/things", echo_param);
        let res = dispatch_to(&router, Method::GET, "/nope").await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn wrong_method_is_404() {
        let router = Router::new(()).on(Method::GET, "/things", echo_param);
        let res = dispatch_to(&router, Method::POST, "/things").await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn path_params_reach_the_handler() {
        let router = Router::new(()).on(Method::GET, "/things/{id}", echo_param);
        let res = dispatch_to(&router, Method::GET, "/things/42").await;
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body, serde_json::json!({"id": "42"}));
    }

    /// Stamps a marker header so tests can see whether the stage ran.
    struct Marker(&'static str);

    impl<S: Clone + Send + Sync + 'static> Middleware<S> for Marker {
        fn handle(&self, req: Request, next: Next<S>) -> crate::handler::BoxFuture {
            let name = self.0;
            Box::pin(async move { next.run(req).await.with_header("x-ran", name) })
        }
    }

    #[tokio::test]
    async fn scoped_layer_fires_only_on_matching_paths() {
        let router = Router::new(())
            .layer_on("/things/{id}", Marker("scoped"))
            .on(Method::GET, "/things", echo_param)
            .on(Method::GET, "/things/{id}", echo_param);

        let collection = dispatch_to(&router, Method::GET, "/things").await;
        assert_eq!(collection.header("x-ran"), None);

        let item = dispatch_to(&router, Method::GET, "/things/42").await;
        assert_eq!(item.header("x-ran"), Some("scoped"));
    }

    #[tokio::test]
    async fn global_layers_cover_unmatched_paths() {
        let router = Router::new(()).layer(Marker("global"));
        let res = dispatch_to(&router, Method::GET, "/missing").await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(res.header("x-ran"), Some("global"));
    }
}
