//! Route protection.
//!
//! Every route is registered as public or protected through
//! `GuardedRouter`; the resulting table never changes afterwards. The
//! guard runs on every request and sends protected requests without a
//! session cookie to the login page before the handler is called.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::MethodRouter;
use axum::Router;
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::cookies::TokenCookieStore;

pub const LOGIN_PAGE: &str = "/auth";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<&'static str, Access>,
}

impl RouteTable {
    /// Unregistered paths are public
    pub fn access(&self, path: &str) -> Access {
        self.routes.get(path).copied().unwrap_or(Access::Public)
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.access(path) == Access::Protected
    }
}

/// Router builder that records each route's access level.
pub struct GuardedRouter<S> {
    router: Router<S>,
    table: RouteTable,
}

impl<S> GuardedRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            table: RouteTable::default(),
        }
    }

    pub fn public(self, path: &'static str, route: MethodRouter<S>) -> Self {
        self.add(path, Access::Public, route)
    }

    pub fn protected(self, path: &'static str, route: MethodRouter<S>) -> Self {
        self.add(path, Access::Protected, route)
    }

    fn add(mut self, path: &'static str, access: Access, route: MethodRouter<S>) -> Self {
        self.table.routes.insert(path, access);
        self.router = self.router.route(path, route);
        self
    }

    /// Freeze the table and install the guard in front of every route.
    pub fn into_router(self) -> Router<S> {
        let table = Arc::new(self.table);
        self.router
            .layer(middleware::from_fn_with_state(table, route_guard))
    }
}

impl<S> Default for GuardedRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

async fn route_guard(
    State(table): State<Arc<RouteTable>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let protected = request
        .extensions()
        .get::<MatchedPath>()
        .is_some_and(|path| table.is_protected(path.as_str()));

    if protected && !TokenCookieStore::new(jar).is_authenticated() {
        debug!(path = %request.uri().path(), "No session cookie, redirecting to login");
        return Redirect::to(LOGIN_PAGE).into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::{COOKIE, LOCATION};
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::routing::get;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn app(calls: Arc<AtomicUsize>) -> Router {
        let protected_calls = calls.clone();
        GuardedRouter::new()
            .public("/", get(|| async { "home" }))
            .public("/games/:id", get(|| async { "game" }))
            .protected(
                "/library",
                get(move || {
                    protected_calls.fetch_add(1, Ordering::SeqCst);
                    async { "library" }
                }),
            )
            .protected("/library/:id", get(|| async { "entry" }))
            .into_router()
    }

    fn request(path: &str, cookie: Option<&str>) -> Request {
        let mut builder = HttpRequest::builder().uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_route_table_defaults_to_public() {
        let mut table = RouteTable::default();
        table.routes.insert("/library", Access::Protected);
        assert!(table.is_protected("/library"));
        assert_eq!(table.access("/"), Access::Public);
        assert_eq!(table.access("/unknown"), Access::Public);
    }

    #[tokio::test]
    async fn test_protected_without_cookie_redirects_before_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let response = app(calls.clone()).oneshot(request("/library", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), LOGIN_PAGE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_protected_with_empty_cookie_redirects() {
        let calls = Arc::new(AtomicUsize::new(0));
        let response = app(calls.clone())
            .oneshot(request("/library", Some("token=")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_protected_with_cookie_proceeds() {
        let calls = Arc::new(AtomicUsize::new(0));
        let response = app(calls.clone())
            .oneshot(request("/library", Some("token=abc")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_parameterized_protected_route() {
        let response = app(Arc::default()).oneshot(request("/library/4", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_public_routes_need_no_cookie() {
        let response = app(Arc::default()).oneshot(request("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(Arc::default()).oneshot(request("/games/3", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(Arc::default()).oneshot(request("/missing", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
