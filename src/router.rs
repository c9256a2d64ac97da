//! Ordered route table and dispatch.
//!
//! Routes are tried in registration order. No tree, no sorting, no
//! specificity rules: the first route whose matcher accepts the path *and*
//! whose verb equals the request's wins. Build the table once at startup with
//! [`RouterBuilder`]; [`RouterBuilder::build`] seals it into a [`Router`] that
//! can be cloned into every connection task.

use std::sync::Arc;

use http::{Method, StatusCode};
use tracing::{debug, trace};

use crate::context::Context;
use crate::error::Error;
use crate::handler::{self, BoxedHandler, Captures};
use crate::negotiate;
use crate::request::Request;
use crate::response::{IntoHandlerResult, Response};
use crate::route::{Matcher, Route};

// ── RouterBuilder ─────────────────────────────────────────────────────────────

/// Collects routes during application setup.
///
/// Obtain via [`Router::builder()`]. Each registration call returns `self`
/// so registrations chain naturally. Registration mistakes panic right here,
/// during startup; use [`RouterBuilder::try_add_handler`] to get them as an
/// [`Error`] instead.
///
/// ```rust
/// use waypost::{Captures, Context, Matcher, Router};
///
/// let app = Router::builder()
///     .get("/static-get", |_: &mut Context, _: Captures| "Ohai!")
///     .get(Matcher::pattern(r"^/regex-get/([^/]+)").unwrap(), |_: &mut Context, args: Captures| {
///         args.get(0).unwrap_or_default().to_owned()
///     })
///     .add_handler("PURGE", "/cache", |_: &mut Context, _: Captures| "purged")
///     .build();
/// ```
#[derive(Default)]
pub struct RouterBuilder {
    routes: Vec<Route>,
}

impl RouterBuilder {
    /// Handles `GET` and `HEAD` on `matcher`.
    ///
    /// `HEAD` runs the very same handler; the body is dropped afterwards by
    /// [`Router::serve`].
    pub fn get<F, R>(self, matcher: impl Into<Matcher>, handler: F) -> Self
    where
        F: Fn(&mut Context, Captures) -> R + Send + Sync + 'static,
        R: IntoHandlerResult + 'static,
    {
        let matcher = matcher.into();
        let handler = handler::boxed(handler);
        self.push(Method::GET, matcher.clone(), Arc::clone(&handler))
            .push(Method::HEAD, matcher, handler)
    }

    pub fn put<F, R>(self, matcher: impl Into<Matcher>, handler: F) -> Self
    where
        F: Fn(&mut Context, Captures) -> R + Send + Sync + 'static,
        R: IntoHandlerResult + 'static,
    {
        self.push(Method::PUT, matcher.into(), handler::boxed(handler))
    }

    pub fn post<F, R>(self, matcher: impl Into<Matcher>, handler: F) -> Self
    where
        F: Fn(&mut Context, Captures) -> R + Send + Sync + 'static,
        R: IntoHandlerResult + 'static,
    {
        self.push(Method::POST, matcher.into(), handler::boxed(handler))
    }

    pub fn delete<F, R>(self, matcher: impl Into<Matcher>, handler: F) -> Self
    where
        F: Fn(&mut Context, Captures) -> R + Send + Sync + 'static,
        R: IntoHandlerResult + 'static,
    {
        self.push(Method::DELETE, matcher.into(), handler::boxed(handler))
    }

    pub fn patch<F, R>(self, matcher: impl Into<Matcher>, handler: F) -> Self
    where
        F: Fn(&mut Context, Captures) -> R + Send + Sync + 'static,
        R: IntoHandlerResult + 'static,
    {
        self.push(Method::PATCH, matcher.into(), handler::boxed(handler))
    }

    /// Handles an arbitrary verb on `matcher`.
    ///
    /// `verb` is compared case-sensitively: `"get"` is an extension method,
    /// not `GET`.
    ///
    /// # Panics
    ///
    /// Panics if `verb` is not a valid HTTP method token.
    pub fn add_handler<F, R>(self, verb: &str, matcher: impl Into<Matcher>, handler: F) -> Self
    where
        F: Fn(&mut Context, Captures) -> R + Send + Sync + 'static,
        R: IntoHandlerResult + 'static,
    {
        self.try_add_handler(verb, matcher, handler)
            .unwrap_or_else(|e| panic!("invalid route: {e}"))
    }

    /// Like [`add_handler`](Self::add_handler), returning the error instead
    /// of panicking.
    pub fn try_add_handler<F, R>(
        self,
        verb: &str,
        matcher: impl Into<Matcher>,
        handler: F,
    ) -> Result<Self, Error>
    where
        F: Fn(&mut Context, Captures) -> R + Send + Sync + 'static,
        R: IntoHandlerResult + 'static,
    {
        let verb = Method::from_bytes(verb.as_bytes())
            .map_err(|_| Error::InvalidVerb(verb.to_owned()))?;
        Ok(self.push(verb, matcher.into(), handler::boxed(handler)))
    }

    fn push(mut self, verb: Method, matcher: Matcher, handler: BoxedHandler) -> Self {
        debug!(%verb, %matcher, "route registered");
        self.routes.push(Route::new(verb, matcher, handler));
        self
    }

    /// Seals the table. No routes can be added to the returned [`Router`].
    pub fn build(self) -> Router {
        Router { routes: self.routes.into() }
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// The sealed, read-only route table.
///
/// Cloning is one atomic increment; every clone shares the same table, so
/// concurrent requests may call [`serve`](Router::serve) in parallel.
#[derive(Clone, Debug)]
pub struct Router {
    routes: Arc<[Route]>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// The routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Finds the route for `verb` and `path`.
    ///
    /// Path matching runs first over the whole table; only then are the
    /// path-matching routes narrowed by verb. That ordering is what tells
    /// 404 ([`Error::NotFound`]) apart from 405
    /// ([`Error::MethodNotAllowed`]). Among the survivors, the first
    /// registered wins.
    pub fn find_route(&self, verb: &Method, path: &str) -> Result<&Route, Error> {
        let mut candidates = self.routes.iter().filter(|r| r.handles(path)).peekable();

        if candidates.peek().is_none() {
            return Err(Error::NotFound { path: path.to_owned() });
        }

        candidates
            .inspect(|r| trace!(verb = %r.verb(), matcher = %r.matcher(), "path candidate"))
            .find(|r| r.verb() == verb)
            .ok_or_else(|| Error::MethodNotAllowed {
                verb: verb.to_string(),
                path: path.to_owned(),
            })
    }

    /// Routes one request and produces one response.
    ///
    /// Never fails: an unknown path is `404 Not found`, a known path with the
    /// wrong verb is `405`, both as `text/plain`. For `HEAD` the body is
    /// dropped after the response is assembled, so status, headers and
    /// `Content-Length` are those of the matching `GET`.
    pub fn serve(&self, mut req: Request) -> Response {
        if req.path.is_empty() {
            req.path.push('/');
        }

        let head = req.method == Method::HEAD;
        let route = match self.find_route(&req.method, &req.path) {
            Ok(route) => route,
            Err(e @ Error::MethodNotAllowed { .. }) => {
                debug!(method = %req.method, path = %req.path, "method not allowed");
                return Response::plain(StatusCode::METHOD_NOT_ALLOWED, e.to_string());
            }
            Err(_) => {
                debug!(method = %req.method, path = %req.path, "no route");
                return Response::plain(StatusCode::NOT_FOUND, "Not found");
            }
        };

        debug!(method = %req.method, path = %req.path, matcher = %route.matcher(), "route matched");

        let path = req.path.clone();
        let mut cx = Context::new(req);
        let result = route.run(&mut cx, &path);
        let mut res = negotiate::respond(result, cx.into_headers());

        if head {
            res.body.clear();
        }
        res
    }
}
