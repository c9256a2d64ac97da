//! # waypost
//!
//! A minimal request router. Routing, and *only* routing.
//!
//! ## The contract
//!
//! You register routes as a verb, a matcher and a handler. A request comes in
//! with a method and a path; waypost picks one route, runs it, and turns
//! whatever the handler returned into a response.
//!
//! - **Ordered.** Routes are tried in registration order. First match wins.
//! - **404 vs 405.** No route knows the path → `404 Not found`. Some route
//!   knows the path but not the verb → `405`. Both `text/plain`.
//! - **Literals are exact, patterns search.** A string matcher must equal the
//!   path. A regex matcher only has to match *somewhere* in it; anchor it with
//!   `^…$` if that is what you mean. Capturing groups become handler
//!   arguments.
//! - **JSON unless told otherwise.** Set `Content-Type` from the handler and
//!   the body goes out untouched. Otherwise waypost sends JSON when it can and
//!   `text/plain` when it cannot.
//! - **`GET` implies `HEAD`.** Same handler, same headers, empty body.
//!
//! What the host server owns, and waypost ignores: connections, TLS,
//! timeouts, middleware, query strings.
//!
//! ## Quick start
//!
//! ```rust
//! use waypost::{Captures, Context, Matcher, Method, Request, Router, StatusCode};
//!
//! let app = Router::builder()
//!     .get("/static-get", |_: &mut Context, _: Captures| (StatusCode::OK, ["Ohai!"]))
//!     .get(Matcher::pattern(r"^/regex-get/([^/]+)").unwrap(), regex_get)
//!     .build();
//!
//! fn regex_get(_cx: &mut Context, args: Captures) -> (StatusCode, Vec<String>) {
//!     (StatusCode::OK, args.into_iter().flatten().collect())
//! }
//!
//! let res = app.serve(Request::new(Method::GET, "/regex-get/foo/bar"));
//! assert_eq!(res.status(), StatusCode::OK);
//! assert_eq!(res.body(), ["foo"]);
//!
//! let res = app.serve(Request::new(Method::POST, "/static-get"));
//! assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
//! ```
//!
//! To put it on the network, pass a [`Router`] to any hyper connection
//! builder: it implements `hyper::service::Service`.

mod context;
mod error;
mod handler;
mod negotiate;
mod request;
mod response;
mod route;
mod router;
mod service;

pub use context::Context;
pub use error::Error;
pub use handler::Captures;
pub use http::{Method, StatusCode};
pub use request::Request;
pub use response::{HandlerResult, IntoHandlerResult, Json, Response};
pub use route::{Matcher, Route};
pub use router::{Router, RouterBuilder};
pub use service::ServeFuture;
