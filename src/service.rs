//! hyper integration.
//!
//! [`Router`] implements [`hyper::service::Service`], so a host can hand it
//! straight to a hyper (or hyper-util) connection builder. The service
//! buffers the request body, runs [`Router::serve`] and converts the result.
//! Everything about connections (accept loop, TLS, timeouts, shutdown) stays
//! with the host.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::service::Service;
use tracing::warn;

use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// A heap-allocated future resolving to the converted response.
pub type ServeFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<Full<Bytes>>, Infallible>> + Send + 'static>>;

/// The error type is [`Infallible`]: routing failures are already 404 / 405
/// responses, and a body that cannot be read becomes `400 Bad request`.
impl<B> Service<http::Request<B>> for Router
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: fmt::Display,
{
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = ServeFuture;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let router = self.clone();
        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let body = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    warn!(path = %parts.uri.path(), "failed to read request body: {e}");
                    return Ok(Response::plain(StatusCode::BAD_REQUEST, "Bad request").into_inner());
                }
            };

            let req = Request::from(http::Request::from_parts(parts, body));
            Ok(router.serve(req).into_inner())
        })
    }
}
