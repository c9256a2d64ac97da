//! Per-request handler context.

use http::Method;

use crate::request::Request;

/// The per-request state a handler runs against.
///
/// A fresh `Context` is built for every call to [`Router::serve`] and dropped
/// when the response is assembled. Handlers read the request through it and
/// may set response headers before returning. Setting `Content-Type` here
/// switches off content negotiation for the response.
///
/// [`Router::serve`]: crate::Router::serve
#[derive(Debug)]
pub struct Context {
    request: Request,
    headers: Vec<(String, String)>,
}

impl Context {
    pub(crate) fn new(request: Request) -> Self {
        Self { request, headers: Vec::new() }
    }

    pub fn request(&self) -> &Request { &self.request }
    pub fn method(&self) -> &Method { &self.request.method }

    /// The request path after normalization (an empty path reads as `"/"`).
    pub fn path(&self) -> &str { &self.request.path }

    /// Sets a response header, replacing any header with the same name.
    ///
    /// Names compare case-insensitively.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Adds a response header, keeping earlier ones with the same name
    /// (e.g. several `Link` headers).
    pub fn append_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Reads back a response header set by the handler.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn into_headers(self) -> Vec<(String, String)> {
        self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_header_replaces_regardless_of_case() {
        let mut cx = Context::new(Request::new(Method::GET, "/"));
        cx.set_header("content-type", "text/html");
        cx.set_header("Content-Type", "text/csv");

        assert_eq!(cx.header("CONTENT-TYPE"), Some("text/csv"));
        assert_eq!(cx.into_headers(), vec![("Content-Type".to_owned(), "text/csv".to_owned())]);
    }

    #[test]
    fn append_header_keeps_duplicates() {
        let mut cx = Context::new(Request::new(Method::GET, "/"));
        cx.append_header("Link", "</a>; rel=\"next\"");
        cx.append_header("Link", "</b>; rel=\"prev\"");

        assert_eq!(cx.header("link"), Some("</a>; rel=\"next\""));
        assert_eq!(cx.into_headers().len(), 2);
    }
}
