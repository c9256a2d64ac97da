//! Incoming request descriptor.
//!
//! The host terminates the wire protocol; waypost only needs the method and
//! the path relative to the application's mount point. Headers and body ride
//! along so handlers can read them through [`Context::request`].
//!
//! [`Context::request`]: crate::Context::request

use bytes::Bytes;
use http::Method;
use tracing::debug;

/// An incoming request as handed over by the host server.
#[derive(Clone, Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
}

impl Request {
    /// A request with no headers and an empty body.
    ///
    /// `path` is taken as-is: already percent-decoded, no query string.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &Bytes { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Builds a [`Request`] from an `http` request whose body is already buffered.
///
/// The URI path is percent-decoded; a path that does not decode to UTF-8 is
/// kept raw. Header values that are not visible ASCII are dropped.
impl<B: Into<Bytes>> From<http::Request<B>> for Request {
    fn from(req: http::Request<B>) -> Self {
        let (parts, body) = req.into_parts();
        let headers = parts.headers.iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();
        Self {
            method: parts.method,
            path: decode_path(parts.uri.path()),
            headers,
            body: body.into(),
        }
    }
}

fn decode_path(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(path) => path.into_owned(),
        Err(e) => {
            debug!(path = raw, "path is not valid UTF-8 once decoded: {e}");
            raw.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new(Method::GET, "/").with_header("X-Token", "abc");
        assert_eq!(req.header("x-token"), Some("abc"));
        assert_eq!(req.header("x-other"), None);
    }

    #[test]
    fn converts_from_http_request() {
        let req = http::Request::builder()
            .method("PUT")
            .uri("http://example.com/things/7?verbose=1")
            .header("accept", "application/json")
            .body(Bytes::from_static(b"payload"))
            .unwrap();

        let req = Request::from(req);
        assert_eq!(req.method(), &Method::PUT);
        assert_eq!(req.path(), "/things/7");
        assert_eq!(req.header("Accept"), Some("application/json"));
        assert_eq!(req.body().as_ref(), b"payload");
    }

    #[test]
    fn percent_encoded_paths_are_decoded() {
        let req = http::Request::builder()
            .uri("/files/caf%C3%A9%20menu.txt")
            .body(Bytes::new())
            .unwrap();
        assert_eq!(Request::from(req).path(), "/files/café menu.txt");
    }

    #[test]
    fn undecodable_paths_stay_raw() {
        let req = http::Request::builder()
            .uri("/bytes/%FF")
            .body(Bytes::new())
            .unwrap();
        assert_eq!(Request::from(req).path(), "/bytes/%FF");
    }
}
