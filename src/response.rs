//! Outgoing response type, the raw [`HandlerResult`] and the
//! [`IntoHandlerResult`] conversion trait.
//!
//! Handlers return anything that converts into a [`HandlerResult`]. The router
//! then turns that raw value into a [`Response`] (see `negotiate`).

use std::fmt;

use bytes::{Bytes, BytesMut};
use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use tracing::warn;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Media types the router assigns on its own.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ContentType {
    Json, // application/json
    Text, // text/plain
}

impl ContentType {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain",
        }
    }
}

pub(crate) const CONTENT_TYPE: &str = "Content-Type";
pub(crate) const CONTENT_LENGTH: &str = "Content-Length";

// ── Response ─────────────────────────────────────────────────────────────────

/// A finished response: status, ordered headers, body chunks.
///
/// Header names keep the case they were set with; duplicates are kept in
/// insertion order. This three-part shape is all the host needs to write the
/// response onto the wire, or call [`Response::into_inner`] for an
/// `http::Response`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<Bytes>,
}

impl Response {
    pub(crate) fn new(status: StatusCode, headers: Vec<(String, String)>, body: Vec<Bytes>) -> Self {
        Self { status, headers, body }
    }

    /// A `text/plain` response with a single body chunk. Used for the
    /// router's own 404 / 405 replies.
    pub(crate) fn plain(status: StatusCode, body: impl Into<String>) -> Self {
        let headers = vec![(CONTENT_TYPE.to_owned(), ContentType::Text.as_str().to_owned())];
        Self::new(status, headers, vec![Bytes::from(body.into())])
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[Bytes] { &self.body }

    /// First header with this name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body chunks joined into one buffer.
    pub fn body_bytes(&self) -> Bytes {
        match self.body.as_slice() {
            [] => Bytes::new(),
            [only] => only.clone(),
            chunks => {
                let mut buf = BytesMut::with_capacity(chunks.iter().map(Bytes::len).sum());
                for chunk in chunks {
                    buf.extend_from_slice(chunk);
                }
                buf.freeze()
            }
        }
    }

    /// Converts into an `http::Response` with a buffered body.
    ///
    /// Headers whose name or value is not valid HTTP are dropped with a
    /// warning rather than failing the whole response.
    pub fn into_inner(self) -> http::Response<Full<Bytes>> {
        let body = self.body_bytes();
        let mut res = http::Response::new(Full::new(body));
        *res.status_mut() = self.status;

        let headers = res.headers_mut();
        for (name, value) in self.headers {
            match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => warn!(header = %name, "dropping malformed response header"),
            }
        }
        res
    }
}

// ── HandlerResult ─────────────────────────────────────────────────────────────

/// What a handler's return value looks like before negotiation.
#[derive(Debug)]
pub(crate) enum Payload {
    /// List-like: chunks the handler already framed.
    Chunks(Vec<Bytes>),
    /// A string. May or may not be a JSON document.
    Text(String),
    /// Any other value: its JSON encoding attempt and its display form.
    Value {
        json: Result<String, serde_json::Error>,
        text: String,
    },
}

/// The raw value a handler produced, with its status and any headers the
/// handler attached to it.
///
/// Build one directly or let [`IntoHandlerResult`] do it:
///
/// ```rust
/// use http::StatusCode;
/// use waypost::HandlerResult;
///
/// HandlerResult::chunks(["[1,", "2]"]);
/// HandlerResult::text("hello").with_status(StatusCode::ACCEPTED);
/// HandlerResult::value(&42).with_header("Cache-Control", "no-store");
/// HandlerResult::json(&vec![1, 2, 3]);
/// ```
#[derive(Debug)]
pub struct HandlerResult {
    pub(crate) status: StatusCode,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) payload: Payload,
}

impl HandlerResult {
    fn from_payload(payload: Payload) -> Self {
        Self { status: StatusCode::OK, headers: Vec::new(), payload }
    }

    /// Pre-framed body chunks. Without an explicit `Content-Type` these are
    /// assumed to add up to a JSON document.
    pub fn chunks<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Bytes>,
    {
        Self::from_payload(Payload::Chunks(chunks.into_iter().map(Into::into).collect()))
    }

    /// A string body. Without an explicit `Content-Type` it is parsed as JSON
    /// and, failing that, sent as a JSON string.
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_payload(Payload::Text(text.into()))
    }

    /// Any serializable value. Sent as JSON when it encodes, otherwise as
    /// `text/plain` using its `Display` form.
    pub fn value<T: Serialize + fmt::Display + ?Sized>(value: &T) -> Self {
        Self::from_payload(Payload::Value {
            json: serde_json::to_string(value),
            text: value.to_string(),
        })
    }

    /// Any serializable value, `Display` or not. When encoding fails the
    /// value goes out as `text/plain` carrying the encoder's error message.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        let json = serde_json::to_string(value);
        let text = match &json {
            Ok(json) => json.clone(),
            Err(e) => e.to_string(),
        };
        Self::from_payload(Payload::Value { json, text })
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn status(&self) -> StatusCode { self.status }
}

// ── IntoHandlerResult ─────────────────────────────────────────────────────────

/// Conversion from a handler's return value into a [`HandlerResult`].
///
/// | Return type | Payload |
/// |---|---|
/// | `&'static str`, `String` | text |
/// | `Vec<C>`, `[C; N]` with `C: Into<Bytes>` | chunks |
/// | `serde_json::Value`, [`Json<T>`] | value |
/// | `(StatusCode, R)` | `R` with that status |
/// | `(StatusCode, headers, R)` | `R` with that status and headers |
///
/// A response with a status and no extra headers is the two-element tuple.
/// An empty header list in the three-element form needs a type, since `[]`
/// alone cannot be inferred:
///
/// ```rust
/// use waypost::{IntoHandlerResult, StatusCode};
///
/// let arg = "foo".to_owned();
/// (StatusCode::OK, vec![arg.clone()]).into_handler_result();
/// let no_headers: [(&str, &str); 0] = [];
/// (StatusCode::OK, no_headers, vec![arg]).into_handler_result();
/// ```
///
/// Implement it on your own types to return them directly from handlers.
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> HandlerResult;
}

impl IntoHandlerResult for HandlerResult {
    fn into_handler_result(self) -> HandlerResult { self }
}

impl IntoHandlerResult for &'static str {
    fn into_handler_result(self) -> HandlerResult { HandlerResult::text(self) }
}

impl IntoHandlerResult for String {
    fn into_handler_result(self) -> HandlerResult { HandlerResult::text(self) }
}

impl<C: Into<Bytes>> IntoHandlerResult for Vec<C> {
    fn into_handler_result(self) -> HandlerResult { HandlerResult::chunks(self) }
}

impl<C: Into<Bytes>, const N: usize> IntoHandlerResult for [C; N] {
    fn into_handler_result(self) -> HandlerResult { HandlerResult::chunks(self) }
}

impl IntoHandlerResult for serde_json::Value {
    fn into_handler_result(self) -> HandlerResult { HandlerResult::value(&self) }
}

/// Returns any `Serialize` type from a handler, encoded as JSON.
///
/// ```rust
/// use serde_json::json;
/// use waypost::{Captures, Context, Json, Router};
///
/// let app = Router::builder()
///     .get("/user", |_: &mut Context, _: Captures| Json(json!({ "id": 1 })))
///     .build();
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoHandlerResult for Json<T> {
    fn into_handler_result(self) -> HandlerResult { HandlerResult::json(&self.0) }
}

impl<R: IntoHandlerResult> IntoHandlerResult for (StatusCode, R) {
    fn into_handler_result(self) -> HandlerResult {
        self.1.into_handler_result().with_status(self.0)
    }
}

impl<H, K, V, R> IntoHandlerResult for (StatusCode, H, R)
where
    H: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
    R: IntoHandlerResult,
{
    fn into_handler_result(self) -> HandlerResult {
        let (status, headers, inner) = self;
        let mut result = inner.into_handler_result().with_status(status);
        result.headers.extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_bytes_joins_chunks() {
        let res = Response::new(
            StatusCode::OK,
            Vec::new(),
            vec![Bytes::from_static(b"ab"), Bytes::from_static(b"cd")],
        );
        assert_eq!(res.body_bytes(), Bytes::from_static(b"abcd"));
    }

    #[test]
    fn into_inner_keeps_duplicate_headers_and_drops_malformed_ones() {
        let res = Response::new(
            StatusCode::CREATED,
            vec![
                ("Link".to_owned(), "</a>".to_owned()),
                ("Link".to_owned(), "</b>".to_owned()),
                ("Bad Name".to_owned(), "x".to_owned()),
            ],
            vec![Bytes::from_static(b"{}")],
        );

        let res = res.into_inner();
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers().get_all("link").iter().count(), 2);
        assert_eq!(res.headers().len(), 2);
    }

    #[test]
    fn tuple_sets_status_and_headers() {
        let result = (StatusCode::CREATED, [("Location", "/users/9")], "made").into_handler_result();
        assert_eq!(result.status(), StatusCode::CREATED);
        assert_eq!(result.headers, vec![("Location".to_owned(), "/users/9".to_owned())]);
        assert!(matches!(result.payload, Payload::Text(ref s) if s == "made"));
    }

    #[test]
    fn status_with_body_needs_no_header_list() {
        let arg = "foo".to_owned();
        let result = (StatusCode::OK, vec![arg]).into_handler_result();
        assert_eq!(result.status(), StatusCode::OK);
        assert!(result.headers.is_empty());
        assert!(matches!(result.payload, Payload::Chunks(ref c) if c == &[Bytes::from("foo")]));

        let empty: [(&str, &str); 0] = [];
        let result = (StatusCode::NOT_FOUND, empty, "gone").into_handler_result();
        assert_eq!(result.status(), StatusCode::NOT_FOUND);
        assert!(result.headers.is_empty());
    }

    #[test]
    fn arrays_become_chunks() {
        let result = ["a", "b"].into_handler_result();
        match result.payload {
            Payload::Chunks(chunks) => assert_eq!(chunks.len(), 2),
            other => panic!("unexpected payload {other:?}"),
        }
    }
}
