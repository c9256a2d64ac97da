//! Turning a [`HandlerResult`] into a [`Response`].
//!
//! | Handler set `Content-Type`? | Payload | Sent as |
//! |---|---|---|
//! | yes | any | as-is, wrapped into chunks |
//! | no | chunks | `application/json`, chunks untouched |
//! | no | text that parses as JSON | `application/json`, text untouched |
//! | no | other text | `application/json`, encoded as a JSON string |
//! | no | value that encodes | `application/json` |
//! | no | value that does not encode | `text/plain`, display form |
//!
//! `Content-Length` is always recomputed from the final body.

use bytes::Bytes;
use serde::de::IgnoredAny;

use crate::response::{CONTENT_LENGTH, CONTENT_TYPE, ContentType, HandlerResult, Payload, Response};

/// Assembles the response for one handler run.
///
/// `context_headers` are the headers set through the request's
/// [`Context`](crate::Context); they come first, followed by the headers the
/// result carries itself.
pub(crate) fn respond(result: HandlerResult, context_headers: Vec<(String, String)>) -> Response {
    let HandlerResult { status, headers: result_headers, payload } = result;

    let mut headers = context_headers;
    headers.extend(result_headers);

    let body = if has_header(&headers, CONTENT_TYPE) {
        into_chunks(payload)
    } else {
        let (content_type, body) = negotiate(payload);
        headers.push((CONTENT_TYPE.to_owned(), content_type.as_str().to_owned()));
        body
    };

    let length: usize = body.iter().map(Bytes::len).sum();
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(CONTENT_LENGTH));
    headers.push((CONTENT_LENGTH.to_owned(), length.to_string()));

    Response::new(status, headers, body)
}

/// Picks a media type for a payload whose handler did not choose one.
fn negotiate(payload: Payload) -> (ContentType, Vec<Bytes>) {
    match payload {
        Payload::Chunks(chunks) => (ContentType::Json, chunks),
        Payload::Text(text) => {
            // Validated, not re-encoded: key order and number spelling stay
            // exactly as the handler wrote them.
            if serde_json::from_str::<IgnoredAny>(&text).is_ok() {
                return (ContentType::Json, vec![Bytes::from(text)]);
            }
            match serde_json::to_string(&text) {
                Ok(json) => (ContentType::Json, vec![Bytes::from(json)]),
                Err(_) => (ContentType::Text, vec![Bytes::from(text)]),
            }
        }
        Payload::Value { json: Ok(json), .. } => (ContentType::Json, vec![Bytes::from(json)]),
        Payload::Value { json: Err(_), text } => (ContentType::Text, vec![Bytes::from(text)]),
    }
}

fn into_chunks(payload: Payload) -> Vec<Bytes> {
    match payload {
        Payload::Chunks(chunks) => chunks,
        Payload::Text(text) | Payload::Value { text, .. } => vec![Bytes::from(text)],
    }
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
}
