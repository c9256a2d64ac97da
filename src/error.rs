//! Unified error type.

use thiserror::Error;

/// The error type returned by waypost's fallible operations.
///
/// Two kinds live here. Dispatch failures ([`Error::NotFound`],
/// [`Error::MethodNotAllowed`]) come out of [`Router::find_route`] and are
/// always turned into a 404 / 405 response by [`Router::serve`]; they never
/// reach the host. Registration failures ([`Error::InvalidMatcher`],
/// [`Error::InvalidVerb`]) are configuration mistakes and surface at startup.
///
/// [`Router::find_route`]: crate::Router::find_route
/// [`Router::serve`]: crate::Router::serve
#[derive(Debug, Error)]
pub enum Error {
    /// No route's matcher accepts the path.
    #[error("{path} not found")]
    NotFound { path: String },

    /// At least one route accepts the path, none of them for this verb.
    #[error("{verb} not permitted on {path}")]
    MethodNotAllowed { verb: String, path: String },

    /// The pattern source is not a valid regular expression.
    #[error("invalid matcher `{pattern}`: {source}")]
    InvalidMatcher {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The verb is not a valid HTTP method token.
    #[error("invalid HTTP verb `{0}`")]
    InvalidVerb(String),
}
