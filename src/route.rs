//! A single verb + matcher + handler record.

use std::fmt;

use http::Method;
use regex::Regex;

use crate::context::Context;
use crate::error::Error;
use crate::handler::{BoxedHandler, Captures};
use crate::response::HandlerResult;

// ── Matcher ───────────────────────────────────────────────────────────────────

/// Decides whether a route accepts a path.
///
/// The two kinds match differently:
///
/// - [`Matcher::Literal`] matches only a path that is exactly equal. No
///   trailing-slash tolerance, no normalization.
/// - [`Matcher::Pattern`] matches when the regular expression matches
///   **anywhere** in the path. Patterns are not anchored for you: `/foo`
///   accepts `/bar/foo/baz`. Write `^…$` when you mean the whole path.
///
/// `&str` and `String` convert into literals; [`Regex`] converts into a
/// pattern.
#[derive(Clone, Debug)]
pub enum Matcher {
    Literal(String),
    Pattern(Regex),
}

impl Matcher {
    pub fn literal(path: impl Into<String>) -> Self {
        Self::Literal(path.into())
    }

    /// Compiles `source` into a pattern matcher.
    pub fn pattern(source: &str) -> Result<Self, Error> {
        Regex::new(source)
            .map(Self::Pattern)
            .map_err(|source_err| Error::InvalidMatcher {
                pattern: source.to_owned(),
                source: source_err,
            })
    }

    pub fn is_match(&self, path: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == path,
            Self::Pattern(re) => re.is_match(path),
        }
    }

    /// Capturing-group values for `path`, group 1 first.
    fn captures(&self, path: &str) -> Captures {
        match self {
            Self::Literal(_) => Captures::default(),
            Self::Pattern(re) => {
                let groups = match re.captures(path) {
                    Some(caps) => caps.iter()
                        .skip(1)
                        .map(|group| group.map(|m| m.as_str().to_owned()))
                        .collect(),
                    None => vec![None; re.captures_len() - 1],
                };
                Captures::new(groups)
            }
        }
    }
}

impl From<&str> for Matcher {
    fn from(path: &str) -> Self { Self::Literal(path.to_owned()) }
}

impl From<String> for Matcher {
    fn from(path: String) -> Self { Self::Literal(path) }
}

impl From<Regex> for Matcher {
    fn from(re: Regex) -> Self { Self::Pattern(re) }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => f.write_str(literal),
            Self::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// One entry of the route table. Immutable once built.
#[derive(Clone)]
pub struct Route {
    verb: Method,
    matcher: Matcher,
    handler: BoxedHandler,
}

impl Route {
    pub(crate) fn new(verb: Method, matcher: Matcher, handler: BoxedHandler) -> Self {
        Self { verb, matcher, handler }
    }

    pub fn verb(&self) -> &Method { &self.verb }
    pub fn matcher(&self) -> &Matcher { &self.matcher }

    /// Whether this route's matcher accepts `path`. The verb is not checked.
    pub fn handles(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Invokes the handler against `cx`.
    ///
    /// Pattern routes pass their capturing groups for `path`. If the pattern
    /// does not match `path` at all, every group is `None`.
    pub fn run(&self, cx: &mut Context, path: &str) -> HandlerResult {
        self.handler.call(cx, self.matcher.captures(path))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("verb", &self.verb)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler;
    use crate::request::Request;
    use crate::response::Payload;

    fn echo_captures() -> BoxedHandler {
        handler::boxed(|_: &mut Context, args: Captures| {
            args.iter()
                .map(|g| g.as_deref().unwrap_or("<none>"))
                .collect::<Vec<_>>()
                .join(",")
        })
    }

    fn run(route: &Route, path: &str) -> String {
        let mut cx = Context::new(Request::new(Method::GET, path));
        match route.run(&mut cx, path).payload {
            Payload::Text(text) => text,
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn literal_matches_exactly() {
        let route = Route::new(Method::GET, "/static".into(), echo_captures());
        assert!(route.handles("/static"));
        assert!(!route.handles("/static/"));
        assert!(!route.handles("/Static"));
        assert!(!route.handles("/static/more"));
    }

    #[test]
    fn pattern_searches_anywhere() {
        let route = Route::new(Method::GET, Matcher::pattern("foo").unwrap(), echo_captures());
        assert!(route.handles("/bar/foo/baz"));
        assert!(!route.handles("/bar"));
    }

    #[test]
    fn pattern_passes_groups_in_order() {
        let matcher = Matcher::pattern(r"^/regex-get/([^/]+)").unwrap();
        let route = Route::new(Method::GET, matcher, echo_captures());
        assert_eq!(run(&route, "/regex-get/foo/bar"), "foo");

        let matcher = Matcher::pattern(r"^/(\w+)/(\d+)$").unwrap();
        let route = Route::new(Method::GET, matcher, echo_captures());
        assert_eq!(run(&route, "/users/42"), "users,42");
    }

    #[test]
    fn groups_that_do_not_participate_are_none() {
        let matcher = Matcher::pattern(r"^/items/(\d+)(?:/(\w+))?$").unwrap();
        let route = Route::new(Method::GET, matcher, echo_captures());
        assert_eq!(run(&route, "/items/3"), "3,<none>");
        assert_eq!(run(&route, "/items/3/edit"), "3,edit");
    }

    #[test]
    fn literal_routes_get_no_arguments() {
        let route = Route::new(Method::GET, "/".into(), echo_captures());
        assert_eq!(run(&route, "/"), "");
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = Matcher::pattern("(unclosed").unwrap_err();
        assert!(matches!(err, Error::InvalidMatcher { ref pattern, .. } if pattern == "(unclosed"));
    }
}
