//! Handler type erasure and captured path arguments.
//!
//! # How handlers are stored
//!
//! The route table holds handlers of *different* closure types in a single
//! `Vec<Route>`. Each one is wrapped in `FnHandler` and stored behind an
//! `Arc<dyn ErasedHandler>`:
//!
//! ```text
//! |cx, args| { … }                        ← user writes this
//!        ↓ builder.get("/", handler)
//! Arc::new(FnHandler(handler, ..))        ← one allocation, at startup
//!        ↓ stored as BoxedHandler
//! handler.call(&mut cx, captures)         ← one virtual call per request
//!        ↓
//! IntoHandlerResult::into_handler_result  ← raw value, negotiated later
//! ```
//!
//! `get` registers the same `Arc` for `GET` and `HEAD`.

use std::marker::PhantomData;
use std::slice;
use std::sync::Arc;

use crate::context::Context;
use crate::response::{HandlerResult, IntoHandlerResult};

// ── Captures ──────────────────────────────────────────────────────────────────

/// Values of a pattern route's capturing groups, in left-to-right group order.
///
/// A group that did not take part in the match is `None`. Literal routes
/// always receive an empty `Captures`.
///
/// ```rust
/// # use waypost::{Captures, Context, Matcher, Router};
/// let app = Router::builder()
///     .get(Matcher::pattern(r"^/users/(\d+)(?:/(\w+))?$").unwrap(), |_: &mut Context, args: Captures| {
///         format!("{} {}", args.get(0).unwrap_or("-"), args.get(1).unwrap_or("-"))
///     })
///     .build();
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Captures(Vec<Option<String>>);

impl Captures {
    pub(crate) fn new(groups: Vec<Option<String>>) -> Self {
        Self(groups)
    }

    /// The value of group `index + 1` (group 0, the whole match, is not
    /// included). `None` when the group is absent or out of range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index)?.as_deref()
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> slice::Iter<'_, Option<String>> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Option<String>> {
        self.0
    }
}

impl IntoIterator for Captures {
    type Item = Option<String>;
    type IntoIter = std::vec::IntoIter<Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Captures {
    type Item = &'a Option<String>;
    type IntoIter = slice::Iter<'a, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ── Erasure ───────────────────────────────────────────────────────────────────

/// Internal dispatch interface.
pub(crate) trait ErasedHandler: Send + Sync {
    fn call(&self, cx: &mut Context, args: Captures) -> HandlerResult;
}

/// A type-erased handler shared by every route registered with it.
pub(crate) type BoxedHandler = Arc<dyn ErasedHandler>;

/// Newtype wrapper bridging a concrete closure to [`ErasedHandler`].
struct FnHandler<F, R>(F, PhantomData<fn() -> R>);

impl<F, R> ErasedHandler for FnHandler<F, R>
where
    F: Fn(&mut Context, Captures) -> R + Send + Sync,
    R: IntoHandlerResult,
{
    fn call(&self, cx: &mut Context, args: Captures) -> HandlerResult {
        (self.0)(cx, args).into_handler_result()
    }
}

pub(crate) fn boxed<F, R>(handler: F) -> BoxedHandler
where
    F: Fn(&mut Context, Captures) -> R + Send + Sync + 'static,
    R: IntoHandlerResult + 'static,
{
    Arc::new(FnHandler(handler, PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_groups_read_as_none() {
        let args = Captures::new(vec![Some("42".to_owned()), None]);
        assert_eq!(args.get(0), Some("42"));
        assert_eq!(args.get(1), None);
        assert_eq!(args.get(2), None);
        assert_eq!(args.len(), 2);
    }
}
