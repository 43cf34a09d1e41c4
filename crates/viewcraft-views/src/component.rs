//! The component trait and the hook points it can intercept.
//!
//! A view runs two hooked methods per request, `get_queryset` and
//! `get_context_data`. For each one the view calls, across all components
//! in sequence order:
//!
//! 1. `pre_*` hooks, the first of which to return `Some` short-circuits
//!    the method with that value;
//! 2. the view's own implementation;
//! 3. `process_*` hooks, each receiving the previous result;
//! 4. `post_*` hooks, which observe but cannot change the result.

use std::collections::HashMap;
use std::fmt;

use viewcraft_core::{ViewcraftError, ViewcraftResult};
use viewcraft_db::QuerySet;
use viewcraft_http::HttpRequest;

/// The context a list view renders: a JSON object keyed by name.
pub type Context = HashMap<String, serde_json::Value>;

/// A view method components can hook into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookMethod {
    GetQueryset,
    GetContextData,
}

impl HookMethod {
    /// Returns the method name as it appears in hook names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetQueryset => "get_queryset",
            Self::GetContextData => "get_context_data",
        }
    }
}

impl fmt::Display for HookMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-request unit of list view behaviour.
///
/// Components are built fresh for every request from an immutable
/// [`ComponentConfig`](crate::config::ComponentConfig), so they may cache
/// request-derived state (a decoded search, a page number) in `&mut self`.
/// Every hook has a pass-through default.
pub trait Component: Send {
    /// A short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Position in the hook chain. Lower runs earlier; ties keep
    /// declaration order.
    fn sequence(&self) -> i32 {
        0
    }

    fn pre_get_queryset(&mut self, _request: &HttpRequest) -> ViewcraftResult<Option<QuerySet>> {
        Ok(None)
    }

    fn process_get_queryset(
        &mut self,
        _request: &HttpRequest,
        queryset: QuerySet,
    ) -> ViewcraftResult<QuerySet> {
        Ok(queryset)
    }

    fn post_get_queryset(&mut self, _request: &HttpRequest) -> ViewcraftResult<()> {
        Ok(())
    }

    fn pre_get_context_data(&mut self, _request: &HttpRequest) -> ViewcraftResult<Option<Context>> {
        Ok(None)
    }

    fn process_get_context_data(
        &mut self,
        _request: &HttpRequest,
        context: Context,
    ) -> ViewcraftResult<Context> {
        Ok(context)
    }

    fn post_get_context_data(&mut self, _request: &HttpRequest) -> ViewcraftResult<()> {
        Ok(())
    }
}

/// Builds components for
/// [`ComponentConfig::Custom`](crate::config::ComponentConfig::Custom).
pub trait ComponentFactory: Send + Sync {
    /// A short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Builds the component for one request.
    fn build(&self, request: &HttpRequest) -> ViewcraftResult<Box<dyn Component>>;
}

/// Attributes a hook failure to the component and hook that raised it.
///
/// Errors that carry their own client-facing status (an invalid page, a bad
/// request) pass through unchanged.
pub(crate) fn hook_error(
    component: &str,
    stage: &str,
    method: HookMethod,
    err: ViewcraftError,
) -> ViewcraftError {
    match err {
        ViewcraftError::InvalidPage(_)
        | ViewcraftError::BadRequest(_)
        | ViewcraftError::NotFound(_)
        | ViewcraftError::Hook(_) => err,
        other => ViewcraftError::Hook(format!("{component}.{stage}_{method}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Component for Noop {
        fn name(&self) -> &str {
            "noop"
        }
    }

    #[test]
    fn test_defaults_pass_through() {
        let request = HttpRequest::builder().build();
        let mut c = Noop;
        assert_eq!(c.sequence(), 0);
        assert!(c.pre_get_queryset(&request).unwrap().is_none());
        let qs = QuerySet::from_rows("t", vec![serde_json::json!({"a": 1})]);
        assert_eq!(c.process_get_queryset(&request, qs).unwrap().count(), 1);
        let mut ctx = Context::new();
        ctx.insert("k".into(), serde_json::json!(1));
        assert_eq!(c.process_get_context_data(&request, ctx).unwrap().len(), 1);
    }

    #[test]
    fn test_hook_error_wraps_internal_errors() {
        let err = hook_error(
            "search",
            "process",
            HookMethod::GetQueryset,
            ViewcraftError::Serialization("boom".into()),
        );
        assert_eq!(
            err.to_string(),
            "Hook error: search.process_get_queryset: Serialization error: boom"
        );
    }

    #[test]
    fn test_hook_error_keeps_client_errors() {
        let err = hook_error(
            "pagination",
            "process",
            HookMethod::GetQueryset,
            ViewcraftError::InvalidPage("Page 9 does not exist".into()),
        );
        assert!(matches!(err, ViewcraftError::InvalidPage(_)));
    }
}
