//! URL rewriting for component links.
//!
//! Every link a component renders (a page number, a removed search chip,
//! a sort toggle) is the current URL with one or two parameters changed.

use crate::querydict::QueryDict;
use crate::request::HttpRequest;

/// Rebuilds the request's `path?query` with parameters set or removed.
///
/// Each existing parameter keeps its last value and its position. A
/// `Some(value)` update replaces or appends the parameter; `None` removes
/// it. When no parameters remain the bare path is returned.
///
/// # Examples
///
/// ```
/// use viewcraft_http::{modify_query_params, HttpRequest};
///
/// let request = HttpRequest::builder()
///     .path("/posts/")
///     .query_string("sort=title&page=3")
///     .build();
///
/// assert_eq!(
///     modify_query_params(&request, &[("page", Some("4")), ("sort", None)]),
///     "/posts/?page=4"
/// );
/// assert_eq!(
///     modify_query_params(&request, &[("page", None), ("sort", None)]),
///     "/posts/"
/// );
/// ```
pub fn modify_query_params(request: &HttpRequest, updates: &[(&str, Option<&str>)]) -> String {
    let mut params = QueryDict::from_pairs(request.get().items());

    for (key, value) in updates {
        // A QueryDict built by from_pairs is mutable, so these cannot fail.
        let outcome = match value {
            Some(value) => params.set(key, value),
            None => params.remove(key).map(|_| ()),
        };
        if let Err(err) = outcome {
            tracing::warn!(key = *key, error = %err, "failed to update query parameter");
        }
    }

    if params.is_empty() {
        request.path().to_string()
    } else {
        format!("{}?{}", request.path(), params.urlencode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(qs: &str) -> HttpRequest {
        HttpRequest::builder().path("/list/").query_string(qs).build()
    }

    #[test]
    fn test_add_param() {
        assert_eq!(
            modify_query_params(&request(""), &[("page", Some("2"))]),
            "/list/?page=2"
        );
    }

    #[test]
    fn test_update_keeps_position() {
        assert_eq!(
            modify_query_params(&request("page=1&q=abc"), &[("page", Some("2"))]),
            "/list/?page=2&q=abc"
        );
    }

    #[test]
    fn test_remove_param() {
        assert_eq!(
            modify_query_params(&request("page=1&q=abc"), &[("q", None)]),
            "/list/?page=1"
        );
    }

    #[test]
    fn test_remove_missing_param_is_noop() {
        assert_eq!(
            modify_query_params(&request("page=1"), &[("q", None)]),
            "/list/?page=1"
        );
    }

    #[test]
    fn test_empty_result_is_bare_path() {
        assert_eq!(modify_query_params(&request("q=x"), &[("q", None)]), "/list/");
    }

    #[test]
    fn test_repeated_keys_collapse_to_last() {
        assert_eq!(
            modify_query_params(&request("tag=a&tag=b"), &[]),
            "/list/?tag=b"
        );
    }

    #[test]
    fn test_values_are_encoded() {
        assert_eq!(
            modify_query_params(&request(""), &[("q", Some("a b=c"))]),
            "/list/?q=a%20b%3Dc"
        );
    }
}
