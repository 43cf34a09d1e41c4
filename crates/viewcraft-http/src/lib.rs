//! # viewcraft-http
//!
//! Request and response types for viewcraft views, plus the query-string
//! plumbing components use to build links: [`QueryDict`] for parsing and
//! encoding parameters and [`modify_query_params`] for rewriting the current
//! URL with parameters set or removed.

pub mod querydict;
pub mod request;
pub mod response;
pub mod url;

pub use querydict::QueryDict;
pub use request::{HttpRequest, HttpRequestBuilder};
pub use response::{HttpResponse, JsonResponse, ResponseContent};
pub use url::modify_query_params;
