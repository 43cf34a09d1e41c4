//! HTTP request type.
//!
//! [`HttpRequest`] carries what a list view needs from an incoming request:
//! method, path, headers, and parsed GET/POST parameters.

use http::{HeaderMap, Method};

use crate::querydict::QueryDict;

/// An HTTP request.
///
/// Instances are created from an incoming Axum request via
/// [`HttpRequest::from_axum`], or with [`HttpRequest::builder`] in tests.
///
/// # Examples
///
/// ```
/// use viewcraft_http::HttpRequest;
///
/// let request = HttpRequest::builder()
///     .method(http::Method::GET)
///     .path("/posts/")
///     .query_string("page=1")
///     .build();
///
/// assert_eq!(request.method(), &http::Method::GET);
/// assert_eq!(request.path(), "/posts/");
/// assert_eq!(request.get().get("page"), Some("1"));
/// ```
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    get: QueryDict,
    post: QueryDict,
    headers: HeaderMap,
    body: Vec<u8>,
}

fn parse_form_body(content_type: Option<&str>, body: &[u8]) -> QueryDict {
    if content_type.is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded")) {
        QueryDict::parse(&String::from_utf8_lossy(body))
    } else {
        QueryDict::new()
    }
}

impl HttpRequest {
    /// Creates a new [`HttpRequestBuilder`].
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    /// Creates an `HttpRequest` from Axum request parts and body bytes.
    pub fn from_axum(parts: http::request::Parts, body: Vec<u8>) -> Self {
        let method = parts.method;
        let uri = parts.uri;
        let headers = parts.headers;

        let path = uri.path().to_string();
        let query_string = uri.query().unwrap_or("").to_string();
        let get = QueryDict::parse(&query_string);

        let content_type = headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let post = parse_form_body(content_type.as_deref(), &body);

        Self {
            method,
            path,
            query_string,
            content_type,
            get,
            post,
            headers,
            body,
        }
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path (without query string).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string (without the leading `?`).
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Returns the content type of the request body, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the GET query parameters.
    pub const fn get(&self) -> &QueryDict {
        &self.get
    }

    /// Returns the POST form parameters.
    pub const fn post(&self) -> &QueryDict {
        &self.post
    }

    /// Returns the request headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw request body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns `true` if the `Accept` header asks for JSON.
    pub fn accepts_json(&self) -> bool {
        self.headers
            .get(http::header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"))
    }

    /// Returns the full path including the query string.
    ///
    /// # Examples
    ///
    /// ```
    /// use viewcraft_http::HttpRequest;
    ///
    /// let request = HttpRequest::builder()
    ///     .path("/posts/")
    ///     .query_string("page=2")
    ///     .build();
    /// assert_eq!(request.get_full_path(), "/posts/?page=2");
    /// ```
    pub fn get_full_path(&self) -> String {
        if self.query_string.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string)
        }
    }
}

/// Builder for constructing [`HttpRequest`] instances without a full Axum request.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query_string: String::new(),
            content_type: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }
}

impl HttpRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Sets the query string (without leading `?`).
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query_string = qs.to_string();
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, ct: &str) -> Self {
        self.content_type = Some(ct.to_string());
        self
    }

    /// Adds a header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::from_bytes(name.as_bytes()),
            http::header::HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the [`HttpRequest`].
    pub fn build(self) -> HttpRequest {
        let get = QueryDict::parse(&self.query_string);
        let post = parse_form_body(self.content_type.as_deref(), &self.body);

        HttpRequest {
            method: self.method,
            path: self.path,
            query_string: self.query_string,
            content_type: self.content_type,
            get,
            post,
            headers: self.headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let request = HttpRequest::builder().build();
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/");
        assert!(request.get().is_empty());
        assert_eq!(request.get_full_path(), "/");
    }

    #[test]
    fn test_form_post_parsed() {
        let request = HttpRequest::builder()
            .method(Method::POST)
            .content_type("application/x-www-form-urlencoded")
            .body(b"title=rust&title_match=contains".to_vec())
            .build();
        assert_eq!(request.post().get("title"), Some("rust"));
        assert_eq!(request.post().get("title_match"), Some("contains"));
    }

    #[test]
    fn test_non_form_body_not_parsed() {
        let request = HttpRequest::builder()
            .method(Method::POST)
            .content_type("application/json")
            .body(b"{\"a\": 1}".to_vec())
            .build();
        assert!(request.post().is_empty());
    }

    #[test]
    fn test_accepts_json() {
        let json = HttpRequest::builder()
            .header("accept", "application/json")
            .build();
        assert!(json.accepts_json());
        let html = HttpRequest::builder().header("accept", "text/html").build();
        assert!(!html.accepts_json());
    }

    #[test]
    fn test_from_axum() {
        let (parts, ()) = http::Request::builder()
            .method("GET")
            .uri("/posts/?q=abc&page=2")
            .header("accept", "application/json")
            .body(())
            .unwrap()
            .into_parts();
        let request = HttpRequest::from_axum(parts, Vec::new());
        assert_eq!(request.path(), "/posts/");
        assert_eq!(request.query_string(), "q=abc&page=2");
        assert_eq!(request.get().get("page"), Some("2"));
        assert_eq!(request.get_full_path(), "/posts/?q=abc&page=2");
        assert!(request.accepts_json());
    }
}
