//! HTTP response types.
//!
//! [`HttpResponse`] is what a view's `dispatch` returns. It converts into an
//! Axum response via [`IntoResponse`], and [`JsonResponse`] builds JSON bodies.

use axum::response::IntoResponse;
use http::{HeaderMap, HeaderValue, StatusCode};

use viewcraft_core::ViewcraftError;

/// The body content of an HTTP response.
#[derive(Debug, Clone)]
pub enum ResponseContent {
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
}

/// An HTTP response.
///
/// # Examples
///
/// ```
/// use viewcraft_http::HttpResponse;
///
/// let response = HttpResponse::ok("Hello, World!");
/// assert_eq!(response.status(), http::StatusCode::OK);
/// ```
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    content: ResponseContent,
    charset: String,
    content_type: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse` with the given status code and text body.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            content: ResponseContent::Text(body.into()),
            charset: "utf-8".to_string(),
            content_type: "text/html".to_string(),
        }
    }

    /// Creates a 200 OK response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found(body: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, body)
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request(body: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, body)
    }

    /// Creates a 500 Internal Server Error response.
    pub fn server_error(body: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, body)
    }

    /// Creates a 405 Method Not Allowed response with the list of permitted methods.
    pub fn not_allowed(permitted_methods: &[&str]) -> Self {
        let allowed = permitted_methods.join(", ");
        let mut response = Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("Method Not Allowed. Permitted: {allowed}"),
        );
        if let Ok(value) = HeaderValue::from_str(&allowed) {
            response.headers.insert(http::header::ALLOW, value);
        }
        response
    }

    /// Creates a 302 Found redirect to `url`.
    pub fn redirect(url: &str) -> Self {
        let mut response = Self::new(StatusCode::FOUND, "");
        if let Ok(value) = HeaderValue::from_str(url) {
            response.headers.insert(http::header::LOCATION, value);
        }
        response
    }

    /// Creates the response for an error, using its mapped status code.
    pub fn from_error(err: &ViewcraftError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.to_string())
    }

    /// Returns the status code.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns a reference to the headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a mutable reference to the headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns the content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Sets the content type.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    /// Returns the response body.
    pub const fn content(&self) -> &ResponseContent {
        &self.content
    }

    /// Returns the body as bytes.
    pub fn content_bytes(&self) -> Vec<u8> {
        match &self.content {
            ResponseContent::Bytes(b) => b.clone(),
            ResponseContent::Text(t) => t.as_bytes().to_vec(),
        }
    }

    /// Returns the full content type header value including charset.
    fn full_content_type(&self) -> String {
        if self.content_type.starts_with("text/") || self.content_type.contains("json") {
            format!("{}; charset={}", self.content_type, self.charset)
        } else {
            self.content_type.clone()
        }
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> axum::response::Response {
        let content_type = HeaderValue::from_str(&self.full_content_type()).ok();
        let body = match self.content {
            ResponseContent::Text(text) => axum::body::Body::from(text),
            ResponseContent::Bytes(bytes) => axum::body::Body::from(bytes),
        };

        let mut response = axum::response::Response::new(body);
        *response.status_mut() = self.status;
        if let Some(ct) = content_type {
            response.headers_mut().insert(http::header::CONTENT_TYPE, ct);
        }
        for (key, value) in &self.headers {
            response.headers_mut().insert(key, value.clone());
        }
        response
    }
}

/// A JSON response.
///
/// Serializes the given data as JSON and sets the content type to `application/json`.
pub struct JsonResponse;

impl JsonResponse {
    /// Creates a new JSON response from a serializable value.
    ///
    /// A serialization failure yields a 500 response instead.
    pub fn new<T: serde::Serialize>(data: &T) -> HttpResponse {
        Self::with_status(StatusCode::OK, data)
    }

    /// Creates a new JSON response with a custom status code.
    pub fn with_status<T: serde::Serialize>(status: StatusCode, data: &T) -> HttpResponse {
        match serde_json::to_string(data) {
            Ok(json) => {
                let mut response = HttpResponse::new(status, json);
                response.set_content_type("application/json");
                response
            }
            Err(e) => HttpResponse::server_error(format!("JSON serialization error: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok() {
        let response = HttpResponse::ok("hi");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.content_type(), "text/html");
        assert_eq!(response.content_bytes(), b"hi");
    }

    #[test]
    fn test_json_response() {
        let response = JsonResponse::new(&serde_json::json!({"a": 1}));
        assert_eq!(response.content_type(), "application/json");
        assert_eq!(response.content_bytes(), br#"{"a":1}"#);
    }

    #[test]
    fn test_redirect() {
        let response = HttpResponse::redirect("/posts/?q=abc");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(http::header::LOCATION).unwrap(),
            "/posts/?q=abc"
        );
    }

    #[test]
    fn test_not_allowed_sets_allow_header() {
        let response = HttpResponse::not_allowed(&["GET", "HEAD"]);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(http::header::ALLOW).unwrap(), "GET, HEAD");
    }

    #[test]
    fn test_from_error() {
        let response = HttpResponse::from_error(&ViewcraftError::InvalidPage("9".into()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_into_axum_response() {
        let response = JsonResponse::new(&serde_json::json!([])).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json; charset=utf-8"
        );
    }
}
