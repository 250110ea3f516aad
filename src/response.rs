//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Build a [`Response`] in your handler and return it. That is the entire
//! job description.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;

/// An outgoing HTTP response.
///
/// ```rust
/// use http::StatusCode;
/// use plank::Response;
///
/// Response::json(&serde_json::json!({"id": 1}));
/// Response::status(StatusCode::NO_CONTENT);
/// Response::error(StatusCode::BAD_REQUEST, "Project not found.");
/// ```
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Response {
    /// `200 OK` with a serialized JSON body.
    ///
    /// Serialization of plain data types cannot fail; if it somehow does,
    /// the response degrades to an empty 500.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status: StatusCode::OK,
                headers: vec![("content-type".to_owned(), "application/json".to_owned())],
                body: body.into(),
            },
            Err(_) => Self::status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// A JSON error body of the shape `{"error": message}` with the given status.
    pub fn error(status: StatusCode, message: &str) -> Self {
        let mut res = Self::json(&serde_json::json!({ "error": message }));
        res.status = status;
        res
    }

    /// Response with no body.
    pub fn status(status: StatusCode) -> Self {
        Self { status, headers: Vec::new(), body: Bytes::new() }
    }

    /// Appends a header. Used by middleware to stamp responses on the way out.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive response-header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut out = http::Response::new(Full::new(self.body));
        *out.status_mut() = self.status;
        for (name, value) in self.headers {
            // Names and values originate in this crate; a malformed pair is
            // dropped rather than failing the whole response.
            if let (Ok(n), Ok(v)) =
                (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value))
            {
                out.headers_mut().append(n, v);
            }
        }
        out
    }
}

/// Conversion into an HTTP [`Response`].
///
/// Implemented for the types handlers commonly return directly.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

/// Return a [`StatusCode`] directly from a handler for body-less responses.
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}
