//! Transport-neutral request/response types and the [`HttpTransport`] seam.
//!
//! The browser front end implements the trait over `fetch`, the CLI over
//! reqwest. Everything above this module only sees these types.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ClientError;

/// HTTP verbs used against the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Whether ambient credentials (cookies) accompany a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CredentialsMode {
    /// Platform default.
    #[default]
    SameOrigin,
    /// Send cookies cross-origin (cookie-session auth).
    Include,
}

/// Binary part of a multipart form.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Filename reported to the server.
    pub filename: String,
    /// MIME type of the bytes.
    pub content_type: String,
    /// File content.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FilePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePart")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One multipart field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Plain text field.
    Text(String),
    /// File upload.
    File(FilePart),
}

/// Ordered multipart form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    fields: Vec<(String, FormValue)>,
}

impl MultipartForm {
    /// Empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields
            .push((name.into(), FormValue::Text(value.into())));
    }

    /// Append a file field.
    pub fn push_file(&mut self, name: impl Into<String>, file: FilePart) {
        self.fields.push((name.into(), FormValue::File(file)));
    }

    /// Builder form of [`Self::push_text`].
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_text(name, value);
        self
    }

    /// Fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[(String, FormValue)] {
        &self.fields
    }

    /// Consume the form, yielding its fields in insertion order.
    #[must_use]
    pub fn into_fields(self) -> Vec<(String, FormValue)> {
        self.fields
    }

    /// First text value for a field name.
    #[must_use]
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|(field, value)| match value {
            FormValue::Text(text) if field == name => Some(text.as_str()),
            _ => None,
        })
    }

    /// First file for a field name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&FilePart> {
        self.fields.iter().find_map(|(field, value)| match value {
            FormValue::File(file) if field == name => Some(file),
            _ => None,
        })
    }
}

/// Request body variants.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON document.
    Json(Value),
    /// Multipart form.
    Multipart(MultipartForm),
}

/// A fully-resolved request handed to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Verb.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Extra headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Body.
    pub body: RequestBody,
    /// Credential mode.
    pub credentials: CredentialsMode,
}

impl HttpRequest {
    /// Request without headers or body.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            credentials: CredentialsMode::default(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replace the body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Replace the credential mode.
    #[must_use]
    pub const fn credentials(mut self, credentials: CredentialsMode) -> Self {
        self.credentials = credentials;
        self
    }

    /// Header value by case-insensitive name.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response as seen by the client layer: status plus the whole body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase, possibly empty.
    pub status_text: String,
    /// `Content-Type` header value.
    pub content_type: Option<String>,
    /// Raw body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes requests. Implementations must not interpret status codes.
#[async_trait(?Send)]
pub trait HttpTransport {
    /// Send `request` and return the full response.
    ///
    /// # Errors
    /// Returns [`ClientError::Transport`] when no response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_lookup_finds_text_and_files() {
        let mut form = MultipartForm::new().text("nama", "Sari").text("_method", "PUT");
        form.push_file(
            "foto",
            FilePart {
                filename: "a.png".into(),
                content_type: "image/png".into(),
                bytes: vec![1, 2, 3],
            },
        );
        assert_eq!(form.text_value("_method"), Some("PUT"));
        assert_eq!(form.file("foto").map(|f| f.bytes.len()), Some(3));
        assert!(form.text_value("foto").is_none());
        assert_eq!(form.fields().len(), 3);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = HttpRequest::new(Method::Get, "http://x/").header("Authorization", "Bearer t");
        assert_eq!(request.header_value("authorization"), Some("Bearer t"));
        assert!(request.header_value("accept").is_none());
    }
}
