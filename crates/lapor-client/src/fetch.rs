//! JSON request wrapper that attaches the session's bearer token.

use std::rc::Rc;

use lapor_api_models::ApiEnvelope;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::{Session, SessionProvider};
use crate::transport::{HttpRequest, HttpTransport, Method, MultipartForm, RequestBody};

const LOG_PREVIEW_CHARS: usize = 200;

/// Issues JSON API calls with `Accept: application/json` and, when a token is
/// held, `Authorization: Bearer <token>`.
pub struct AuthenticatedFetch {
    transport: Rc<dyn HttpTransport>,
    session: Rc<dyn SessionProvider>,
    config: ClientConfig,
}

impl AuthenticatedFetch {
    /// Wire the fetch wrapper to its collaborators.
    #[must_use]
    pub fn new(
        transport: Rc<dyn HttpTransport>,
        session: Rc<dyn SessionProvider>,
        config: ClientConfig,
    ) -> Self {
        Self {
            transport,
            session,
            config,
        }
    }

    /// Endpoint configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current session snapshot.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session.session()
    }

    /// Session provider used for token lookups.
    #[must_use]
    pub fn session_provider(&self) -> &Rc<dyn SessionProvider> {
        &self.session
    }

    /// Underlying transport.
    #[must_use]
    pub fn transport(&self) -> &Rc<dyn HttpTransport> {
        &self.transport
    }

    /// Unauthenticated request skeleton for an API path.
    #[must_use]
    pub fn request(&self, method: Method, path: &str) -> HttpRequest {
        HttpRequest::new(method, self.config.endpoint(path))
    }

    /// `GET` an API path.
    ///
    /// # Errors
    /// See [`Self::execute`].
    pub async fn get(&self, path: &str) -> Result<JsonResponse, ClientError> {
        self.execute(self.request(Method::Get, path)).await
    }

    /// `POST` a JSON document.
    ///
    /// # Errors
    /// Fails with [`ClientError::UnexpectedShape`] if `body` cannot be
    /// serialized, otherwise see [`Self::execute`].
    pub async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<JsonResponse, ClientError> {
        let value = serde_json::to_value(body).map_err(|err| ClientError::UnexpectedShape {
            raw: err.to_string(),
        })?;
        self.execute(self.request(Method::Post, path).body(RequestBody::Json(value)))
            .await
    }

    /// `POST` a multipart form.
    ///
    /// # Errors
    /// See [`Self::execute`].
    pub async fn post_form(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<JsonResponse, ClientError> {
        self.execute(
            self.request(Method::Post, path)
                .body(RequestBody::Multipart(form)),
        )
        .await
    }

    /// `DELETE` an API path.
    ///
    /// # Errors
    /// See [`Self::execute`].
    pub async fn delete(&self, path: &str) -> Result<JsonResponse, ClientError> {
        self.execute(self.request(Method::Delete, path)).await
    }

    /// Attach auth headers, send, and decode the body as JSON.
    ///
    /// The status code is returned untouched; use
    /// [`JsonResponse::into_payload`] to classify success.
    ///
    /// # Errors
    /// - [`ClientError::Transport`] when no response arrives.
    /// - [`ClientError::MalformedResponse`] when the body is not JSON.
    pub async fn execute(&self, request: HttpRequest) -> Result<JsonResponse, ClientError> {
        let request = self.authorize(request);
        debug!(method = request.method.as_str(), url = %request.url, "api request");
        let response = self.transport.send(request).await?;
        let raw = response.text();
        let body = decode_body(response.status, &raw)?;
        Ok(JsonResponse {
            status: response.status,
            status_text: response.status_text,
            body,
        })
    }

    fn authorize(&self, request: HttpRequest) -> HttpRequest {
        let request = request.header("Accept", "application/json");
        match self.session.session().bearer_token() {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }
}

fn decode_body(status: u16, raw: &str) -> Result<Value, ClientError> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(raw).map_err(|err| {
        warn!(
            status,
            error = %err,
            body = %preview(raw),
            "response body is not valid JSON"
        );
        ClientError::MalformedResponse {
            status,
            raw: raw.to_string(),
        }
    })
}

pub(crate) fn preview(raw: &str) -> String {
    let mut chars = raw.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

/// Decoded JSON body together with its HTTP status.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase.
    pub status_text: String,
    /// Decoded body; `Null` for an empty body.
    pub body: Value,
}

impl JsonResponse {
    /// Status markers found in the body.
    #[must_use]
    pub fn envelope(&self) -> ApiEnvelope {
        ApiEnvelope::from_value(&self.body)
    }

    /// Apply the single success contract used across endpoints.
    ///
    /// 1. A non-empty `errors` map is a validation failure, whatever the status.
    /// 2. A non-2xx status is a rejection carrying the body's message.
    /// 3. An explicit `false` in `status`, `success` or `ok` is a rejection.
    /// 4. Anything else is success and yields the body.
    ///
    /// # Errors
    /// [`ClientError::Validation`] or [`ClientError::Rejected`] per the rules above.
    pub fn into_payload(self) -> Result<Value, ClientError> {
        let envelope = self.envelope();
        if let Some(errors) = envelope.errors.clone() {
            return Err(ClientError::Validation(errors));
        }
        let success = (200..300).contains(&self.status);
        if !success || envelope.explicit_failure() {
            let message = envelope
                .message()
                .map(str::to_string)
                .or_else(|| (!self.status_text.is_empty()).then(|| self.status_text.clone()))
                .unwrap_or_else(|| format!("HTTP {}", self.status));
            return Err(ClientError::Rejected {
                status: self.status,
                message,
            });
        }
        Ok(self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySession;
    use crate::testing::{FakeTransport, json_response, session_with_token};
    use serde_json::json;

    fn fetch_with(transport: &Rc<FakeTransport>, token: Option<&str>) -> AuthenticatedFetch {
        let session: Rc<dyn SessionProvider> = match token {
            Some(token) => Rc::new(session_with_token(token)),
            None => Rc::new(MemorySession::default()),
        };
        AuthenticatedFetch::new(transport.clone(), session, ClientConfig::default())
    }

    #[tokio::test]
    async fn bearer_and_accept_headers_are_attached() {
        let transport = Rc::new(FakeTransport::new());
        transport.respond(Method::Get, "/laporan-online", json_response(200, &json!([])));
        let fetch = fetch_with(&transport, Some("tok-1"));

        let response = fetch.get("/laporan-online").await.expect("request succeeds");
        assert_eq!(response.body, json!([]));

        let sent = transport.last_request().expect("request recorded");
        assert_eq!(sent.url, "http://127.0.0.1:8000/api/laporan-online");
        assert_eq!(sent.header_value("accept"), Some("application/json"));
        assert_eq!(sent.header_value("authorization"), Some("Bearer tok-1"));
    }

    #[tokio::test]
    async fn anonymous_requests_carry_no_authorization() {
        let transport = Rc::new(FakeTransport::new());
        transport.respond(Method::Get, "/laporan-online", json_response(200, &json!([])));
        let fetch = fetch_with(&transport, None);

        fetch.get("/laporan-online").await.expect("request succeeds");
        let sent = transport.last_request().expect("request recorded");
        assert!(sent.header_value("authorization").is_none());
    }

    #[tokio::test]
    async fn non_json_body_is_malformed_with_raw_text() {
        let transport = Rc::new(FakeTransport::new());
        transport.respond_raw(Method::Get, "/laporan-online", 500, "<h1>Server Error</h1>");
        let fetch = fetch_with(&transport, None);

        let err = fetch.get("/laporan-online").await.expect_err("body is html");
        match err {
            ClientError::MalformedResponse { status, raw } => {
                assert_eq!(status, 500);
                assert_eq!(raw, "<h1>Server Error</h1>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_body_decodes_as_null() {
        let transport = Rc::new(FakeTransport::new());
        transport.respond_raw(Method::Delete, "/laporan-online/1", 204, "");
        let fetch = fetch_with(&transport, Some("t"));

        let response = fetch.delete("/laporan-online/1").await.expect("empty body ok");
        assert_eq!(response.body, Value::Null);
        assert_eq!(response.into_payload().expect("204 is success"), Value::Null);
    }

    #[test]
    fn payload_classification_follows_one_contract() {
        let validation = JsonResponse {
            status: 422,
            status_text: String::new(),
            body: json!({ "message": "invalid", "errors": { "nama": ["wajib"] } }),
        };
        assert!(matches!(
            validation.into_payload(),
            Err(ClientError::Validation(errors)) if errors.first("nama") == Some("wajib")
        ));

        let flagged = JsonResponse {
            status: 200,
            status_text: "OK".into(),
            body: json!({ "success": false, "message": "Gagal simpan" }),
        };
        assert!(matches!(
            flagged.into_payload(),
            Err(ClientError::Rejected { status: 200, message }) if message == "Gagal simpan"
        ));

        let not_found = JsonResponse {
            status: 404,
            status_text: String::new(),
            body: json!({}),
        };
        assert!(matches!(
            not_found.into_payload(),
            Err(ClientError::Rejected { status: 404, message }) if message == "HTTP 404"
        ));

        let ok = JsonResponse {
            status: 201,
            status_text: String::new(),
            body: json!({ "status": true, "data": { "id": 1 } }),
        };
        assert!(ok.into_payload().is_ok());
    }

    #[test]
    fn preview_truncates_long_bodies() {
        let long = "x".repeat(LOG_PREVIEW_CHARS + 5);
        let shown = preview(&long);
        assert!(shown.ends_with('…'));
        assert_eq!(shown.chars().count(), LOG_PREVIEW_CHARS + 1);
        assert_eq!(preview("short"), "short");
    }
}
