//! Login, registration, logout and route guarding.

use std::rc::Rc;

use lapor_api_models::{LoginResponse, RegisterRequest};
use tracing::{info, warn};

use crate::error::ClientError;
use crate::fetch::AuthenticatedFetch;
use crate::session::Session;
use crate::transport::Method;

/// Message shown when login fails without a server explanation.
pub const LOGIN_FAILED: &str = "Cek email & password";

/// Session lifecycle against `/login`, `/register` and `/logout`.
pub struct AuthService {
    fetch: Rc<AuthenticatedFetch>,
}

impl AuthService {
    /// Build the service over a shared fetch wrapper.
    #[must_use]
    pub const fn new(fetch: Rc<AuthenticatedFetch>) -> Self {
        Self { fetch }
    }

    /// Exchange credentials for a token and persist the resulting session.
    ///
    /// # Errors
    /// - [`ClientError::Rejected`] when the server refuses or returns no token.
    /// - [`ClientError::Validation`] for field errors.
    /// - [`ClientError::Session`] when the session cannot be stored.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = serde_json::json!({ "email": email.trim(), "password": password });
        let response = self.fetch.post_json("/login", &body).await?;
        let status = response.status;
        let fallback = response
            .envelope()
            .message()
            .map_or_else(|| LOGIN_FAILED.to_string(), str::to_string);

        let payload = match response.into_payload() {
            Ok(payload) => payload,
            Err(ClientError::Rejected { status, .. }) => {
                return Err(ClientError::Rejected {
                    status,
                    message: fallback,
                });
            }
            Err(err) => return Err(err),
        };
        let login: LoginResponse =
            serde_json::from_value(payload).map_err(|err| ClientError::UnexpectedShape {
                raw: err.to_string(),
            })?;
        let Some(token) = login.token.filter(|token| !token.trim().is_empty()) else {
            return Err(ClientError::Rejected {
                status,
                message: fallback,
            });
        };

        let user = login.user.unwrap_or_default();
        let session = Session {
            token: Some(token),
            role: user.role,
            name: user.name,
        };
        self.fetch.session_provider().store(&session)?;
        info!(role = ?session.role, "logged in");
        Ok(session)
    }

    /// Create an account. Returns the server's acknowledgement text.
    ///
    /// # Errors
    /// [`ClientError::Validation`] for field errors, [`ClientError::Rejected`]
    /// for other refusals.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<String>, ClientError> {
        let response = self.fetch.post_json("/register", request).await?;
        let message = response.envelope().message().map(str::to_string);
        response.into_payload()?;
        Ok(message)
    }

    /// Best-effort server logout followed by an unconditional local clear.
    ///
    /// # Errors
    /// Only [`ClientError::Session`] when local storage cannot be cleared;
    /// server failures are logged and ignored.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if self.fetch.session().is_authenticated() {
            let outcome = match self.fetch.execute(self.fetch.request(Method::Post, "/logout")).await {
                Ok(response) => response.into_payload().map(drop),
                Err(err) => Err(err),
            };
            if let Err(err) = outcome {
                warn!(error = %err, "server logout failed; clearing local session anyway");
            }
        }
        self.fetch.session_provider().clear()
    }
}

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone.
    Public,
    /// Only holders of a token.
    Protected,
    /// Only visitors without a token (login, register).
    GuestOnly,
}

/// Decision for a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render the route.
    Allow,
    /// Send the visitor to `/login`.
    RedirectToLogin,
    /// Send the visitor to `/`.
    RedirectToHome,
}

/// Route guard shared by every front end.
#[must_use]
pub fn guard(access: Access, session: &Session) -> GuardOutcome {
    match (access, session.is_authenticated()) {
        (Access::Protected, false) => GuardOutcome::RedirectToLogin,
        (Access::GuestOnly, true) => GuardOutcome::RedirectToHome,
        _ => GuardOutcome::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::session::{MemorySession, SessionProvider};
    use crate::testing::{FakeTransport, json_response, session_with_token};
    use crate::transport::RequestBody;
    use lapor_api_models::Role;
    use serde_json::json;

    fn service(transport: &Rc<FakeTransport>, session: &Rc<MemorySession>) -> AuthService {
        AuthService::new(Rc::new(AuthenticatedFetch::new(
            transport.clone(),
            session.clone(),
            ClientConfig::default(),
        )))
    }

    #[tokio::test]
    async fn login_stores_token_role_and_name() {
        let transport = Rc::new(FakeTransport::new());
        transport.respond(
            Method::Post,
            "/login",
            json_response(200, &json!({ "token": "abc", "user": { "name": "Admin Desa", "role": "admin" } })),
        );
        let session = Rc::new(MemorySession::default());
        let auth = service(&transport, &session);

        let stored = auth.login(" a@b.id ", "rahasia").await.expect("login");
        assert_eq!(stored.role, Some(Role::Admin));
        assert_eq!(session.session().bearer_token(), Some("abc"));
        assert_eq!(session.session().name.as_deref(), Some("Admin Desa"));

        let sent = transport.last_request().expect("sent");
        assert_eq!(
            sent.body,
            RequestBody::Json(json!({ "email": "a@b.id", "password": "rahasia" }))
        );
    }

    #[tokio::test]
    async fn login_without_token_uses_server_or_default_message() {
        let transport = Rc::new(FakeTransport::new());
        transport.respond(Method::Post, "/login", json_response(401, &json!({ "message": "Unauthorized" })));
        transport.respond(Method::Post, "/login", json_response(200, &json!({})));
        let session = Rc::new(MemorySession::default());
        let auth = service(&transport, &session);

        let first = auth.login("a@b.id", "x").await.expect_err("401");
        assert!(matches!(first, ClientError::Rejected { status: 401, ref message } if message == "Unauthorized"));
        let second = auth.login("a@b.id", "x").await.expect_err("no token");
        assert!(matches!(second, ClientError::Rejected { ref message, .. } if message == LOGIN_FAILED));
        assert!(!session.session().is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_even_when_server_fails() {
        let transport = Rc::new(FakeTransport::new());
        transport.fail(Method::Post, "/logout", "connection reset");
        let session = Rc::new(session_with_token("tok"));
        let auth = service(&transport, &session);

        auth.logout().await.expect("local clear succeeds");
        assert_eq!(session.session(), Session::default());
        assert_eq!(transport.count(Method::Post, "/logout"), 1);
        let sent = transport.last_request().expect("sent");
        assert_eq!(sent.header_value("authorization"), Some("Bearer tok"));
    }

    #[tokio::test]
    async fn register_maps_field_errors() {
        let transport = Rc::new(FakeTransport::new());
        transport.respond(
            Method::Post,
            "/register",
            json_response(422, &json!({ "errors": { "email": "The email has already been taken." } })),
        );
        let session = Rc::new(MemorySession::default());
        let auth = service(&transport, &session);

        let err = auth
            .register(&RegisterRequest {
                name: "Sari".into(),
                email: "sari@desa.id".into(),
                password: "rahasia1".into(),
                password_confirmation: "rahasia1".into(),
            })
            .await
            .expect_err("taken");
        assert!(err.validation().is_some_and(|errors| errors.contains("email")));
    }

    #[test]
    fn guard_redirects_by_token_presence() {
        let anonymous = Session::default();
        let signed_in = session_with_token("t").session();
        assert_eq!(guard(Access::Protected, &anonymous), GuardOutcome::RedirectToLogin);
        assert_eq!(guard(Access::Protected, &signed_in), GuardOutcome::Allow);
        assert_eq!(guard(Access::GuestOnly, &signed_in), GuardOutcome::RedirectToHome);
        assert_eq!(guard(Access::GuestOnly, &anonymous), GuardOutcome::Allow);
        assert_eq!(guard(Access::Public, &anonymous), GuardOutcome::Allow);
    }
}
