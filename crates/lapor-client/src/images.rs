//! Protected photo retrieval and scoped display handles.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::SessionProvider;
use crate::transport::{CredentialsMode, HttpRequest, HttpTransport, Method};

/// Creates and releases locally renderable handles (object URLs in the
/// browser, temporary files in the CLI) for fetched image bytes.
pub trait ImageHandleFactory {
    /// Create a handle for `bytes`.
    ///
    /// # Errors
    /// Returns [`ClientError::Image`] when the platform cannot allocate one.
    fn create(&self, bytes: &[u8], content_type: Option<&str>) -> Result<String, ClientError>;

    /// Release a handle previously returned by [`Self::create`].
    fn release(&self, handle: &str);
}

/// A live image handle; released when dropped.
pub struct ObjectUrl {
    url: String,
    factory: Rc<dyn ImageHandleFactory>,
}

impl ObjectUrl {
    /// Wrap a handle created by `factory`.
    #[must_use]
    pub fn new(url: String, factory: Rc<dyn ImageHandleFactory>) -> Self {
        Self { url, factory }
    }

    /// Renderable handle.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.url).finish()
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.factory.release(&self.url);
    }
}

/// Last path segment of a stored photo reference (`foto/a.jpg` -> `a.jpg`).
#[must_use]
pub fn bare_filename(foto: &str) -> &str {
    let trimmed = foto.trim();
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed)
}

/// Fetches photos from `GET {api}/foto/{filename}` with bearer or cookie auth.
pub struct ProtectedImageLoader {
    transport: Rc<dyn HttpTransport>,
    session: Rc<dyn SessionProvider>,
    factory: Rc<dyn ImageHandleFactory>,
    config: ClientConfig,
}

impl ProtectedImageLoader {
    /// Wire the loader to its collaborators.
    #[must_use]
    pub fn new(
        transport: Rc<dyn HttpTransport>,
        session: Rc<dyn SessionProvider>,
        factory: Rc<dyn ImageHandleFactory>,
        config: ClientConfig,
    ) -> Self {
        Self {
            transport,
            session,
            factory,
            config,
        }
    }

    /// Protected endpoint for a photo reference.
    #[must_use]
    pub fn protected_url(&self, foto: &str) -> String {
        self.config
            .endpoint(&format!("foto/{}", urlencoding::encode(bare_filename(foto))))
    }

    /// Unauthenticated public-storage URL used as a degraded fallback.
    #[must_use]
    pub fn public_url(&self, foto: &str) -> String {
        format!(
            "{}/{}",
            self.config.storage_base_url(),
            urlencoding::encode(bare_filename(foto))
        )
    }

    /// Fetch the photo bytes and wrap them in a handle.
    ///
    /// A held token is sent as a bearer header; otherwise the request is made
    /// in credential-bearing mode so a cookie session can authorize it.
    ///
    /// # Errors
    /// - [`ClientError::ImageFetch`] for a non-2xx response or an empty reference.
    /// - [`ClientError::Transport`] when no response arrives.
    /// - [`ClientError::Image`] when the handle cannot be created.
    pub async fn load(&self, foto: &str) -> Result<ObjectUrl, ClientError> {
        if bare_filename(foto).is_empty() {
            return Err(ClientError::ImageFetch {
                status: 0,
                message: "empty photo reference".to_string(),
            });
        }
        let request = HttpRequest::new(Method::Get, self.protected_url(foto));
        let request = match self.session.session().bearer_token() {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request.credentials(CredentialsMode::Include),
        };
        debug!(url = %request.url, "protected image request");
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            let text = response.text();
            let message = if text.trim().is_empty() {
                response.status_text.clone()
            } else {
                text
            };
            return Err(ClientError::ImageFetch {
                status: response.status,
                message,
            });
        }
        let handle = self
            .factory
            .create(&response.body, response.content_type.as_deref())?;
        Ok(ObjectUrl::new(handle, Rc::clone(&self.factory)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySession;
    use crate::testing::{CountingFactory, FakeTransport, image_response, session_with_token};

    fn loader(
        transport: &Rc<FakeTransport>,
        factory: &Rc<CountingFactory>,
        session: MemorySession,
    ) -> ProtectedImageLoader {
        ProtectedImageLoader::new(
            transport.clone(),
            Rc::new(session),
            factory.clone(),
            ClientConfig::default(),
        )
    }

    #[test]
    fn bare_filename_strips_any_directory() {
        assert_eq!(bare_filename("foto/abc.jpg"), "abc.jpg");
        assert_eq!(bare_filename(r"C:\uploads\x y.png"), "x y.png");
        assert_eq!(bare_filename("plain.gif"), "plain.gif");
    }

    #[test]
    fn urls_encode_the_bare_filename() {
        let loader = loader(
            &Rc::new(FakeTransport::new()),
            &Rc::new(CountingFactory::default()),
            MemorySession::default(),
        );
        assert_eq!(
            loader.public_url("foto/x y.png"),
            "http://127.0.0.1:8000/storage/foto/x%20y.png"
        );
        assert_eq!(
            loader.protected_url("x y.png"),
            "http://127.0.0.1:8000/api/foto/x%20y.png"
        );
    }

    #[tokio::test]
    async fn bearer_token_is_used_without_cookie_mode() {
        let transport = Rc::new(FakeTransport::new());
        transport.respond(Method::Get, "/foto/a.jpg", image_response(200, b"jpeg"));
        let factory = Rc::new(CountingFactory::default());
        let loader = loader(&transport, &factory, session_with_token("tok"));

        let handle = loader.load("foto/a.jpg").await.expect("image loads");
        assert_eq!(handle.url(), "blob:test/1");

        let sent = transport.last_request().expect("request sent");
        assert_eq!(sent.header_value("Authorization"), Some("Bearer tok"));
        assert_eq!(sent.credentials, CredentialsMode::SameOrigin);

        drop(handle);
        assert!(factory.live().is_empty());
        assert_eq!(factory.released(), vec!["blob:test/1".to_string()]);
    }

    #[tokio::test]
    async fn anonymous_load_includes_credentials() {
        let transport = Rc::new(FakeTransport::new());
        transport.respond(Method::Get, "/foto/a.jpg", image_response(200, b"jpeg"));
        let factory = Rc::new(CountingFactory::default());
        let loader = loader(&transport, &factory, MemorySession::default());

        let _handle = loader.load("a.jpg").await.expect("image loads");
        let sent = transport.last_request().expect("request sent");
        assert!(sent.header_value("Authorization").is_none());
        assert_eq!(sent.credentials, CredentialsMode::Include);
    }

    #[tokio::test]
    async fn failure_status_surfaces_as_image_fetch_error() {
        let transport = Rc::new(FakeTransport::new());
        transport.respond(Method::Get, "/foto/a.jpg", image_response(403, b""));
        let factory = Rc::new(CountingFactory::default());
        let loader = loader(&transport, &factory, session_with_token("tok"));

        let err = loader.load("a.jpg").await.expect_err("forbidden");
        assert!(matches!(
            err,
            ClientError::ImageFetch { status: 403, ref message } if message == "Forbidden"
        ));
        assert_eq!(factory.created(), 0);
    }
}
