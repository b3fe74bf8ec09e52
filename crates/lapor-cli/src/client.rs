//! Shared HTTP transport, application context and CLI error types.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use lapor_api_models::ValidationErrors;
use lapor_client::{
    AuthService, AuthenticatedFetch, ClientConfig, ClientError, FormValue, HttpRequest,
    HttpResponse, HttpTransport, ImageHandleFactory, Method, MultipartForm, ProtectedImageLoader,
    ReportRepository, RequestBody, Session, SessionProvider,
};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Url, multipart};

use crate::cli::Cli;
use crate::images::TempFileImages;
use crate::session::FileSession;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        match &err {
            ClientError::Validation(errors) => Self::Validation(format_validation(errors)),
            ClientError::Rejected {
                status: 400 | 409 | 422,
                message,
            } => Self::Validation(message.clone()),
            ClientError::MissingToken => Self::Validation(err.to_string()),
            _ => Self::Failure(anyhow::Error::new(err)),
        }
    }
}

/// Render field errors as `field: message; field: message`.
pub(crate) fn format_validation(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Dependencies constructed from environment flags and CLI options.
#[derive(Clone)]
pub(crate) struct CliDependencies {
    pub(crate) client: Client,
}

impl CliDependencies {
    /// Construct a configured HTTP client tagged with a per-invocation request id.
    pub(crate) fn from_cli(cli: &Cli, trace_id: &str) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let client = Client::builder()
            .timeout(Duration::from_secs(cli.timeout))
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self { client })
    }
}

/// [`HttpTransport`] over reqwest.
pub(crate) struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub(crate) const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(to_multipart(form)?),
        };

        let response = builder.send().await.map_err(ClientError::transport)?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(ClientError::transport)?
            .to_vec();
        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body,
        })
    }
}

fn to_multipart(form: MultipartForm) -> Result<multipart::Form, ClientError> {
    form.into_fields()
        .into_iter()
        .try_fold(multipart::Form::new(), |acc, (name, value)| match value {
            FormValue::Text(text) => Ok(acc.text(name, text)),
            FormValue::File(file) => {
                let part = multipart::Part::bytes(file.bytes)
                    .file_name(file.filename)
                    .mime_str(&file.content_type)
                    .map_err(ClientError::transport)?;
                Ok(acc.part(name, part))
            }
        })
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) session: Rc<dyn SessionProvider>,
    pub(crate) transport: Rc<dyn HttpTransport>,
    pub(crate) repository: ReportRepository,
    pub(crate) auth: AuthService,
    pub(crate) images: ProtectedImageLoader,
}

impl AppContext {
    /// Wire the shared client components over one transport and session.
    pub(crate) fn new(
        client: Client,
        config: ClientConfig,
        session: Rc<dyn SessionProvider>,
        image_dir: PathBuf,
    ) -> Self {
        let transport: Rc<dyn HttpTransport> = Rc::new(ReqwestTransport::new(client));
        let fetch = Rc::new(AuthenticatedFetch::new(
            Rc::clone(&transport),
            Rc::clone(&session),
            config.clone(),
        ));
        let factory: Rc<dyn ImageHandleFactory> = Rc::new(TempFileImages::new(image_dir));
        let images = ProtectedImageLoader::new(
            Rc::clone(&transport),
            Rc::clone(&session),
            factory,
            config,
        );
        Self {
            session,
            transport,
            repository: ReportRepository::new(Rc::clone(&fetch)),
            auth: AuthService::new(fetch),
            images,
        }
    }

    /// Build the context from parsed flags.
    pub(crate) fn from_cli(cli: &Cli, deps: &CliDependencies) -> CliResult<Self> {
        let config = ClientConfig::from_api_base(cli.api_url.as_str());
        let config = match &cli.storage_url {
            Some(storage) => config.with_storage_base(storage.as_str()),
            None => config,
        };
        let session_path = match &cli.session_file {
            Some(path) => path.clone(),
            None => FileSession::default_path().ok_or_else(|| {
                CliError::validation(
                    "cannot locate a config directory; pass --session-file or set LAPOR_SESSION_FILE",
                )
            })?,
        };
        Ok(Self::new(
            deps.client.clone(),
            config,
            Rc::new(FileSession::new(session_path)),
            std::env::temp_dir(),
        ))
    }

    /// Current session, failing when no token is held.
    pub(crate) fn require_session(&self) -> CliResult<Session> {
        let session = self.session.session();
        if session.is_authenticated() {
            Ok(session)
        } else {
            Err(ClientError::MissingToken.into())
        }
    }
}

/// Parse a base URL flag.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}
