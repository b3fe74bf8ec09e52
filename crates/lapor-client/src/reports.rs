//! CRUD access to the `/laporan-online` resource.

use std::rc::Rc;

use lapor_api_models::{ApiEnvelope, Report, ReportId, ReportListPayload, ReportPayload};
use serde_json::Value;
use tracing::warn;

use crate::error::ClientError;
use crate::fetch::AuthenticatedFetch;
use crate::session::Session;
use crate::transport::MultipartForm;

/// Collection path of the report resource.
pub const REPORTS_PATH: &str = "/laporan-online";

/// Form field carrying the method override for multipart updates.
pub const METHOD_OVERRIDE_FIELD: &str = "_method";

/// Outcome of a create or update call.
///
/// Mutation endpoints answer with the stored report, a bare acknowledgement,
/// or both, so the report is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    /// Stored report when the body echoes it.
    pub report: Option<Report>,
    /// Server acknowledgement text.
    pub message: Option<String>,
}

/// Report CRUD built on [`AuthenticatedFetch`].
pub struct ReportRepository {
    fetch: Rc<AuthenticatedFetch>,
}

impl ReportRepository {
    /// Build a repository over a shared fetch wrapper.
    #[must_use]
    pub const fn new(fetch: Rc<AuthenticatedFetch>) -> Self {
        Self { fetch }
    }

    /// Shared fetch wrapper.
    #[must_use]
    pub const fn fetch(&self) -> &Rc<AuthenticatedFetch> {
        &self.fetch
    }

    /// Current session snapshot.
    #[must_use]
    pub fn session(&self) -> Session {
        self.fetch.session()
    }

    /// Submit a new report.
    ///
    /// # Errors
    /// Field-level problems surface as [`ClientError::Validation`]; other
    /// failures as returned by [`AuthenticatedFetch::execute`] and
    /// [`crate::JsonResponse::into_payload`].
    pub async fn create(&self, form: MultipartForm) -> Result<SavedReport, ClientError> {
        let payload = self
            .fetch
            .post_form(REPORTS_PATH, form)
            .await?
            .into_payload()?;
        Ok(saved_from(&payload))
    }

    /// Fetch every report. An empty body yields an empty list; rows that do
    /// not decode are skipped with a warning.
    ///
    /// # Errors
    /// [`ClientError::UnexpectedShape`] when the body is neither a list nor a
    /// `{ data: [...] }` envelope; request failures otherwise.
    pub async fn list(&self) -> Result<Vec<Report>, ClientError> {
        let payload = self.fetch.get(REPORTS_PATH).await?.into_payload()?;
        if payload.is_null() {
            return Ok(Vec::new());
        }
        let rows = serde_json::from_value::<ReportListPayload>(payload.clone())
            .map_err(|_| ClientError::UnexpectedShape {
                raw: payload.to_string(),
            })?
            .into_rows();
        Ok(rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match row {
                Ok(report) => Some(report),
                Err(error) => {
                    warn!(index, %error, "skipping undecodable report row");
                    None
                }
            })
            .collect())
    }

    /// Fetch one report.
    ///
    /// # Errors
    /// [`ClientError::UnexpectedShape`] when the body holds no report.
    pub async fn get(&self, id: &ReportId) -> Result<Report, ClientError> {
        let payload = self.fetch.get(&item_path(id)).await?.into_payload()?;
        serde_json::from_value::<ReportPayload>(payload.clone())
            .map(ReportPayload::into_report)
            .map_err(|_| ClientError::UnexpectedShape {
                raw: payload.to_string(),
            })
    }

    /// Update a report. The backend only accepts multipart updates as a
    /// `POST` carrying `_method=PUT`.
    ///
    /// # Errors
    /// As for [`Self::create`].
    pub async fn update(
        &self,
        id: &ReportId,
        mut form: MultipartForm,
    ) -> Result<SavedReport, ClientError> {
        if form.text_value(METHOD_OVERRIDE_FIELD).is_none() {
            form.push_text(METHOD_OVERRIDE_FIELD, "PUT");
        }
        let payload = self
            .fetch
            .post_form(&item_path(id), form)
            .await?
            .into_payload()?;
        Ok(saved_from(&payload))
    }

    /// Delete a report.
    ///
    /// # Errors
    /// Request failures and rejections, including 404 for unknown ids.
    pub async fn delete(&self, id: &ReportId) -> Result<(), ClientError> {
        self.fetch.delete(&item_path(id)).await?.into_payload()?;
        Ok(())
    }
}

fn item_path(id: &ReportId) -> String {
    format!(
        "{REPORTS_PATH}/{}",
        urlencoding::encode(id.as_str())
    )
}

fn saved_from(payload: &Value) -> SavedReport {
    let report = payload
        .get("data")
        .and_then(|data| serde_json::from_value::<Report>(data.clone()).ok())
        .or_else(|| serde_json::from_value::<Report>(payload.clone()).ok());
    SavedReport {
        report,
        message: ApiEnvelope::from_value(payload).message().map(str::to_string),
    }
}
