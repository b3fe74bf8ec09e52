#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
//! Shared HTTP DTOs for the LaporOnline API.
//!
//! The backend is loose about shapes: ids arrive as numbers or strings, list
//! endpoints answer with either a bare array or a `{ data: [...] }` envelope,
//! and validation failures carry a field-keyed `errors` map whose values are a
//! string or a list of strings. Every such variation is absorbed here so the
//! client crates only ever see one typed representation.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Wire format used for `tanggal` values in forms and JSON bodies.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifier of a single report, normalised to its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    /// Wrap an identifier value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the identifier as used in resource paths.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ReportId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ReportId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for ReportId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ReportId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(value) => Self(value.to_string()),
            RawId::Text(value) => Self(value),
        })
    }
}

/// Processing state of a report. Any value may be set by an editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Freshly submitted, not yet handled.
    #[default]
    Baru,
    /// Being handled.
    Diproses,
    /// Resolved.
    Selesai,
}

impl ReportStatus {
    /// Every status in workflow order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Baru, Self::Diproses, Self::Selesai]
    }

    /// Wire value for forms and query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Baru => "baru",
            Self::Diproses => "diproses",
            Self::Selesai => "selesai",
        }
    }

    /// Parse a wire value, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "baru" => Some(Self::Baru),
            "diproses" => Some(Self::Diproses),
            "selesai" => Some(Self::Selesai),
            _ => None,
        }
    }
}

impl Display for ReportStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReportStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Self::parse).unwrap_or_default())
    }
}

/// A citizen-submitted incident report ("laporan").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Server-assigned identifier.
    pub id: ReportId,
    /// Reporter name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nama: String,
    /// Location or address of the incident.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub alamat: String,
    /// Free-text description; may be long or missing.
    #[serde(default)]
    pub deskripsi: Option<String>,
    /// Incident date. Unparseable values are treated as absent.
    #[serde(
        default,
        deserialize_with = "lenient_date",
        serialize_with = "serialize_date"
    )]
    pub tanggal: Option<NaiveDate>,
    /// Processing status; unknown values fall back to [`ReportStatus::Baru`].
    #[serde(default)]
    pub status: ReportStatus,
    /// Stored photo reference (bare filename or storage path).
    #[serde(default)]
    pub foto: Option<String>,
}

impl Report {
    /// Photo reference when one is declared.
    #[must_use]
    pub fn photo(&self) -> Option<&str> {
        self.foto
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Description text, empty when absent.
    #[must_use]
    pub fn description(&self) -> &str {
        self.deskripsi.as_deref().unwrap_or_default()
    }
}

/// Parse the date part of a `YYYY-MM-DD[ HH:MM:SS]` or RFC 3339 value.
#[must_use]
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_report_date))
}

#[allow(clippy::ref_option)]
fn serialize_date<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}

/// Response of `GET /laporan-online`: a bare array or a `{ data: [...] }` envelope.
///
/// Rows stay raw until [`ReportListPayload::into_rows`] so a single malformed
/// entry does not reject the whole listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ReportListPayload {
    /// Bare JSON array of reports.
    RawList(Vec<Value>),
    /// Object wrapping the reports under `data`.
    Envelope {
        /// Wrapped reports.
        data: Vec<Value>,
    },
}

impl ReportListPayload {
    /// Decode every row independently, keeping the row order.
    #[must_use]
    pub fn into_rows(self) -> Vec<Result<Report, serde_json::Error>> {
        match self {
            Self::RawList(rows) | Self::Envelope { data: rows } => {
                rows.into_iter().map(serde_json::from_value).collect()
            }
        }
    }
}

/// Response of `GET /laporan-online/{id}` and of successful mutations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ReportPayload {
    /// Object wrapping the report under `data`.
    Envelope {
        /// Wrapped report.
        data: Report,
    },
    /// The report object itself.
    Bare(Report),
}

impl ReportPayload {
    /// Collapse either shape into the report.
    #[must_use]
    pub fn into_report(self) -> Report {
        match self {
            Self::Envelope { data: report } | Self::Bare(report) => report,
        }
    }
}

/// Field-keyed validation messages, as returned by the backend on HTTP 422
/// and produced by client-side form checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// First message recorded for a field.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Drop all messages for a field (e.g. once the user edits it).
    pub fn clear_field(&mut self, field: &str) {
        self.0.remove(field);
    }

    /// Whether a field has at least one message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Whether no field has messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate fields in name order with their messages.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Convert into `Ok(())` when empty.
    ///
    /// # Errors
    /// Returns `self` when at least one field has a message.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl<'de> Deserialize<'de> for ValidationErrors {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Messages {
            One(String),
            Many(Vec<String>),
        }

        let raw = BTreeMap::<String, Messages>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .map(|(field, messages)| {
                    let messages = match messages {
                        Messages::One(message) => vec![message],
                        Messages::Many(messages) => messages,
                    };
                    (field, messages)
                })
                .collect(),
        ))
    }
}

/// Loosely-typed view over the status markers the backend sprinkles on bodies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiEnvelope {
    /// `status` marker (boolean on some endpoints, string on others).
    pub status: Option<Value>,
    /// `success` marker.
    pub success: Option<Value>,
    /// `ok` marker.
    pub ok: Option<Value>,
    /// Human-readable `message`.
    pub message: Option<String>,
    /// Human-readable `error`.
    pub error: Option<String>,
    /// Field-keyed validation errors, when present and non-empty.
    pub errors: Option<ValidationErrors>,
    /// `data` payload.
    pub data: Option<Value>,
}

impl ApiEnvelope {
    /// Extract markers from a decoded body; non-object bodies yield an empty envelope.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            status: object.get("status").cloned(),
            success: object.get("success").cloned(),
            ok: object.get("ok").cloned(),
            message: text("message"),
            error: text("error"),
            errors: object
                .get("errors")
                .filter(|errors| errors.is_object())
                .and_then(|errors| serde_json::from_value::<ValidationErrors>(errors.clone()).ok())
                .filter(|errors| !errors.is_empty()),
            data: object.get("data").cloned(),
        }
    }

    /// Whether any marker explicitly reports failure.
    #[must_use]
    pub fn explicit_failure(&self) -> bool {
        [&self.status, &self.success, &self.ok]
            .into_iter()
            .any(|marker| matches!(marker, Some(Value::Bool(false))))
    }

    /// Best human-readable message carried by the body.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|message| !message.trim().is_empty())
    }
}

/// Account role as reported at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May edit and delete reports.
    Admin,
    /// Regular citizen account.
    User,
}

impl Role {
    /// Storage/wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Parse a stored value; anything other than `admin` is a regular user.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.eq_ignore_ascii_case("admin") {
            Some(Self::Admin)
        } else {
            Some(Self::User)
        }
    }
}

/// `POST /login` body.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// `POST /register` body.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Password repeated for confirmation.
    pub password_confirmation: String,
}

/// Profile block returned alongside a login token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Account email.
    #[serde(default)]
    pub email: Option<String>,
    /// Account role, when the backend reports one.
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
}

/// `POST /login` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    /// Bearer token; absent on failure.
    #[serde(default)]
    pub token: Option<String>,
    /// Authenticated user.
    #[serde(default)]
    pub user: Option<UserProfile>,
    /// Failure or greeting message.
    #[serde(default)]
    pub message: Option<String>,
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Role::parse))
}
