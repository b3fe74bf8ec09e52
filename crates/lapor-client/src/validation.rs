//! Client-side form checks and form-body construction for reports and accounts.

use lapor_api_models::{
    DATE_FORMAT, RegisterRequest, Report, ReportStatus, ValidationErrors, parse_report_date,
};

use crate::transport::{FilePart, MultipartForm};

/// Largest accepted photo upload.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// A photo picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Original filename.
    pub filename: String,
    /// MIME type reported by the picker.
    pub content_type: String,
    /// File content.
    pub bytes: Vec<u8>,
}

/// Reject non-images and files above [`MAX_PHOTO_BYTES`].
///
/// # Errors
/// Returns the message to show next to the photo picker.
pub fn validate_photo(content_type: &str, size: usize) -> Result<(), &'static str> {
    if !content_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err("File harus berupa gambar (JPG/PNG).");
    }
    if size > MAX_PHOTO_BYTES {
        return Err("Ukuran gambar maksimal 5 MB.");
    }
    Ok(())
}

/// Keep only the date of a `YYYY-MM-DD HH:MM:SS` value.
#[must_use]
pub fn date_part(raw: &str) -> &str {
    raw.trim().split(' ').next().unwrap_or_default()
}

/// Editable report fields as typed into a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDraft {
    /// Reporter name.
    pub nama: String,
    /// Address.
    pub alamat: String,
    /// Description.
    pub deskripsi: String,
    /// Date as `YYYY-MM-DD`.
    pub tanggal: String,
    /// Selected status; creation always submits `baru`.
    pub status: Option<ReportStatus>,
    /// Replacement or new photo.
    pub foto: Option<PhotoUpload>,
}

impl ReportDraft {
    /// Prefill an edit form from a stored report.
    #[must_use]
    pub fn from_report(report: &Report) -> Self {
        Self {
            nama: report.nama.clone(),
            alamat: report.alamat.clone(),
            deskripsi: report.description().to_string(),
            tanggal: report
                .tanggal
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            status: Some(report.status),
            foto: None,
        }
    }

    /// Checks for the submission form.
    ///
    /// # Errors
    /// Returns every failing field with its message.
    pub fn validate_create(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.common_errors("Tanggal kejadian wajib diisi.");
        if self.deskripsi.trim().chars().count() < 10 {
            errors.add("deskripsi", "Deskripsi minimal 10 karakter.");
        }
        self.photo_errors(&mut errors);
        errors.into_result()
    }

    /// Checks for the edit form.
    ///
    /// # Errors
    /// Returns every failing field with its message.
    pub fn validate_edit(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.common_errors("Tanggal wajib diisi.");
        if self.status.is_none() {
            errors.add("status", "Pilih status laporan.");
        }
        self.photo_errors(&mut errors);
        errors.into_result()
    }

    /// Multipart body for creation; status is always `baru`.
    #[must_use]
    pub fn into_create_form(self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .text("nama", self.nama.trim())
            .text("alamat", self.alamat.trim())
            .text("deskripsi", self.deskripsi.trim())
            .text("tanggal", self.tanggal.trim())
            .text("status", ReportStatus::Baru.as_str());
        attach_photo(&mut form, self.foto);
        form
    }

    /// Multipart body for an update; the method override is added by the
    /// repository. The photo is only sent when replaced.
    #[must_use]
    pub fn into_update_form(self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .text("nama", self.nama.trim())
            .text("alamat", self.alamat.trim())
            .text("tanggal", self.tanggal.trim())
            .text("status", self.status.unwrap_or_default().as_str());
        if !self.deskripsi.trim().is_empty() {
            form.push_text("deskripsi", self.deskripsi.trim());
        }
        attach_photo(&mut form, self.foto);
        form
    }

    fn common_errors(&self, missing_date: &str) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.nama.trim().chars().count() < 2 {
            errors.add("nama", "Nama minimal 2 karakter.");
        }
        if self.alamat.trim().chars().count() < 6 {
            errors.add("alamat", "Alamat minimal 6 karakter.");
        }
        if self.tanggal.trim().is_empty() {
            errors.add("tanggal", missing_date);
        } else if parse_report_date(&self.tanggal).is_none() {
            errors.add("tanggal", "Format tanggal harus YYYY-MM-DD.");
        }
        errors
    }

    fn photo_errors(&self, errors: &mut ValidationErrors) {
        if let Some(photo) = &self.foto
            && let Err(message) = validate_photo(&photo.content_type, photo.bytes.len())
        {
            errors.add("foto", message);
        }
    }
}

fn attach_photo(form: &mut MultipartForm, photo: Option<PhotoUpload>) {
    if let Some(photo) = photo {
        form.push_file(
            "foto",
            FilePart {
                filename: photo.filename,
                content_type: photo.content_type,
                bytes: photo.bytes,
            },
        );
    }
}

/// Login form checks.
///
/// # Errors
/// Returns every missing field.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if email.trim().is_empty() {
        errors.add("email", "Email wajib diisi.");
    }
    if password.is_empty() {
        errors.add("password", "Password wajib diisi.");
    }
    errors.into_result()
}

/// Registration form checks.
///
/// # Errors
/// Returns every missing field and a confirmation mismatch.
pub fn validate_register(request: &RegisterRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if request.name.trim().is_empty() {
        errors.add("name", "Nama wajib diisi.");
    }
    if request.email.trim().is_empty() {
        errors.add("email", "Email wajib diisi.");
    }
    if request.password.is_empty() {
        errors.add("password", "Password wajib diisi.");
    }
    if request.password != request.password_confirmation {
        errors.add("password_confirmation", "Konfirmasi password tidak cocok.");
    }
    errors.into_result()
}
