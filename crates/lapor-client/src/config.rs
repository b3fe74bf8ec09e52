//! Endpoint configuration shared by every client component.

/// API base used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

const STORAGE_SUFFIX: &str = "/storage/foto";

/// Base URLs for the JSON API and the public photo storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_base_url: String,
    storage_base_url: String,
}

impl ClientConfig {
    /// Build a configuration from explicit bases. Trailing slashes are dropped.
    #[must_use]
    pub fn new(api_base_url: impl AsRef<str>, storage_base_url: impl AsRef<str>) -> Self {
        Self {
            api_base_url: trim_base(api_base_url.as_ref()),
            storage_base_url: trim_base(storage_base_url.as_ref()),
        }
    }

    /// Derive the public storage base from the API base by replacing a
    /// trailing `/api` segment with `/storage/foto`.
    #[must_use]
    pub fn from_api_base(api_base_url: impl AsRef<str>) -> Self {
        let api = trim_base(api_base_url.as_ref());
        let origin = api.strip_suffix("/api").unwrap_or(&api);
        let storage = format!("{origin}{STORAGE_SUFFIX}");
        Self {
            api_base_url: api,
            storage_base_url: storage,
        }
    }

    /// Replace the storage base while keeping the API base.
    #[must_use]
    pub fn with_storage_base(mut self, storage_base_url: impl AsRef<str>) -> Self {
        self.storage_base_url = trim_base(storage_base_url.as_ref());
        self
    }

    /// JSON API base, without trailing slash.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Public photo storage base, without trailing slash.
    #[must_use]
    pub fn storage_base_url(&self) -> &str {
        &self.storage_base_url
    }

    /// Absolute URL for an API path such as `/laporan-online`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_api_base(DEFAULT_API_BASE)
    }
}

fn trim_base(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_base_is_derived_from_api_origin() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url(), "http://127.0.0.1:8000/api");
        assert_eq!(
            config.storage_base_url(),
            "http://127.0.0.1:8000/storage/foto"
        );

        let bare = ClientConfig::from_api_base("https://lapor.example.id/");
        assert_eq!(
            bare.storage_base_url(),
            "https://lapor.example.id/storage/foto"
        );
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = ClientConfig::new("http://host/api/", "http://cdn/foto/");
        assert_eq!(config.endpoint("/laporan-online"), "http://host/api/laporan-online");
        assert_eq!(config.endpoint("login"), "http://host/api/login");
        assert_eq!(config.storage_base_url(), "http://cdn/foto");
    }
}
