//! UI strings. Indonesian is the source language; English keys that are
//! missing resolve from the Indonesian file.

use serde_json::Value;
use std::sync::LazyLock;

/// Supported locale codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocaleCode {
    /// Indonesian.
    Id,
    /// English.
    En,
}

impl LocaleCode {
    /// All supported locales in display order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Id, Self::En]
    }

    /// Two-letter code stored in preferences.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::En => "en",
        }
    }

    /// Human-friendly label for the locale switcher.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "Bahasa Indonesia",
            Self::En => "English",
        }
    }

    /// Map a browser language tag (`id-ID`, `en`) to a supported locale.
    #[must_use]
    pub fn from_lang_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            // `in` is the retired ISO 639 code some browsers still report.
            "id" | "in" => Some(Self::Id),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// The locale the switcher moves to next.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Id => Self::En,
            Self::En => Self::Id,
        }
    }
}

/// Default locale; also the fallback for missing keys.
pub const DEFAULT_LOCALE: LocaleCode = LocaleCode::Id;

/// Parsed strings for one locale.
#[derive(Clone, Debug)]
pub struct TranslationBundle {
    /// Locale backing this bundle.
    pub locale: LocaleCode,
    tree: Value,
}

impl PartialEq for TranslationBundle {
    fn eq(&self, other: &Self) -> bool {
        self.locale == other.locale
    }
}

impl TranslationBundle {
    /// Build a bundle for the given locale.
    ///
    /// Keys missing from the locale resolve from the Indonesian bundle, then
    /// the caller default.
    #[must_use]
    pub fn new(locale: LocaleCode) -> Self {
        let tree: Value = serde_json::from_str(raw_locale(locale)).unwrap_or(Value::Null);
        Self { locale, tree }
    }

    /// Resolve a dotted path (`section.key`).
    #[must_use]
    pub fn text(&self, path: &str, default: &str) -> String {
        resolve(&self.tree, path)
            .or_else(|| resolve(&FALLBACK.tree, path))
            .unwrap_or_else(|| default.to_string())
    }
}

static FALLBACK: LazyLock<TranslationBundle> =
    LazyLock::new(|| TranslationBundle::new(DEFAULT_LOCALE));

fn resolve(tree: &Value, path: &str) -> Option<String> {
    let mut node = tree;
    for segment in path.split('.') {
        node = node.get(segment)?;
    }
    node.as_str().map(ToString::to_string)
}

const fn raw_locale(locale: LocaleCode) -> &'static str {
    match locale {
        LocaleCode::Id => include_str!("../../i18n/id.json"),
        LocaleCode::En => include_str!("../../i18n/en.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_falls_back_to_default() {
        let bundle = TranslationBundle::new(LocaleCode::En);
        assert_eq!(bundle.text("nonexistent.key", "fallback"), "fallback");
    }

    #[test]
    fn bundles_load_all_locales() {
        for locale in LocaleCode::all() {
            let bundle = TranslationBundle::new(locale);
            assert_eq!(bundle.locale, locale);
            assert!(!bundle.text("nav.reports", "").is_empty());
            assert!(!bundle.text("list.confirm_delete", "").is_empty());
        }
    }

    #[test]
    fn indonesian_is_the_default() {
        let bundle = TranslationBundle::new(DEFAULT_LOCALE);
        assert_eq!(bundle.text("list.title", ""), "Data Laporan");
        assert_eq!(
            TranslationBundle::new(LocaleCode::En).text("list.title", ""),
            "Reports"
        );
    }

    #[test]
    fn language_tags_map_to_locales() {
        assert_eq!(LocaleCode::from_lang_tag("id-ID"), Some(LocaleCode::Id));
        assert_eq!(LocaleCode::from_lang_tag("EN-gb"), Some(LocaleCode::En));
        assert_eq!(LocaleCode::from_lang_tag("in_ID"), Some(LocaleCode::Id));
        assert_eq!(LocaleCode::from_lang_tag("fr"), None);
        assert_eq!(LocaleCode::Id.next(), LocaleCode::En);
    }
}
