//! Persisted UI preferences and environment lookups.

use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::window;

use crate::core::config::{api_base_for_origin, compiled_api_base};
use crate::i18n::{DEFAULT_LOCALE, LocaleCode};

pub(crate) const LOCALE_KEY: &str = "lapor.locale";

pub(crate) fn load_locale() -> LocaleCode {
    if let Ok(value) = LocalStorage::get::<String>(LOCALE_KEY)
        && let Some(locale) = LocaleCode::from_lang_tag(&value)
    {
        return locale;
    }
    window()
        .navigator()
        .language()
        .and_then(|tag| LocaleCode::from_lang_tag(&tag))
        .unwrap_or(DEFAULT_LOCALE)
}

pub(crate) fn persist_locale(locale: LocaleCode) {
    if let Err(err) = LocalStorage::set(LOCALE_KEY, locale.code()) {
        console::error!("storage operation failed", "set", LOCALE_KEY, err.to_string());
    }
}

pub(crate) fn api_base_url() -> String {
    if let Some(base) = compiled_api_base() {
        return base.to_string();
    }
    let location = window().location();
    let protocol = location.protocol().unwrap_or_default();
    let hostname = location.hostname().unwrap_or_default();
    api_base_for_origin(&protocol, &hostname)
}
