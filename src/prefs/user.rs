use tracing::warn;

use crate::store::{SharedStore, StoreError};

const COUNTRY_CODE_KEY: &str = "country_code";
const LANGUAGE_CODE_KEY: &str = "language_code";
const COLOR_SCHEME_KEY: &str = "color_scheme";

/// Preferred UI colour scheme. `System` means "follow the terminal/host".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ColorScheme {
    Light,
    Dark,
    #[default]
    System,
}

impl ColorScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// Per-user preferences, one store key each. Readers get defaults whenever a
/// key is missing or unreadable.
pub struct UserPrefs {
    store: SharedStore,
}

impl UserPrefs {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn country_code(&self) -> Option<String> {
        self.read(COUNTRY_CODE_KEY)
    }

    /// Save the preferred country filter; an empty code clears it.
    pub fn set_country_code(&self, code: &str) -> Result<(), StoreError> {
        self.write(COUNTRY_CODE_KEY, code)
    }

    pub fn language_code(&self) -> Option<String> {
        self.read(LANGUAGE_CODE_KEY)
    }

    pub fn set_language_code(&self, code: &str) -> Result<(), StoreError> {
        self.write(LANGUAGE_CODE_KEY, code)
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.read(COLOR_SCHEME_KEY)
            .and_then(|raw| ColorScheme::parse(&raw))
            .unwrap_or_default()
    }

    pub fn set_color_scheme(&self, scheme: ColorScheme) -> Result<(), StoreError> {
        self.store.set(COLOR_SCHEME_KEY, scheme.as_str())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(Some(v)) if !v.trim().is_empty() => Some(v),
            Ok(_) => None,
            Err(e) => {
                warn!("could not read preference {key}: {e}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if value.trim().is_empty() {
            self.store.remove(key)
        } else {
            self.store.set(key, value)
        }
    }
}
