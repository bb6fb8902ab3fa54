//! # Preferences Repository
//!
//! Scalar preference strings persisted under their own keys.
//!
//! Preferences are stored as plain strings (`"ko"`, `"dark"`) rather than
//! JSON objects so the layout matches what the UI layer historically wrote.
//! Unknown stored values degrade to the defaults the same way corrupt JSON
//! does elsewhere.

use tracing::debug;

use koko_core::{Language, Theme};

use crate::error::StoreResult;
use crate::kv::KvStore;
use crate::repository::keys;

/// Repository for language and theme preferences.
#[derive(Debug, Clone)]
pub struct PrefsRepository {
    kv: KvStore,
}

impl PrefsRepository {
    /// Creates a new PrefsRepository.
    pub fn new(kv: KvStore) -> Self {
        PrefsRepository { kv }
    }

    /// Loads the language preference, defaulting to Korean.
    pub async fn language(&self) -> StoreResult<Language> {
        let raw: String = self
            .kv
            .get(keys::LANGUAGE, Language::default().as_str().to_string())
            .await?;
        let language = Language::parse(&raw).unwrap_or_default();
        debug!(language = language.as_str(), "loaded language preference");
        Ok(language)
    }

    /// Persists the language preference.
    pub async fn set_language(&self, language: Language) -> StoreResult<()> {
        self.kv
            .set(keys::LANGUAGE, &language.as_str().to_string())
            .await
    }

    /// Loads the theme preference, defaulting to light.
    pub async fn theme(&self) -> StoreResult<Theme> {
        let raw: String = self
            .kv
            .get(keys::THEME, Theme::default().as_str().to_string())
            .await?;
        let theme = Theme::parse(&raw).unwrap_or_default();
        debug!(theme = theme.as_str(), "loaded theme preference");
        Ok(theme)
    }

    /// Persists the theme preference.
    pub async fn set_theme(&self, theme: Theme) -> StoreResult<()> {
        self.kv.set(keys::THEME, &theme.as_str().to_string()).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
