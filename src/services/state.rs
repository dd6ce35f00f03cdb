use std::path::Path;

use chrono::{Datelike, Local};
use tracing::info;

use crate::db::{DocumentStore, KeyValueBackend, SqliteBackend};
use crate::errors::Result;
use crate::models::{CompanySettings, SettingsPatch};
use crate::services::numbering::NumberingConfig;
use crate::services::pricing::PricingConfig;
use crate::services::quotes::next_number;
use crate::services::seed::seed_catalogue;
use crate::services::transfer::import_all_data;

/// The open store plus the settings loaded from it. Settings are read once
/// and refreshed only through this type.
pub struct AppState<B: KeyValueBackend> {
    pub store: DocumentStore<B>,
    settings: CompanySettings,
    seeded_on_open: bool,
}

impl AppState<SqliteBackend> {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let backend = SqliteBackend::open(db_path.as_ref())?;
        info!(path = %db_path.as_ref().display(), "database opened");
        Self::new(backend)
    }
}

impl<B: KeyValueBackend> AppState<B> {
    /// Seeds the catalogue on first use and loads the settings.
    pub fn new(backend: B) -> Result<Self> {
        let store = DocumentStore::new(backend);
        let seeded_on_open = seed_catalogue(&store)?;
        let settings = store.settings()?;
        Ok(AppState {
            store,
            settings,
            seeded_on_open,
        })
    }

    /// Whether opening this state loaded the starter catalogue.
    pub fn seeded_on_open(&self) -> bool {
        self.seeded_on_open
    }

    pub fn settings(&self) -> &CompanySettings {
        &self.settings
    }

    /// Merges `patch` over the current settings and saves the result. The
    /// default payment split must still total 100; nothing is written otherwise.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<&CompanySettings> {
        let mut updated = self.settings.clone();
        updated.merge(patch);
        updated.validate()?;
        self.store.save_settings(&updated)?;
        self.settings = updated;
        Ok(&self.settings)
    }

    pub fn pricing(&self) -> PricingConfig {
        PricingConfig::from(&self.settings)
    }

    pub fn numbering(&self) -> NumberingConfig {
        NumberingConfig::from(&self.settings)
    }

    pub fn current_year() -> i32 {
        Local::now().year()
    }

    pub fn next_quote_number(&self) -> Result<String> {
        Ok(next_number(&self.store, &self.numbering(), Self::current_year())?)
    }

    /// Restores a backup and reloads the settings it may have replaced.
    pub fn import_backup(&mut self, json: &str) -> Result<bool> {
        if !import_all_data(&self.store, json)? {
            return Ok(false);
        }
        self.settings = self.store.settings()?;
        Ok(true)
    }
}
