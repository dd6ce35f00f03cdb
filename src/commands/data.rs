use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Local;
use serde_json::json;
use tracing::info;

use super::{print_json, State};
use decor_quotes::models::{Service, ServiceCategory};
use decor_quotes::services::transfer::export_all_data;

pub fn seed(state: &State) -> anyhow::Result<()> {
    let categories = state.store.list::<ServiceCategory>()?.len();
    let services = state.store.list::<Service>()?.len();
    print_json(&json!({
        "seeded": state.seeded_on_open(),
        "categories": categories,
        "services": services,
    }))
}

/// `backup-gestionale-YYYY-MM-DD.json` in the working directory.
fn default_backup_path() -> PathBuf {
    PathBuf::from(format!("backup-gestionale-{}.json", Local::now().format("%Y-%m-%d")))
}

pub fn export(state: &State, path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(default_backup_path);
    let backup = export_all_data(&state.store)?;
    fs::write(&path, backup).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "backup written");
    print_json(&json!({ "path": path }))
}

pub fn import(state: &mut State, path: &Path) -> anyhow::Result<()> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if !state.import_backup(&raw)? {
        bail!("{} is not a valid backup file", path.display());
    }
    print_json(&json!({ "imported": true, "path": path }))
}
