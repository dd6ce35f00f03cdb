pub mod dashboard;
pub mod data;
pub mod quotes;
pub mod settings;

use decor_quotes::db::SqliteBackend;
use decor_quotes::services::state::AppState;
use serde::Serialize;

pub type State = AppState<SqliteBackend>;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
