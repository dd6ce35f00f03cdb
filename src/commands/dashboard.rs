use chrono::Local;
use serde_json::json;

use super::{print_json, State};
use decor_quotes::services::stats::dashboard_stats;

pub fn stats(state: &State) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let stats = dashboard_stats(&state.store, today)?;
    print_json(&stats)
}

pub fn next_number(state: &State) -> anyhow::Result<()> {
    let number = state.next_quote_number()?;
    print_json(&json!({ "number": number }))
}
