use anyhow::anyhow;
use serde_json::json;
use tracing::warn;

use super::{print_json, State};
use decor_quotes::services::pricing::{compute_totals, payment_split_warning, Discount};
use decor_quotes::services::quotes::{
    delete_quote, duplicate_quote, get_quote, list_quotes, payment_plans, quote_items, quotes_by_client,
    recompute_quote, wedding_details,
};
use decor_quotes::services::renderer::load_quote_document;
use decor_quotes::services::wedding::selections;

pub fn list(state: &State, client: Option<i64>) -> anyhow::Result<()> {
    let quotes = match client {
        Some(client_id) => quotes_by_client(&state.store, client_id)?,
        None => list_quotes(&state.store)?,
    };
    print_json(&quotes)
}

pub fn show(state: &State, id: i64) -> anyhow::Result<()> {
    let view = get_quote(&state.store, id)?.ok_or_else(|| anyhow!("Quote {} not found", id))?;
    let items = quote_items(&state.store, id)?;
    let plans = payment_plans(&state.store, id)?;
    let wedding = wedding_details(&state.store, id)?;

    let discount = Discount {
        kind: view.quote.discount_type,
        value: view.quote.discount_value,
    };
    let totals = compute_totals(&items, discount, &state.pricing());

    let split_warning = if plans.is_empty() {
        None
    } else {
        payment_split_warning(plans.iter().map(|plan| &plan.percentage))
    };
    if let Some(message) = &split_warning {
        warn!(quote_id = id, "{}", message);
    }

    let selections = wedding.as_ref().map(selections);
    print_json(&json!({
        "quote": view,
        "items": items,
        "totals": totals,
        "paymentPlans": plans,
        "paymentSplitWarning": split_warning,
        "weddingDetails": wedding,
        "weddingSelections": selections,
    }))
}

pub fn duplicate(state: &State, id: i64) -> anyhow::Result<()> {
    let copy = duplicate_quote(&state.store, id, &state.numbering(), State::current_year())?
        .ok_or_else(|| anyhow!("Quote {} not found", id))?;
    print_json(&copy)
}

pub fn delete(state: &State, id: i64) -> anyhow::Result<()> {
    let deleted = delete_quote(&state.store, id)?;
    print_json(&json!({ "id": id, "deleted": deleted }))
}

pub fn recompute(state: &State, id: i64) -> anyhow::Result<()> {
    let (quote, totals) = recompute_quote(&state.store, id, &state.pricing())?
        .ok_or_else(|| anyhow!("Quote {} not found", id))?;
    print_json(&json!({
        "number": quote.number,
        "totals": totals,
        "paymentPlans": payment_plans(&state.store, id)?,
    }))
}

pub fn document(state: &State, id: i64, accent: Option<&str>) -> anyhow::Result<()> {
    let document = load_quote_document(&state.store, id, state.settings(), accent, None)?
        .ok_or_else(|| anyhow!("Quote {} not found", id))?;
    print_json(&json!({
        "document": document,
        "sections": document.sections(),
    }))
}
