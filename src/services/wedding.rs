use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::models::{WeddingDetails, WeddingDetailsDraft, WeddingSelections};

/// How an encoded list field was read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEncoding {
    JsonArray,
    CommaSeparated,
    Empty,
}

/// Reads a stored list field: a JSON array first, then comma separated text,
/// otherwise nothing. Entries that are not valid values of `T` are skipped.
pub fn decode_list<T: DeserializeOwned>(raw: &str) -> (Vec<T>, ListEncoding) {
    let raw = raw.trim();
    if raw.is_empty() {
        return (Vec::new(), ListEncoding::Empty);
    }

    if let Ok(tokens) = serde_json::from_str::<Vec<String>>(raw) {
        let values = parse_tokens(tokens.iter().map(String::as_str));
        if !values.is_empty() {
            return (values, ListEncoding::JsonArray);
        }
    }

    let values = parse_tokens(raw.split(','));
    if values.is_empty() {
        (Vec::new(), ListEncoding::Empty)
    } else {
        (values, ListEncoding::CommaSeparated)
    }
}

pub fn encode_list<T: Serialize>(values: &[T]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

fn parse_tokens<'a, T, I>(tokens: I) -> Vec<T>
where
    T: DeserializeOwned,
    I: Iterator<Item = &'a str>,
{
    tokens
        .map(|token| token.trim().trim_matches('"'))
        .filter(|token| !token.is_empty())
        .filter_map(|token| serde_json::from_value(Value::String(token.to_string())).ok())
        .collect()
}

pub fn selections(details: &WeddingDetails) -> WeddingSelections {
    let style = if details.style.trim().is_empty() {
        None
    } else {
        serde_json::from_value(Value::String(details.style.trim().to_string())).ok()
    };

    WeddingSelections {
        palette_colors: decode_list(&details.palette_colors).0,
        style,
        flowers: decode_list(&details.flowers).0,
        greenery: decode_list(&details.greenery).0,
        areas: decode_list(&details.areas).0,
    }
}

/// Writes typed selections into the stored string fields of a draft.
pub fn apply_selections(draft: &mut WeddingDetailsDraft, selections: &WeddingSelections) {
    draft.palette_colors = encode_list(&selections.palette_colors);
    draft.style = selections
        .style
        .and_then(|style| serde_json::to_value(style).ok())
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_default();
    draft.flowers = encode_list(&selections.flowers);
    draft.greenery = encode_list(&selections.greenery);
    draft.areas = encode_list(&selections.areas);
}
