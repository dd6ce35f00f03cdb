use std::collections::HashMap;

use tracing::info;

use crate::db::{DocumentStore, KeyValueBackend, StoreResult};
use crate::errors::Result;
use crate::models::{
    Client, NewService, PaymentPlan, PaymentPlanDraft, Quote, QuoteItem, QuoteItemDraft, QuotePatch,
    QuoteStatus, QuoteView, Service, ServiceCategory, ServiceListing, WeddingDetails, WeddingDetailsDraft,
    DELETED_CLIENT_LABEL,
};
use crate::services::numbering::{next_quote_number, NumberingConfig};
use crate::services::pricing::{compute_totals, reprice_payment_plans, Discount, PricingConfig, QuoteTotals};

pub fn list_quotes<B: KeyValueBackend>(store: &DocumentStore<B>) -> StoreResult<Vec<QuoteView>> {
    let names: HashMap<i64, String> = store
        .list::<Client>()?
        .into_iter()
        .map(|client| (client.id, client.name))
        .collect();

    Ok(store
        .list::<Quote>()?
        .into_iter()
        .map(|quote| {
            let client_name = names
                .get(&quote.client_id)
                .filter(|name| !name.is_empty())
                .cloned()
                .unwrap_or_else(|| DELETED_CLIENT_LABEL.to_string());
            QuoteView { quote, client_name }
        })
        .collect())
}

pub fn get_quote<B: KeyValueBackend>(store: &DocumentStore<B>, id: i64) -> StoreResult<Option<QuoteView>> {
    Ok(list_quotes(store)?.into_iter().find(|view| view.quote.id == id))
}

pub fn quotes_by_client<B: KeyValueBackend>(store: &DocumentStore<B>, client_id: i64) -> StoreResult<Vec<QuoteView>> {
    Ok(list_quotes(store)?
        .into_iter()
        .filter(|view| view.quote.client_id == client_id)
        .collect())
}

pub fn next_number<B: KeyValueBackend>(
    store: &DocumentStore<B>,
    numbering: &NumberingConfig,
    year: i32,
) -> StoreResult<String> {
    Ok(next_quote_number(&store.list::<Quote>()?, numbering, year))
}

/// Categories by `sortOrder`; equal values keep their stored order.
pub fn list_categories<B: KeyValueBackend>(store: &DocumentStore<B>) -> StoreResult<Vec<ServiceCategory>> {
    let mut categories = store.list::<ServiceCategory>()?;
    categories.sort_by_key(|category| category.sort_order);
    Ok(categories)
}

pub fn list_services<B: KeyValueBackend>(store: &DocumentStore<B>) -> StoreResult<Vec<ServiceListing>> {
    let names: HashMap<i64, String> = store
        .list::<ServiceCategory>()?
        .into_iter()
        .map(|category| (category.id, category.name))
        .collect();

    Ok(store
        .list::<Service>()?
        .into_iter()
        .map(|service| {
            let category_name = names.get(&service.category_id).cloned().unwrap_or_default();
            ServiceListing {
                service,
                category_name,
            }
        })
        .collect())
}

pub fn services_by_category<B: KeyValueBackend>(
    store: &DocumentStore<B>,
    category_id: i64,
) -> StoreResult<Vec<ServiceListing>> {
    Ok(list_services(store)?
        .into_iter()
        .filter(|listing| listing.service.category_id == category_id)
        .collect())
}

pub fn create_service<B: KeyValueBackend>(store: &DocumentStore<B>, draft: NewService) -> Result<Service> {
    draft.validate()?;
    Ok(store.create::<Service>(draft)?)
}

pub fn quote_items<B: KeyValueBackend>(store: &DocumentStore<B>, quote_id: i64) -> StoreResult<Vec<QuoteItem>> {
    let mut items = store.children::<QuoteItem>(quote_id)?;
    items.sort_by_key(|item| item.sort_order);
    Ok(items)
}

pub fn payment_plans<B: KeyValueBackend>(store: &DocumentStore<B>, quote_id: i64) -> StoreResult<Vec<PaymentPlan>> {
    let mut plans = store.children::<PaymentPlan>(quote_id)?;
    plans.sort_by_key(|plan| plan.sort_order);
    Ok(plans)
}

pub fn wedding_details<B: KeyValueBackend>(
    store: &DocumentStore<B>,
    quote_id: i64,
) -> StoreResult<Option<WeddingDetails>> {
    Ok(store.children::<WeddingDetails>(quote_id)?.into_iter().next())
}

/// Replaces the quote's lines with `items`, in the given order.
pub fn save_quote_items<B: KeyValueBackend>(
    store: &DocumentStore<B>,
    quote_id: i64,
    items: Vec<QuoteItemDraft>,
) -> Result<Vec<QuoteItem>> {
    for item in &items {
        item.validate()?;
    }
    Ok(store.replace_children::<QuoteItem>(quote_id, items)?)
}

pub fn save_payment_plans<B: KeyValueBackend>(
    store: &DocumentStore<B>,
    quote_id: i64,
    plans: Vec<PaymentPlanDraft>,
) -> StoreResult<Vec<PaymentPlan>> {
    store.replace_children::<PaymentPlan>(quote_id, plans)
}

/// Sets the quote's wedding details, replacing any previous record.
pub fn save_wedding_details<B: KeyValueBackend>(
    store: &DocumentStore<B>,
    quote_id: i64,
    details: WeddingDetailsDraft,
) -> StoreResult<WeddingDetails> {
    let mut saved = store.replace_children::<WeddingDetails>(quote_id, vec![details])?;
    Ok(saved.remove(0))
}

/// Deletes the quote with its items, wedding details and payment plans.
///
/// The four collections are written through one backend batch, which the
/// SQLite backend commits as a single transaction. Returns whether the quote
/// row itself existed; orphaned children are cleared either way.
pub fn delete_quote<B: KeyValueBackend>(store: &DocumentStore<B>, id: i64) -> StoreResult<bool> {
    let mut quotes = store.load::<Quote>()?;
    let removed = quotes.remove_matching("id", id, |quote| quote.id) > 0;

    let mut items = store.load::<QuoteItem>()?;
    items.remove_matching("quoteId", id, |item| item.quote_id);
    let mut details = store.load::<WeddingDetails>()?;
    details.remove_matching("quoteId", id, |detail| detail.quote_id);
    let mut plans = store.load::<PaymentPlan>()?;
    plans.remove_matching("quoteId", id, |plan| plan.quote_id);

    let entries = [quotes.encode()?, items.encode()?, details.encode()?, plans.encode()?];
    store.write_batch(&entries)?;

    info!(quote_id = id, removed, "quote deleted with dependents");
    Ok(removed)
}

/// Copies a quote under a fresh number, reset to draft, together with its
/// items, wedding details and payment plans. `None` if the source is gone.
pub fn duplicate_quote<B: KeyValueBackend>(
    store: &DocumentStore<B>,
    source_id: i64,
    numbering: &NumberingConfig,
    year: i32,
) -> StoreResult<Option<Quote>> {
    let quotes = store.list::<Quote>()?;
    let Some(source) = quotes.iter().find(|quote| quote.id == source_id) else {
        return Ok(None);
    };

    let mut draft = source.to_draft();
    draft.number = next_quote_number(&quotes, numbering, year);
    draft.status = QuoteStatus::Draft;
    draft.confirmed_date = None;
    let copy = store.create::<Quote>(draft)?;

    let items: Vec<QuoteItemDraft> = quote_items(store, source_id)?.iter().map(QuoteItem::to_draft).collect();
    if !items.is_empty() {
        store.replace_children::<QuoteItem>(copy.id, items)?;
    }

    if let Some(details) = wedding_details(store, source_id)? {
        store.replace_children::<WeddingDetails>(copy.id, vec![details.to_draft()])?;
    }

    let plans: Vec<PaymentPlanDraft> = payment_plans(store, source_id)?
        .iter()
        .map(PaymentPlan::to_draft)
        .collect();
    if !plans.is_empty() {
        store.replace_children::<PaymentPlan>(copy.id, plans)?;
    }

    info!(source_id, copy_id = copy.id, number = %copy.number, "quote duplicated");
    Ok(Some(copy))
}

/// Re-derives the stored money fields of a quote from its items and the
/// current tax settings, then reprices its payment plans against the new
/// total. Running it twice changes nothing the second time.
pub fn recompute_quote<B: KeyValueBackend>(
    store: &DocumentStore<B>,
    id: i64,
    pricing: &PricingConfig,
) -> StoreResult<Option<(Quote, QuoteTotals)>> {
    let Some(quote) = store.find::<Quote>(id)? else {
        return Ok(None);
    };

    let items = quote_items(store, id)?;
    let discount = Discount {
        kind: quote.discount_type,
        value: quote.discount_value,
    };
    let totals = compute_totals(&items, discount, pricing);

    let patch = QuotePatch {
        subtotal: Some(totals.subtotal),
        tax_rate: Some(totals.tax_rate),
        total: Some(totals.total),
        ..QuotePatch::default()
    };
    let Some(updated) = store.update::<Quote>(id, patch)? else {
        return Ok(None);
    };

    let mut plans = store.load::<PaymentPlan>()?;
    let repriced = reprice_payment_plans(plans.rows.iter_mut().filter(|plan| plan.quote_id == id), totals.total);
    if repriced > 0 {
        store.save(&plans)?;
    }

    Ok(Some((updated, totals)))
}
