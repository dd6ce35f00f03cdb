use serde::Serialize;

use crate::db::{DocumentStore, KeyValueBackend, StoreResult};
use crate::models::{CompanySettings, PaymentPlan, PdfTemplate, Quote, QuoteItem, WeddingDetails};
use crate::services::pricing::subtotal;
use crate::services::quotes::{payment_plans, quote_items, wedding_details};

pub const DEFAULT_ACCENT_COLOR: &str = "#8B6F5E";

/// Heading used for items saved without a section.
const FALLBACK_SECTION: &str = "Altro";

/// Everything a document renderer needs for one quote. Money fields are read
/// from the stored quote as finalized; renderers never recompute them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDocument {
    pub quote: Quote,
    pub items: Vec<QuoteItem>,
    pub wedding: Option<WeddingDetails>,
    pub payment_plans: Vec<PaymentPlan>,
    pub settings: CompanySettings,
    pub accent_color: String,
    pub template: PdfTemplate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSection<'a> {
    pub title: &'a str,
    pub items: Vec<&'a QuoteItem>,
    pub subtotal: f64,
}

impl QuoteDocument {
    /// Items grouped by section in first-seen order, each group keeping the
    /// items' `sortOrder`. Gift lines are listed but left out of the group
    /// subtotal.
    pub fn sections(&self) -> Vec<ItemSection<'_>> {
        let mut ordered: Vec<&QuoteItem> = self.items.iter().collect();
        ordered.sort_by_key(|item| item.sort_order);

        let mut sections: Vec<ItemSection<'_>> = Vec::new();
        for item in ordered {
            let title = if item.section.trim().is_empty() {
                FALLBACK_SECTION
            } else {
                item.section.as_str()
            };
            match sections.iter_mut().find(|section| section.title == title) {
                Some(section) => section.items.push(item),
                None => sections.push(ItemSection {
                    title,
                    items: vec![item],
                    subtotal: 0.0,
                }),
            }
        }

        for section in sections.iter_mut() {
            section.subtotal = subtotal(&section.items);
        }
        sections
    }
}

/// Turns a finished quote into a binary document (PDF or otherwise).
pub trait DocumentRenderer {
    fn render(&self, document: &QuoteDocument) -> anyhow::Result<Vec<u8>>;
}

/// Collects a quote and its children for rendering. `None` if the quote is
/// gone. Falls back to the settings' template and the house accent colour.
pub fn load_quote_document<B: KeyValueBackend>(
    store: &DocumentStore<B>,
    quote_id: i64,
    settings: &CompanySettings,
    accent_color: Option<&str>,
    template: Option<PdfTemplate>,
) -> StoreResult<Option<QuoteDocument>> {
    let Some(quote) = store.find::<Quote>(quote_id)? else {
        return Ok(None);
    };

    Ok(Some(QuoteDocument {
        quote,
        items: quote_items(store, quote_id)?,
        wedding: wedding_details(store, quote_id)?,
        payment_plans: payment_plans(store, quote_id)?,
        settings: settings.clone(),
        accent_color: accent_color.unwrap_or(DEFAULT_ACCENT_COLOR).to_string(),
        template: template.unwrap_or(settings.default_template),
    }))
}
