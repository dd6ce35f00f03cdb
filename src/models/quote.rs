use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use super::{DiscountType, EventType, QuoteStatus, ServiceListing};
use crate::db::{merge_fields, Collection, QuoteChild, Record};
use crate::errors::ValidationError;
use crate::services::pricing::{line_amount, payment_amount};

/// Shown in place of the client name when the client no longer exists.
pub const DELETED_CLIENT_LABEL: &str = "Cliente eliminato";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quote {
    pub id: i64,
    pub number: String,
    pub client_id: i64,
    pub event_type: EventType,
    pub event_date: String,
    pub event_location: String,
    pub guest_count: i64,
    pub table_count: i64,
    pub expiry_date: String,
    pub internal_notes: String,
    pub client_notes: String,
    pub conditions: String,
    pub status: QuoteStatus,
    pub subtotal: f64,
    pub discount_type: Option<DiscountType>,
    pub discount_value: f64,
    pub discount_note: String,
    pub tax_rate: f64,
    pub total: f64,
    pub confirmed_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Quote {
    /// Every scalar field except id and timestamps, for creating a copy.
    pub fn to_draft(&self) -> NewQuote {
        NewQuote {
            number: self.number.clone(),
            client_id: self.client_id,
            event_type: self.event_type,
            event_date: self.event_date.clone(),
            event_location: self.event_location.clone(),
            guest_count: self.guest_count,
            table_count: self.table_count,
            expiry_date: self.expiry_date.clone(),
            internal_notes: self.internal_notes.clone(),
            client_notes: self.client_notes.clone(),
            conditions: self.conditions.clone(),
            status: self.status,
            subtotal: self.subtotal,
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            discount_note: self.discount_note.clone(),
            tax_rate: self.tax_rate,
            total: self.total,
            confirmed_date: self.confirmed_date.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewQuote {
    pub number: String,
    pub client_id: i64,
    pub event_type: EventType,
    pub event_date: String,
    pub event_location: String,
    pub guest_count: i64,
    pub table_count: i64,
    pub expiry_date: String,
    pub internal_notes: String,
    pub client_notes: String,
    pub conditions: String,
    pub status: QuoteStatus,
    pub subtotal: f64,
    pub discount_type: Option<DiscountType>,
    pub discount_value: f64,
    pub discount_note: String,
    pub tax_rate: f64,
    pub total: f64,
    pub confirmed_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuotePatch {
    pub number: Option<String>,
    pub client_id: Option<i64>,
    pub event_type: Option<EventType>,
    pub event_date: Option<String>,
    pub event_location: Option<String>,
    pub guest_count: Option<i64>,
    pub table_count: Option<i64>,
    pub expiry_date: Option<String>,
    pub internal_notes: Option<String>,
    pub client_notes: Option<String>,
    pub conditions: Option<String>,
    pub status: Option<QuoteStatus>,
    pub subtotal: Option<f64>,
    pub discount_type: Option<Option<DiscountType>>,
    pub discount_value: Option<f64>,
    pub discount_note: Option<String>,
    pub tax_rate: Option<f64>,
    pub total: Option<f64>,
    pub confirmed_date: Option<Option<String>>,
}

impl Record for Quote {
    const COLLECTION: Collection = Collection::Quotes;

    type Draft = NewQuote;
    type Patch = QuotePatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: NewQuote, now: &str) -> Self {
        Quote {
            id,
            number: draft.number,
            client_id: draft.client_id,
            event_type: draft.event_type,
            event_date: draft.event_date,
            event_location: draft.event_location,
            guest_count: draft.guest_count,
            table_count: draft.table_count,
            expiry_date: draft.expiry_date,
            internal_notes: draft.internal_notes,
            client_notes: draft.client_notes,
            conditions: draft.conditions,
            status: draft.status,
            subtotal: draft.subtotal,
            discount_type: draft.discount_type,
            discount_value: draft.discount_value,
            discount_note: draft.discount_note,
            tax_rate: draft.tax_rate,
            total: draft.total,
            confirmed_date: draft.confirmed_date,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    fn merge(&mut self, patch: QuotePatch, now: &str) {
        merge_fields!(
            self,
            patch,
            [
                number,
                client_id,
                event_type,
                event_date,
                event_location,
                guest_count,
                table_count,
                expiry_date,
                internal_notes,
                client_notes,
                conditions,
                status,
                subtotal,
                discount_type,
                discount_value,
                discount_note,
                tax_rate,
                total,
                confirmed_date,
            ]
        );
        self.updated_at = now.to_string();
    }
}

/// A quote joined with its client's name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView {
    #[serde(flatten)]
    pub quote: Quote,
    pub client_name: String,
}

/// A priced line of a quote. `amount` is stored, not derived: whoever edits
/// quantity or price recomputes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteItem {
    pub id: i64,
    pub quote_id: i64,
    pub service_id: Option<i64>,
    pub section: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub amount: f64,
    pub is_gift: bool,
    pub sort_order: i64,
}

impl QuoteItem {
    pub fn to_draft(&self) -> QuoteItemDraft {
        QuoteItemDraft {
            service_id: self.service_id,
            section: self.section.clone(),
            description: self.description.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            amount: self.amount,
            is_gift: self.is_gift,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteItemDraft {
    pub service_id: Option<i64>,
    pub section: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub amount: f64,
    pub is_gift: bool,
}

impl QuoteItemDraft {
    /// A custom row with its amount priced from quantity and unit price.
    pub fn new(section: &str, description: &str, quantity: i64, unit_price: f64) -> Self {
        QuoteItemDraft {
            service_id: None,
            section: section.to_string(),
            description: description.to_string(),
            quantity,
            unit_price,
            amount: line_amount(quantity, unit_price),
            is_gift: false,
        }
    }

    /// A single unit of a catalogue service, grouped under its category.
    pub fn from_service(listing: &ServiceListing) -> Self {
        let service = &listing.service;
        QuoteItemDraft {
            service_id: Some(service.id),
            ..Self::new(&listing.category_name, &service.name, 1, service.base_price)
        }
    }

    pub fn as_gift(mut self) -> Self {
        self.is_gift = true;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity < 1 {
            return Err(ValidationError::InvalidQuantity {
                description: self.description.clone(),
            });
        }
        if self.unit_price < 0.0 {
            return Err(ValidationError::NegativePrice {
                description: self.description.clone(),
            });
        }
        Ok(())
    }
}

impl Record for QuoteItem {
    const COLLECTION: Collection = Collection::QuoteItems;

    type Draft = QuoteItemDraft;
    // Items are replaced wholesale, never patched in place.
    type Patch = Infallible;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: QuoteItemDraft, _now: &str) -> Self {
        QuoteItem {
            id,
            quote_id: 0,
            service_id: draft.service_id,
            section: draft.section,
            description: draft.description,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            amount: draft.amount,
            is_gift: draft.is_gift,
            sort_order: 0,
        }
    }

    fn merge(&mut self, patch: Infallible, _now: &str) {
        match patch {}
    }
}

impl QuoteChild for QuoteItem {
    fn quote_id(&self) -> i64 {
        self.quote_id
    }

    fn attach(&mut self, quote_id: i64, sort_order: i64) {
        self.quote_id = quote_id;
        self.sort_order = sort_order;
    }
}

/// One instalment of a quote's payment schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentPlan {
    pub id: i64,
    pub quote_id: i64,
    pub description: String,
    pub percentage: f64,
    pub amount: f64,
    pub due_date: String,
    pub sort_order: i64,
}

impl PaymentPlan {
    pub fn to_draft(&self) -> PaymentPlanDraft {
        PaymentPlanDraft {
            description: self.description.clone(),
            percentage: self.percentage,
            amount: self.amount,
            due_date: self.due_date.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentPlanDraft {
    pub description: String,
    pub percentage: f64,
    pub amount: f64,
    pub due_date: String,
}

impl PaymentPlanDraft {
    pub fn new(description: &str, percentage: f64, total: f64) -> Self {
        PaymentPlanDraft {
            description: description.to_string(),
            percentage,
            amount: payment_amount(total, percentage),
            due_date: String::new(),
        }
    }

    /// Changing one row's percentage reprices that row only.
    pub fn set_percentage(&mut self, percentage: f64, total: f64) {
        self.percentage = percentage;
        self.amount = payment_amount(total, percentage);
    }
}

impl Record for PaymentPlan {
    const COLLECTION: Collection = Collection::PaymentPlans;

    type Draft = PaymentPlanDraft;
    type Patch = Infallible;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: PaymentPlanDraft, _now: &str) -> Self {
        PaymentPlan {
            id,
            quote_id: 0,
            description: draft.description,
            percentage: draft.percentage,
            amount: draft.amount,
            due_date: draft.due_date,
            sort_order: 0,
        }
    }

    fn merge(&mut self, patch: Infallible, _now: &str) {
        match patch {}
    }
}

impl QuoteChild for PaymentPlan {
    fn quote_id(&self) -> i64 {
        self.quote_id
    }

    fn attach(&mut self, quote_id: i64, sort_order: i64) {
        self.quote_id = quote_id;
        self.sort_order = sort_order;
    }
}
