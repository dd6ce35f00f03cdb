mod catalog;
mod client;
mod quote;
mod settings;
mod stats;
mod wedding;

pub use catalog::{CategoryPatch, NewCategory, NewService, Service, ServiceCategory, ServiceListing, ServicePatch};
pub use client::{Client, ClientPatch, NewClient};
pub use quote::{
    NewQuote, PaymentPlan, PaymentPlanDraft, Quote, QuoteItem, QuoteItemDraft, QuotePatch, QuoteView,
    DELETED_CLIENT_LABEL,
};
pub use settings::{CompanySettings, SettingsPatch};
pub use stats::{DashboardStats, MonthlyRevenue};
pub use wedding::{Flower, Greenery, WeddingArea, WeddingDetails, WeddingDetailsDraft, WeddingSelections, WeddingStyle};

use serde::{Deserialize, Serialize};

// Stored values are English; aliases accept backups written with the
// original Italian vocabulary.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    #[serde(alias = "matrimonio")]
    Wedding,
    #[serde(alias = "compleanno")]
    Birthday,
    #[serde(alias = "battesimo")]
    Baptism,
    #[serde(alias = "comunione")]
    Communion,
    #[serde(alias = "altro")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[default]
    Prospect,
    #[serde(alias = "attivo")]
    Active,
    #[serde(alias = "confermato")]
    Confirmed,
    #[serde(alias = "archiviato")]
    Archived,
}

/// Any status may be set from any other; no transition graph is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    #[serde(alias = "bozza")]
    Draft,
    #[serde(alias = "inviato")]
    Sent,
    #[serde(alias = "confermato")]
    Confirmed,
    #[serde(alias = "rifiutato")]
    Rejected,
    #[serde(alias = "scaduto")]
    Expired,
    #[serde(alias = "completato")]
    Completed,
}

impl QuoteStatus {
    /// Confirmed or completed: the quote turned into booked work.
    pub fn is_won(self) -> bool {
        matches!(self, QuoteStatus::Confirmed | QuoteStatus::Completed)
    }

    pub fn is_open(self) -> bool {
        matches!(self, QuoteStatus::Draft | QuoteStatus::Sent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitOfMeasure {
    #[default]
    #[serde(alias = "pezzo")]
    Piece,
    #[serde(alias = "coppia")]
    Pair,
    #[serde(alias = "tavolo")]
    Table,
    #[serde(alias = "metro")]
    Meter,
    #[serde(alias = "servizio")]
    Service,
    #[serde(alias = "evento")]
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Regime forfettario: no VAT on quotes.
    #[default]
    #[serde(alias = "forfettario")]
    FlatRate,
    #[serde(alias = "ordinario")]
    Ordinary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfTemplate {
    #[default]
    #[serde(alias = "elegante")]
    Elegant,
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CeremonyType {
    #[default]
    #[serde(alias = "religiosa")]
    Religious,
    #[serde(alias = "civile")]
    Civil,
    #[serde(alias = "simbolica")]
    Symbolic,
}
