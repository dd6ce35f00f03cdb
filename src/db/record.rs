use serde::de::DeserializeOwned;
use serde::Serialize;

pub const SETTINGS_KEY: &str = "settings";
pub const SEEDED_KEY: &str = "seeded";

/// Keys carried by a full backup, in export order.
pub const EXPORT_KEYS: [&str; 8] = [
    "clients",
    "categories",
    "services",
    "quotes",
    "quote_items",
    "wedding_details",
    "payment_plans",
    SETTINGS_KEY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Clients,
    Categories,
    Services,
    Quotes,
    QuoteItems,
    WeddingDetails,
    PaymentPlans,
}

impl Collection {
    pub fn key(self) -> &'static str {
        match self {
            Collection::Clients => "clients",
            Collection::Categories => "categories",
            Collection::Services => "services",
            Collection::Quotes => "quotes",
            Collection::QuoteItems => "quote_items",
            Collection::WeddingDetails => "wedding_details",
            Collection::PaymentPlans => "payment_plans",
        }
    }
}

/// A row of a named collection, keyed by a positive integer id.
///
/// `Draft` carries every field the caller chooses; the store supplies the id
/// and the creation timestamps. `Patch` is a partial field set merged over an
/// existing row.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const COLLECTION: Collection;

    type Draft;
    type Patch;

    fn id(&self) -> i64;

    fn from_draft(id: i64, draft: Self::Draft, now: &str) -> Self;

    /// Shallow merge. Rows with an `updatedAt` field refresh it to `now`.
    fn merge(&mut self, patch: Self::Patch, now: &str);
}

/// Rows owned by a quote and replaced wholesale whenever the quote is saved.
pub trait QuoteChild: Record {
    fn quote_id(&self) -> i64;

    fn attach(&mut self, quote_id: i64, sort_order: i64);
}

/// Assigns each `Some` field of a patch onto the target.
macro_rules! merge_fields {
    ($target:expr, $patch:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )*
    };
}

pub(crate) use merge_fields;
