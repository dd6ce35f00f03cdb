use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use super::CeremonyType;
use crate::db::{Collection, QuoteChild, Record};

/// Wedding specifics of a quote, at most one per quote.
///
/// The selection fields are stored as encoded lists (JSON arrays, or comma
/// separated text in older data). Use [`crate::services::wedding`] to read
/// and write them as typed values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeddingDetails {
    pub id: i64,
    pub quote_id: i64,
    pub bride_name: String,
    pub groom_name: String,
    pub ceremony_type: CeremonyType,
    pub church_name: String,
    pub reception_name: String,
    pub has_coordinator: bool,
    pub palette: String,
    pub palette_colors: String,
    pub style: String,
    pub flowers: String,
    pub greenery: String,
    pub areas: String,
}

impl WeddingDetails {
    pub fn to_draft(&self) -> WeddingDetailsDraft {
        WeddingDetailsDraft {
            bride_name: self.bride_name.clone(),
            groom_name: self.groom_name.clone(),
            ceremony_type: self.ceremony_type,
            church_name: self.church_name.clone(),
            reception_name: self.reception_name.clone(),
            has_coordinator: self.has_coordinator,
            palette: self.palette.clone(),
            palette_colors: self.palette_colors.clone(),
            style: self.style.clone(),
            flowers: self.flowers.clone(),
            greenery: self.greenery.clone(),
            areas: self.areas.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeddingDetailsDraft {
    pub bride_name: String,
    pub groom_name: String,
    pub ceremony_type: CeremonyType,
    pub church_name: String,
    pub reception_name: String,
    pub has_coordinator: bool,
    pub palette: String,
    pub palette_colors: String,
    pub style: String,
    pub flowers: String,
    pub greenery: String,
    pub areas: String,
}

impl Record for WeddingDetails {
    const COLLECTION: Collection = Collection::WeddingDetails;

    type Draft = WeddingDetailsDraft;
    type Patch = Infallible;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: WeddingDetailsDraft, _now: &str) -> Self {
        WeddingDetails {
            id,
            quote_id: 0,
            bride_name: draft.bride_name,
            groom_name: draft.groom_name,
            ceremony_type: draft.ceremony_type,
            church_name: draft.church_name,
            reception_name: draft.reception_name,
            has_coordinator: draft.has_coordinator,
            palette: draft.palette,
            palette_colors: draft.palette_colors,
            style: draft.style,
            flowers: draft.flowers,
            greenery: draft.greenery,
            areas: draft.areas,
        }
    }

    fn merge(&mut self, patch: Infallible, _now: &str) {
        match patch {}
    }
}

impl QuoteChild for WeddingDetails {
    fn quote_id(&self) -> i64 {
        self.quote_id
    }

    fn attach(&mut self, quote_id: i64, _sort_order: i64) {
        self.quote_id = quote_id;
    }
}

/// Decoded form of the encoded selection fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeddingSelections {
    pub palette_colors: Vec<String>,
    pub style: Option<WeddingStyle>,
    pub flowers: Vec<Flower>,
    pub greenery: Vec<Greenery>,
    pub areas: Vec<WeddingArea>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeddingStyle {
    Rustico,
    Romantico,
    Luxury,
    Garden,
    Classico,
    Seaside,
    Autunnale,
    Invernale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flower {
    RoseVendela,
    RoseColombiana,
    RoseAvalanche,
    RoseExplorer,
    OrtensiaBianca,
    OrtensiaVerde,
    OrtensiaRosa,
    OrtensiaAzzurra,
    Peonia,
    Ranuncolo,
    Tulipano,
    Lilium,
    Iris,
    Gypsophila,
    Lisianthus,
    Fresia,
    Gerbera,
    Dalia,
    Anemone,
    Calla,
    WaxFlower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Greenery {
    Eucalipto,
    Ruscus,
    Asparagina,
    Hedera,
    Smilax,
    Salal,
    Fern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeddingArea {
    Chiesa,
    Location,
    CasaSposa,
    CasaSposo,
    Auto,
    Welcome,
    Photobooth,
}
