use serde::{Deserialize, Serialize};

use super::UnitOfMeasure;
use crate::db::{merge_fields, Collection, Record};
use crate::errors::ValidationError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceCategory {
    pub id: i64,
    pub name: String,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCategory {
    pub name: String,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub sort_order: Option<i64>,
}

impl Record for ServiceCategory {
    const COLLECTION: Collection = Collection::Categories;

    type Draft = NewCategory;
    type Patch = CategoryPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: NewCategory, _now: &str) -> Self {
        ServiceCategory {
            id,
            name: draft.name,
            sort_order: draft.sort_order,
        }
    }

    fn merge(&mut self, patch: CategoryPatch, _now: &str) {
        merge_fields!(self, patch, [name, sort_order]);
    }
}

/// A catalogue entry. `category_id` is a weak reference: deleting the
/// category leaves the service in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub base_price: f64,
    pub unit: UnitOfMeasure,
    pub transport_included: bool,
    pub image_path: Option<String>,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewService {
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub base_price: f64,
    pub unit: UnitOfMeasure,
    pub transport_included: bool,
    pub image_path: Option<String>,
    pub sort_order: i64,
}

impl NewService {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_price < 0.0 {
            return Err(ValidationError::NegativePrice {
                description: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServicePatch {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<f64>,
    pub unit: Option<UnitOfMeasure>,
    pub transport_included: Option<bool>,
    pub image_path: Option<Option<String>>,
    pub sort_order: Option<i64>,
}

impl Record for Service {
    const COLLECTION: Collection = Collection::Services;

    type Draft = NewService;
    type Patch = ServicePatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: NewService, _now: &str) -> Self {
        Service {
            id,
            category_id: draft.category_id,
            name: draft.name,
            description: draft.description,
            base_price: draft.base_price,
            unit: draft.unit,
            transport_included: draft.transport_included,
            image_path: draft.image_path,
            sort_order: draft.sort_order,
        }
    }

    fn merge(&mut self, patch: ServicePatch, _now: &str) {
        merge_fields!(
            self,
            patch,
            [category_id, name, description, base_price, unit, transport_included, image_path, sort_order]
        );
    }
}

/// A service joined with its category name; blank when the category is gone.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListing {
    #[serde(flatten)]
    pub service: Service,
    pub category_name: String,
}
