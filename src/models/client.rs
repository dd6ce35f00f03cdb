use serde::{Deserialize, Serialize};

use super::{ClientStatus, EventType};
use crate::db::{merge_fields, Collection, Record};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub event_type: EventType,
    pub notes: String,
    pub status: ClientStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub event_type: EventType,
    pub notes: String,
    pub status: ClientStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub event_type: Option<EventType>,
    pub notes: Option<String>,
    pub status: Option<ClientStatus>,
}

impl Record for Client {
    const COLLECTION: Collection = Collection::Clients;

    type Draft = NewClient;
    type Patch = ClientPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: NewClient, now: &str) -> Self {
        Client {
            id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            address: draft.address,
            event_type: draft.event_type,
            notes: draft.notes,
            status: draft.status,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    fn merge(&mut self, patch: ClientPatch, now: &str) {
        merge_fields!(self, patch, [name, email, phone, address, event_type, notes, status]);
        self.updated_at = now.to_string();
    }
}
