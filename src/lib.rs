//! Quote book for a wedding and event decoration business: clients, a service
//! catalogue, quotes with line items, wedding details and payment schedules,
//! persisted as JSON collections over a key/value store.

pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;
