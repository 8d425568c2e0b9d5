//! Entity descriptors for the generic list controller

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{Item, NewItem, NewTransaction, Transaction};

/// A server collection the list controller can browse and mutate.
pub trait Resource: Send + Sync + 'static {
    /// Record returned by the list and detail endpoints
    type Record: DeserializeOwned + Clone + Send + Sync + 'static;
    /// POST body for a new record
    type Draft: Serialize + Send + Sync;

    /// Collection path, e.g. `/items`
    const PATH: &'static str;
    /// Singular noun used in notifications
    const NOUN: &'static str;
    /// Fields the server accepts in `sortBy`
    const SORT_FIELDS: &'static [&'static str];

    /// Path of a single record
    fn record_path(id: u64) -> String {
        format!("{}/{}", Self::PATH, id)
    }

    fn is_sortable(field: &str) -> bool {
        Self::SORT_FIELDS.contains(&field)
    }
}

/// `/items`
#[derive(Debug, Clone, Copy, Default)]
pub struct Items;

impl Resource for Items {
    type Record = Item;
    type Draft = NewItem;

    const PATH: &'static str = "/items";
    const NOUN: &'static str = "item";
    const SORT_FIELDS: &'static [&'static str] = &["name", "stock", "createdAt"];
}

/// `/transactions`
#[derive(Debug, Clone, Copy, Default)]
pub struct Transactions;

impl Resource for Transactions {
    type Record = Transaction;
    type Draft = NewTransaction;

    const PATH: &'static str = "/transactions";
    const NOUN: &'static str = "transaction";
    const SORT_FIELDS: &'static [&'static str] =
        &["name", "stockHistory", "amount", "transactionDate"];
}
