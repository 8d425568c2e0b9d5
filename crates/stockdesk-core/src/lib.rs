//! Inventory list and report controllers
//!
//! Everything here is front-end agnostic: controllers talk to the server
//! through a [`Transport`] and to the user through a [`Notifier`].

pub mod debounce;
pub mod error;
pub mod list;
pub mod live;
pub mod models;
pub mod notify;
pub mod query;
pub mod report;
pub mod resource;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use debounce::{Debouncer, DEFAULT_QUIESCENCE};
pub use error::{ClientError, ClientResult, ErrorCode, ErrorSeverity};
pub use list::{ListController, RefreshOutcome};
pub use live::LiveList;
pub use models::{Item, ItemType, NewItem, NewTransaction, Transaction, TransactionReport};
pub use notify::{CollectingNotifier, LogNotifier, Notification, NotificationLevel, Notifier};
pub use query::{build_query_string, join_query, with_query};
pub use report::ReportController;
pub use resource::{Items, Resource, Transactions};
pub use transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};
pub use types::{
    DateRange, FilterSet, SortOrder, SortSpec, FIELD_END_DATE, FIELD_ITEM_NAME, FIELD_START_DATE,
};

/// List controller over `/items`
pub type ItemList = ListController<Items>;
/// List controller over `/transactions`
pub type TransactionList = ListController<Transactions>;
