//! Wire models for the inventory API

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// Cleaning supplies
    #[serde(rename = "Pembersih")]
    Cleaning,
    /// Consumables
    #[serde(rename = "Konsumsi")]
    Consumable,
}

impl ItemType {
    pub const ALL: [ItemType; 2] = [ItemType::Cleaning, ItemType::Consumable];

    /// Label as stored by the server
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Cleaning => "Pembersih",
            ItemType::Consumable => "Konsumsi",
        }
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pembersih" | "cleaning" => Ok(ItemType::Cleaning),
            "konsumsi" | "consumable" => Ok(ItemType::Consumable),
            _ => Err(format!("Invalid item type: {}", s)),
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stock item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub stock: u32,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Creation timestamp as sent by the server
    pub created_at: String,
}

impl Item {
    /// Creation date, whatever timestamp shape the server used
    pub fn created_date(&self) -> Option<NaiveDate> {
        parse_date(&self.created_at)
    }
}

/// POST body for a new item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub stock: u32,
    #[serde(rename = "type")]
    pub item_type: ItemType,
}

/// One sale event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: u64,
    #[serde(default)]
    pub item_name: String,
    /// Stock level recorded at the time of sale
    #[serde(default)]
    pub stock_history: i64,
    /// Units sold
    #[serde(alias = "soldAmount")]
    pub amount: u32,
    #[serde(default)]
    pub item_type: String,
    pub transaction_date: String,
    /// Denormalized item, when the server includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
}

impl Transaction {
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.transaction_date)
    }

    /// Item name, preferring the linked item when present
    pub fn display_name(&self) -> &str {
        match &self.item {
            Some(item) if self.item_name.is_empty() => &item.name,
            _ => &self.item_name,
        }
    }
}

/// POST body for a new transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// Item id
    pub item: u64,
    pub amount: u32,
    /// `YYYY-MM-DD`
    pub transaction_date: String,
}

/// Aggregate returned by `/transactions/reports`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReport {
    #[serde(default)]
    pub most_transactions: Vec<Transaction>,
    #[serde(default)]
    pub least_transactions: Vec<Transaction>,
}

impl TransactionReport {
    pub fn is_empty(&self) -> bool {
        self.most_transactions.is_empty() && self.least_transactions.is_empty()
    }
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` and plain `YYYY-MM-DD`.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_from_server_json() {
        let item: Item = serde_json::from_str(
            r#"{"id":1,"name":"Soap","stock":10,"type":"Pembersih","createdAt":"2024-01-01"}"#,
        )
        .unwrap();

        assert_eq!(item.item_type, ItemType::Cleaning);
        assert_eq!(item.created_date(), NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let result = serde_json::from_str::<Item>(
            r#"{"id":1,"name":"Soap","stock":-1,"type":"Pembersih","createdAt":"2024-01-01"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_new_item_body() {
        let body = serde_json::to_value(NewItem {
            name: "Teh".to_string(),
            stock: 20,
            item_type: ItemType::Consumable,
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({"name": "Teh", "stock": 20, "type": "Konsumsi"}));
    }

    #[test]
    fn test_transaction_accepts_sold_amount_alias() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id":7,"itemName":"Kopi","stockHistory":100,"soldAmount":10,
                "itemType":"Konsumsi","transactionDate":"2024-05-01T08:00:00.000Z"}"#,
        )
        .unwrap();

        assert_eq!(tx.amount, 10);
        assert_eq!(tx.date(), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(tx.item.is_none());

        let out = serde_json::to_value(&tx).unwrap();
        assert_eq!(out["amount"], 10);
        assert!(out.get("soldAmount").is_none());
    }

    #[test]
    fn test_transaction_display_name_falls_back_to_item() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id":3,"amount":2,"transactionDate":"2024-05-01",
                "item":{"id":1,"name":"Soap","stock":8,"type":"Pembersih",
                        "createdAt":"2024-01-01"}}"#,
        )
        .unwrap();

        assert_eq!(tx.display_name(), "Soap");
    }

    #[test]
    fn test_new_transaction_body() {
        let body = serde_json::to_value(NewTransaction {
            item: 4,
            amount: 3,
            transaction_date: "2024-06-01".to_string(),
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({"item": 4, "amount": 3, "transactionDate": "2024-06-01"})
        );
    }

    #[test]
    fn test_report_defaults_missing_sections() {
        let report: TransactionReport =
            serde_json::from_str(r#"{"mostTransactions":[]}"#).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_item_type_from_str() {
        assert_eq!("Pembersih".parse::<ItemType>().unwrap(), ItemType::Cleaning);
        assert_eq!("konsumsi".parse::<ItemType>().unwrap(), ItemType::Consumable);
        assert!("furniture".parse::<ItemType>().is_err());
    }
}
