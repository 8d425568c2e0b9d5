//! Filter and sort state shared by the list and report controllers

use serde::{Deserialize, Serialize};

use crate::query::build_query_string;

/// Filter field: substring match on the item name
pub const FIELD_ITEM_NAME: &str = "itemName";
/// Filter field: inclusive lower date bound
pub const FIELD_START_DATE: &str = "startDate";
/// Filter field: inclusive upper date bound
pub const FIELD_END_DATE: &str = "endDate";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(format!("Invalid sort order: {}", s)),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side ordering: which field, which direction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            sort_by: Some(field.into()),
            order,
        }
    }

    /// Column-header click: the same field flips direction, a new field
    /// starts descending.
    pub fn toggle(&mut self, field: &str) {
        self.order = match self.sort_by.as_deref() {
            Some(current) if current == field => self.order.flipped(),
            _ => SortOrder::Desc,
        };
        self.sort_by = Some(field.to_string());
    }

    /// `sortBy=...&order=...`
    pub fn to_query(&self) -> String {
        build_query_string([
            ("sortBy", self.sort_by.as_deref()),
            ("order", Some(self.order.as_str())),
        ])
    }
}

/// Ordered field → value mapping narrowing a list query.
///
/// Setting an existing field replaces its value in place; empty values are
/// kept here and dropped at encoding time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSet {
    fields: Vec<(String, String)>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterSet::set`]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn clear(&mut self, field: &str) {
        self.fields.retain(|(name, _)| name != field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// True when no field would reach the query string
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.is_empty())
    }

    pub fn to_query(&self) -> String {
        build_query_string(self.iter())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = FilterSet::new();
        for (field, value) in iter {
            filters.set(field, value);
        }
        filters
    }
}

/// Date bounds for the transaction report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(rename = "startDate", default)]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<String>,
}

impl DateRange {
    pub fn new(start_date: Option<String>, end_date: Option<String>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    pub fn to_query(&self) -> String {
        build_query_string([
            (FIELD_START_DATE, self.start_date.as_deref()),
            (FIELD_END_DATE, self.end_date.as_deref()),
        ])
    }
}

impl From<&DateRange> for FilterSet {
    fn from(range: &DateRange) -> Self {
        let mut filters = FilterSet::new();
        if let Some(start) = &range.start_date {
            filters.set(FIELD_START_DATE, start.clone());
        }
        if let Some(end) = &range.end_date {
            filters.set(FIELD_END_DATE, end.clone());
        }
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_same_field_is_desc_then_asc() {
        let mut sort = SortSpec::default();
        sort.toggle("name");
        assert_eq!(sort, SortSpec::new("name", SortOrder::Desc));
        sort.toggle("name");
        assert_eq!(sort, SortSpec::new("name", SortOrder::Asc));
        sort.toggle("name");
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[test]
    fn test_toggle_new_field_starts_desc() {
        let mut sort = SortSpec::new("name", SortOrder::Desc);
        sort.toggle("name");
        assert_eq!(sort.order, SortOrder::Asc);

        sort.toggle("stock");
        assert_eq!(sort, SortSpec::new("stock", SortOrder::Desc));
    }

    #[test]
    fn test_sort_query() {
        assert_eq!(SortSpec::default().to_query(), "order=desc");
        assert_eq!(
            SortSpec::new("createdAt", SortOrder::Asc).to_query(),
            "sortBy=createdAt&order=asc"
        );
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("descending".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("up".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_filter_set_last_write_wins_in_place() {
        let mut filters = FilterSet::new()
            .with(FIELD_ITEM_NAME, "so")
            .with(FIELD_START_DATE, "2024-01-01");
        filters.set(FIELD_ITEM_NAME, "soap");

        assert_eq!(filters.get(FIELD_ITEM_NAME), Some("soap"));
        assert_eq!(filters.to_query(), "itemName=soap&startDate=2024-01-01");
    }

    #[test]
    fn test_filter_set_blank() {
        let mut filters = FilterSet::new().with(FIELD_ITEM_NAME, "");
        assert!(filters.is_blank());
        assert_eq!(filters.to_query(), "");

        filters.set(FIELD_END_DATE, "2024-02-01");
        assert!(!filters.is_blank());
        filters.clear(FIELD_END_DATE);
        assert!(filters.is_blank());
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::new(Some("2024-01-01".to_string()), None);
        assert_eq!(range.to_query(), "startDate=2024-01-01");

        let filters = FilterSet::from(&range);
        assert_eq!(filters.get(FIELD_START_DATE), Some("2024-01-01"));
        assert_eq!(filters.get(FIELD_END_DATE), None);
    }
}
