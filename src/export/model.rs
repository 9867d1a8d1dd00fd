//! Records consumed by the expense exporter.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single shared-cost transaction.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub currency: String,
    pub date: NaiveDate,
    /// User id of the payer.
    pub paid_by: String,
    /// User ids, in display order.
    pub participants: Vec<String>,
    #[serde(default)]
    pub settled: bool,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Event {
    pub id: String,
    pub name: String,
}

/// Anything with an id and a display name.
pub trait Named {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl Named for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Event {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Id → display name index, built once per export.
///
/// Duplicate ids resolve to the first entry.
#[derive(Debug, Default)]
pub struct Lookup<'a> {
    names: HashMap<&'a str, &'a str>,
}

impl<'a> Lookup<'a> {
    pub fn new<T: Named>(items: &'a [T]) -> Self {
        let mut names = HashMap::with_capacity(items.len());
        for item in items {
            names.entry(item.id()).or_insert(item.name());
        }
        Self { names }
    }

    pub fn get(&self, id: &str) -> Option<&'a str> {
        self.names.get(id).copied()
    }

    pub fn name_or<'b>(&self, id: &str, fallback: &'b str) -> &'b str
    where
        'a: 'b,
    {
        self.get(id).unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_deserializes_hub_shape() {
        let json = r#"{
            "id": "e1",
            "description": "Lunch",
            "amount": 100.5,
            "currency": "USD",
            "date": "2023-01-01",
            "paidBy": "u1",
            "participants": ["u1", "u2"],
            "eventId": "ev1"
        }"#;

        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.paid_by, "u1");
        assert_eq!(expense.event_id.as_deref(), Some("ev1"));
        assert!(!expense.settled);
        assert!(expense.notes.is_none());
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }

    #[test]
    fn test_lookup_first_entry_wins() {
        let users = vec![
            User { id: "u1".into(), name: "Alice".into() },
            User { id: "u1".into(), name: "Impostor".into() },
        ];
        let lookup = Lookup::new(&users);
        assert_eq!(lookup.get("u1"), Some("Alice"));
        assert_eq!(lookup.name_or("u9", "Unknown"), "Unknown");
    }
}
