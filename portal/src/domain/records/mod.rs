//! Backend business records as the portal reads them.
//!
//! The backend owns these shapes. Apart from the primary key every field is
//! optional, so a record decodes even when an endpoint omits or renames a
//! column; screens render whatever is present. Each record declares the
//! fields the list filter searches through [`Searchable`](super::Searchable)
//! and its primary key through [`Keyed`](pagination::Keyed).

mod audit;
mod finance;
mod inventory;
mod messages;
mod people;
mod sales;

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use audit::{AuditAction, AuditLogEntry};
pub use finance::{CashReport, CashSession, Credit, Expense, Payment, PaymentMethod};
pub use inventory::{AdjustmentRequest, InventoryArrival, InventoryItem, StockRequest};
pub use messages::{Message, MessageThread};
pub use people::{Customer, StaffUser};
pub use sales::{Sale, SaleAction, SaleStatus};

/// Primary key of a backend record, string-coerced.
///
/// Endpoints disagree on whether ids are numbers or strings; both decode to
/// the same textual key so de-duplication and lookups work across them.
///
/// # Examples
/// ```
/// use portal::domain::records::RecordId;
///
/// let numeric: RecordId = serde_json::from_str("5").expect("numeric id");
/// let textual: RecordId = serde_json::from_str("\"5\"").expect("text id");
/// assert_eq!(numeric, textual);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a textual key. Returns `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Busy-row key for a create form, which has no row yet.
    pub(crate) fn form(name: &'static str) -> Self {
        Self(format!("new:{name}"))
    }

    /// Borrow the key text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match Value::deserialize(deserializer)? {
            Value::Number(number) => number.to_string(),
            Value::String(text) => text,
            other => {
                return Err(de::Error::custom(format!(
                    "record id must be a number or string, got {other}"
                )));
            }
        };
        Self::new(raw).ok_or_else(|| de::Error::custom("record id must not be blank"))
    }
}

/// Collect the present, non-empty fields of a record for searching.
pub(crate) fn search_fields<const N: usize>(fields: [Option<String>; N]) -> Vec<String> {
    fields.into_iter().flatten().filter(|f| !f.is_empty()).collect()
}

macro_rules! keyed_by_id {
    ($($record:ty),+ $(,)?) => {
        $(
            impl pagination::Keyed for $record {
                type Key = $crate::domain::records::RecordId;

                fn key(&self) -> Self::Key {
                    self.id.clone()
                }
            }
        )+
    };
}

keyed_by_id!(
    AuditLogEntry,
    CashReport,
    CashSession,
    Credit,
    Expense,
    Payment,
    AdjustmentRequest,
    InventoryArrival,
    InventoryItem,
    StockRequest,
    Message,
    MessageThread,
    Customer,
    StaffUser,
    Sale,
);
