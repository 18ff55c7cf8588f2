//! Payments, cash sessions, cash reports, customer credits and expenses.

use serde::{Deserialize, Serialize};

use super::{RecordId, search_fields};
use crate::domain::{Amount, Searchable};

/// Payment methods the cashier screens accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Notes and coins.
    Cash,
    /// Card terminal.
    Card,
    /// Bank transfer.
    Transfer,
    /// Mobile wallet.
    Mobile,
}

impl PaymentMethod {
    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Transfer => "transfer",
            Self::Mobile => "mobile",
        }
    }

    /// Parse form input, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            "transfer" => Some(Self::Transfer),
            "mobile" => Some(Self::Mobile),
            _ => None,
        }
    }
}

/// A payment recorded against a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Primary key.
    pub id: RecordId,
    /// Sale the payment settles.
    #[serde(default)]
    pub sale_id: Option<RecordId>,
    /// Payment method as sent.
    #[serde(default)]
    pub method: Option<String>,
    /// Amount paid.
    #[serde(default)]
    pub amount: Option<Amount>,
    /// Payment status.
    #[serde(default)]
    pub status: Option<String>,
    /// Recording timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Searchable for Payment {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.sale_id.as_ref().map(ToString::to_string),
            self.method.clone(),
            self.amount.as_ref().map(ToString::to_string),
            self.status.clone(),
        ])
    }
}

/// A cashier's till session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashSession {
    /// Primary key.
    pub id: RecordId,
    /// `OPEN` or `CLOSED`, as sent.
    #[serde(default)]
    pub status: Option<String>,
    /// Float counted at opening.
    #[serde(default)]
    pub opening_balance: Option<Amount>,
    /// Cash counted at closing.
    #[serde(default)]
    pub closing_balance: Option<Amount>,
    /// Cashier who owns the session.
    #[serde(default)]
    pub cashier_email: Option<String>,
    /// Opening timestamp.
    #[serde(default)]
    pub opened_at: Option<String>,
    /// Closing timestamp.
    #[serde(default)]
    pub closed_at: Option<String>,
}

impl CashSession {
    /// Whether the session is still open.
    pub fn is_open(&self) -> bool {
        match self.status.as_deref() {
            Some(status) => status.eq_ignore_ascii_case("open"),
            None => self.closed_at.is_none(),
        }
    }
}

impl Searchable for CashSession {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.status.clone(),
            self.cashier_email.clone(),
            self.opening_balance.as_ref().map(ToString::to_string),
            self.closing_balance.as_ref().map(ToString::to_string),
        ])
    }
}

/// Store credit extended to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credit {
    /// Primary key.
    pub id: RecordId,
    /// Customer display name.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Customer phone number.
    #[serde(default)]
    pub customer_phone: Option<String>,
    /// Credit granted.
    #[serde(default)]
    pub amount: Option<Amount>,
    /// Outstanding balance.
    #[serde(default)]
    pub balance: Option<Amount>,
    /// Credit status.
    #[serde(default)]
    pub status: Option<String>,
}

impl Searchable for Credit {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.customer_name.clone(),
            self.customer_phone.clone(),
            self.amount.as_ref().map(ToString::to_string),
            self.status.clone(),
        ])
    }
}

/// One line of an aggregated cash report (per session or per day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashReport {
    /// Primary key.
    pub id: RecordId,
    /// Business day, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
    /// Cashier the line belongs to.
    #[serde(default)]
    pub cashier_email: Option<String>,
    /// Cash the till should hold.
    #[serde(default)]
    pub expected_cash: Option<Amount>,
    /// Cash actually counted.
    #[serde(default)]
    pub counted_cash: Option<Amount>,
    /// Counted minus expected.
    #[serde(default)]
    pub difference: Option<Amount>,
    /// Sales taken during the period.
    #[serde(default)]
    pub sales_total: Option<Amount>,
}

impl Searchable for CashReport {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.date.clone(),
            self.cashier_email.clone(),
            self.difference.as_ref().map(ToString::to_string),
        ])
    }
}

/// Money paid out of the till or the business account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Primary key.
    pub id: RecordId,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Expense category.
    #[serde(default)]
    pub category: Option<String>,
    /// Amount spent.
    #[serde(default)]
    pub amount: Option<Amount>,
    /// Staff member who recorded it.
    #[serde(default)]
    pub recorded_by: Option<String>,
    /// Recording timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Searchable for Expense {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.description.clone(),
            self.category.clone(),
            self.amount.as_ref().map(ToString::to_string),
            self.recorded_by.clone(),
        ])
    }
}
