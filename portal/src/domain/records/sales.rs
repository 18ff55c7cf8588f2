//! Sales and the status gating for sale actions.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{RecordId, search_fields};
use crate::domain::{Amount, Searchable};

/// Sale lifecycle status as reported by the backend.
///
/// Unknown statuses are preserved verbatim so new backend states still
/// render, but they permit no actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SaleStatus {
    /// Sale recorded by a seller; waiting for the cashier to record payment.
    AwaitingPaymentRecord,
    /// Sale started but not yet submitted for payment.
    Pending,
    /// Paid and closed.
    Completed,
    /// Voided before completion.
    Cancelled,
    /// Money returned after completion.
    Refunded,
    /// Any status the portal does not know.
    Other(String),
}

impl SaleStatus {
    /// Wire value used by the backend.
    pub fn as_str(&self) -> &str {
        match self {
            Self::AwaitingPaymentRecord => "AWAITING_PAYMENT_RECORD",
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Refunded => "REFUNDED",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Parse a backend status, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        let normalised = raw.trim().to_ascii_uppercase();
        match normalised.as_str() {
            "AWAITING_PAYMENT_RECORD" => Self::AwaitingPaymentRecord,
            "PENDING" => Self::Pending,
            "COMPLETED" => Self::Completed,
            "CANCELLED" | "CANCELED" => Self::Cancelled,
            "REFUNDED" => Self::Refunded,
            _ => Self::Other(normalised),
        }
    }

    /// Actions the portal offers for a sale in this status.
    ///
    /// This is advisory: it only decides which buttons a screen shows. The
    /// backend applies its own transition rules and may still refuse.
    pub fn allowed_actions(&self) -> &'static [SaleAction] {
        match self {
            Self::AwaitingPaymentRecord => &[SaleAction::RecordPayment, SaleAction::Cancel],
            Self::Pending => &[SaleAction::Cancel],
            Self::Completed => &[SaleAction::Refund],
            Self::Cancelled | Self::Refunded | Self::Other(_) => &[],
        }
    }

    /// Whether `action` is offered for this status.
    pub fn permits(&self, action: SaleAction) -> bool {
        self.allowed_actions().contains(&action)
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SaleStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SaleStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Row actions on a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleAction {
    /// Record the customer's payment.
    RecordPayment,
    /// Void the sale.
    Cancel,
    /// Return money on a completed sale.
    Refund,
}

/// A sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Primary key.
    pub id: RecordId,
    /// Lifecycle status.
    #[serde(default)]
    pub status: Option<SaleStatus>,
    /// Sale total.
    #[serde(default, alias = "total")]
    pub total_amount: Option<Amount>,
    /// Customer display name.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Customer phone number.
    #[serde(default)]
    pub customer_phone: Option<String>,
    /// Seller who created the sale.
    #[serde(default)]
    pub seller_email: Option<String>,
    /// Store location.
    #[serde(default)]
    pub location_id: Option<RecordId>,
    /// Creation timestamp, as sent.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Sale {
    /// Whether the sale is waiting for a cashier to record payment.
    pub fn awaits_payment(&self) -> bool {
        matches!(self.status, Some(SaleStatus::AwaitingPaymentRecord))
    }

    /// Actions offered for this sale.
    pub fn allowed_actions(&self) -> &'static [SaleAction] {
        match &self.status {
            Some(status) => status.allowed_actions(),
            None => &[],
        }
    }
}

impl Searchable for Sale {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.status.as_ref().map(ToString::to_string),
            self.total_amount.as_ref().map(ToString::to_string),
            self.customer_name.clone(),
            self.customer_phone.clone(),
            self.seller_email.clone(),
        ])
    }
}
