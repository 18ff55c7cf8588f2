//! Inventory rows and stock movement requests.

use serde::{Deserialize, Serialize};

use super::{RecordId, search_fields};
use crate::domain::Searchable;

/// Stock on hand for one product at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Primary key.
    pub id: RecordId,
    /// Product identifier.
    #[serde(default)]
    pub product_id: Option<RecordId>,
    /// Product display name.
    #[serde(default, alias = "name")]
    pub product_name: Option<String>,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
    /// Units on hand.
    #[serde(default)]
    pub quantity: Option<i64>,
    /// Store location.
    #[serde(default)]
    pub location_id: Option<RecordId>,
}

impl Searchable for InventoryItem {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.product_name.clone(),
            self.sku.clone(),
            self.quantity.map(|q| q.to_string()),
        ])
    }
}

/// Request to correct recorded stock, decided by a manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRequest {
    /// Primary key.
    pub id: RecordId,
    /// `PENDING`, `APPROVED` or `REJECTED`, as sent.
    #[serde(default)]
    pub status: Option<String>,
    /// Product display name.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Signed change in units.
    #[serde(default)]
    pub quantity_delta: Option<i64>,
    /// Reason given by the requester.
    #[serde(default)]
    pub reason: Option<String>,
    /// Who asked for the adjustment.
    #[serde(default)]
    pub requested_by: Option<String>,
}

impl AdjustmentRequest {
    /// Whether the request still awaits a decision.
    pub fn is_pending(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("pending"))
    }
}

impl Searchable for AdjustmentRequest {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.status.clone(),
            self.product_name.clone(),
            self.reason.clone(),
            self.requested_by.clone(),
        ])
    }
}

/// Request to move stock to a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRequest {
    /// Primary key.
    pub id: RecordId,
    /// Request status.
    #[serde(default)]
    pub status: Option<String>,
    /// Product display name.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Units requested.
    #[serde(default)]
    pub quantity: Option<i64>,
    /// Destination location.
    #[serde(default)]
    pub location_id: Option<RecordId>,
}

impl Searchable for StockRequest {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.status.clone(),
            self.product_name.clone(),
            self.quantity.map(|q| q.to_string()),
        ])
    }
}

/// Goods received at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryArrival {
    /// Primary key.
    pub id: RecordId,
    /// Product display name.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Units received.
    #[serde(default)]
    pub quantity: Option<i64>,
    /// Supplier or source.
    #[serde(default)]
    pub supplier: Option<String>,
    /// Receipt timestamp.
    #[serde(default)]
    pub received_at: Option<String>,
}

impl Searchable for InventoryArrival {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.product_name.clone(),
            self.supplier.clone(),
            self.quantity.map(|q| q.to_string()),
        ])
    }
}
