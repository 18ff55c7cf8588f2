//! Cancelling and refunding sales.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::optional_text;
use crate::domain::ports::BackendCommand;
use crate::domain::records::{RecordId, SaleAction};
use crate::domain::resources::{REFUNDS, SALES};

/// Raw cancel/refund form; only the reason is free text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleActionInput {
    /// Optional reason recorded with the action.
    #[serde(default)]
    pub reason: Option<String>,
}

/// A status-changing action on one sale.
///
/// Recording a payment has its own form,
/// [`RecordPayment`](super::RecordPayment); this type covers the
/// body-less actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleActionRequest {
    sale_id: RecordId,
    action: SaleAction,
    reason: Option<String>,
}

impl SaleActionRequest {
    /// Build the request. Record-payment is routed to its own form, so it
    /// is mapped to `None` here.
    pub fn new(sale_id: RecordId, action: SaleAction, input: &SaleActionInput) -> Option<Self> {
        match action {
            SaleAction::RecordPayment => None,
            SaleAction::Cancel | SaleAction::Refund => Some(Self {
                sale_id,
                action,
                reason: optional_text(input.reason.as_deref()),
            }),
        }
    }

    /// Sale affected.
    pub fn sale_id(&self) -> &RecordId {
        &self.sale_id
    }

    /// Action requested.
    pub fn action(&self) -> SaleAction {
        self.action
    }

    /// The POST performing the action.
    pub fn to_command(&self) -> BackendCommand {
        let mut body = Map::new();
        if let Some(reason) = &self.reason {
            body.insert("reason".into(), Value::String(reason.clone()));
        }
        match self.action {
            SaleAction::Refund => {
                body.insert("saleId".into(), Value::String(self.sale_id.to_string()));
                BackendCommand::post(REFUNDS.path(), Value::Object(body))
            }
            SaleAction::Cancel | SaleAction::RecordPayment => BackendCommand::post(
                SALES.member_action_path(self.sale_id.as_str(), "cancel"),
                Value::Object(body),
            ),
        }
    }
}
