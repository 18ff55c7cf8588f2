//! Store-keeper stock requests.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{FormError, optional_text, parse_positive_integer, required_text};
use crate::domain::ports::BackendCommand;
use crate::domain::resources::STOCK_REQUESTS;

/// Raw "request stock" form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStockRequestInput {
    /// Product being requested.
    #[serde(default)]
    pub product_id: Option<String>,
    /// Units wanted; a number or numeric string.
    #[serde(default)]
    pub quantity: Option<Value>,
    /// Optional note for the supplier side.
    #[serde(default)]
    pub note: Option<String>,
}

/// Validated stock request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStockRequest {
    product_id: String,
    quantity: u32,
    note: Option<String>,
}

impl NewStockRequest {
    /// Validate the form.
    pub fn try_from_input(input: &NewStockRequestInput) -> Result<Self, FormError> {
        Ok(Self {
            product_id: required_text("productId", input.product_id.as_deref())?,
            quantity: parse_positive_integer("quantity", input.quantity.as_ref())?,
            note: optional_text(input.note.as_deref()),
        })
    }

    /// Units requested.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The POST creating the request.
    pub fn to_command(&self) -> BackendCommand {
        let mut body = Map::new();
        body.insert("productId".into(), Value::String(self.product_id.clone()));
        body.insert("quantity".into(), Value::from(self.quantity));
        if let Some(note) = &self.note {
            body.insert("note".into(), Value::String(note.clone()));
        }
        BackendCommand::post(STOCK_REQUESTS.path(), Value::Object(body))
    }
}
