//! Opening and closing a cashier's till session.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{FormError, optional_text, parse_non_negative_money};
use crate::domain::ports::BackendCommand;
use crate::domain::records::RecordId;
use crate::domain::resources::CASH_SESSIONS;
use crate::domain::{Amount, Money};

/// Raw "open cash session" form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCashSessionInput {
    /// Float counted into the till.
    #[serde(default)]
    pub opening_balance: Option<Amount>,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Validated request to open a session.
///
/// # Examples
/// ```
/// use portal::domain::forms::{OpenCashSession, OpenCashSessionInput};
///
/// let rejected: OpenCashSessionInput =
///     serde_json::from_str(r#"{"openingBalance": -1}"#).expect("input");
/// assert!(OpenCashSession::try_from_input(&rejected).is_err());
///
/// let accepted: OpenCashSessionInput =
///     serde_json::from_str(r#"{"openingBalance": 0}"#).expect("input");
/// assert!(OpenCashSession::try_from_input(&accepted).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCashSession {
    opening_balance: Money,
    note: Option<String>,
}

impl OpenCashSession {
    /// Validate the form: the balance is required, has at most two
    /// decimals and is not negative.
    pub fn try_from_input(input: &OpenCashSessionInput) -> Result<Self, FormError> {
        Ok(Self {
            opening_balance: parse_non_negative_money(
                "openingBalance",
                input.opening_balance.as_ref(),
            )?,
            note: optional_text(input.note.as_deref()),
        })
    }

    /// Validated opening float.
    pub fn opening_balance(&self) -> Money {
        self.opening_balance
    }

    /// The single POST that opens the session.
    pub fn to_command(&self) -> BackendCommand {
        let mut body = Map::new();
        body.insert("openingBalance".into(), self.opening_balance.to_json());
        if let Some(note) = &self.note {
            body.insert("note".into(), Value::String(note.clone()));
        }
        BackendCommand::post(CASH_SESSIONS.path(), Value::Object(body))
    }
}

/// Raw "close cash session" form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseCashSessionInput {
    /// Cash counted in the till at closing.
    #[serde(default)]
    pub counted_cash: Option<Amount>,
    /// Optional note, e.g. explaining a difference.
    #[serde(default)]
    pub note: Option<String>,
}

/// Validated request to close a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseCashSession {
    session_id: RecordId,
    counted_cash: Money,
    note: Option<String>,
}

impl CloseCashSession {
    /// Validate the form for session `session_id`.
    pub fn try_from_input(
        session_id: RecordId,
        input: &CloseCashSessionInput,
    ) -> Result<Self, FormError> {
        Ok(Self {
            session_id,
            counted_cash: parse_non_negative_money("countedCash", input.counted_cash.as_ref())?,
            note: optional_text(input.note.as_deref()),
        })
    }

    /// Session being closed.
    pub fn session_id(&self) -> &RecordId {
        &self.session_id
    }

    /// The POST that closes the session.
    pub fn to_command(&self) -> BackendCommand {
        let mut body = Map::new();
        body.insert("countedCash".into(), self.counted_cash.to_json());
        if let Some(note) = &self.note {
            body.insert("note".into(), Value::String(note.clone()));
        }
        BackendCommand::post(
            CASH_SESSIONS.member_action_path(self.session_id.as_str(), "close"),
            Value::Object(body),
        )
    }
}
