//! Client-side pre-validation of staff forms.
//!
//! Each form has a raw `*Input` type decoded from the request body and a
//! validated type built from it. Only validated forms can produce a
//! [`BackendCommand`](crate::domain::ports::BackendCommand), so a rejected
//! form never reaches the backend. The backend stays the final authority.

mod cash_session;
mod decision;
mod message;
mod payment;
mod sale_action;
mod stock_request;
mod upload;
mod user_account;

use serde_json::{Value, json};
use thiserror::Error;

use super::{Amount, Error, Money, MoneyParseError};

pub use cash_session::{
    CloseCashSession, CloseCashSessionInput, OpenCashSession, OpenCashSessionInput,
};
pub use decision::{AdjustmentDecision, AdjustmentDecisionInput, Verdict};
pub use message::{MAX_MESSAGE_LEN, NewThread, NewThreadInput, Reply, ReplyInput};
pub use payment::{RecordPayment, RecordPaymentInput};
pub use sale_action::{SaleActionInput, SaleActionRequest};
pub use stock_request::{NewStockRequest, NewStockRequestInput};
pub use upload::UploadBatch;
pub use user_account::{
    MIN_PASSWORD_LEN, NewStaffUser, NewStaffUserInput, UserStatusChange, UserStatusInput,
};

/// Machine-readable reason a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormErrorCode {
    /// Missing or blank.
    Required,
    /// Present but not parseable.
    InvalidFormat,
    /// Parsed but outside the accepted range.
    OutOfRange,
    /// Longer than allowed.
    TooLong,
    /// Not one of the accepted values.
    UnknownValue,
}

impl FormErrorCode {
    /// Wire value used in error details.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::InvalidFormat => "invalid_format",
            Self::OutOfRange => "out_of_range",
            Self::TooLong => "too_long",
            Self::UnknownValue => "unknown_value",
        }
    }
}

/// A form field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FormError {
    field: &'static str,
    code: FormErrorCode,
    message: String,
}

impl FormError {
    /// Rejection of `field` with a display message.
    pub fn new(field: &'static str, code: FormErrorCode, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }

    /// `field` is missing or blank.
    pub fn required(field: &'static str) -> Self {
        Self::new(field, FormErrorCode::Required, format!("{field} is required"))
    }

    /// Rejected field name, as sent by the browser.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Rejection reason.
    pub fn code(&self) -> FormErrorCode {
        self.code
    }

    /// Display message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl From<FormError> for Error {
    fn from(error: FormError) -> Self {
        Error::invalid_request(error.message.clone()).with_details(json!({
            "field": error.field,
            "code": error.code.as_str(),
        }))
    }
}

/// Trimmed, non-blank text or a `required` error.
pub(crate) fn required_text(field: &'static str, raw: Option<&str>) -> Result<String, FormError> {
    optional_text(raw).ok_or_else(|| FormError::required(field))
}

/// Trimmed text, `None` when missing or blank.
pub(crate) fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Parse a money field with at most two decimals.
pub(crate) fn parse_money(field: &'static str, raw: Option<&Amount>) -> Result<Money, FormError> {
    let raw = raw.ok_or_else(|| FormError::required(field))?;
    Money::parse(raw.as_str()).map_err(|err| match err {
        MoneyParseError::Empty => FormError::required(field),
        other => FormError::new(
            field,
            FormErrorCode::InvalidFormat,
            format!("{field}: {other}"),
        ),
    })
}

/// Parse a money field that must be zero or more.
pub(crate) fn parse_non_negative_money(
    field: &'static str,
    raw: Option<&Amount>,
) -> Result<Money, FormError> {
    let amount = parse_money(field, raw)?;
    if amount.is_negative() {
        return Err(FormError::new(
            field,
            FormErrorCode::OutOfRange,
            format!("{field} must be zero or more"),
        ));
    }
    Ok(amount)
}

/// Parse a strictly positive whole number sent as a JSON number or string.
pub(crate) fn parse_positive_integer(
    field: &'static str,
    raw: Option<&Value>,
) -> Result<u32, FormError> {
    let invalid = || {
        FormError::new(
            field,
            FormErrorCode::InvalidFormat,
            format!("{field} must be a whole number"),
        )
    };
    let value: i64 = match raw {
        None | Some(Value::Null) => return Err(FormError::required(field)),
        Some(Value::Number(number)) => number.as_i64().ok_or_else(invalid)?,
        Some(Value::String(text)) if text.trim().is_empty() => {
            return Err(FormError::required(field));
        }
        Some(Value::String(text)) => text.trim().parse().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };
    u32::try_from(value)
        .ok()
        .filter(|quantity| *quantity > 0)
        .ok_or_else(|| {
            FormError::new(
                field,
                FormErrorCode::OutOfRange,
                format!("{field} must be greater than zero"),
            )
        })
}
