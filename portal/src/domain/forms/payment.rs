//! Recording a customer's payment against a sale.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{FormError, FormErrorCode, optional_text, parse_money};
use crate::domain::ports::BackendCommand;
use crate::domain::records::{PaymentMethod, RecordId};
use crate::domain::resources::PAYMENTS;
use crate::domain::{Amount, Money};

/// Raw "record payment" form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentInput {
    /// Amount received.
    #[serde(default)]
    pub amount: Option<Amount>,
    /// One of `cash`, `card`, `transfer`, `mobile`.
    #[serde(default)]
    pub method: Option<String>,
    /// Terminal or transfer reference.
    #[serde(default)]
    pub reference: Option<String>,
}

/// Validated payment for one sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPayment {
    sale_id: RecordId,
    amount: Money,
    method: PaymentMethod,
    reference: Option<String>,
}

impl RecordPayment {
    /// Validate the form for sale `sale_id`.
    pub fn try_from_input(sale_id: RecordId, input: &RecordPaymentInput) -> Result<Self, FormError> {
        let amount = parse_money("amount", input.amount.as_ref())?;
        if !amount.is_positive() {
            return Err(FormError::new(
                "amount",
                FormErrorCode::OutOfRange,
                "amount must be greater than zero",
            ));
        }
        let raw_method = input
            .method
            .as_deref()
            .filter(|method| !method.trim().is_empty())
            .ok_or_else(|| FormError::required("method"))?;
        let method = PaymentMethod::parse(raw_method).ok_or_else(|| {
            FormError::new(
                "method",
                FormErrorCode::UnknownValue,
                "method must be one of cash, card, transfer, mobile",
            )
        })?;
        Ok(Self {
            sale_id,
            amount,
            method,
            reference: optional_text(input.reference.as_deref()),
        })
    }

    /// Sale being paid.
    pub fn sale_id(&self) -> &RecordId {
        &self.sale_id
    }

    /// The POST that records the payment.
    pub fn to_command(&self) -> BackendCommand {
        let mut body = Map::new();
        body.insert("saleId".into(), Value::String(self.sale_id.to_string()));
        body.insert("amount".into(), self.amount.to_json());
        body.insert("method".into(), Value::String(self.method.as_str().to_owned()));
        if let Some(reference) = &self.reference {
            body.insert("reference".into(), Value::String(reference.clone()));
        }
        BackendCommand::post(PAYMENTS.path(), Value::Object(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn sale() -> RecordId {
        RecordId::new("5").expect("id")
    }

    #[rstest]
    #[case(json!({"amount": 0, "method": "cash"}), "amount", FormErrorCode::OutOfRange)]
    #[case(json!({"amount": -3, "method": "cash"}), "amount", FormErrorCode::OutOfRange)]
    #[case(json!({"method": "cash"}), "amount", FormErrorCode::Required)]
    #[case(json!({"amount": 10}), "method", FormErrorCode::Required)]
    #[case(json!({"amount": 10, "method": "cheque"}), "method", FormErrorCode::UnknownValue)]
    fn rejected_payments(
        #[case] raw: Value,
        #[case] field: &str,
        #[case] code: FormErrorCode,
    ) {
        let input: RecordPaymentInput = serde_json::from_value(raw).expect("input");
        let err = RecordPayment::try_from_input(sale(), &input).expect_err("rejected");
        assert_eq!((err.field(), err.code()), (field, code));
    }

    #[rstest]
    fn accepted_payment_posts_to_payments() {
        let input: RecordPaymentInput =
            serde_json::from_value(json!({"amount": "1000", "method": "Card", "reference": "T-1"}))
                .expect("input");
        let command = RecordPayment::try_from_input(sale(), &input)
            .expect("accepted")
            .to_command();
        assert_eq!(command.path, "payments");
        assert_eq!(
            command.body,
            json!({"saleId": "5", "amount": 1000, "method": "card", "reference": "T-1"})
        );
    }
}
