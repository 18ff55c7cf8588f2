//! Manager decisions on stock adjustment requests.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{FormError, FormErrorCode, optional_text};
use crate::domain::ports::BackendCommand;
use crate::domain::records::RecordId;
use crate::domain::resources::ADJUSTMENT_REQUESTS;

/// Approve or reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Apply the adjustment.
    Approve,
    /// Discard it.
    Reject,
}

impl Verdict {
    /// Path segment of the backend action.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    /// Parse form input.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approve" | "approved" => Some(Self::Approve),
            "reject" | "rejected" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Raw decision form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentDecisionInput {
    /// `approve` or `reject`.
    #[serde(default)]
    pub decision: Option<String>,
    /// Why; required when rejecting.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Validated decision on one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentDecision {
    request_id: RecordId,
    verdict: Verdict,
    reason: Option<String>,
}

impl AdjustmentDecision {
    /// Validate the form for request `request_id`.
    pub fn try_from_input(
        request_id: RecordId,
        input: &AdjustmentDecisionInput,
    ) -> Result<Self, FormError> {
        let raw = optional_text(input.decision.as_deref())
            .ok_or_else(|| FormError::required("decision"))?;
        let verdict = Verdict::parse(&raw).ok_or_else(|| {
            FormError::new(
                "decision",
                FormErrorCode::UnknownValue,
                "decision must be approve or reject",
            )
        })?;
        let reason = optional_text(input.reason.as_deref());
        if verdict == Verdict::Reject && reason.is_none() {
            return Err(FormError::new(
                "reason",
                FormErrorCode::Required,
                "a reason is required to reject a request",
            ));
        }
        Ok(Self {
            request_id,
            verdict,
            reason,
        })
    }

    /// Request being decided.
    pub fn request_id(&self) -> &RecordId {
        &self.request_id
    }

    /// Decision taken.
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Success banner text for this decision.
    pub fn success_message(&self) -> String {
        match self.verdict {
            Verdict::Approve => format!("Request #{} approved", self.request_id),
            Verdict::Reject => format!("Request #{} rejected", self.request_id),
        }
    }

    /// The POST applying the decision.
    pub fn to_command(&self) -> BackendCommand {
        let mut body = Map::new();
        if let Some(reason) = &self.reason {
            body.insert("reason".into(), Value::String(reason.clone()));
        }
        BackendCommand::post(
            ADJUSTMENT_REQUESTS.member_action_path(self.request_id.as_str(), self.verdict.as_str()),
            Value::Object(body),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn decide(decision: Option<&str>, reason: Option<&str>) -> Result<AdjustmentDecision, FormError> {
        AdjustmentDecision::try_from_input(
            RecordId::new("7").expect("id"),
            &AdjustmentDecisionInput {
                decision: decision.map(str::to_owned),
                reason: reason.map(str::to_owned),
            },
        )
    }

    #[rstest]
    #[case(None, None, "decision", FormErrorCode::Required)]
    #[case(Some("maybe"), None, "decision", FormErrorCode::UnknownValue)]
    #[case(Some("reject"), Some("  "), "reason", FormErrorCode::Required)]
    fn rejected_decisions(
        #[case] decision: Option<&str>,
        #[case] reason: Option<&str>,
        #[case] field: &str,
        #[case] code: FormErrorCode,
    ) {
        let err = decide(decision, reason).expect_err("rejected");
        assert_eq!((err.field(), err.code()), (field, code));
    }

    #[rstest]
    fn approval_needs_no_reason() {
        let decision = decide(Some("Approve"), None).expect("accepted");
        let command = decision.to_command();
        assert_eq!(command.path, "inventory/adjustment-requests/7/approve");
        assert_eq!(command.body, json!({}));
        assert_eq!(decision.success_message(), "Request #7 approved");
    }

    #[rstest]
    fn rejection_carries_reason() {
        let command = decide(Some("reject"), Some("count was right"))
            .expect("accepted")
            .to_command();
        assert_eq!(command.path, "inventory/adjustment-requests/7/reject");
        assert_eq!(command.body, json!({"reason": "count was right"}));
    }
}
