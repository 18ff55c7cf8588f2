//! Audit log entries and the action vocabulary used to filter them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{RecordId, search_fields};
use crate::domain::Searchable;

/// One audit log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// Primary key.
    pub id: RecordId,
    /// Action code, e.g. `sale.cancel`.
    #[serde(default)]
    pub action: Option<String>,
    /// Entity type affected.
    #[serde(default)]
    pub entity: Option<String>,
    /// Id of the affected entity.
    #[serde(default)]
    pub entity_id: Option<RecordId>,
    /// Who performed the action.
    #[serde(default, alias = "userEmail")]
    pub actor_email: Option<String>,
    /// When it happened.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Free-form payload attached by the backend.
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl Searchable for AuditLogEntry {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.action.clone(),
            self.entity.clone(),
            self.entity_id.as_ref().map(ToString::to_string),
            self.actor_email.clone(),
        ])
    }
}

/// Entry of the audit action vocabulary.
///
/// The vocabulary endpoint returns either bare strings or objects with a
/// `code` (or `action`) and optional `label`; both forms decode here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditAction {
    /// Action code used as a filter value.
    pub code: String,
    /// Human label, falling back to the code.
    pub label: String,
}

impl<'de> Deserialize<'de> for AuditAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(String),
            Entry {
                #[serde(alias = "action")]
                code: String,
                #[serde(default)]
                label: Option<String>,
            },
        }

        let (code, label) = match Raw::deserialize(deserializer)? {
            Raw::Code(code) => (code, None),
            Raw::Entry { code, label } => (code, label),
        };
        let label = label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| code.clone());
        Ok(Self { code, label })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("sale.cancel"), "sale.cancel", "sale.cancel")]
    #[case(json!({"code": "user.create", "label": "User created"}), "user.create", "User created")]
    #[case(json!({"action": "cash.open"}), "cash.open", "cash.open")]
    fn vocabulary_accepts_both_shapes(
        #[case] raw: Value,
        #[case] code: &str,
        #[case] label: &str,
    ) {
        let action: AuditAction = serde_json::from_value(raw).expect("action");
        assert_eq!(action.code, code);
        assert_eq!(action.label, label);
    }

    #[rstest]
    fn user_email_alias_populates_actor() {
        let entry: AuditLogEntry =
            serde_json::from_value(json!({"id": 1, "userEmail": "ana@example.com"}))
                .expect("entry");
        assert_eq!(entry.actor_email.as_deref(), Some("ana@example.com"));
    }
}
