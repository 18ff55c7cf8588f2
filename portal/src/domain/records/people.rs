//! Staff accounts and customers.

use serde::{Deserialize, Serialize};

use super::{RecordId, search_fields};
use crate::domain::Searchable;

/// Staff account managed from the admin screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUser {
    /// Primary key.
    pub id: RecordId,
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Role string, as sent.
    #[serde(default)]
    pub role: Option<String>,
    /// Assigned store location.
    #[serde(default)]
    pub location_id: Option<RecordId>,
    /// Whether the account may sign in.
    #[serde(default)]
    pub active: Option<bool>,
}

impl Searchable for StaffUser {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.email.clone(),
            self.name.clone(),
            self.role.clone(),
        ])
    }
}

/// Customer known to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Primary key.
    pub id: RecordId,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
}

impl Searchable for Customer {
    fn search_fields(&self) -> Vec<String> {
        search_fields([
            Some(self.id.to_string()),
            self.name.clone(),
            self.phone.clone(),
            self.email.clone(),
        ])
    }
}
