//! Staff account administration.

use serde::Deserialize;
use serde_json::{Map, Value, json};
use zeroize::Zeroizing;

use super::{FormError, FormErrorCode, optional_text, required_text};
use crate::domain::Role;
use crate::domain::ports::BackendCommand;
use crate::domain::records::RecordId;
use crate::domain::resources::USERS;

/// Shortest password the portal will forward.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Raw "create user" form.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaffUserInput {
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,
    /// Initial password.
    #[serde(default)]
    pub password: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Role string.
    #[serde(default)]
    pub role: Option<String>,
    /// Store location for store-bound roles.
    #[serde(default)]
    pub location_id: Option<String>,
}

impl std::fmt::Debug for NewStaffUserInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewStaffUserInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("location_id", &self.location_id)
            .finish()
    }
}

/// Validated new staff account.
#[derive(Clone, PartialEq, Eq)]
pub struct NewStaffUser {
    email: String,
    password: Zeroizing<String>,
    name: Option<String>,
    role: Role,
    location_id: Option<String>,
}

impl std::fmt::Debug for NewStaffUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewStaffUser")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("location_id", &self.location_id)
            .finish_non_exhaustive()
    }
}

impl NewStaffUser {
    /// Validate the form.
    ///
    /// Admins and owners are not tied to a store; every other role needs a
    /// location.
    pub fn try_from_input(input: &NewStaffUserInput) -> Result<Self, FormError> {
        let email = required_text("email", input.email.as_deref())?;
        if !email.contains('@') {
            return Err(FormError::new(
                "email",
                FormErrorCode::InvalidFormat,
                "email must contain @",
            ));
        }
        let password = input
            .password
            .as_deref()
            .filter(|password| !password.is_empty())
            .ok_or_else(|| FormError::required("password"))?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::new(
                "password",
                FormErrorCode::OutOfRange,
                format!("password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        let raw_role = required_text("role", input.role.as_deref())?;
        let role = Role::parse(&raw_role).ok_or_else(|| {
            FormError::new(
                "role",
                FormErrorCode::UnknownValue,
                format!("unknown role: {raw_role}"),
            )
        })?;
        let location_id = optional_text(input.location_id.as_deref());
        if location_id.is_none() && !matches!(role, Role::Admin | Role::Owner) {
            return Err(FormError::required("locationId"));
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            name: optional_text(input.name.as_deref()),
            role,
            location_id,
        })
    }

    /// Role being granted.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The POST creating the account.
    pub fn to_command(&self) -> BackendCommand {
        let mut body = Map::new();
        body.insert("email".into(), Value::String(self.email.clone()));
        body.insert("password".into(), Value::String(self.password.as_str().to_owned()));
        body.insert("role".into(), Value::String(self.role.as_str().to_owned()));
        if let Some(name) = &self.name {
            body.insert("name".into(), Value::String(name.clone()));
        }
        if let Some(location_id) = &self.location_id {
            body.insert("locationId".into(), Value::String(location_id.clone()));
        }
        BackendCommand::post(USERS.path(), Value::Object(body))
    }
}

/// Raw activate/deactivate form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserStatusInput {
    /// Desired state.
    #[serde(default)]
    pub active: Option<bool>,
}

/// Validated activation change for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStatusChange {
    user_id: RecordId,
    active: bool,
}

impl UserStatusChange {
    /// Validate the form for account `user_id`.
    pub fn try_from_input(user_id: RecordId, input: &UserStatusInput) -> Result<Self, FormError> {
        let active = input.active.ok_or_else(|| FormError::required("active"))?;
        Ok(Self { user_id, active })
    }

    /// Account affected.
    pub fn user_id(&self) -> &RecordId {
        &self.user_id
    }

    /// Whether the account is being enabled.
    pub fn active(&self) -> bool {
        self.active
    }

    /// The PATCH applying the change.
    pub fn to_command(&self) -> BackendCommand {
        BackendCommand::patch(
            USERS.member_path(self.user_id.as_str()),
            json!({ "active": self.active }),
        )
    }
}
