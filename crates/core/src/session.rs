//! The identity a service call runs as.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DocId;

/// Authenticated caller, passed explicitly into every service operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    pub user_id: DocId,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: impl Into<DocId>, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            display_name: None,
            role,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Display name, falling back to the email address.
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }

    /// Fail with `Forbidden` unless the caller is an admin.
    pub fn require_admin(&self, action: &str) -> Result<(), CoreError> {
        self.require_role(&[Role::Admin], action)
    }

    /// Fail with `Forbidden` unless the caller holds one of `roles`.
    pub fn require_role(&self, roles: &[Role], action: &str) -> Result<(), CoreError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Role '{}' may not {action}",
                self.role
            )))
        }
    }

    /// Fail with `Forbidden` unless the caller owns `owner_id` or is an admin.
    pub fn require_owner_or_admin(&self, owner_id: &str, action: &str) -> Result<(), CoreError> {
        if self.is_admin() || self.user_id == owner_id {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Only the owner or an admin may {action}"
            )))
        }
    }
}
