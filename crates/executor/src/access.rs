//! Caller authorization.
//!
//! The host decides who the caller is; the executor only asks whether the
//! caller holds the admin role or belongs to the access group.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{Error, Result};

/// Group whose members may use every command.
pub const ACCESS_GROUP: &str = "docbridge";

/// The host's view of the current caller.
pub trait Subject {
    /// Caller name, for messages
    fn name(&self) -> &str;
    /// Whether the caller holds the admin role
    fn has_admin_role(&self) -> bool;
    /// Whether the caller belongs to `group`
    fn has_group(&self, group: &str) -> bool;
}

/// A caller with a fixed name, role and group list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Caller name
    pub name: String,
    /// Holds the admin role
    #[serde(default)]
    pub admin: bool,
    /// Group memberships
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Principal {
    /// A caller with no role and no groups
    pub fn new(name: impl Into<String>) -> Self {
        Principal {
            name: name.into(),
            admin: false,
            groups: Vec::new(),
        }
    }

    /// An admin caller
    pub fn admin(name: impl Into<String>) -> Self {
        Principal {
            admin: true,
            ..Principal::new(name)
        }
    }

    /// Add a group membership
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }
}

impl Subject for Principal {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_admin_role(&self) -> bool {
        self.admin
    }

    fn has_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

/// Fail with `PermissionDenied` unless `subject` is an admin or in `group`.
pub fn require_access(subject: &dyn Subject, group: &str, command: &str) -> Result<()> {
    if subject.has_admin_role() || subject.has_group(group) {
        return Ok(());
    }
    let message = format!(
        "Permission denied, user '{}' must be an admin or be in group '{}'",
        subject.name(),
        group
    );
    error!(target: "docbridge::executor", command, user = %subject.name(), "{}", message);
    Err(Error::permission_denied(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docbridge_core::ErrorCode;

    #[test]
    fn admin_and_group_members_allowed() {
        require_access(&Principal::admin("root"), ACCESS_GROUP, "Get").unwrap();
        require_access(
            &Principal::new("alice").with_group(ACCESS_GROUP),
            ACCESS_GROUP,
            "Get",
        )
        .unwrap();
    }

    #[test]
    fn others_denied() {
        let err = require_access(
            &Principal::new("guest").with_group("users"),
            ACCESS_GROUP,
            "Get",
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PermissionDenied);
        assert!(err.message().contains("'guest'"));
        assert!(err.message().contains("'docbridge'"));
    }
}
