//! Authenticated principals and role checks.

use rnd_core::Role;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::entry::DirectoryEntry;
use crate::fetcher::{ResolvedRoles, RoleFetcher};

/// The acting user of a request with the roles resolved for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub username: String,
    pub roles: ResolvedRoles
}

impl Principal {
    pub fn new(username: impl Into<String>, roles: ResolvedRoles) -> Self {
        Self {
            username: username.into(),
            roles
        }
    }

    /// Resolves the roles of a directory entry. The entry's DN becomes the
    /// username.
    pub fn from_entry(entry: &dyn DirectoryEntry, fetcher: &dyn RoleFetcher) -> Self {
        Self::new(entry.dn(), fetcher.fetch_roles(entry))
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Denial raised when a principal lacks the role an operation requires.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct AccessDenied {
    pub role: Role,
    pub message: String
}

/// Checks that `principal` holds `role`.
///
/// `message` explains the denial to the caller, e.g. "Only researchers can
/// create processes".
pub fn authorize(
    principal: &Principal,
    role: Role,
    message: impl Into<String>
) -> Result<(), AccessDenied> {
    if principal.has_role(role.as_str()) {
        return Ok(());
    }

    let message = message.into();
    warn!(
        username = %principal.username,
        required_role = %role,
        reason = %message,
        "Access denied"
    );
    Err(AccessDenied { role, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LdapEntry;
    use crate::fetcher::LdapRoleFetcher;
    use crate::mapping::RoleMapping;

    #[test]
    fn test_authorize_allows_holder() {
        let principal = Principal::new("alice", ResolvedRoles::from(["ROLE_CHERCHEUR".to_string()]));

        assert!(authorize(&principal, Role::Researcher, "researchers only").is_ok());
    }

    #[test]
    fn test_authorize_denies_with_message() {
        let principal = Principal::new("bob", ResolvedRoles::from(["ROLE_CHERCHEUR".to_string()]));

        let denied = authorize(&principal, Role::Tester, "Only testers can validate processes")
            .unwrap_err();
        assert_eq!(denied.role, Role::Tester);
        assert_eq!(denied.to_string(), "Only testers can validate processes");
    }

    #[test]
    fn test_principal_from_entry() {
        let fetcher = LdapRoleFetcher::new(RoleMapping::new([("RND-Testers", "ROLE_TESTEUR")]));
        let entry = LdapEntry::new("carol")
            .with_attribute("ismemberof", ["CN=RND-Testers,OU=Groups,DC=x,DC=y"]);

        let principal = Principal::from_entry(&entry, &fetcher);
        assert_eq!(principal.username, "carol");
        assert!(principal.has_role("ROLE_TESTEUR"));
        assert!(!principal.has_role("ROLE_CHERCHEUR"));
    }

    #[test]
    fn test_principal_serializes_roles_in_order() {
        let principal = Principal::new(
            "dave",
            ResolvedRoles::from(["ROLE_TESTEUR".to_string(), "ROLE_CHERCHEUR".to_string()])
        );
        let json = serde_json::to_value(&principal).unwrap();
        assert_eq!(json["roles"], serde_json::json!(["ROLE_CHERCHEUR", "ROLE_TESTEUR"]));
    }
}
