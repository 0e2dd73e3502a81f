//! Role resolution from directory group membership.

use errors::SecurityError;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::{debug, trace};

use crate::entry::DirectoryEntry;
use crate::mapping::RoleMapping;

pub const DEFAULT_ATTRIBUTE_NAME: &str = "ismemberof";

/// Matches `CN=<group>,OU=...` case-insensitively.
pub const DEFAULT_GROUP_NAME_PATTERN: &str = r"(?i)^CN=(?P<group>[^,]+),ou.*$";

const GROUP_CAPTURE: &str = "group";

static DEFAULT_GROUP_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_GROUP_NAME_PATTERN).expect("default group name pattern compiles")
});

/// Deduplicated role identifiers resolved for one principal.
pub type ResolvedRoles = BTreeSet<String>;

/// Resolves a principal's roles from their directory entry.
///
/// Implementations are pure: the same entry always yields the same roles,
/// and they are shared across concurrent requests without locking.
pub trait RoleFetcher: Send + Sync {
    fn fetch_roles(&self, entry: &dyn DirectoryEntry) -> ResolvedRoles;
}

/// Maps the values of a membership attribute (`ismemberof` by default) to
/// roles.
///
/// Each value is reduced to a canonical group name with the `group` capture
/// of the group-name pattern. Values the pattern does not match are used
/// verbatim as the group name, so the mapping may key on raw membership
/// strings. Names absent from the mapping grant nothing.
#[derive(Debug, Clone)]
pub struct LdapRoleFetcher {
    mapping: RoleMapping,
    attribute_name: String,
    group_name_regex: Regex
}

impl LdapRoleFetcher {
    /// Builds a fetcher reading `ismemberof` with the default pattern.
    pub fn new(mapping: RoleMapping) -> Self {
        Self {
            mapping,
            attribute_name: DEFAULT_ATTRIBUTE_NAME.to_string(),
            group_name_regex: DEFAULT_GROUP_NAME_REGEX.clone()
        }
    }

    /// Builds a fetcher with a custom attribute and group-name pattern.
    ///
    /// The pattern must compile and define a capture group named `group`.
    pub fn with_options(
        mapping: RoleMapping,
        attribute_name: impl Into<String>,
        group_name_pattern: &str
    ) -> Result<Self, SecurityError> {
        Ok(Self {
            mapping,
            attribute_name: attribute_name.into(),
            group_name_regex: compile_group_name_pattern(group_name_pattern)?
        })
    }

    pub fn mapping(&self) -> &RoleMapping {
        &self.mapping
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// Canonical group name of a raw membership value.
    pub fn group_name<'a>(&self, raw: &'a str) -> &'a str {
        self.group_name_regex
            .captures(raw)
            .and_then(|captures| captures.name(GROUP_CAPTURE))
            .map_or(raw, |group| group.as_str())
    }
}

impl RoleFetcher for LdapRoleFetcher {
    fn fetch_roles(&self, entry: &dyn DirectoryEntry) -> ResolvedRoles {
        if !entry.has_attribute(&self.attribute_name) {
            trace!(dn = entry.dn(), attribute = %self.attribute_name, "No membership attribute");
            return ResolvedRoles::new();
        }

        let values = entry.attribute(&self.attribute_name).unwrap_or_default();
        let roles: ResolvedRoles = values
            .iter()
            .filter_map(|raw| {
                let group = self.group_name(raw);
                let role = self.mapping.get(group);
                if role.is_none() {
                    trace!(group, "No role mapped for group");
                }
                role.map(str::to_string)
            })
            .collect();

        debug!(
            dn = entry.dn(),
            memberships = values.len(),
            roles = roles.len(),
            "Resolved directory roles"
        );

        roles
    }
}

/// Compiles a group-name pattern, checking for the `group` capture.
pub fn compile_group_name_pattern(pattern: &str) -> Result<Regex, SecurityError> {
    let regex = Regex::new(pattern).map_err(|e| SecurityError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string()
    })?;

    if !regex
        .capture_names()
        .flatten()
        .any(|name| name == GROUP_CAPTURE)
    {
        return Err(SecurityError::MissingGroupCapture {
            pattern: pattern.to_string()
        });
    }

    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LdapEntry;

    fn fetcher() -> LdapRoleFetcher {
        LdapRoleFetcher::new(RoleMapping::new([
            ("RND-Researchers", "ROLE_CHERCHEUR"),
            ("RND-Testers", "ROLE_TESTEUR")
        ]))
    }

    #[test]
    fn test_group_name_extraction() {
        let fetcher = fetcher();

        assert_eq!(
            fetcher.group_name("CN=RND-Researchers,OU=Groups,DC=x,DC=y"),
            "RND-Researchers"
        );
        assert_eq!(fetcher.group_name("cn=RND-Testers,ou=groups"), "RND-Testers");
    }

    #[test]
    fn test_group_name_falls_back_to_raw_value() {
        let fetcher = fetcher();

        assert_eq!(fetcher.group_name("plain-string-group"), "plain-string-group");
        // No OU component after the CN.
        assert_eq!(
            fetcher.group_name("CN=RND-Researchers,DC=x"),
            "CN=RND-Researchers,DC=x"
        );
    }

    #[test]
    fn test_defaults() {
        let fetcher = fetcher();
        assert_eq!(fetcher.attribute_name(), "ismemberof");
        assert_eq!(fetcher.mapping().len(), 2);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err =
            LdapRoleFetcher::with_options(RoleMapping::default(), "memberof", "^CN=(?P<group>")
                .unwrap_err();
        assert!(matches!(err, SecurityError::InvalidPattern { .. }));
    }

    #[test]
    fn test_pattern_without_group_capture_is_rejected() {
        let err = LdapRoleFetcher::with_options(RoleMapping::default(), "memberof", "^CN=([^,]+)")
            .unwrap_err();
        assert_eq!(
            err,
            SecurityError::MissingGroupCapture {
                pattern: "^CN=([^,]+)".to_string()
            }
        );
    }

    #[test]
    fn test_custom_attribute_and_pattern() {
        let fetcher = LdapRoleFetcher::with_options(
            RoleMapping::new([("testers", "ROLE_TESTEUR")]),
            "memberOf",
            r"^cn=(?P<group>[a-z]+),.*$"
        )
        .unwrap();

        let entry = LdapEntry::new("uid=dave").with_attribute(
            "memberof",
            ["cn=testers,ou=groups", "CN=testers,OU=groups"]
        );

        // The custom pattern is case-sensitive, so the second value falls
        // back to its raw form and is unmapped.
        assert_eq!(
            fetcher.fetch_roles(&entry),
            ResolvedRoles::from(["ROLE_TESTEUR".to_string()])
        );
    }
}
