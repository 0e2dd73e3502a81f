//! Group name to role identifier mapping.

use errors::SecurityError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Immutable mapping from canonical group name to role identifier.
///
/// Lookups are exact and case-sensitive. Any string is accepted on either
/// side, including raw membership values that the group-name pattern does
/// not recognise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleMapping(HashMap<String, String>);

impl RoleMapping {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>
    {
        entries.into_iter().collect()
    }

    /// Parses the compact `group=ROLE;group2=ROLE2` form used by environment
    /// variables.
    ///
    /// The role is taken after the last `=`, so raw distinguished names can
    /// be used as keys (`CN=x,OU=y=ROLE`).
    pub fn parse(spec: &str) -> Result<Self, SecurityError> {
        spec.split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                entry
                    .rsplit_once('=')
                    .map(|(group, role)| (group.trim(), role.trim()))
                    .filter(|(group, role)| !group.is_empty() && !role.is_empty())
                    .ok_or_else(|| SecurityError::InvalidMappingEntry {
                        entry: entry.to_string()
                    })
            })
            .collect()
    }

    pub fn get(&self, group: &str) -> Option<&str> {
        self.0.get(group).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(group, role)| (group.as_str(), role.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for RoleMapping
where
    K: Into<String>,
    V: Into<String>
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(group, role)| (group.into(), role.into()))
                .collect()
        )
    }
}
