//! Directory entries as seen by the role resolver.

use std::collections::HashMap;

/// Read-only attribute bag describing one principal.
///
/// Attribute names compare case-insensitively. An attribute is either
/// absent or present with zero or more values, and the two cases are
/// distinguishable: `attribute` returns `None` exactly when
/// `has_attribute` is false.
pub trait DirectoryEntry: Send + Sync {
    fn dn(&self) -> &str;

    fn has_attribute(&self, name: &str) -> bool;

    /// Values of the attribute in directory order.
    fn attribute(&self, name: &str) -> Option<&[String]>;
}

/// In-memory directory entry, materialised by the identity source before
/// role resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LdapEntry {
    dn: String,
    attributes: HashMap<String, Vec<String>>
}

impl LdapEntry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: HashMap::new()
        }
    }

    #[must_use]
    pub fn with_attribute<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>
    {
        self.insert_attribute(name, values);
        self
    }

    /// Replaces the attribute's values. An empty iterator leaves the
    /// attribute present with no values.
    pub fn insert_attribute<I, V>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>
    {
        self.attributes.insert(
            normalize(name),
            values.into_iter().map(Into::into).collect()
        );
    }

    /// Appends one value, creating the attribute when needed.
    pub fn push_value(&mut self, name: &str, value: impl Into<String>) {
        self.attributes
            .entry(normalize(name))
            .or_default()
            .push(value.into());
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}

impl DirectoryEntry for LdapEntry {
    fn dn(&self) -> &str {
        &self.dn
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(&normalize(name))
    }

    fn attribute(&self, name: &str) -> Option<&[String]> {
        self.attributes.get(&normalize(name)).map(Vec::as_slice)
    }
}

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}
