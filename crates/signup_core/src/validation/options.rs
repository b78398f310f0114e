//! Validator configuration.
//!
//! Alias tables are data, not branching: adding an input spelling for a field
//! means adding a string to `FieldAliases`.

use serde_json::{Map, Value};

pub const EMAIL_FIELD: &str = "email";
pub const HOUSE_NUMBER_FIELD: &str = "house_number";

const DEFAULT_EMAIL_ALIASES: &[&str] = &["email", "Email", "e-mail", "mail"];
// The original registration documents spelled this key `hause_number`.
const DEFAULT_HOUSE_NUMBER_ALIASES: &[&str] = &["house_number", "hause_number"];

/// Options for one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidatorOptions {
    pub aliases: FieldAliases,
    pub house_number_policy: HouseNumberPolicy,
}

/// How an absent `address.house_number` is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HouseNumberPolicy {
    /// Substitute `0`, which then fails the positivity constraint.
    #[default]
    DefaultZero,
    /// Report the field as missing.
    Required,
}

/// Ordered input spellings accepted for canonical field names.
///
/// Fields without an entry are looked up under their canonical name only.
/// An entry replaces the canonical lookup, so the canonical spelling must be
/// listed explicitly if it should stay accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAliases {
    entries: Vec<(String, Vec<String>)>,
}

impl FieldAliases {
    /// Creates an empty table: every field uses its canonical name.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets the accepted spellings for `canonical`, in priority order.
    pub fn with_aliases<I, S>(mut self, canonical: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let canonical = canonical.into();
        let aliases = aliases.into_iter().map(Into::into).collect::<Vec<_>>();
        match self.entries.iter_mut().find(|(name, _)| *name == canonical) {
            Some(entry) => entry.1 = aliases,
            None => self.entries.push((canonical, aliases)),
        }
        self
    }

    /// Returns the accepted spellings for `canonical`.
    pub fn aliases_for<'a>(&'a self, canonical: &'a str) -> Vec<&'a str> {
        match self.entries.iter().find(|(name, _)| name == canonical) {
            Some((_, aliases)) => aliases.iter().map(String::as_str).collect(),
            None => vec![canonical],
        }
    }

    /// Finds the value for `canonical` in `object`.
    ///
    /// The first alias present wins. Matching is exact: case and hyphenation
    /// are significant.
    pub fn lookup<'v>(&self, object: &'v Map<String, Value>, canonical: &str) -> Option<&'v Value> {
        self.aliases_for(canonical)
            .into_iter()
            .find_map(|alias| object.get(alias))
    }
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self::empty()
            .with_aliases(EMAIL_FIELD, DEFAULT_EMAIL_ALIASES.iter().copied())
            .with_aliases(
                HOUSE_NUMBER_FIELD,
                DEFAULT_HOUSE_NUMBER_ALIASES.iter().copied(),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldAliases, EMAIL_FIELD};
    use serde_json::json;

    #[test]
    fn first_present_alias_wins() {
        let value = json!({ "mail": "b@example.com", "Email": "a@example.com" });
        let object = value.as_object().unwrap();
        let found = FieldAliases::default().lookup(object, EMAIL_FIELD);
        assert_eq!(found, Some(&json!("a@example.com")));
    }

    #[test]
    fn alias_matching_is_exact() {
        let value = json!({ "EMAIL": "a@example.com", "E-mail": "b@example.com" });
        let object = value.as_object().unwrap();
        assert_eq!(FieldAliases::default().lookup(object, EMAIL_FIELD), None);
    }

    #[test]
    fn fields_without_entry_use_canonical_name() {
        let value = json!({ "name": "Anna" });
        let object = value.as_object().unwrap();
        assert_eq!(
            FieldAliases::empty().lookup(object, "name"),
            Some(&json!("Anna"))
        );
    }

    #[test]
    fn with_aliases_replaces_existing_entry() {
        let aliases = FieldAliases::default().with_aliases(EMAIL_FIELD, ["contact"]);
        assert_eq!(aliases.aliases_for(EMAIL_FIELD), vec!["contact"]);
    }
}
