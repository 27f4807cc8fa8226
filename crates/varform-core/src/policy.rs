//! Override order and scope handling policies.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::{Error, OwnerId};

/// Something that takes part in set override ordering.
pub trait Overridable {
    fn owner_id(&self) -> &OwnerId;
    fn document_id(&self) -> &str;
}

/// Order in which variable sets are applied when they write into the same
/// bucket. Later sets overwrite earlier ones.
///
/// Both orders compare raw ids as plain strings (`LibraryVariableSets-10`
/// sorts before `LibraryVariableSets-2`) and break ties on the document id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverrideOrder {
    /// Sort by owner id, so `Projects-*` sets apply after `LibraryVariableSets-*`.
    #[default]
    OwnerId,
    /// Sort by the variable-set document id.
    DocumentId,
}

impl OverrideOrder {
    pub fn compare<T: Overridable>(&self, a: &T, b: &T) -> Ordering {
        let primary = match self {
            OverrideOrder::OwnerId => a.owner_id().cmp(b.owner_id()),
            OverrideOrder::DocumentId => a.document_id().cmp(b.document_id()),
        };
        primary.then_with(|| a.document_id().cmp(b.document_id()))
    }

    /// Sort into application order, first applied first.
    pub fn sort<T: Overridable>(&self, items: &mut [T]) {
        items.sort_by(|a, b| self.compare(a, b));
    }
}

impl FromStr for OverrideOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner-id" => Ok(OverrideOrder::OwnerId),
            "document-id" => Ok(OverrideOrder::DocumentId),
            other => Err(Error::InvalidInput(format!(
                "unknown override order '{}' (expected owner-id or document-id)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for OverrideOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverrideOrder::OwnerId => write!(f, "owner-id"),
            OverrideOrder::DocumentId => write!(f, "document-id"),
        }
    }
}

/// What to do with a variable scoped to an environment outside the
/// two-environment model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopePolicy {
    /// Abort the run.
    #[default]
    Strict,
    /// Log a warning and drop the variable.
    Lenient,
}

impl FromStr for ScopePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(ScopePolicy::Strict),
            "lenient" => Ok(ScopePolicy::Lenient),
            other => Err(Error::InvalidInput(format!(
                "unknown scope policy '{}' (expected strict or lenient)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ScopePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopePolicy::Strict => write!(f, "strict"),
            ScopePolicy::Lenient => write!(f, "lenient"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Entry {
        owner: OwnerId,
        document: String,
    }

    impl Overridable for Entry {
        fn owner_id(&self) -> &OwnerId {
            &self.owner
        }

        fn document_id(&self) -> &str {
            &self.document
        }
    }

    fn entry(owner: &str, document: &str) -> Entry {
        Entry {
            owner: OwnerId::from(owner),
            document: document.to_string(),
        }
    }

    fn documents(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.document.as_str()).collect()
    }

    #[test]
    fn test_owner_id_order() {
        let mut entries = vec![
            entry("Projects-42", "a-doc"),
            entry("LibraryVariableSets-1", "z-doc"),
        ];
        OverrideOrder::OwnerId.sort(&mut entries);
        assert_eq!(documents(&entries), vec!["z-doc", "a-doc"]);
    }

    #[test]
    fn test_document_id_order() {
        let mut entries = vec![
            entry("Projects-42", "a-doc"),
            entry("LibraryVariableSets-1", "z-doc"),
        ];
        OverrideOrder::DocumentId.sort(&mut entries);
        assert_eq!(documents(&entries), vec!["a-doc", "z-doc"]);
    }

    #[test]
    fn test_ties_break_on_document_id() {
        let mut entries = vec![
            entry("Projects-42", "variableset-2"),
            entry("Projects-42", "variableset-1"),
        ];
        OverrideOrder::OwnerId.sort(&mut entries);
        assert_eq!(documents(&entries), vec!["variableset-1", "variableset-2"]);
    }

    #[test]
    fn test_parse_round_trip() {
        for order in [OverrideOrder::OwnerId, OverrideOrder::DocumentId] {
            assert_eq!(order.to_string().parse::<OverrideOrder>().unwrap(), order);
        }
        for policy in [ScopePolicy::Strict, ScopePolicy::Lenient] {
            assert_eq!(policy.to_string().parse::<ScopePolicy>().unwrap(), policy);
        }
        assert!("alphabetical".parse::<OverrideOrder>().is_err());
        assert!("loose".parse::<ScopePolicy>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(OverrideOrder::default(), OverrideOrder::OwnerId);
        assert_eq!(ScopePolicy::default(), ScopePolicy::Strict);
    }
}
