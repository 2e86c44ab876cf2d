//! Fallback table: which backups to try after a model fails.
//!
//! The table is one hop deep. A backup's own backups are not followed, so a
//! call tries at most `1 + backups(requested).len()` models.

use std::collections::HashMap;

use serde::Deserialize;

use super::config::{
    INSTRUCT_BACKUP_MODEL, INSTRUCT_MODEL, REASONING_BACKUP_MODEL, REASONING_MODEL,
};

/// Mapping from model id to its ordered backups.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FallbackTable {
    backups: HashMap<String, Vec<String>>,
}

impl Default for FallbackTable {
    fn default() -> Self {
        Self::empty()
            .with_backups(INSTRUCT_MODEL, [INSTRUCT_BACKUP_MODEL])
            .with_backups(REASONING_MODEL, [REASONING_BACKUP_MODEL])
    }
}

impl FallbackTable {
    /// A table with no backups at all; every call tries exactly one model.
    pub fn empty() -> Self {
        Self {
            backups: HashMap::new(),
        }
    }

    /// Replace the backups declared for `model`.
    pub fn with_backups<I, S>(mut self, model: impl Into<String>, backups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.backups
            .insert(model.into(), backups.into_iter().map(Into::into).collect());
        self
    }

    /// Backups declared for `model`, in order. Empty for unknown models.
    pub fn backups_for(&self, model: &str) -> &[String] {
        self.backups.get(model).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ordered candidate list: the requested model, then its backups.
    ///
    /// Duplicates are dropped so a misconfigured table never retries the
    /// same model twice.
    pub fn candidates(&self, requested: &str) -> Vec<String> {
        let mut list = vec![requested.to_string()];
        for backup in self.backups_for(requested) {
            if !list.iter().any(|m| m == backup) {
                list.push(backup.clone());
            }
        }
        list
    }

    /// Every model id mentioned by the table, sorted.
    pub fn known_models(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .backups
            .iter()
            .flat_map(|(k, v)| std::iter::once(k).chain(v.iter()))
            .cloned()
            .collect();
        all.sort();
        all.dedup();
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_gets_backup() {
        let table = FallbackTable::default();
        assert_eq!(
            table.candidates(INSTRUCT_MODEL),
            vec![INSTRUCT_MODEL.to_string(), INSTRUCT_BACKUP_MODEL.to_string()]
        );
    }

    #[test]
    fn test_reasoning_gets_backup() {
        let table = FallbackTable::default();
        assert_eq!(
            table.candidates(REASONING_MODEL),
            vec![REASONING_MODEL.to_string(), REASONING_BACKUP_MODEL.to_string()]
        );
    }

    #[test]
    fn test_unknown_model_has_single_candidate() {
        let table = FallbackTable::default();
        assert_eq!(table.candidates("some/other-model"), vec!["some/other-model".to_string()]);
    }

    #[test]
    fn test_backups_are_one_hop() {
        let table = FallbackTable::empty()
            .with_backups("a", ["b"])
            .with_backups("b", ["c"]);
        assert_eq!(table.candidates("a"), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_duplicates_dropped() {
        let table = FallbackTable::empty().with_backups("a", ["a", "b", "b"]);
        assert_eq!(table.candidates("a"), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_known_models() {
        let table = FallbackTable::empty().with_backups("x", ["y"]).with_backups("y", ["z"]);
        assert_eq!(table.known_models(), vec!["x", "y", "z"]);
    }
}
