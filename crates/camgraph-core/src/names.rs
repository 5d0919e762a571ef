//! Case-insensitive resolution of configuration strings to typed values
//!
//! Tables are plain `static` slices, so they are initialized at compile time
//! and never mutated; concurrent builds can read them freely.

use tracing::error;

use crate::error::{PipelineError, Result};

/// Fixed mapping from canonical upper-case keys to values
#[derive(Debug)]
pub struct NameTable<T: 'static> {
    /// What the table names, used in error messages (e.g. "pipeline type")
    kind: &'static str,
    entries: &'static [(&'static str, T)],
}

impl<T: Copy + PartialEq + 'static> NameTable<T> {
    pub const fn new(kind: &'static str, entries: &'static [(&'static str, T)]) -> Self {
        Self { kind, entries }
    }

    /// Upper-case `raw` and look it up, failing on unknown keys
    pub fn resolve(&self, raw: &str) -> Result<T> {
        let key = raw.to_uppercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| {
                error!(kind = self.kind, value = raw, "Unknown configuration value");
                PipelineError::UnknownConfigurationValue {
                    kind: self.kind,
                    value: raw.to_string(),
                }
            })
    }

    /// First (canonical) key registered for `value`
    pub fn key_of(&self, value: T) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(k, _)| *k)
    }

    /// All accepted keys, in table order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k).filter(|k| !k.is_empty())
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

/// Resolve `raw` against `table`
pub fn resolve<T: Copy + PartialEq + 'static>(raw: &str, table: &NameTable<T>) -> Result<T> {
    table.resolve(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Fruit {
        Apple,
        Pear,
    }

    static FRUITS: NameTable<Fruit> =
        NameTable::new("fruit", &[("APPLE", Fruit::Apple), ("PEAR", Fruit::Pear), ("P", Fruit::Pear)]);

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(resolve("apple", &FRUITS).unwrap(), Fruit::Apple);
        assert_eq!(resolve("PeAr", &FRUITS).unwrap(), Fruit::Pear);
        assert_eq!(resolve("p", &FRUITS).unwrap(), Fruit::Pear);
    }

    #[test]
    fn test_unknown_key_fails() {
        let err = resolve("banana", &FRUITS).unwrap_err();
        assert_eq!(
            err,
            PipelineError::UnknownConfigurationValue {
                kind: "fruit",
                value: "banana".to_string(),
            }
        );
    }

    #[test]
    fn test_key_of_returns_first_key() {
        assert_eq!(FRUITS.key_of(Fruit::Pear), Some("PEAR"));
        assert_eq!(FRUITS.keys().collect::<Vec<_>>(), vec!["APPLE", "PEAR", "P"]);
    }
}
