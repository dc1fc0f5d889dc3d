//! # Content Store
//!
//! Read-only catalog of thinkers loaded once at startup from a JSON document:
//!
//! ```text
//! {
//!   "kant": {
//!     "display_name": "Иммануил Кант",
//!     "bio": "...",
//!     "glossary": { "А": [ { "term": "Априори", "definition": "..." } ] }
//!   }
//! }
//! ```
//!
//! Document order matters: it is the menu order for thinkers and the
//! tie-break order for glossary letters, so both maps are deserialized into
//! ordered entry lists instead of hash maps.
//!
//! A store that cannot be read or parsed is a startup error. The process
//! never serves from a partially loaded catalog.

use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

use log::{debug, info};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::core::alphabet;

const MISSING_BIO: &str = "Биография отсутствует.";

/// A single glossary entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub term: String,
    pub definition: String,
}

/// One thinker: name, biography and letter-indexed glossary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thinker {
    pub display_name: String,
    pub bio: String,
    /// Letter → terms, in document order.
    pub glossary: Vec<(String, Vec<Term>)>,
}

impl Thinker {
    /// Terms filed under `letter`, or None if the letter is absent.
    pub fn terms(&self, letter: &str) -> Option<&[Term]> {
        self.glossary
            .iter()
            .find(|(l, _)| l == letter)
            .map(|(_, terms)| terms.as_slice())
    }

    /// Glossary letters in alphabetical order, unknown letters last.
    pub fn letters(&self) -> Vec<&str> {
        let mut letters: Vec<&str> = self.glossary.iter().map(|(l, _)| l.as_str()).collect();
        alphabet::sort_letters(&mut letters);
        letters
    }
}

/// The immutable catalog. Safe to share across threads behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentStore {
    entries: Vec<(String, Thinker)>,
}

impl ContentStore {
    /// Load and validate the store at `path`.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = fs::read_to_string(path).map_err(StoreError::Io)?;
        let store = Self::from_json(&json)?;
        info!(
            "Loaded {} thinkers from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Parse and validate a store from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let raw: Ordered<RawThinker> = serde_json::from_str(json).map_err(StoreError::Parse)?;

        if raw.0.is_empty() {
            return Err(StoreError::Invalid("store has no thinkers".to_string()));
        }

        let mut entries = Vec::with_capacity(raw.0.len());
        for (key, thinker) in raw.0 {
            if key.trim().is_empty() {
                return Err(StoreError::Invalid("empty thinker key".to_string()));
            }
            // ':' separates fields in button identifiers
            if key.contains(':') || thinker.glossary.0.iter().any(|(l, _)| l.contains(':')) {
                return Err(StoreError::Invalid(format!("':' not allowed in keys: {key}")));
            }
            if entries.iter().any(|(k, _): &(String, Thinker)| *k == key) {
                return Err(StoreError::Invalid(format!("duplicate thinker key: {key}")));
            }
            debug!(
                "Thinker {key}: {} bio chars, {} glossary letters",
                thinker.bio.as_deref().map_or(0, |b| b.chars().count()),
                thinker.glossary.0.len()
            );
            let display_name = thinker.display_name.unwrap_or_else(|| key.clone());
            entries.push((
                key,
                Thinker {
                    display_name,
                    bio: thinker.bio.unwrap_or_else(|| MISSING_BIO.to_string()),
                    glossary: thinker.glossary.0,
                },
            ));
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&Thinker> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, thinker)| thinker)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All thinkers in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Thinker)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Deserialize)]
struct RawThinker {
    display_name: Option<String>,
    bio: Option<String>,
    #[serde(default)]
    glossary: Ordered<Vec<Term>>,
}

/// A JSON object deserialized as a list of entries, keeping document order.
struct Ordered<T>(Vec<(String, T)>);

impl<T> Default for Ordered<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Ordered<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
            type Value = Ordered<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(Ordered(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// Parsed, but not a usable catalog.
    Invalid(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "content store I/O error: {e}"),
            StoreError::Parse(e) => write!(f, "content store parse error: {e}"),
            StoreError::Invalid(msg) => write!(f, "invalid content store: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{STORE_JSON, test_store};

    #[test]
    fn test_preserves_document_order() {
        let store = test_store();
        let keys: Vec<&str> = store.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["kant", "hegel", "nietzsche"]);
    }

    #[test]
    fn test_letters_sorted_alphabetically() {
        let store = test_store();
        // Document order is К, А
        assert_eq!(store.get("kant").unwrap().letters(), vec!["А", "К"]);
    }

    #[test]
    fn test_terms_lookup() {
        let store = test_store();
        let kant = store.get("kant").unwrap();
        assert_eq!(kant.terms("А").map(<[Term]>::len), Some(2));
        assert!(kant.terms("Я").is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let store = ContentStore::from_json(r#"{"anon": {}}"#).unwrap();
        let anon = store.get("anon").unwrap();
        assert_eq!(anon.display_name, "anon");
        assert_eq!(anon.bio, MISSING_BIO);
        assert!(anon.glossary.is_empty());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = ContentStore::from_json(r#"{"kant": {"bio": 42}}"#).unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
        let err = ContentStore::from_json("not json").unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[test]
    fn test_empty_store_is_invalid() {
        let err = ContentStore::from_json("{}").unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn test_duplicate_key_is_invalid() {
        let err = ContentStore::from_json(r#"{"a": {}, "a": {}}"#).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn test_colon_in_keys_is_invalid() {
        let err = ContentStore::from_json(r#"{"a:b": {}}"#).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        let err = ContentStore::from_json(r#"{"a": {"glossary": {"А:Б": []}}}"#).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ContentStore::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn test_fixture_parses() {
        assert!(ContentStore::from_json(STORE_JSON).is_ok());
    }
}
