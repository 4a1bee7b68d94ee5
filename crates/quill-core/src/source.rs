//! Already-parsed system data, before validation
//!
//! These types mirror the dictionary documents a system editor produces:
//!
//! ```json
//! {
//!   "glyphs":  { "a": [[[0, 0], [0.5, 0.4]]] },
//!   "modes":   { "digits": { "pattern": "\\d+", "points": [[[0, 0], [0, 1]]] } },
//!   "phrases": { "of the": [[[0, 0], [1, 0]]] },
//!   "rules":   [{ "name": "Drop silent e", "regex": "e\\b", "replacement": "" }]
//! }
//! ```
//!
//! Dictionary order matters (it breaks ties during tokenization), so objects
//! are read into [`Entries`], which keeps document order.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use crate::system::SystemOptions;

/// One stroke as raw `[x, y]` pairs
pub type RawStroke = Vec<[f64; 2]>;

/// The strokes of one entry
pub type RawStrokes = Vec<RawStroke>;

/// Key/value pairs in document order
#[derive(Debug, Clone, PartialEq)]
pub struct Entries<V>(pub Vec<(String, V)>);

impl<V> Entries<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<String>, value: V) {
        self.0.push((key.into(), value));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> Default for Entries<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for Entries<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of dictionary entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, V)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                let mut seen: HashMap<String, usize> = HashMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    // Later duplicates replace earlier ones in place, like a JSON object would
                    match seen.get(&key) {
                        Some(&index) => entries[index].1 = value,
                        None => {
                            seen.insert(key.clone(), entries.len());
                            entries.push((key, value));
                        },
                    }
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// A regex-keyed mode entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMode {
    pub pattern: String,
    pub points: RawStrokes,
}

/// A rewrite rule entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRule {
    pub name: String,
    pub regex: String,
    #[serde(default)]
    pub replacement: String,
}

/// Everything needed to build a [`System`](crate::System).
///
/// A `None` dictionary means the collaborator could not supply it; the
/// system is still built, with that dictionary empty and a warning recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSource {
    #[serde(default)]
    pub glyphs: Option<Entries<RawStrokes>>,
    #[serde(default)]
    pub modes: Option<Entries<RawMode>>,
    #[serde(default)]
    pub phrases: Option<Entries<RawStrokes>>,
    #[serde(default)]
    pub rules: Option<Vec<RawRule>>,
    #[serde(default)]
    pub options: SystemOptions,
}

impl SystemSource {
    /// A source with all four dictionaries present and empty
    pub fn empty() -> Self {
        Self {
            glyphs: Some(Entries::new()),
            modes: Some(Entries::new()),
            phrases: Some(Entries::new()),
            rules: Some(Vec::new()),
            options: SystemOptions::default(),
        }
    }

    pub fn with_glyph(mut self, key: impl Into<String>, strokes: RawStrokes) -> Self {
        self.glyphs.get_or_insert_with(Entries::new).push(key, strokes);
        self
    }

    pub fn with_mode(
        mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
        strokes: RawStrokes,
    ) -> Self {
        self.modes.get_or_insert_with(Entries::new).push(
            name,
            RawMode {
                pattern: pattern.into(),
                points: strokes,
            },
        );
        self
    }

    pub fn with_phrase(mut self, phrase: impl Into<String>, strokes: RawStrokes) -> Self {
        self.phrases
            .get_or_insert_with(Entries::new)
            .push(phrase, strokes);
        self
    }

    pub fn with_rule(
        mut self,
        name: impl Into<String>,
        regex: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.rules.get_or_insert_with(Vec::new).push(RawRule {
            name: name.into(),
            regex: regex.into(),
            replacement: replacement.into(),
        });
        self
    }

    pub fn with_options(mut self, options: SystemOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_document_order() {
        let json = r#"{"z": 1, "a": 2, "m": 3}"#;
        let entries: Entries<u32> = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_duplicate_key_replaces_in_place() {
        let json = r#"{"a": 1, "b": 2, "a": 3}"#;
        let entries: Entries<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.0, vec![("a".to_string(), 3), ("b".to_string(), 2)]);
    }

    #[test]
    fn test_source_from_json() {
        let json = r#"{
            "glyphs": {"a": [[[0, 0], [1, 0.5]]]},
            "modes": {"digits": {"pattern": "\\d+", "points": [[[0, 0]]]}},
            "rules": [{"name": "r", "regex": "x"}]
        }"#;
        let source: SystemSource = serde_json::from_str(json).unwrap();

        assert_eq!(source.glyphs.as_ref().map(Entries::len), Some(1));
        assert_eq!(source.modes.as_ref().unwrap().0[0].1.pattern, "\\d+");
        assert!(source.phrases.is_none());
        assert_eq!(source.rules.as_ref().unwrap()[0].replacement, "");
    }

    #[test]
    fn test_entries_round_trip_through_serializer() {
        let mut entries = Entries::new();
        entries.push("b", 1u8);
        entries.push("a", 2u8);
        let json = serde_json::to_string(&entries).unwrap();
        assert_eq!(json, r#"{"b":1,"a":2}"#);
    }
}
