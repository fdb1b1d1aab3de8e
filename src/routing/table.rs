//! Route tables returned by the site-config service.

use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered `pattern → replacement` pairs, in the order the service sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<(String, String)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pattern: impl Into<String>, replacement: impl Into<String>) {
        self.entries.push((pattern.into(), replacement.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite `pattern` through every entry in order.
    ///
    /// Each key and value loses one leading `/`. When the key occurs in the
    /// current pattern, its first occurrence is replaced; later entries see
    /// the already rewritten text.
    pub fn apply(&self, pattern: &str) -> String {
        let mut rewritten = pattern.to_string();
        for (key, value) in self.iter() {
            let key = strip_leading_slash(key);
            if key.is_empty() {
                continue;
            }
            if rewritten.contains(key) {
                rewritten = rewritten.replacen(key, strip_leading_slash(value), 1);
            }
        }
        rewritten
    }
}

fn strip_leading_slash(s: &str) -> &str {
    s.strip_prefix('/').unwrap_or(s)
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

impl<'de> Deserialize<'de> for RouteTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = RouteTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of route patterns to replacements")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RouteTable, A::Error> {
                let mut table = RouteTable::new();
                while let Some((k, v)) = map.next_entry::<String, String>()? {
                    table.insert(k, v);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

impl Serialize for RouteTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_prefix() {
        let table: RouteTable = [("/content", "/c")].into_iter().collect();
        assert_eq!(table.apply("/content/foo"), "/c/foo");
        assert_eq!(table.apply("/wp-admin/*"), "/wp-admin/*");
    }

    #[test]
    fn test_cumulative_in_order() {
        let table: RouteTable = [("/content", "/articles"), ("/articles", "/a")]
            .into_iter()
            .collect();
        assert_eq!(table.apply("/content/*"), "/a/*");

        let reversed: RouteTable = [("/articles", "/a"), ("/content", "/articles")]
            .into_iter()
            .collect();
        assert_eq!(reversed.apply("/content/*"), "/articles/*");
    }

    #[test]
    fn test_first_occurrence_only() {
        let table: RouteTable = [("/wp", "/blog")].into_iter().collect();
        assert_eq!(table.apply("/wp-content/wp/*"), "/blog-content/wp/*");
    }

    #[test]
    fn test_root_key_is_skipped() {
        let table: RouteTable = [("/", "/home")].into_iter().collect();
        assert_eq!(table.apply("/content/*"), "/content/*");
    }

    #[test]
    fn test_json_keeps_document_order() {
        let table: RouteTable =
            serde_json::from_str(r#"{"/zeta": "/z", "/alpha": "/a", "/mid": "/m"}"#).unwrap();
        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["/zeta", "/alpha", "/mid"]);
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"{"/zeta":"/z","/alpha":"/a","/mid":"/m"}"#
        );
    }
}
