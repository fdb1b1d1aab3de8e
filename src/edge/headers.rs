//! CDN header representation.
//!
//! The edge platform delivers headers keyed by lower-case name, each holding an
//! ordered list of `{key, value}` pairs. This shape only lives at the boundary;
//! the enricher reads it through [`EdgeHeaders::first_value`].
//!
//! Names are lower-cased on the way in. A header whose value does not have the
//! list-of-pairs shape is kept verbatim and forwarded as received, but it never
//! yields a value.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Viewer country supplied by the CDN.
pub const VIEWER_COUNTRY: &str = "cloudfront-viewer-country";
/// Viewer IANA time zone name supplied by the CDN.
pub const VIEWER_TIME_ZONE: &str = "cloudfront-viewer-time-zone";

/// A derived header: lower-case map name plus the cased key sent to origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderName {
    pub name: &'static str,
    pub key: &'static str,
}

pub const X_COUNTRY: HeaderName = HeaderName { name: "x-country", key: "X-Country" };
pub const HTTP_X_COUNTRY: HeaderName = HeaderName { name: "http_x_country", key: "HTTP_X_COUNTRY" };
pub const X_TIME_ZONE: HeaderName = HeaderName { name: "x-time-zone", key: "X-Time-Zone" };
pub const HTTP_X_TIME_ZONE: HeaderName = HeaderName {
    name: "http_x_time_zone",
    key: "HTTP_X_TIME_ZONE",
};

/// One header value as the CDN represents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Values under one header name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum HeaderValues {
    Entries(Vec<HeaderEntry>),
    Malformed(Value),
}

/// Multi-value header map keyed by lower-case header name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EdgeHeaders(BTreeMap<String, HeaderValues>);

impl<'de> Deserialize<'de> for EdgeHeaders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let received = Option::<BTreeMap<String, HeaderValues>>::deserialize(deserializer)?;

        let mut headers = Self::new();
        for (name, values) in received.unwrap_or_default() {
            headers.merge(name.to_ascii_lowercase(), values);
        }
        Ok(headers)
    }
}

impl EdgeHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value under `name`, or `None` when missing, empty, or malformed.
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|entries| entries.first())
            .map(|entry| entry.value.as_str())
            .filter(|value| !value.is_empty())
    }

    /// All entries under `name`; `None` when missing or malformed.
    pub fn get(&self, name: &str) -> Option<&[HeaderEntry]> {
        match self.0.get(&name.to_ascii_lowercase()) {
            Some(HeaderValues::Entries(entries)) => Some(entries.as_slice()),
            _ => None,
        }
    }

    /// Append a value, keeping any existing entries.
    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        self.merge(
            key.to_ascii_lowercase(),
            HeaderValues::Entries(vec![HeaderEntry::new(key, value)]),
        );
    }

    /// Replace whatever is under `header` with exactly one entry.
    pub fn set_single(&mut self, header: HeaderName, value: impl Into<String>) {
        self.0.insert(
            header.name.to_string(),
            HeaderValues::Entries(vec![HeaderEntry::new(header.key, value)]),
        );
    }

    // Well-formed entries under one name are concatenated; they replace a
    // malformed value and are never replaced by one.
    fn merge(&mut self, name: String, values: HeaderValues) {
        match self.0.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(values);
            }
            Entry::Occupied(mut slot) => {
                if let HeaderValues::Entries(more) = values {
                    if let HeaderValues::Entries(existing) = slot.get_mut() {
                        existing.extend(more);
                    } else {
                        slot.insert(HeaderValues::Entries(more));
                    }
                }
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(&'static str, &'static str)> for EdgeHeaders {
    fn from_iter<T: IntoIterator<Item = (&'static str, &'static str)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (key, value) in iter {
            headers.append(key, value);
        }
        headers
    }
}
