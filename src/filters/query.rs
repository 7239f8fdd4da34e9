//! Query-string reading and writing.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use url::form_urlencoded;

/// Read-only access to query parameters by key.
pub trait QueryReader {
    fn get(&self, key: &str) -> Option<&str>;
}

impl QueryReader for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl QueryReader for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}

/// Parsed `a=1&b=two` query string. Keeps pair order; lookups return the
/// first occurrence of a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    /// Parses a query string, with or without a leading `?`. Percent-escapes
    /// and `+` are decoded.
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        let pairs = form_urlencoded::parse(input.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self {
            pairs: map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Sets `key` to `value`, replacing every previous occurrence in place.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut replaced = false;
        self.pairs.retain_mut(|(k, v)| {
            if k != key {
                return true;
            }
            if replaced {
                return false;
            }
            *v = value.to_string();
            replaced = true;
            true
        });
        if !replaced {
            self.pairs.push((key.to_string(), value.to_string()));
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// Writes `patch` over the query. Keys listed in `managed` but absent
    /// from `patch` are removed; unrelated keys are left untouched.
    pub fn merge(&mut self, patch: &BTreeMap<String, String>, managed: &[&str]) {
        for key in managed {
            if !patch.contains_key(*key) {
                self.remove(key);
            }
        }
        for (key, value) in patch {
            self.set(key, value);
        }
    }
}

impl QueryReader for QueryString {
    fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            serializer.append_pair(k, v);
        }
        f.write_str(&serializer.finish())
    }
}

/// Merges an encoded filter map into an existing query string.
pub fn merge_query(existing: &str, patch: &BTreeMap<String, String>, managed: &[&str]) -> String {
    let mut query = QueryString::parse(existing);
    query.merge(patch, managed);
    query.to_string()
}
