use serde::{Serialize, Serializer};
use url::form_urlencoded;

pub const SEARCH_KEY: &str = "q";

/// The page URL's query string, the only state the view persists outside
/// itself. Keys keep their order; unknown keys survive a `set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pairs: Vec<(String, String)>,
}

impl Location {
    /// Parses a raw query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        }
    }

    pub fn with_search(query: &str) -> Self {
        let mut location = Self::default();
        location.set(SEARCH_KEY, query);
        location
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces every value of `key` with a single `value`.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.pairs[first].1 = value.to_string();
                let mut index = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = k != key || index == first;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push((key.to_string(), value.to_string())),
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.get(SEARCH_KEY)
    }

    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Path plus query, ready for a redirect.
    pub fn href(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self.query_string())
        }
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.query_string())
    }
}
