use crate::error::Result;
use serde_json::{Map, Value};
use url::{ParseError, Url, form_urlencoded};

/// Resolves route-relative entries such as `/payment?amount=1`.
const ROUTE_BASE: &str = "http://localhost/";

/// An ordered bag of query parameters, the only state carried between stages.
///
/// Duplicate keys are preserved in order. Lookups return the first value,
/// snapshots keep the last one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string. A leading `?` is ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Accepts an absolute URL, a route such as `/payment?amount=1`, or a
    /// bare query string.
    pub fn from_entry(entry: &str) -> Result<Self> {
        match Url::parse(entry) {
            Ok(url) => Ok(Self::from_url(&url)),
            Err(ParseError::RelativeUrlWithoutBase) if entry.starts_with('/') => {
                let url = Url::parse(ROUTE_BASE)?.join(entry)?;
                Ok(Self::from_url(&url))
            }
            // No scheme: a bare query, possibly with URLs inside its values.
            Err(ParseError::RelativeUrlWithoutBase) => Ok(Self::parse(entry)),
            Err(e) => Err(e.into()),
        }
    }

    fn from_url(url: &Url) -> Self {
        Self::parse(url.query().unwrap_or_default())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`QueryParams::get`], but an empty value counts as missing.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Replaces every occurrence of `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.pairs.retain(|(k, _)| *k != key);
        self.pairs.push((key, value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// JSON object of every parameter. Later duplicates overwrite earlier ones.
    pub fn to_snapshot(&self) -> Value {
        let mut map = Map::new();
        for (k, v) in &self.pairs {
            map.insert(k.clone(), Value::String(v.clone()));
        }
        Value::Object(map)
    }
}
