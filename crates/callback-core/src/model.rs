use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const HMAC_FIELD: &str = "hmac";
pub const HOST_FIELD: &str = "host";

/// Fields that always take part in the signed canonical string.
pub const REQUIRED_SIGNED_FIELDS: [&str; 4] = ["code", "timestamp", "state", "shop"];

/// Query parameters of an OAuth authorization callback.
///
/// Keys are unique; inserting an existing key replaces its value. The claimed
/// signature lives under [`HMAC_FIELD`] and is never part of the signed form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthQuery {
    params: BTreeMap<String, String>,
}

impl AuthQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a form-urlencoded query string. A leading `?` is ignored and
    /// the last occurrence of a repeated key wins.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        form_urlencoded::parse(raw.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.params.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The claimed signature, if the query carries a non-empty one.
    pub fn hmac(&self) -> Option<&str> {
        self.get(HMAC_FIELD).filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Pairs that are signed: the required fields that are present, plus
    /// `host` when it is present and non-empty. Unrecognized keys and `hmac`
    /// are left out.
    pub fn signable_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = REQUIRED_SIGNED_FIELDS
            .iter()
            .filter_map(|field| self.get(field).map(|value| (*field, value)))
            .collect();

        if let Some(host) = self.get(HOST_FIELD).filter(|host| !host.is_empty()) {
            pairs.push((HOST_FIELD, host));
        }

        pairs
    }

    /// Serializes every parameter, `hmac` included, as a form-urlencoded
    /// query string in key order.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for AuthQuery
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
