//! Normalized response header snapshot.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::TRACKED_HEADERS;

/// Lowercase header name to raw value, restricted to [`TRACKED_HEADERS`].
///
/// Names are interned from the allowlist, so keys are unique and every key is
/// a tracked name. Built once per response and not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeaderSet {
    headers: BTreeMap<&'static str, String>,
}

impl HeaderSet {
    /// Builds a header set from raw `(name, value)` pairs.
    ///
    /// Name matching is case-insensitive; untracked names are dropped. When a
    /// name repeats, the last value wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut headers = BTreeMap::new();
        for (name, value) in pairs {
            if let Some(tracked) = intern(name.as_ref()) {
                headers.insert(tracked, value.into());
            }
        }
        Self { headers }
    }

    /// Raw value of a tracked header.
    pub fn get(&self, name: &str) -> Option<&str> {
        intern(name)
            .and_then(|key| self.headers.get(key))
            .map(String::as_str)
    }

    /// Value of a header that carries a usable signal.
    ///
    /// An empty value counts as absent.
    pub fn signal(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.signal(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Iterates headers in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.headers.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

fn intern(name: &str) -> Option<&'static str> {
    TRACKED_HEADERS
        .iter()
        .copied()
        .find(|tracked| tracked.eq_ignore_ascii_case(name.trim()))
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}
