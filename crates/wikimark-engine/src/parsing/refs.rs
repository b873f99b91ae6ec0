use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// URL prefix of the MeatBall wiki, the stock interwiki entry.
pub const MEATBALL_URL: &str = "http://www.usemod.com/cgi-bin/mb.pl?";

/// Interwiki prefixes mapped to URL prefixes: `MeatBall:Test` expands to
/// `http://www.usemod.com/cgi-bin/mb.pl?Test`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterwikiMap(BTreeMap<String, String>);

impl InterwikiMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock table holding the `MeatBall` entry.
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.insert("MeatBall", MEATBALL_URL);
        map
    }

    pub fn insert(&mut self, prefix: impl Into<String>, url: impl Into<String>) {
        self.0.insert(prefix.into(), url.into());
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.0.get(prefix).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expands `Prefix:Suffix` when `Prefix` is known.
    pub fn expand(&self, target: &str) -> Option<String> {
        let (prefix, suffix) = target.split_once(':')?;
        if suffix.is_empty() || suffix.contains(char::is_whitespace) {
            return None;
        }
        self.get(prefix).map(|url| format!("{url}{suffix}"))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InterwikiMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A resolved link reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub url: String,
    pub title: Option<String>,
}

/// Link ids (case-insensitive) mapped to their definitions, scoped to a
/// single parse call.
#[derive(Debug, Clone, Default)]
pub struct LinkReferenceTable {
    refs: HashMap<String, LinkRef>,
}

impl LinkReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids compare case-insensitively with runs of whitespace collapsed.
    fn key(id: &str) -> String {
        id.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn insert(&mut self, id: &str, url: impl Into<String>, title: Option<String>) {
        self.refs.insert(
            Self::key(id),
            LinkRef {
                url: url.into(),
                title,
            },
        );
    }

    /// Adds every definition of `other`; its entries win on conflict.
    pub fn merge(&mut self, other: LinkReferenceTable) {
        self.refs.extend(other.refs);
    }

    pub fn get(&self, id: &str) -> Option<&LinkRef> {
        self.refs.get(&Self::key(id))
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interwiki_expansion() {
        let map = InterwikiMap::with_defaults();
        assert_eq!(
            map.expand("MeatBall:Test").as_deref(),
            Some("http://www.usemod.com/cgi-bin/mb.pl?Test")
        );
        assert_eq!(map.expand("Unknown:Test"), None);
        assert_eq!(map.expand("MeatBall:"), None);
        assert_eq!(map.expand("NoColon"), None);
    }

    #[test]
    fn interwiki_from_iterator() {
        let map: InterwikiMap = [("Wp", "https://en.wikipedia.org/wiki/")].into_iter().collect();
        assert_eq!(
            map.expand("Wp:Rust").as_deref(),
            Some("https://en.wikipedia.org/wiki/Rust")
        );
    }

    #[test]
    fn reference_ids_are_case_insensitive() {
        let mut table = LinkReferenceTable::new();
        table.insert("Foo  Bar", "http://x", None);
        assert_eq!(table.get("foo bar").map(|r| r.url.as_str()), Some("http://x"));
        assert_eq!(table.get("FOO\nBAR").map(|r| r.url.as_str()), Some("http://x"));
        assert!(table.get("baz").is_none());
    }

    #[test]
    fn merged_entries_win() {
        let mut table = LinkReferenceTable::new();
        table.insert("a", "http://old", None);
        let mut later = LinkReferenceTable::new();
        later.insert("A", "http://new", Some("T".into()));
        later.insert("b", "http://b", None);
        table.merge(later);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a").map(|r| r.url.as_str()), Some("http://new"));
    }
}
