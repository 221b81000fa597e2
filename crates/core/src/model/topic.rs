use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Short identifier for a course module (e.g. `"os"`, `"dbms"`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicCode(String);

impl TopicCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the underlying code string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TopicCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicCode({})", self.0)
    }
}

impl fmt::Display for TopicCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TopicCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// A course module as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub code: TopicCode,
    pub display_name: String,
}

/// The full set of topics offered by the content service.
///
/// Loaded once at startup and immutable afterwards; it survives a session
/// reset. Iteration order follows the topic code so the presentation layer
/// gets a stable listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicCatalog(BTreeMap<TopicCode, String>);

impl TopicCatalog {
    #[must_use]
    pub fn new(topics: BTreeMap<TopicCode, String>) -> Self {
        Self(topics)
    }

    #[must_use]
    pub fn contains(&self, code: &TopicCode) -> bool {
        self.0.contains_key(code)
    }

    #[must_use]
    pub fn display_name(&self, code: &TopicCode) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Topic> + '_ {
        self.0.iter().map(|(code, name)| Topic {
            code: code.clone(),
            display_name: name.clone(),
        })
    }
}

impl FromIterator<(TopicCode, String)> for TopicCatalog {
    fn from_iter<I: IntoIterator<Item = (TopicCode, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
