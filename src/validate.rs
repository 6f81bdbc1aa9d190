//! Syntactic url checks. Nothing here touches the network.

use crate::model::CanonicalStore;

/// True when `s` parses as an absolute url with a scheme and a host.
pub fn is_valid_url(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    match reqwest::Url::parse(s) {
        Ok(url) => url.has_host(),
        Err(_) => false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlIssue {
    /// Disabled, or switched on with nothing to restore.
    Empty,
    /// Non-empty but not an absolute url.
    Unparseable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationWarning {
    pub key: String,
    pub issue: UrlIssue,
}

impl ValidationWarning {
    pub fn blocks_strict_save(&self) -> bool {
        self.issue == UrlIssue::Unparseable
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.issue {
            UrlIssue::Empty => write!(f, "{}: no url set", self.key),
            UrlIssue::Unparseable => write!(f, "{}: invalid url", self.key),
        }
    }
}

pub fn validate_store(store: &CanonicalStore) -> Vec<ValidationWarning> {
    store
        .iter()
        .filter(|(_, e)| !is_valid_url(&e.url))
        .map(|(key, e)| ValidationWarning {
            key: key.clone(),
            issue: if e.is_active() {
                UrlIssue::Unparseable
            } else {
                UrlIssue::Empty
            },
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/validate_tests.rs"]
mod tests;
