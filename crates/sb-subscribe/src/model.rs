use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubsError {
    #[error("fetch error: {0}")]
    Fetch(String),
    /// Text believed to be a subscription yielded no links.
    #[error("subscription unreadable: zero links found")]
    Unreadable,
}

impl SubsError {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "subscription_fetch",
            Self::Unreadable => "subscription_unreadable",
        }
    }
}

/// Ordered link strings, de-duplicated by exact equality. Insertion order is kept and
/// becomes the client list order of emitted configs.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionBatch {
    links: Vec<String>,
    seen: HashSet<String>,
}

impl SubscriptionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unless already present. Returns whether the link was new.
    pub fn push(&mut self, link: impl Into<String>) -> bool {
        let link = link.into();
        if link.is_empty() || self.contains(&link) {
            return false;
        }
        self.seen.insert(link.clone());
        self.links.push(link);
        true
    }

    pub fn contains(&self, link: &str) -> bool {
        self.seen.contains(link)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.links
    }

    pub fn into_vec(self) -> Vec<String> {
        self.links
    }

    /// Newline-joined list, the plain-text subscription form.
    pub fn join(&self) -> String {
        self.links.join("\n")
    }
}

impl<S: Into<String>> FromIterator<S> for SubscriptionBatch {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut batch = Self::new();
        for link in iter {
            batch.push(link);
        }
        batch
    }
}
