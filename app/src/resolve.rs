//! Turn raw user input into either one link or an ordered batch.
//!
//! Subscription URLs are fetched first; a subscription that yields exactly one link is
//! handled as that single link.

use crate::settings::Settings;
use anyhow::Result;
use sb_subscribe::{collect_links, is_http_url, is_subscription, SubsError};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Single {
        link: String,
        /// Subscription URL the link came from, if any.
        source: Option<String>,
    },
    Batch {
        links: Vec<String>,
        source: Option<String>,
    },
}

impl Resolved {
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Single { source, .. } | Self::Batch { source, .. } => source.as_deref(),
        }
    }

    pub fn links(&self) -> Vec<&str> {
        match self {
            Self::Single { link, .. } => vec![link.as_str()],
            Self::Batch { links, .. } => links.iter().map(String::as_str).collect(),
        }
    }
}

/// Fetch the body of a subscription URL with the configured timeout and user agent.
#[cfg(feature = "subs_http")]
pub async fn fetch(url: &str, settings: &Settings) -> Result<String, SubsError> {
    tracing::info!(url, timeout_secs = settings.fetch_timeout.as_secs(), "fetching subscription");
    sb_subscribe::http::fetch_text(url, settings.fetch_timeout, &settings.user_agent).await
}

#[cfg(not(feature = "subs_http"))]
pub async fn fetch(_url: &str, _settings: &Settings) -> Result<String, SubsError> {
    Err(SubsError::Fetch("built without the `subs_http` feature".into()))
}

/// Text to extract from: the fetched body for URLs, the input itself otherwise.
pub async fn subscription_text(input: &str, settings: &Settings) -> Result<String, SubsError> {
    let input = input.trim();
    if is_http_url(input) {
        fetch(input, settings).await
    } else {
        Ok(input.to_string())
    }
}

/// Classify already-available text (no fetching).
pub fn classify(text: &str, source: Option<String>) -> Result<Resolved, SubsError> {
    let text = text.trim();
    if source.is_none() && !is_subscription(text) {
        return Ok(Resolved::Single {
            link: text.to_string(),
            source,
        });
    }
    let mut links = collect_links(text)?.into_vec();
    debug!(count = links.len(), "subscription resolved");
    if links.len() == 1 {
        let link = links.remove(0);
        return Ok(Resolved::Single { link, source });
    }
    Ok(Resolved::Batch { links, source })
}

pub async fn resolve(input: &str, settings: &Settings) -> Result<Resolved> {
    let input = input.trim();
    if is_http_url(input) {
        let body = fetch(input, settings).await?;
        return Ok(classify(&body, Some(input.to_string()))?);
    }
    Ok(classify(input, None)?)
}
