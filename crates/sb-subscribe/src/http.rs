use crate::model::SubsError;
use std::time::Duration;
use tracing::debug;

/// GET a subscription body. The timeout covers the whole request; non-2xx is an error.
pub async fn fetch_text(url: &str, timeout: Duration, user_agent: &str) -> Result<String, SubsError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| SubsError::Fetch(e.to_string()))?;
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| SubsError::Fetch(e.to_string()))?
        .error_for_status()
        .map_err(|e| SubsError::Fetch(e.to_string()))?;
    let s = resp
        .text()
        .await
        .map_err(|e| SubsError::Fetch(e.to_string()))?;
    debug!(url, bytes = s.len(), "subscription fetched");
    Ok(s)
}
