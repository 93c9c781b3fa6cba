use anyhow::Context;

use globochat_core::ChatMessage;

/// Fetches the most recent messages, oldest first. A failure surfaces to
/// the caller as a notice; there is no retry.
pub async fn fetch_history(base_url: &str, limit: u32) -> anyhow::Result<Vec<ChatMessage>> {
    let url = format!("{}/api/messages", base_url.trim_end_matches('/'));
    let messages = reqwest::Client::new()
        .get(&url)
        .query(&[("limit", limit)])
        .send()
        .await
        .with_context(|| format!("request {}", url))?
        .error_for_status()
        .context("history request rejected")?
        .json::<Vec<ChatMessage>>()
        .await
        .context("decode history response")?;
    Ok(messages)
}
