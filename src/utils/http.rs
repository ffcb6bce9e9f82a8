// src/utils/http.rs

//! HTTP client utilities.

use crate::error::Result;
use crate::models::ApiConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .build()?;
    Ok(client)
}

/// First `max_chars` characters of a reply body, for error messages.
pub fn body_snippet(body: &str, max_chars: usize) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_truncates_on_char_boundary() {
        assert_eq!(body_snippet("서비스키오류", 3), "서비스...");
        assert_eq!(body_snippet("short", 10), "short");
    }

    #[test]
    fn default_config_builds_client() {
        assert!(create_async_client(&ApiConfig::default()).is_ok());
    }
}
