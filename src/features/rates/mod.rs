//! # Currency Rates Feature
//!
//! Daily exchange rates from the central bank JSON feed.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: true

use anyhow::{anyhow, Context as _, Result};
use log::debug;
use serde_json::Value;

/// Currencies the `/rate` command exposes.
pub const SUPPORTED: &[&str] = &["USD", "EUR", "CNY"];

#[derive(Clone)]
pub struct RatesClient {
    http: reqwest::Client,
    url: String,
}

impl RatesClient {
    pub fn new(url: String) -> Self {
        RatesClient {
            http: reqwest::Client::new(),
            url,
        }
    }

    /// User-facing rate line for a currency code (case-insensitive).
    pub async fn rate_reply(&self, currency: &str) -> String {
        let code = currency.trim().to_uppercase();
        if !SUPPORTED.contains(&code.as_str()) {
            return "Unknown currency. Use USD, EUR or CNY".to_string();
        }
        match self.fetch_rate(&code).await {
            Ok(rate) => format!("💱 {code} rate: {rate:.2} ₽"),
            Err(e) => format!("❌ Failed to fetch the {code} rate: {e}"),
        }
    }

    async fn fetch_rate(&self, code: &str) -> Result<f64> {
        debug!("fetching rates from {}", self.url);
        let body: Value = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("rates request failed")?
            .json()
            .await
            .context("rates response was not JSON")?;
        extract_rate(&body, code)
    }
}

/// Pull `Valute.<code>.Value` out of the daily-rates document.
fn extract_rate(body: &Value, code: &str) -> Result<f64> {
    body["Valute"][code]["Value"]
        .as_f64()
        .ok_or_else(|| anyhow!("no value for {code} in rates feed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_rate_reads_valute_value() {
        let body = json!({
            "Valute": {
                "USD": { "Value": 92.5, "Previous": 91.0 },
                "EUR": { "Value": 100.25 }
            }
        });
        assert_eq!(extract_rate(&body, "USD").unwrap(), 92.5);
        assert_eq!(extract_rate(&body, "EUR").unwrap(), 100.25);
        assert!(extract_rate(&body, "CNY").is_err());
    }

    #[tokio::test]
    async fn test_unknown_currency_is_a_reply_not_an_error() {
        let client = RatesClient::new("http://127.0.0.1:1/unreachable".to_string());
        let reply = client.rate_reply("gbp").await;
        assert_eq!(reply, "Unknown currency. Use USD, EUR or CNY");
    }
}
