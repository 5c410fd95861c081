//! # Random Fact Feature
//!
//! Scrapes the facts page for `/fact`; falls back to a built-in list on any
//! fetch or parse failure so the command never errors at the user.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0
//! - **Toggleable**: true

use log::warn;
use rand::prelude::IndexedRandom;
use scraper::{Html, Selector};

const BACKUP_FACTS: &[&str] = &[
    "🐝 Honeybees can recognize human faces!",
    "🌌 The Milky Way will collide with the Andromeda galaxy in about 4 billion years",
    "🐙 An octopus has three hearts and blue blood",
    "📚 The longest novel ever written is Proust's \"In Search of Lost Time\"",
    "🧠 The human brain runs on roughly 23 watts of power",
];

#[derive(Clone)]
pub struct FactsClient {
    http: reqwest::Client,
    url: String,
}

impl FactsClient {
    pub fn new(url: String) -> Self {
        FactsClient {
            http: reqwest::Client::new(),
            url,
        }
    }

    /// A formatted random fact. Infallible by design: network and parse
    /// failures degrade to the backup list.
    pub async fn random_fact(&self) -> String {
        match self.fetch_page().await {
            Ok(html) => parse_fact(&html).unwrap_or_else(backup_fact),
            Err(e) => {
                warn!("failed to fetch fact page: {e}");
                backup_fact()
            }
        }
    }

    async fn fetch_page(&self) -> anyhow::Result<String> {
        let body = self
            .http
            .get(&self.url)
            .header("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64)")
            .send()
            .await?
            .text()
            .await?;
        Ok(body)
    }
}

/// Extract the fact text from the page's `table.text td` cell.
fn parse_fact(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("table.text td").ok()?;
    let cell = document.select(&selector).next()?;
    let text = cell.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.len() < 10 {
        return None;
    }
    Some(format_fact(&text))
}

fn backup_fact() -> String {
    let mut rng = rand::rng();
    let fact = BACKUP_FACTS
        .choose(&mut rng)
        .copied()
        .unwrap_or(BACKUP_FACTS[0]);
    format_fact(fact)
}

fn format_fact(fact: &str) -> String {
    format!("📚 Random fact:\n\n{fact}\n\n✨ Learn something new every day!")
}
