//! FiNANCiE page provider
//!
//! Fetches the community page for the member count and the market page
//! for the token price and stock, extracting values by the CSS class
//! markers the site renders around each figure. The extraction helpers
//! are deliberately naive string scanning tailored to the site
//! structure; a change in page markup surfaces as
//! [`ProviderError::ValueNotFound`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::ProviderSettings;
use crate::ledger::Observation;

use super::traits::{ProviderError, ProviderResult, StatsProvider};

const MEMBER_MARKER: &str = "profile_num";
const PRICE_INT_MARKER: &str = "connector-price";
const PRICE_FRACTION_MARKER: &str = "float-part";
const STOCK_MARKER: &str = "connector-instock";

/// Scrapes the community and market pages over plain HTTP.
pub struct FinancieProvider {
    client: Client,
    community_url: String,
    market_url: String,
}

impl FinancieProvider {
    pub fn new(settings: &ProviderSettings) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            community_url: settings.community_url.clone(),
            market_url: settings.market_url.clone(),
        })
    }

    async fn fetch_page(&self, url: &str) -> ProviderResult<String> {
        debug!(url, "fetching page");
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl StatsProvider for FinancieProvider {
    async fn fetch_today(&self, date: NaiveDate) -> ProviderResult<Observation> {
        let community = self.fetch_page(&self.community_url).await?;
        let members = extract_count(&community, MEMBER_MARKER, "members")?;
        debug!(members, "parsed member count");

        let market = self.fetch_page(&self.market_url).await?;
        let price = extract_price(&market)?;
        let stock = extract_count(&market, STOCK_MARKER, "stock")?;
        debug!(%price, stock, "parsed market figures");

        Ok(Observation::new(date, members, price, stock))
    }
}

/// Text of the first element whose opening tag carries `marker`,
/// stripped of nested tags.
fn marker_text<'a>(html: &'a str, marker: &str) -> Option<String> {
    let at = html.find(marker)?;
    let open_end = html[at..].find('>')? + at + 1;
    let close = html[open_end..].find("</")? + open_end;
    Some(strip_tags(&html[open_end..close]))
}

/// Remove all `<...>` tags, keeping text content only.
fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn extract_count(html: &str, marker: &str, field: &'static str) -> ProviderResult<u64> {
    let text = marker_text(html, marker).ok_or(ProviderError::ValueNotFound { field })?;
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(ProviderError::ValueNotFound { field });
    }
    digits.parse().map_err(|_| ProviderError::Parse {
        field,
        value: digits,
    })
}

/// The price renders as an integer part and an optional fraction part in
/// separate elements; join them before parsing.
fn extract_price(html: &str) -> ProviderResult<Decimal> {
    let int_text = marker_text(html, PRICE_INT_MARKER)
        .ok_or(ProviderError::ValueNotFound { field: "price" })?;
    let mut price_str: String = int_text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if !price_str.contains('.') {
        if let Some(fraction) = marker_text(html, PRICE_FRACTION_MARKER) {
            let digits: String = fraction.chars().filter(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty() {
                price_str.push('.');
                price_str.push_str(&digits);
            }
        }
    }

    if price_str.is_empty() {
        return Err(ProviderError::ValueNotFound { field: "price" });
    }
    price_str.parse().map_err(|_| ProviderError::Parse {
        field: "price",
        value: price_str,
    })
}
