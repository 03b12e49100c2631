// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! CoinGecko public market data for the live price board.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Shown in place of a price the provider did not return.
pub const MISSING_PRICE: &str = "—";

const MAX_FRACTION_DIGITS: usize = 8;

/// A coin quoted against USDT on the price board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedPair {
    /// CoinGecko coin id
    pub id: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

pub const TRACKED_PAIRS: [TrackedPair; 10] = [
    TrackedPair { id: "bitcoin", symbol: "BTC/USDT", name: "Bitcoin" },
    TrackedPair { id: "ethereum", symbol: "ETH/USDT", name: "Ethereum" },
    TrackedPair { id: "binancecoin", symbol: "BNB/USDT", name: "BNB" },
    TrackedPair { id: "solana", symbol: "SOL/USDT", name: "Solana" },
    TrackedPair { id: "ripple", symbol: "XRP/USDT", name: "XRP" },
    TrackedPair { id: "dogecoin", symbol: "DOGE/USDT", name: "Dogecoin" },
    TrackedPair { id: "cardano", symbol: "ADA/USDT", name: "Cardano" },
    TrackedPair { id: "avalanche-2", symbol: "AVAX/USDT", name: "Avalanche" },
    TrackedPair { id: "tron", symbol: "TRX/USDT", name: "TRON" },
    TrackedPair { id: "matic-network", symbol: "MATIC/USDT", name: "Polygon" },
];

#[derive(Debug, thiserror::Error)]
pub enum CoinGeckoError {
    #[error("CoinGecko request failed: {0}")]
    Request(String),

    #[error("CoinGecko response was invalid: {0}")]
    InvalidResponse(String),
}

/// One entry of `/coins/markets`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketQuote {
    pub id: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A tracked pair with whatever the provider returned for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PairPrice {
    pub pair: TrackedPair,
    pub price: Option<f64>,
    pub logo: Option<String>,
}

impl PairPrice {
    /// Board text: formatted price, or [`MISSING_PRICE`].
    pub fn display_price(&self) -> String {
        match self.price {
            Some(price) => format_price(price),
            None => MISSING_PRICE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    api_base_url: String,
    http: Client,
}

impl CoinGeckoClient {
    pub fn new(api_base_url: impl Into<String>) -> Result<Self, CoinGeckoError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| CoinGeckoError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// USD market data for `ids`.
    pub async fn fetch_markets(&self, ids: &[&str]) -> Result<Vec<MarketQuote>, CoinGeckoError> {
        let path = "/coins/markets";
        let ids = ids.join(",");
        let per_page = TRACKED_PAIRS.len().to_string();
        let response = self
            .http
            .get(format!("{}{}", self.api_base_url, path))
            .query(&[
                ("vs_currency", "usd"),
                ("ids", ids.as_str()),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
            ])
            .send()
            .await
            .map_err(|e| CoinGeckoError::Request(format!("GET {path} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(CoinGeckoError::Request(format!(
                "GET {path} returned {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CoinGeckoError::InvalidResponse(format!("GET {path} invalid JSON: {e}")))
    }

    /// Prices for every [`TRACKED_PAIRS`] entry, in board order.
    pub async fn fetch_tracked(&self) -> Result<Vec<PairPrice>, CoinGeckoError> {
        let ids: Vec<&str> = TRACKED_PAIRS.iter().map(|p| p.id).collect();
        let quotes = self.fetch_markets(&ids).await?;
        debug!(returned = quotes.len(), "Fetched market quotes");
        Ok(match_quotes(&quotes))
    }
}

/// Line quotes up with the tracked pairs; unknown ids are ignored.
pub fn match_quotes(quotes: &[MarketQuote]) -> Vec<PairPrice> {
    TRACKED_PAIRS
        .iter()
        .map(|pair| {
            let quote = quotes.iter().find(|q| q.id == pair.id);
            PairPrice {
                pair: *pair,
                price: quote.and_then(|q| q.current_price),
                logo: quote.and_then(|q| q.image.clone()),
            }
        })
        .collect()
}

/// US-style grouping with at most eight fraction digits, trailing zeros
/// dropped: `67234.5` -> `67,234.5`.
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return MISSING_PRICE.to_string();
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && (whole != "0" || !fraction.is_empty());
    let sign = if negative { "-" } else { "" };
    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}
