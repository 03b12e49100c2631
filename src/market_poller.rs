// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Market Price Poller
//!
//! Background task that keeps the live price board fresh.
//!
//! ## Strategy
//!
//! Every `poll_interval` (default 10 s) the poller fetches all tracked pairs
//! from CoinGecko and publishes a [`MarketSnapshot`] on a `tokio::sync::watch`
//! channel. A failed sweep keeps the previous prices and sets
//! [`FETCH_ERROR_MESSAGE`]; the next successful sweep clears it.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken`; the first sweep runs
//! immediately and cancellation is honoured between sweeps.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::providers::coingecko::{match_quotes, CoinGeckoClient, PairPrice};

/// Default interval between polling sweeps.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub const FETCH_ERROR_MESSAGE: &str = "Could not fetch live prices. Please try again later.";

/// What the price board shows.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub prices: Vec<PairPrice>,
    /// Set when the latest sweep failed.
    pub error: Option<String>,
    /// Time of the last successful sweep; `None` while still loading.
    pub updated_at: Option<DateTime<Utc>>,
}

impl MarketSnapshot {
    fn loading() -> Self {
        Self {
            prices: match_quotes(&[]),
            error: None,
            updated_at: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.updated_at.is_some()
    }
}

pub struct MarketPoller {
    client: CoinGeckoClient,
    poll_interval: Duration,
    tx: watch::Sender<MarketSnapshot>,
}

impl MarketPoller {
    /// Create a poller and the receiver its snapshots are published on.
    pub fn new(client: CoinGeckoClient) -> (Self, watch::Receiver<MarketSnapshot>) {
        let (tx, rx) = watch::channel(MarketSnapshot::loading());
        let poller = Self {
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
            tx,
        };
        (poller, rx)
    }

    pub fn with_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run the poller loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(poller.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            "Market price poller starting"
        );

        loop {
            if shutdown.is_cancelled() {
                info!("Market price poller shutting down");
                return;
            }

            self.poll_step().await;

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Market price poller shutting down");
                    return;
                }
            }
        }
    }

    /// Execute one sweep and publish the outcome.
    pub async fn poll_step(&self) {
        match self.client.fetch_tracked().await {
            Ok(prices) => {
                debug!(pairs = prices.len(), "Market poller: prices updated");
                self.tx.send_modify(|snapshot| {
                    snapshot.prices = prices;
                    snapshot.error = None;
                    snapshot.updated_at = Some(Utc::now());
                });
            }
            Err(e) => {
                warn!(error = %e, "Market poller: failed to fetch prices");
                self.tx.send_modify(|snapshot| {
                    snapshot.error = Some(FETCH_ERROR_MESSAGE.to_string());
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn poller_for(server: &MockServer) -> (MarketPoller, watch::Receiver<MarketSnapshot>) {
        MarketPoller::new(CoinGeckoClient::new(server.base_url()).unwrap())
    }

    #[tokio::test]
    async fn successful_sweep_publishes_prices() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/coins/markets");
            then.status(200)
                .json_body(json!([{"id": "bitcoin", "current_price": 64000.5}]));
        });

        let (poller, rx) = poller_for(&server);
        assert!(!rx.borrow().is_loaded());

        poller.poll_step().await;
        let snapshot = rx.borrow().clone();
        assert!(snapshot.is_loaded());
        assert_eq!(snapshot.error, None);
        assert_eq!(snapshot.prices[0].display_price(), "64,000.5");
    }

    #[tokio::test]
    async fn failed_sweep_keeps_previous_prices() {
        let server = MockServer::start();
        let mut ok = server.mock(|when, then| {
            when.method(GET).path("/coins/markets");
            then.status(200)
                .json_body(json!([{"id": "solana", "current_price": 150}]));
        });

        let (poller, rx) = poller_for(&server);
        poller.poll_step().await;
        let before = rx.borrow().prices.clone();

        ok.delete();
        server.mock(|when, then| {
            when.method(GET).path("/coins/markets");
            then.status(500);
        });
        poller.poll_step().await;

        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.error.as_deref(), Some(FETCH_ERROR_MESSAGE));
        assert_eq!(snapshot.prices, before);
        assert!(snapshot.is_loaded());
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/coins/markets");
            then.status(200).json_body(json!([]));
        });

        let (poller, mut rx) = poller_for(&server);
        let poller = poller.with_interval(Duration::from_millis(20));
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(poller.run(shutdown.clone()));

        rx.changed().await.unwrap();
        assert!(rx.borrow().is_loaded());

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("poller did not stop")
            .unwrap();
    }
}
