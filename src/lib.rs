// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tether2INR Client - USDT to INR exchange client
//!
//! This crate holds the client-side core of the Tether2INR exchange: who is
//! logged in, and how every backend call is authorized and interpreted.
//!
//! ## Modules
//!
//! - `session` - Session store, roles and access guards
//! - `gateway` - Authorized request gateway (bearer token, JSON, cookies)
//! - `api` - Typed endpoint wrappers (auth, deposits, withdrawals, admin)
//! - `storage` - Persisted key-value storage for the session
//! - `admin_view` - Admin filtering and CSV export
//! - `providers` - Market data (CoinGecko)
//! - `market_poller` - Background live price refresh

pub mod admin_view;
pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod market_poller;
pub mod models;
pub mod providers;
pub mod session;
pub mod state;
pub mod storage;
