// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed wrappers over the exchange backend's REST endpoints.
//!
//! Each function is a thin call through the [`Gateway`](crate::gateway::Gateway):
//! validate the request, send it, decode the payload. None of them touch the
//! session; signing in is done by the caller with the returned [`Session`].
//!
//! | Module | Endpoints |
//! |---|---|
//! | [`auth`] | `/auth/*`, `/user/profile` |
//! | [`deposits`] | `/deposit`, `/deposit/my` |
//! | [`withdrawals`] | `/withdrawal`, `/withdrawal/my` |
//! | [`bank_accounts`] | `/user/bank-accounts` |
//! | [`admin`] | `/deposit/all`, `/withdrawal/all`, `/{kind}/{id}/status` |
//! | [`dashboard`] | both user histories at once |
//!
//! [`Session`]: crate::session::Session

use serde::{Deserialize, Serialize};

pub mod admin;
pub mod auth;
pub mod bank_accounts;
pub mod dashboard;
pub mod deposits;
pub mod withdrawals;

/// Acknowledgement returned by mutating endpoints.
///
/// The backend usually answers `{"message": "..."}`; an empty body is
/// accepted as a bare acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    pub(crate) fn from_payload(ack: Option<Ack>) -> Ack {
        ack.unwrap_or_default()
    }
}

/// Percent-encode a record id for use as a single path segment.
pub(crate) fn path_segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::gateway::Gateway;
    use crate::session::{Role, Session, SessionStore};
    use crate::storage::MemoryStorage;

    /// Gateway against `base_url` with a logged-in user holding `token`.
    pub fn gateway_as(base_url: String, token: &str, role: Role) -> Gateway {
        let store = Arc::new(SessionStore::initialize(Arc::new(MemoryStorage::new())));
        store
            .login(Session::new(token, role, "a@b.com"))
            .unwrap();
        Gateway::new(base_url, store).unwrap()
    }

    /// Gateway against `base_url` with nobody logged in.
    pub fn anonymous_gateway(base_url: String) -> Gateway {
        let store = Arc::new(SessionStore::initialize(Arc::new(MemoryStorage::new())));
        Gateway::new(base_url, store).unwrap()
    }
}
