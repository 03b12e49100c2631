// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tracing::debug;

use crate::api::auth;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::models::LoginRequest;
use crate::session::{Session, SessionStore};
use crate::storage::{FileStorage, KeyValueStorage, StoragePaths};

/// Everything a front end needs, wired once at startup.
///
/// The session store is shared: the gateway reads tokens from the same
/// instance the front end logs in and out of.
#[derive(Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub session: Arc<SessionStore>,
    pub gateway: Gateway,
}

impl AppState {
    /// File-backed session under `config.session_dir`.
    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        let storage: Arc<dyn KeyValueStorage> =
            Arc::new(FileStorage::new(StoragePaths::new(&config.session_dir)));
        Self::with_storage(config, storage)
    }

    pub fn with_storage(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Result<Self, ApiError> {
        let session = Arc::new(SessionStore::initialize(storage));
        let gateway = Gateway::new(config.api_base_url.clone(), session.clone())?;
        debug!(
            api_base_url = %gateway.base_url(),
            authenticated = session.is_authenticated(),
            "Client state ready"
        );
        Ok(Self {
            config,
            session,
            gateway,
        })
    }

    /// Log in against the backend and start the returned session.
    pub async fn sign_in(&self, credentials: &LoginRequest) -> Result<Session, ApiError> {
        let session = auth::login(&self.gateway, credentials).await?;
        self.session
            .login(session.clone())
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(session)
    }

    pub fn sign_out(&self) {
        self.session.logout();
    }
}
