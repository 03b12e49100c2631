// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session store: the single source of truth for "who is logged in".
//!
//! ## Consistency
//!
//! The in-memory session is authoritative. Persisted storage is read once,
//! in [`SessionStore::initialize`], and written through on every mutation
//! while the write lock is held, so readers never observe memory and disk
//! disagreeing past a single update. A failed persisted write is logged and
//! ignored; the in-memory value stays in effect for the rest of the process.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use super::model::Session;
use crate::api::auth;
use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::storage::KeyValueStorage;

/// Storage key holding the serialized session.
pub const SESSION_STORAGE_KEY: &str = "tether2inr:user";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session is missing its token or email")]
    Incomplete,
}

/// Owned, shareable session state plus its persisted copy.
pub struct SessionStore {
    current: RwLock<Option<Session>>,
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    /// Load the persisted session, if any.
    ///
    /// Absent, unreadable, unparsable or incomplete data all yield an
    /// unauthenticated store; the cause is logged, never returned.
    pub fn initialize(storage: Arc<dyn KeyValueStorage>) -> Self {
        let initial = load_persisted(storage.as_ref());
        Self {
            current: RwLock::new(initial),
            storage,
        }
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    /// Token of the current session. Never touches persisted storage.
    pub fn current_token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Replace the session with a backend-issued one and persist it.
    pub fn login(&self, session: Session) -> Result<(), SessionError> {
        if !session.is_complete() {
            return Err(SessionError::Incomplete);
        }

        let mut current = self.write();
        self.persist(&session);
        info!(email = %session.email, role = %session.role, "Session started");
        *current = Some(session);
        Ok(())
    }

    /// Clear memory and the persisted copy. Safe to call when logged out.
    pub fn logout(&self) {
        let mut current = self.write();
        if let Err(e) = self.storage.remove_item(SESSION_STORAGE_KEY) {
            warn!(error = %e, "Failed to remove persisted session");
        }
        if let Some(previous) = current.take() {
            info!(email = %previous.email, "Session ended");
        }
    }

    /// Merge the server's current profile into the session.
    ///
    /// Without a token this returns `Ok(None)` and sends nothing. On failure
    /// the session is left as it was; callers decide whether to re-login.
    /// If the session was logged out or replaced while the profile request
    /// was in flight, the response is discarded.
    pub async fn refresh(&self, gateway: &Gateway) -> Result<Option<Session>, ApiError> {
        let Some(token) = self.current_token() else {
            debug!("Session refresh skipped: not authenticated");
            return Ok(None);
        };

        let fields = auth::fetch_profile(gateway).await?;

        let mut current = self.write();
        let Some(session) = current.as_ref() else {
            debug!("Session refresh discarded: logged out during request");
            return Ok(None);
        };
        if session.token != token {
            debug!("Session refresh discarded: session replaced during request");
            return Ok(Some(session.clone()));
        }

        let merged = session
            .merged_with(&fields)
            .map_err(|e| ApiError::Decode(format!("profile: {e}")))?;
        if !merged.is_complete() {
            return Err(ApiError::Decode(
                "profile cleared the session token or email".to_string(),
            ));
        }

        self.persist(&merged);
        *current = Some(merged.clone());
        Ok(Some(merged))
    }

    fn persist(&self, session: &Session) {
        let text = match serde_json::to_string(session) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to serialize session; keeping it in memory only");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(SESSION_STORAGE_KEY, &text) {
            warn!(error = %e, "Failed to persist session; keeping it in memory only");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load_persisted(storage: &dyn KeyValueStorage) -> Option<Session> {
    let text = match storage.get_item(SESSION_STORAGE_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "Failed to read persisted session; starting logged out");
            return None;
        }
    };

    match serde_json::from_str::<Session>(&text) {
        Ok(session) if session.is_complete() => Some(session),
        Ok(_) => {
            warn!("Persisted session is incomplete; starting logged out");
            None
        }
        Err(e) => {
            warn!(error = %e, "Persisted session is malformed; starting logged out");
            None
        }
    }
}
