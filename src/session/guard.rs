// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access guards for protected and admin-only surfaces.
//!
//! These are client-side conveniences: they decide what to show or where to
//! send the user. The backend enforces the real authorization on every call.

use super::model::Session;
use super::roles::Role;
use super::store::SessionStore;

/// Where an unauthenticated user is sent.
pub const LOGIN_ROUTE: &str = "/login";

/// Where a non-admin user is sent from admin surfaces.
pub const HOME_ROUTE: &str = "/";

/// Guard denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// No session is active
    NotAuthenticated,
    /// Session role is not admin
    NotAdmin,
    /// Admin role, but the email is not on the configured allowlist
    NotAllowlisted { email: String },
}

impl GuardError {
    /// Get the error code for this denial.
    pub fn error_code(&self) -> &'static str {
        match self {
            GuardError::NotAuthenticated => "not_authenticated",
            GuardError::NotAdmin => "not_admin",
            GuardError::NotAllowlisted { .. } => "not_allowlisted",
        }
    }

    /// Route the front end should redirect to.
    pub fn redirect_to(&self) -> &'static str {
        match self {
            GuardError::NotAuthenticated => LOGIN_ROUTE,
            GuardError::NotAdmin | GuardError::NotAllowlisted { .. } => HOME_ROUTE,
        }
    }

    /// What a command-line user should do instead of following the redirect.
    pub fn hint(&self) -> &'static str {
        match self.redirect_to() {
            LOGIN_ROUTE => "run `tether2inr login` first",
            _ => "log in with an admin account",
        }
    }
}

impl std::fmt::Display for GuardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuardError::NotAuthenticated => write!(f, "Please log in first"),
            GuardError::NotAdmin => write!(f, "Admin access required"),
            GuardError::NotAllowlisted { email } => {
                write!(f, "{email} is not an allowed admin account")
            }
        }
    }
}

impl std::error::Error for GuardError {}

/// Any logged-in user.
pub fn require_session(store: &SessionStore) -> Result<Session, GuardError> {
    store.current().ok_or(GuardError::NotAuthenticated)
}

/// Admin role, and, when `allowlist` is non-empty, an allowlisted email.
///
/// `allowlist` entries are expected lower-cased; the comparison ignores case.
pub fn require_admin(store: &SessionStore, allowlist: &[String]) -> Result<Session, GuardError> {
    let session = require_session(store)?;
    if !session.role.has_privilege(Role::Admin) {
        return Err(GuardError::NotAdmin);
    }
    let email = session.email.trim().to_lowercase();
    if !allowlist.is_empty() && !allowlist.iter().any(|allowed| *allowed == email) {
        return Err(GuardError::NotAllowlisted {
            email: session.email.clone(),
        });
    }
    Ok(session)
}
