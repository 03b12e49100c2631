// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Module
//!
//! Client-side authentication state for the Tether2INR exchange.
//!
//! ## Lifecycle
//!
//! 1. At start, [`SessionStore::initialize`] loads the persisted session
//!    (absent or corrupt data means logged out)
//! 2. A successful `/auth/login` returns a session object; the caller hands
//!    it to [`SessionStore::login`], which persists it
//! 3. Every gateway call reads the token from the store and sends
//!    `Authorization: Bearer <token>`
//! 4. [`SessionStore::refresh`] merges `/user/profile` into the session
//! 5. [`SessionStore::logout`] clears memory and the persisted copy
//!
//! A 401 from the backend does not end the session; the front end decides.

pub mod guard;
pub mod model;
pub mod roles;
pub mod store;

pub use guard::{require_admin, require_session, GuardError};
pub use model::Session;
pub use roles::Role;
pub use store::{SessionError, SessionStore, SESSION_STORAGE_KEY};
