// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Persisted Storage Module
//!
//! Client state that must outlive the process is kept in a small key/value
//! store, the same shape as browser `localStorage`. Only one key is used in
//! practice: the serialized session.
//!
//! ## Storage Layout
//!
//! ```text
//! <session dir>/
//!   tether2inr_user.json            # serialized Session (JSON text)
//!   tether2inr_user.<pid>.<n>.tmp   # transient, during atomic replace
//! ```
//!
//! Reads happen once at start; every session mutation writes through.

pub mod local_fs;
pub mod paths;

pub use local_fs::{FileStorage, KeyValueStorage, MemoryStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
