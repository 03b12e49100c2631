// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path utilities for the persisted key/value layout.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Extension used for every persisted value.
pub const VALUE_EXTENSION: &str = "json";

/// Extension of in-flight scratch files.
pub const TEMP_EXTENSION: &str = "tmp";

static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Storage path utilities for the session directory.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// Create paths rooted at `root` (tests pass a temp dir).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persisted values.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the value for `key`.
    ///
    /// Keys are browser-style (`tether2inr:user`); anything outside
    /// `[A-Za-z0-9._-]` is mapped to `_` so a key can never escape the root.
    pub fn value_file(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{VALUE_EXTENSION}", sanitize_key(key)))
    }

    /// Fresh scratch file used for atomic replacement of `key`.
    ///
    /// Unique per process and per call, so concurrent writers never share
    /// a half-written file.
    pub fn temp_file(&self, key: &str) -> PathBuf {
        let seq = TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            "{}.{}.{seq}.{TEMP_EXTENSION}",
            sanitize_key(key),
            std::process::id()
        ))
    }
}

fn sanitize_key(key: &str) -> String {
    let sanitized: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    // ".", ".." and empty names would resolve outside a plain file name.
    if sanitized.chars().all(|c| c == '.') {
        format!("_{sanitized}")
    } else {
        sanitized
    }
}
