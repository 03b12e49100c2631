// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The client-held record of the authenticated identity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::roles::Role;
use crate::models::de_amount;

/// Authenticated identity as returned by login and profile endpoints.
///
/// Field names follow the backend's camelCase JSON. Fields this client does
/// not model are kept in `extra`, so a persisted round trip and a profile
/// merge never drop data the server sent.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer credential; the only authorization the gateway sends.
    pub token: String,

    pub role: Role,

    pub email: String,

    /// Informational only; the backend recomputes it on every fetch.
    #[serde(default, deserialize_with = "de_amount")]
    pub usdt_balance: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    /// Minimal session with the three required fields.
    pub fn new(token: impl Into<String>, role: Role, email: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            role,
            email: email.into(),
            usdt_balance: 0.0,
            referral_code: None,
            extra: Map::new(),
        }
    }

    /// Token, role and email all present. A session is either this or absent.
    pub fn is_complete(&self) -> bool {
        !self.token.trim().is_empty() && !self.email.trim().is_empty()
    }

    /// Shallow merge: every top-level field in `fields` replaces the local
    /// one; fields the server did not send are kept as they are.
    pub fn merged_with(&self, fields: &Map<String, Value>) -> Result<Session, serde_json::Error> {
        let mut base = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in fields {
            base.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(base))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .field("email", &self.email)
            .field("usdt_balance", &self.usdt_balance)
            .field("referral_code", &self.referral_code)
            .field("extra", &self.extra)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Session {
        serde_json::from_value(json!({
            "token": "t1",
            "role": "user",
            "email": "a@b.com",
            "usdtBalance": 5,
            "referralCode": "X",
            "_id": "64f0c0ffee"
        }))
        .unwrap()
    }

    #[test]
    fn deserializes_backend_shape() {
        let session = sample();
        assert_eq!(session.token, "t1");
        assert_eq!(session.role, Role::User);
        assert_eq!(session.usdt_balance, 5.0);
        assert_eq!(session.referral_code.as_deref(), Some("X"));
        assert_eq!(session.extra.get("_id"), Some(&json!("64f0c0ffee")));
    }

    #[test]
    fn optional_fields_default() {
        let session: Session =
            serde_json::from_value(json!({"email": "a@b.com", "token": "t1", "role": "user"}))
                .unwrap();
        assert_eq!(session, Session::new("t1", Role::User, "a@b.com"));
    }

    #[test]
    fn balance_accepts_numeric_string() {
        let session: Session = serde_json::from_value(
            json!({"email": "a@b.com", "token": "t1", "role": "user", "usdtBalance": "12.5"}),
        )
        .unwrap();
        assert_eq!(session.usdt_balance, 12.5);
    }

    #[test]
    fn null_balance_reads_as_zero() {
        let session: Session = serde_json::from_str(
            r#"{"token":"t","role":"user","email":"a@b.com","usdtBalance":null}"#,
        )
        .unwrap();
        assert_eq!(session.usdt_balance, 0.0);
        assert_eq!(session, Session::new("t", Role::User, "a@b.com"));
    }

    #[test]
    fn merge_keeps_fields_server_omitted() {
        let original = sample();
        let update = json!({"usdtBalance": 7});
        let merged = original.merged_with(update.as_object().unwrap()).unwrap();

        let mut expected = original.clone();
        expected.usdt_balance = 7.0;
        assert_eq!(merged, expected);
    }

    #[test]
    fn merge_server_fields_win() {
        let update = json!({"role": "admin", "kycLevel": 2});
        let merged = sample().merged_with(update.as_object().unwrap()).unwrap();
        assert_eq!(merged.role, Role::Admin);
        assert_eq!(merged.extra.get("kycLevel"), Some(&json!(2)));
        assert_eq!(merged.token, "t1");
    }

    #[test]
    fn merge_rejects_wrong_types() {
        let update = json!({"role": 17});
        assert!(sample().merged_with(update.as_object().unwrap()).is_err());
    }

    #[test]
    fn completeness_requires_token_and_email() {
        assert!(Session::new("t", Role::User, "a@b.com").is_complete());
        assert!(!Session::new("", Role::User, "a@b.com").is_complete());
        assert!(!Session::new("t", Role::User, " ").is_complete());
    }

    #[test]
    fn debug_output_hides_token() {
        let rendered = format!("{:?}", Session::new("secret-token", Role::User, "a@b.com"));
        assert!(!rendered.contains("secret-token"));
    }
}
