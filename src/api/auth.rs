// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication endpoints.
//!
//! Registration is a two-step flow: `register` emails a one-time code, then
//! `verify_otp` activates the account. Only `login` yields a [`Session`].

use reqwest::Method;
use serde_json::{Map, Value};
use tracing::info;

use super::Ack;
use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::models::{LoginRequest, RegisterRequest, ResendOtpRequest, VerifyOtpRequest};
use crate::session::Session;

/// Exchange credentials for a session. The caller stores it.
pub async fn login(gateway: &Gateway, credentials: &LoginRequest) -> Result<Session, ApiError> {
    credentials.validate()?;
    let session: Session = gateway
        .send(Method::POST, "/auth/login", credentials)
        .await?;
    if !session.is_complete() {
        return Err(ApiError::Decode(
            "/auth/login: response is missing token or email".to_string(),
        ));
    }
    info!(email = %session.email, "Login accepted");
    Ok(session)
}

pub async fn register(gateway: &Gateway, request: &RegisterRequest) -> Result<Ack, ApiError> {
    request.validate()?;
    let ack = gateway
        .send(Method::POST, "/auth/register", request)
        .await?;
    Ok(Ack::from_payload(ack))
}

pub async fn verify_otp(gateway: &Gateway, request: &VerifyOtpRequest) -> Result<Ack, ApiError> {
    request.validate()?;
    let ack = gateway
        .send(Method::POST, "/auth/verify-otp", request)
        .await?;
    Ok(Ack::from_payload(ack))
}

pub async fn resend_otp(gateway: &Gateway, email: &str) -> Result<Ack, ApiError> {
    let request = ResendOtpRequest {
        email: email.trim().to_string(),
    };
    let ack = gateway
        .send(Method::POST, "/auth/resend-otp", &request)
        .await?;
    Ok(Ack::from_payload(ack))
}

/// Current profile fields, for merging into the session.
///
/// An empty body means "nothing changed" and yields an empty map.
pub async fn fetch_profile(gateway: &Gateway) -> Result<Map<String, Value>, ApiError> {
    let fields: Option<Map<String, Value>> = gateway.get("/user/profile").await?;
    Ok(fields.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{anonymous_gateway, gateway_as};
    use crate::session::Role;
    use httpmock::prelude::*;
    use serde_json::json;

    fn credentials() -> LoginRequest {
        LoginRequest {
            email: "a@b.com".into(),
            password: "hunter2".into(),
        }
    }

    #[tokio::test]
    async fn login_returns_backend_session() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth/login")
                .json_body(json!({"email": "a@b.com", "password": "hunter2"}));
            then.status(200).json_body(json!({
                "token": "jwt",
                "role": "admin",
                "email": "a@b.com",
                "usdtBalance": "12.5",
                "referralCode": "REF1"
            }));
        });

        let gateway = anonymous_gateway(server.url("/api"));
        let session = login(&gateway, &credentials()).await.unwrap();
        mock.assert();

        assert_eq!(session.token, "jwt");
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.usdt_balance, 12.5);
        assert_eq!(session.referral_code.as_deref(), Some("REF1"));
        // The wrapper never signs in on its own.
        assert!(!gateway.session().is_authenticated());
    }

    #[tokio::test]
    async fn login_surfaces_backend_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(400).json_body(json!({"error": "Invalid credentials"}));
        });

        let gateway = anonymous_gateway(server.url("/api"));
        let err = login(&gateway, &credentials()).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn login_rejects_session_without_token() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(200).json_body(json!({"token": "", "role": "user", "email": "a@b.com"}));
        });

        let gateway = anonymous_gateway(server.url("/api"));
        let err = login(&gateway, &credentials()).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn empty_credentials_are_not_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(200);
        });

        let gateway = anonymous_gateway(server.url("/api"));
        let request = LoginRequest {
            email: " ".into(),
            password: "".into(),
        };
        let err = login(&gateway, &request).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn register_sends_confirmation_and_referral() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/auth/register").json_body(json!({
                "email": "new@b.com",
                "password": "pw",
                "confirmPassword": "pw",
                "referralCode": ""
            }));
            then.status(201).json_body(json!({"message": "OTP sent to email"}));
        });

        let gateway = anonymous_gateway(server.url("/api"));
        let ack = register(
            &gateway,
            &RegisterRequest {
                email: "new@b.com".into(),
                password: "pw".into(),
                confirm_password: "pw".into(),
                referral_code: "".into(),
            },
        )
        .await
        .unwrap();
        mock.assert();
        assert_eq!(ack.message.as_deref(), Some("OTP sent to email"));
    }

    #[tokio::test]
    async fn otp_endpoints_accept_empty_acknowledgement() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth/verify-otp")
                .json_body(json!({"email": "a@b.com", "otp": "123456"}));
            then.status(200);
        });
        let resend = server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth/resend-otp")
                .json_body(json!({"email": "a@b.com"}));
            then.status(200).json_body(json!({"message": "OTP resent"}));
        });

        let gateway = anonymous_gateway(server.url("/api"));
        let ack = verify_otp(
            &gateway,
            &VerifyOtpRequest {
                email: "a@b.com".into(),
                otp: "123456".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(ack, Ack::default());

        let ack = resend_otp(&gateway, " a@b.com ").await.unwrap();
        resend.assert();
        assert_eq!(ack.message.as_deref(), Some("OTP resent"));
    }

    #[tokio::test]
    async fn profile_must_be_an_object() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/user/profile");
            then.status(200).json_body(json!(["not", "an", "object"]));
        });

        let gateway = gateway_as(server.url("/api"), "t1", Role::User);
        let err = fetch_profile(&gateway).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn empty_profile_is_an_empty_map() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/user/profile");
            then.status(204);
        });

        let gateway = gateway_as(server.url("/api"), "t1", Role::User);
        assert!(fetch_profile(&gateway).await.unwrap().is_empty());
    }
}
