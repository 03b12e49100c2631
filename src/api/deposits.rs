// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User deposit endpoints.

use reqwest::Method;
use tracing::info;

use super::Ack;
use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::models::{CreateDepositRequest, Deposit};

/// Report an on-chain USDT transfer for admin review.
pub async fn create(gateway: &Gateway, request: &CreateDepositRequest) -> Result<Ack, ApiError> {
    request.validate()?;
    let ack = gateway.send(Method::POST, "/deposit", request).await?;
    info!(network = %request.network, amount = %request.amount, "Deposit submitted");
    Ok(Ack::from_payload(ack))
}

/// The signed-in user's deposits, newest first as the backend sorts them.
pub async fn list_mine(gateway: &Gateway) -> Result<Vec<Deposit>, ApiError> {
    let deposits: Option<Vec<Deposit>> = gateway.get("/deposit/my").await?;
    Ok(deposits.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::gateway_as;
    use crate::models::{DepositNetwork, TransferStatus};
    use crate::session::Role;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_posts_amount_as_entered() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/deposit")
                .header("Authorization", "Bearer t1")
                .json_body(json!({"amount": "250.75", "network": "TRC20", "txHash": "0xabc"}));
            then.status(201).json_body(json!({"message": "Deposit request submitted"}));
        });

        let gateway = gateway_as(server.url("/api"), "t1", Role::User);
        let request = CreateDepositRequest {
            amount: "250.75".into(),
            network: DepositNetwork::Trc20,
            tx_hash: "0xabc".into(),
        };
        let ack = create(&gateway, &request).await.unwrap();
        mock.assert();
        assert_eq!(ack.message.as_deref(), Some("Deposit request submitted"));
    }

    #[tokio::test]
    async fn invalid_form_is_not_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/deposit");
            then.status(201);
        });

        let gateway = gateway_as(server.url("/api"), "t1", Role::User);
        let request = CreateDepositRequest {
            amount: "10".into(),
            network: DepositNetwork::Bep20,
            tx_hash: "".into(),
        };
        let err = create(&gateway, &request).await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter amount and transaction hash.");
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn list_mine_decodes_records() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/deposit/my");
            then.status(200).json_body(json!([{
                "_id": "d1",
                "amount": 100,
                "network": "BEP20",
                "txHash": "0x1",
                "status": "approved",
                "createdAt": "2024-06-01T08:30:00Z"
            }]));
        });

        let gateway = gateway_as(server.url("/api"), "t1", Role::User);
        let deposits = list_mine(&gateway).await.unwrap();
        assert_eq!(deposits.len(), 1);
        assert_eq!(deposits[0].id, "d1");
        assert_eq!(deposits[0].status, TransferStatus::Approved);
    }

    #[tokio::test]
    async fn list_mine_rejects_non_list() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/deposit/my");
            then.status(200).json_body(json!({"deposits": []}));
        });

        let gateway = gateway_as(server.url("/api"), "t1", Role::User);
        assert!(matches!(
            list_mine(&gateway).await.unwrap_err(),
            ApiError::Decode(_)
        ));
    }
}
