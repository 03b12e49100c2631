// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User withdrawal endpoints.

use reqwest::Method;
use tracing::info;

use super::Ack;
use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::models::{CreateWithdrawalRequest, Withdrawal};

/// Request an INR payout to a saved bank account.
pub async fn create(
    gateway: &Gateway,
    request: &CreateWithdrawalRequest,
) -> Result<Ack, ApiError> {
    request.validate()?;
    let ack = gateway.send(Method::POST, "/withdrawal", request).await?;
    info!(
        bank_account_id = %request.bank_account_id,
        amount = %request.amount,
        "Withdrawal submitted"
    );
    Ok(Ack::from_payload(ack))
}

pub async fn list_mine(gateway: &Gateway) -> Result<Vec<Withdrawal>, ApiError> {
    let withdrawals: Option<Vec<Withdrawal>> = gateway.get("/withdrawal/my").await?;
    Ok(withdrawals.unwrap_or_default())
}
