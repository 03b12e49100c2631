// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Saved payout destinations.

use reqwest::Method;
use tracing::info;

use super::Ack;
use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::models::{BankAccount, CreateBankAccountRequest};

const BANK_ACCOUNTS_PATH: &str = "/user/bank-accounts";

/// Saved accounts. A user with none may get an empty body back.
pub async fn list(gateway: &Gateway) -> Result<Vec<BankAccount>, ApiError> {
    let accounts: Option<Vec<BankAccount>> = gateway.get(BANK_ACCOUNTS_PATH).await?;
    Ok(accounts.unwrap_or_default())
}

pub async fn create(
    gateway: &Gateway,
    request: &CreateBankAccountRequest,
) -> Result<Ack, ApiError> {
    request.validate()?;
    let ack = gateway
        .send(Method::POST, BANK_ACCOUNTS_PATH, request)
        .await?;
    info!(ifsc = %request.ifsc, "Bank account added");
    Ok(Ack::from_payload(ack))
}
