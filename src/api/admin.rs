// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only review endpoints.
//!
//! The backend enforces the admin role on each of these; callers typically
//! also pass [`require_admin`](crate::session::require_admin) first so a
//! regular user never issues the request.
//!
//! A review is two sequential calls: set the status, then re-list so the
//! caller sees the backend's view of every record (balances and statuses may
//! change server-side as a side effect of an approval).

use reqwest::Method;
use tracing::info;

use super::{path_segment, Ack};
use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::models::{Deposit, ReviewDecision, StatusUpdateRequest, Withdrawal};

pub async fn list_deposits(gateway: &Gateway) -> Result<Vec<Deposit>, ApiError> {
    let deposits: Option<Vec<Deposit>> = gateway.get("/deposit/all").await?;
    Ok(deposits.unwrap_or_default())
}

pub async fn list_withdrawals(gateway: &Gateway) -> Result<Vec<Withdrawal>, ApiError> {
    let withdrawals: Option<Vec<Withdrawal>> = gateway.get("/withdrawal/all").await?;
    Ok(withdrawals.unwrap_or_default())
}

pub async fn set_deposit_status(
    gateway: &Gateway,
    id: &str,
    decision: ReviewDecision,
) -> Result<Ack, ApiError> {
    set_status(gateway, "deposit", id, decision).await
}

pub async fn set_withdrawal_status(
    gateway: &Gateway,
    id: &str,
    decision: ReviewDecision,
) -> Result<Ack, ApiError> {
    set_status(gateway, "withdrawal", id, decision).await
}

/// Decide a deposit and return the refreshed list.
pub async fn review_deposit(
    gateway: &Gateway,
    id: &str,
    decision: ReviewDecision,
) -> Result<Vec<Deposit>, ApiError> {
    set_deposit_status(gateway, id, decision).await?;
    list_deposits(gateway).await
}

/// Decide a withdrawal and return the refreshed list.
pub async fn review_withdrawal(
    gateway: &Gateway,
    id: &str,
    decision: ReviewDecision,
) -> Result<Vec<Withdrawal>, ApiError> {
    set_withdrawal_status(gateway, id, decision).await?;
    list_withdrawals(gateway).await
}

async fn set_status(
    gateway: &Gateway,
    kind: &str,
    id: &str,
    decision: ReviewDecision,
) -> Result<Ack, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::Validation(format!("Missing {kind} id.")));
    }
    let path = format!("/{kind}/{}/status", path_segment(id.trim()));
    let body = StatusUpdateRequest { status: decision };
    let ack = gateway.send(Method::PATCH, &path, &body).await?;
    info!(kind, id = %id, status = ?decision, "Review recorded");
    Ok(Ack::from_payload(ack))
}
