// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The user dashboard's combined history.

use serde::Serialize;

use super::{deposits, withdrawals};
use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::models::{Deposit, TransferStatus, Withdrawal};

/// Both of the signed-in user's transfer histories.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct History {
    pub deposits: Vec<Deposit>,
    pub withdrawals: Vec<Withdrawal>,
}

impl History {
    /// Dashboard totals. Amounts are summed across every status.
    pub fn summary(&self) -> Summary {
        Summary {
            total_deposits: self.deposits.iter().map(|d| d.amount).sum(),
            total_withdrawals: self.withdrawals.iter().map(|w| w.amount).sum(),
            pending_deposits: self
                .deposits
                .iter()
                .filter(|d| d.status == TransferStatus::Pending)
                .count(),
            pending_withdrawals: self
                .withdrawals
                .iter()
                .filter(|w| w.status == TransferStatus::Pending)
                .count(),
        }
    }
}

/// Aggregate figures shown above the history tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_deposits: f64,
    pub total_withdrawals: f64,
    pub pending_deposits: usize,
    pub pending_withdrawals: usize,
}

/// Fetch deposits and withdrawals concurrently; the first failure wins.
pub async fn load_history(gateway: &Gateway) -> Result<History, ApiError> {
    let (deposits, withdrawals) =
        tokio::try_join!(deposits::list_mine(gateway), withdrawals::list_mine(gateway))?;
    Ok(History {
        deposits,
        withdrawals,
    })
}
