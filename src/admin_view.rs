// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Admin Review Views
//!
//! Client-side filtering and CSV export over the admin listings returned by
//! [`api::admin`](crate::api::admin). Nothing here talks to the network.
//!
//! ## Filtering
//!
//! - `search`: case-insensitive substring over the owner's email, the
//!   transaction hash and every bank detail value
//! - `status`: `all` or a single [`TransferStatus`]
//!
//! ## CSV
//!
//! Every cell is double-quoted with embedded quotes doubled. The header row
//! is always present; data rows are joined with `\n` and carry no trailing
//! newline.

use crate::models::{BankDetails, Deposit, TransferStatus, UserRef, Withdrawal};

/// Status filter for admin listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TransferStatus),
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Some(StatusFilter::All);
        }
        TransferStatus::parse(s).map(StatusFilter::Only)
    }

    fn accepts(&self, status: TransferStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

/// A record the admin can search and review.
pub trait Reviewable {
    fn status(&self) -> TransferStatus;

    /// Text the free-text search runs against.
    fn search_text(&self) -> String;
}

impl Reviewable for Deposit {
    fn status(&self) -> TransferStatus {
        self.status
    }

    fn search_text(&self) -> String {
        search_line(self.user.as_ref(), self.tx_hash.as_deref(), "")
    }
}

impl Reviewable for Withdrawal {
    fn status(&self) -> TransferStatus {
        self.status
    }

    fn search_text(&self) -> String {
        let bank = self
            .bank_details
            .as_ref()
            .map(|details| details.search_text())
            .unwrap_or_default();
        search_line(self.user.as_ref(), None, &bank)
    }
}

fn search_line(user: Option<&UserRef>, tx_hash: Option<&str>, bank: &str) -> String {
    let email = user.and_then(|u| u.email.as_deref()).unwrap_or_default();
    [email, tx_hash.unwrap_or_default(), bank].join(" ")
}

/// Search and status filter for an admin listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminQuery {
    pub search: Option<String>,
    pub status: StatusFilter,
}

impl AdminQuery {
    pub fn matches<R: Reviewable>(&self, row: &R) -> bool {
        if !self.status.accepts(row.status()) {
            return false;
        }
        match self.search.as_deref().map(str::to_lowercase) {
            Some(needle) if !needle.is_empty() => {
                row.search_text().to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }

    /// Keep the rows that match, preserving order.
    pub fn apply<R: Reviewable>(&self, mut rows: Vec<R>) -> Vec<R> {
        rows.retain(|row| self.matches(row));
        rows
    }
}

/// One CSV column: a header and how to read the cell from a row.
pub struct CsvColumn<R> {
    pub header: &'static str,
    pub value: fn(&R) -> String,
}

/// Render `rows` as CSV.
pub fn to_csv<R>(rows: &[R], columns: &[CsvColumn<R>]) -> String {
    let header = columns
        .iter()
        .map(|column| quote(column.header))
        .collect::<Vec<_>>()
        .join(",");
    let body = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| quote(&(column.value)(row)))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("{header}\n{body}")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn format_date(date: &chrono::DateTime<chrono::Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn owner_email(user: Option<&UserRef>) -> String {
    user.and_then(|u| u.email.clone()).unwrap_or_default()
}

pub fn deposit_columns() -> Vec<CsvColumn<Deposit>> {
    vec![
        CsvColumn { header: "Date", value: |d: &Deposit| format_date(&d.created_at) },
        CsvColumn { header: "User", value: |d: &Deposit| owner_email(d.user.as_ref()) },
        CsvColumn { header: "Amount", value: |d: &Deposit| d.amount.to_string() },
        CsvColumn { header: "Network", value: |d: &Deposit| d.network.to_string() },
        CsvColumn { header: "Status", value: |d: &Deposit| d.status.to_string() },
        CsvColumn { header: "TxHash", value: |d: &Deposit| d.tx_hash.clone().unwrap_or_default() },
    ]
}

pub fn withdrawal_columns() -> Vec<CsvColumn<Withdrawal>> {
    vec![
        CsvColumn { header: "Date", value: |w: &Withdrawal| format_date(&w.created_at) },
        CsvColumn { header: "User", value: |w: &Withdrawal| owner_email(w.user.as_ref()) },
        CsvColumn { header: "Amount", value: |w: &Withdrawal| w.amount.to_string() },
        CsvColumn { header: "Status", value: |w: &Withdrawal| w.status.to_string() },
        CsvColumn {
            header: "Bank Account",
            value: |w: &Withdrawal| bank_field(w, |b| b.account_number()),
        },
        CsvColumn {
            header: "Bank Name",
            value: |w: &Withdrawal| bank_field(w, |b| b.holder_name()),
        },
        CsvColumn { header: "IFSC", value: |w: &Withdrawal| bank_field(w, |b| b.ifsc()) },
    ]
}

fn bank_field(
    withdrawal: &Withdrawal,
    read: fn(&BankDetails) -> Option<String>,
) -> String {
    withdrawal
        .bank_details
        .as_ref()
        .and_then(read)
        .unwrap_or_default()
}
