// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response payloads exchanged with the Tether2INR backend.
//! Field names follow the backend's camelCase JSON; MongoDB identifiers
//! arrive as `_id`.
//!
//! ## Model Categories
//!
//! - **Auth**: login credentials, registration, OTP verification
//! - **Deposits**: USDT sent on-chain, reviewed by an admin
//! - **Withdrawals**: INR payouts to a saved bank account
//! - **Bank accounts**: payout destinations
//!
//! Request types carry a `validate()` that runs before anything is sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Validation
// =============================================================================

/// Client-side form check failure. The message is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Accept a positive decimal amount such as `"25"` or `"25.50"`.
pub fn validate_amount(amount: &str) -> Result<(), ValidationError> {
    let trimmed = amount.trim();
    let invalid = || ValidationError::new("Amount must be a valid positive number.");

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value > 0.0 && value.is_finite() => Ok(()),
        _ => Err(invalid()),
    }
}

/// Deserialize an amount sent either as a JSON number or a numeric string.
///
/// `null` reads as zero, same as a missing amount.
pub fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("amount is out of range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("amount {s:?} is not a number"))),
        Value::Null => Ok(0.0),
        other => Err(D::Error::custom(format!(
            "amount must be a number or numeric string, got {other}"
        ))),
    }
}

// =============================================================================
// Auth Models
// =============================================================================

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::new("Email and password are required."));
        }
        Ok(())
    }
}

/// Body for `POST /auth/register`. The backend checks the confirmation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Sent as an empty string when the user has no referrer.
    pub referral_code: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::new("Email and password are required."));
        }
        Ok(())
    }
}

/// Body for `POST /auth/verify-otp`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

impl VerifyOtpRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let otp = self.otp.trim();
        if self.email.trim().is_empty() || otp.is_empty() || otp.chars().count() > 6 {
            return Err(ValidationError::new("Enter the OTP sent to your email."));
        }
        Ok(())
    }
}

/// Body for `POST /auth/resend-otp`.
#[derive(Debug, Clone, Serialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

// =============================================================================
// Shared Transfer Types
// =============================================================================

/// Review state of a deposit or withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Pending,
    Approved,
    Rejected,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Approved => "approved",
            TransferStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(TransferStatus::Pending),
            "approved" => Some(TransferStatus::Approved),
            "rejected" => Some(TransferStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin decision on a pending transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl From<ReviewDecision> for TransferStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => TransferStatus::Approved,
            ReviewDecision::Rejected => TransferStatus::Rejected,
        }
    }
}

/// Body for `PATCH /deposit/{id}/status` and `PATCH /withdrawal/{id}/status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateRequest {
    pub status: ReviewDecision,
}

/// Owner reference populated on admin listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(default)]
    pub email: Option<String>,
}

// =============================================================================
// Deposit Models
// =============================================================================

/// Chain the USDT was sent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepositNetwork {
    #[serde(rename = "TRC20")]
    Trc20,
    #[serde(rename = "BEP20")]
    Bep20,
}

impl DepositNetwork {
    pub fn label(&self) -> &'static str {
        match self {
            DepositNetwork::Trc20 => "TRC20",
            DepositNetwork::Bep20 => "BEP20",
        }
    }

    /// Exchange wallet that receives deposits on this network.
    pub fn deposit_address(&self) -> &'static str {
        match self {
            DepositNetwork::Trc20 => "TH9N2PkXguotCrC2PbFQsHnwBZrYGSmZ8e",
            DepositNetwork::Bep20 => "0x944909359A1Cb0140Ba9047F72fA503A93Bf80f1",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRC20" => Some(DepositNetwork::Trc20),
            "BEP20" => Some(DepositNetwork::Bep20),
            _ => None,
        }
    }
}

impl std::fmt::Display for DepositNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Body for `POST /deposit`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepositRequest {
    /// Decimal string exactly as entered.
    pub amount: String,
    pub network: DepositNetwork,
    pub tx_hash: String,
}

impl CreateDepositRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount.trim().is_empty() || self.tx_hash.trim().is_empty() {
            return Err(ValidationError::new(
                "Please enter amount and transaction hash.",
            ));
        }
        validate_amount(&self.amount)
    }
}

/// A deposit as listed by `/deposit/my` and `/deposit/all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(deserialize_with = "de_amount")]
    pub amount: f64,
    pub network: DepositNetwork,
    #[serde(default)]
    pub tx_hash: Option<String>,
    pub status: TransferStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

// =============================================================================
// Bank Account Models
// =============================================================================

/// Body for `POST /user/bank-accounts`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankAccountRequest {
    pub account_number: String,
    pub ifsc: String,
    pub holder_name: String,
}

impl CreateBankAccountRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.account_number.trim().is_empty()
            || self.ifsc.trim().is_empty()
            || self.holder_name.trim().is_empty()
        {
            return Err(ValidationError::new("Fill all bank details."));
        }
        Ok(())
    }
}

/// A saved payout destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    #[serde(rename = "_id")]
    pub id: String,
    pub account_number: String,
    pub ifsc: String,
    pub holder_name: String,
}

// =============================================================================
// Withdrawal Models
// =============================================================================

/// Body for `POST /withdrawal`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWithdrawalRequest {
    /// Decimal string exactly as entered.
    pub amount: String,
    pub bank_account_id: String,
}

impl CreateWithdrawalRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bank_account_id.trim().is_empty() || self.amount.trim().is_empty() {
            return Err(ValidationError::new(
                "Select a bank account and enter amount.",
            ));
        }
        validate_amount(&self.amount)
    }
}

/// Bank details snapshotted onto a withdrawal.
///
/// Older records store free text; newer ones an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BankDetails {
    Structured(Map<String, Value>),
    Text(String),
}

impl BankDetails {
    fn field(&self, key: &str) -> Option<String> {
        match self {
            BankDetails::Structured(map) => map.get(key).and_then(value_text),
            BankDetails::Text(_) => None,
        }
    }

    pub fn account_number(&self) -> Option<String> {
        self.field("accountNumber")
    }

    pub fn ifsc(&self) -> Option<String> {
        self.field("ifsc")
    }

    pub fn holder_name(&self) -> Option<String> {
        self.field("holderName")
    }

    /// All values joined with spaces, for free-text search.
    pub fn search_text(&self) -> String {
        match self {
            BankDetails::Structured(map) => map
                .values()
                .filter_map(value_text)
                .collect::<Vec<_>>()
                .join(" "),
            BankDetails::Text(text) => text.clone(),
        }
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A withdrawal as listed by `/withdrawal/my` and `/withdrawal/all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(deserialize_with = "de_amount")]
    pub amount: f64,
    pub status: TransferStatus,
    #[serde(default)]
    pub bank_details: Option<BankDetails>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amount_validation() {
        assert!(validate_amount("25").is_ok());
        assert!(validate_amount("25.50").is_ok());
        assert!(validate_amount(".5").is_ok());
        assert!(validate_amount("0").is_err());
        assert!(validate_amount("-3").is_err());
        assert!(validate_amount("1e3").is_err());
        assert!(validate_amount("abc").is_err());
        assert!(validate_amount(".").is_err());
        assert!(validate_amount("").is_err());
    }

    #[test]
    fn deposit_form_messages() {
        let missing = CreateDepositRequest {
            amount: "".into(),
            network: DepositNetwork::Trc20,
            tx_hash: "0xabc".into(),
        };
        assert_eq!(
            missing.validate().unwrap_err().to_string(),
            "Please enter amount and transaction hash."
        );

        let ok = CreateDepositRequest {
            amount: "100".into(),
            network: DepositNetwork::Bep20,
            tx_hash: "0xabc".into(),
        };
        assert!(ok.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"amount": "100", "network": "BEP20", "txHash": "0xabc"})
        );
    }

    #[test]
    fn withdrawal_and_bank_form_messages() {
        let withdrawal = CreateWithdrawalRequest {
            amount: "10".into(),
            bank_account_id: " ".into(),
        };
        assert_eq!(
            withdrawal.validate().unwrap_err().to_string(),
            "Select a bank account and enter amount."
        );

        let bank = CreateBankAccountRequest {
            account_number: "1234".into(),
            ifsc: "".into(),
            holder_name: "A".into(),
        };
        assert_eq!(bank.validate().unwrap_err().to_string(), "Fill all bank details.");
    }

    #[test]
    fn register_body_uses_camel_case() {
        let req = RegisterRequest {
            email: "a@b.com".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
            referral_code: "".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"email": "a@b.com", "password": "pw", "confirmPassword": "pw", "referralCode": ""})
        );
    }

    #[test]
    fn otp_validation() {
        let ok = VerifyOtpRequest { email: "a@b.com".into(), otp: "123456".into() };
        assert!(ok.validate().is_ok());
        let long = VerifyOtpRequest { email: "a@b.com".into(), otp: "1234567".into() };
        assert!(long.validate().is_err());
    }

    #[test]
    fn each_network_has_its_receiving_address() {
        let trc20 = DepositNetwork::Trc20.deposit_address();
        assert_eq!(trc20, "TH9N2PkXguotCrC2PbFQsHnwBZrYGSmZ8e");
        assert!(trc20.starts_with('T'));

        let bep20 = DepositNetwork::Bep20.deposit_address();
        assert_eq!(bep20, "0x944909359A1Cb0140Ba9047F72fA503A93Bf80f1");
        assert!(bep20.starts_with("0x") && bep20.len() == 42);
    }

    #[test]
    fn null_amount_reads_as_zero() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "de_amount")]
            amount: f64,
        }
        let row: Row = serde_json::from_value(json!({"amount": null})).unwrap();
        assert_eq!(row.amount, 0.0);
        assert!(serde_json::from_value::<Row>(json!({"amount": true})).is_err());
    }

    #[test]
    fn deposit_parses_backend_shape() {
        let deposit: Deposit = serde_json::from_value(json!({
            "_id": "d1",
            "amount": "150.5",
            "network": "TRC20",
            "txHash": "0xfeed",
            "status": "pending",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "user": {"email": "a@b.com"},
            "__v": 0
        }))
        .unwrap();
        assert_eq!(deposit.amount, 150.5);
        assert_eq!(deposit.network, DepositNetwork::Trc20);
        assert_eq!(deposit.status, TransferStatus::Pending);
        assert_eq!(deposit.user.unwrap().email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn unknown_status_fails_schema_check() {
        let result = serde_json::from_value::<Deposit>(json!({
            "_id": "d1",
            "amount": 1,
            "network": "TRC20",
            "status": "exploded",
            "createdAt": "2024-05-01T10:00:00Z"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn withdrawal_bank_details_object_or_text() {
        let structured: Withdrawal = serde_json::from_value(json!({
            "_id": "w1",
            "amount": 20,
            "status": "approved",
            "bankDetails": {"accountNumber": "9988", "ifsc": "HDFC0001", "holderName": "Asha"},
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        let details = structured.bank_details.unwrap();
        assert_eq!(details.account_number().as_deref(), Some("9988"));
        assert_eq!(details.holder_name().as_deref(), Some("Asha"));
        let mut words: Vec<String> = details
            .search_text()
            .split(' ')
            .map(str::to_string)
            .collect();
        words.sort();
        assert_eq!(words, vec!["9988", "Asha", "HDFC0001"]);

        let text: Withdrawal = serde_json::from_value(json!({
            "_id": "w2",
            "amount": 20,
            "status": "pending",
            "bankDetails": "SBI 1234",
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        let details = text.bank_details.unwrap();
        assert_eq!(details.account_number(), None);
        assert_eq!(details.search_text(), "SBI 1234");
    }

    #[test]
    fn review_decision_serializes_lowercase() {
        let body = StatusUpdateRequest { status: ReviewDecision::Approved };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"status": "approved"}));
        assert_eq!(TransferStatus::from(ReviewDecision::Rejected), TransferStatus::Rejected);
    }
}
