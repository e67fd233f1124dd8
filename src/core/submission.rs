//! Submission gateway boundary
//!
//! The wizard hands the fully merged record to a [`SubmissionGateway`]
//! exactly once per submission. The gateway shipped here is a stand-in that
//! waits a fixed delay and echoes the record back as a receipt; a real
//! deployment replaces it without touching the controller contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use ulid::Ulid;

use crate::core::record::FormRecord;

/// Receipt identifier: `REG-` followed by a ULID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiptId(Ulid);

impl ReceiptId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ReceiptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "REG-{}", self.0)
    }
}

/// Error for malformed receipt identifiers
#[derive(Debug, Error)]
#[error("invalid receipt id: {0}")]
pub struct ParseReceiptIdError(String);

impl FromStr for ReceiptId {
    type Err = ParseReceiptIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid = s
            .strip_prefix("REG-")
            .and_then(|rest| Ulid::from_string(rest).ok())
            .ok_or_else(|| ParseReceiptIdError(s.to_string()))?;
        Ok(Self(ulid))
    }
}

impl Serialize for ReceiptId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ReceiptId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Successful submission: the gateway's acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub id: ReceiptId,
    pub received: DateTime<Utc>,
    /// Echo of the submitted record
    pub record: FormRecord,
}

impl SubmissionReceipt {
    pub fn new(record: FormRecord) -> Self {
        Self {
            id: ReceiptId::new(),
            received: Utc::now(),
            record,
        }
    }
}

/// Gateway-side failure
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("gateway unreachable: {0}")]
    Unreachable(String),
}

/// Lifecycle of the one in-flight submission per wizard instance
#[derive(Debug, Clone, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Success(SubmissionReceipt),
    Failure(String),
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionState::Success(_))
    }

    /// Whether a submission has run to completion, either way
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SubmissionState::Success(_) | SubmissionState::Failure(_)
        )
    }
}

/// The outbound submission boundary
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, record: &FormRecord) -> Result<SubmissionReceipt, GatewayError>;
}

/// Timer-based stub gateway: waits, then succeeds with an echo receipt
#[derive(Debug, Clone)]
pub struct MockGateway {
    delay: Duration,
}

impl MockGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// A gateway that resolves without waiting (used by tests)
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

#[async_trait]
impl SubmissionGateway for MockGateway {
    async fn submit(&self, record: &FormRecord) -> Result<SubmissionReceipt, GatewayError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(SubmissionReceipt::new(record.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldId;

    #[test]
    fn test_receipt_id_roundtrip() {
        let id = ReceiptId::new();
        let parsed: ReceiptId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_receipt_id_rejects_garbage() {
        assert!("REG-".parse::<ReceiptId>().is_err());
        assert!("SUB-01ARZ3NDEKTSV4RRFFQ69G5FAV".parse::<ReceiptId>().is_err());
    }

    #[tokio::test]
    async fn test_mock_gateway_echoes_record() {
        let mut record = FormRecord::new();
        record.set(FieldId::FullName, "Jane Doe");

        let gateway = MockGateway::instant();
        let receipt = gateway.submit(&record).await.unwrap();

        assert_eq!(receipt.record, record);
        assert!(receipt.id.to_string().starts_with("REG-"));
    }

    #[test]
    fn test_submission_state_predicates() {
        assert!(!SubmissionState::Idle.is_settled());
        assert!(SubmissionState::Pending.is_pending());
        assert!(SubmissionState::Failure("down".into()).is_settled());
    }
}
