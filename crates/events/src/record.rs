//! Journal record - one line of the JSONL journal

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use usdi_vault::ProtocolEvent;
use uuid::Uuid;

use crate::error::EventError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    /// Strictly increasing across the whole journal, starting at 1
    pub sequence: u64,
    /// Protocol time of the operation
    pub timestamp: DateTime<Utc>,
    /// Shared by every record produced by one operation
    pub correlation_id: Uuid,
    pub event: ProtocolEvent,
}

impl JournalRecord {
    pub fn new(
        sequence: u64,
        unix_secs: u64,
        correlation_id: Uuid,
        event: ProtocolEvent,
    ) -> Result<Self, EventError> {
        let timestamp = i64::try_from(unix_secs)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(EventError::InvalidTimestamp(unix_secs))?;
        Ok(Self {
            sequence,
            timestamp,
            correlation_id,
            event,
        })
    }

    /// Journal file this record belongs to
    pub fn file_date(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}
