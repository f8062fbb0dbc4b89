//! USDi Events - JSONL journal
//!
//! Committed protocol events are appended as one JSON object per line, in
//! daily files named after the record timestamp (`YYYY-MM-DD.jsonl`).

pub mod error;
pub mod reader;
pub mod record;
pub mod store;

pub use error::EventError;
pub use reader::EventReader;
pub use record::JournalRecord;
pub use store::EventStore;
