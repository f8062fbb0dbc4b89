//! Journal writer
//!
//! Records land in `<dir>/<YYYY-MM-DD>.jsonl`, keyed by the protocol time of
//! the operation. Sequence numbers keep counting across files and across
//! reopening the same directory.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;
use usdi_vault::ProtocolEvent;
use uuid::Uuid;

use crate::error::EventError;
use crate::reader::EventReader;
use crate::record::JournalRecord;

/// The day file currently open for appending
struct DayFile {
    date: String,
    writer: BufWriter<File>,
}

/// Append-only JSONL journal
pub struct EventStore {
    dir: PathBuf,
    open: Option<DayFile>,
    next_sequence: u64,
}

impl EventStore {
    /// Open `dir` (created if missing) and continue after its highest sequence
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, EventError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let highest = EventReader::from_directory(&dir)?.last_sequence()?;

        Ok(Self {
            dir,
            open: None,
            next_sequence: highest.map_or(1, |seq| seq + 1),
        })
    }

    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Journal the events of one operation under a fresh correlation id
    pub fn record(
        &mut self,
        unix_secs: u64,
        events: impl IntoIterator<Item = ProtocolEvent>,
    ) -> Result<Vec<JournalRecord>, EventError> {
        let correlation_id = Uuid::new_v4();
        let mut records = Vec::new();
        for event in events {
            let record = JournalRecord::new(self.next_sequence, unix_secs, correlation_id, event)?;
            self.append(&record)?;
            records.push(record);
        }
        Ok(records)
    }

    /// Write one record to its day file and flush
    pub fn append(&mut self, record: &JournalRecord) -> Result<(), EventError> {
        let line = serde_json::to_string(record)?;
        let writer = self.writer_for(&record.file_date())?;
        writeln!(writer, "{line}")?;
        writer.flush()?;

        self.next_sequence = self.next_sequence.max(record.sequence + 1);
        Ok(())
    }

    fn writer_for(&mut self, date: &str) -> Result<&mut BufWriter<File>, EventError> {
        let day = match self.open.take() {
            Some(day) if day.date == date => day,
            previous => {
                if let Some(mut previous) = previous {
                    previous.writer.flush()?;
                }
                let path = self.file_path(date);
                let file = OpenOptions::new().create(true).append(true).open(&path)?;
                info!(file = %path.display(), "Opened journal day file");
                DayFile {
                    date: date.to_string(),
                    writer: BufWriter::new(file),
                }
            }
        };
        Ok(&mut self.open.insert(day).writer)
    }

    /// Day file for `date` (`YYYY-MM-DD`)
    pub fn file_path(&self, date: &str) -> PathBuf {
        self.dir.join(format!("{date}.jsonl"))
    }

    /// Day files present on disk, oldest first
    pub fn list_files(&self) -> Result<Vec<PathBuf>, EventError> {
        Ok(EventReader::from_directory(&self.dir)?.files().to_vec())
    }

    /// Flush and release the open day file
    pub fn close(&mut self) -> Result<(), EventError> {
        if let Some(mut day) = self.open.take() {
            day.writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventStore {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
