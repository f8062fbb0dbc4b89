//! JSONL event reader - sequential reader for inspection and replay

use crate::error::EventError;
use crate::record::JournalRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Sequential event reader
pub struct EventReader {
    files: Vec<PathBuf>,
}

fn read_file(path: &Path) -> Result<Vec<JournalRecord>, EventError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| EventError::InvalidFile {
            file: path.display().to_string(),
            line: index + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }

    Ok(records)
}

impl EventReader {
    /// Create a new reader from a directory; a missing directory reads as empty
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, EventError> {
        let path = path.as_ref();
        let mut files = Vec::new();

        if path.exists() {
            for entry in std::fs::read_dir(path)? {
                let file_path = entry?.path();
                if file_path.extension().is_some_and(|ext| ext == "jsonl") {
                    files.push(file_path);
                }
            }
        }

        files.sort();

        Ok(Self { files })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Read all records from all files, ordered by sequence
    ///
    /// A restarted simulation can append to an older day file, so file
    /// order alone is not write order.
    pub fn read_all(&self) -> Result<Vec<JournalRecord>, EventError> {
        let mut records = Vec::new();
        for file_path in &self.files {
            records.extend(read_file(file_path)?);
        }
        records.sort_by_key(|record| record.sequence);
        Ok(records)
    }

    /// The most recent `limit` records, oldest first
    pub fn read_last(&self, limit: usize) -> Result<Vec<JournalRecord>, EventError> {
        let mut records = self.read_all()?;
        let skip = records.len().saturating_sub(limit);
        Ok(records.split_off(skip))
    }

    /// Highest sequence number across all files
    pub fn last_sequence(&self) -> Result<Option<u64>, EventError> {
        let mut highest = None;
        for file_path in &self.files {
            let last = read_file(file_path)?.iter().map(|r| r.sequence).max();
            highest = highest.max(last);
        }
        Ok(highest)
    }

    /// Count total records across all files
    pub fn count(&self) -> Result<usize, EventError> {
        let mut count = 0;

        for file_path in &self.files {
            let reader = BufReader::new(File::open(file_path)?);
            for line in reader.lines() {
                if !line?.trim().is_empty() {
                    count += 1;
                }
            }
        }

        Ok(count)
    }
}
