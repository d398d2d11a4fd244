//! Match History
//!
//! The in-memory append-only history and the JSONL match log on disk.

use bevy_ecs::prelude::*;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use sim_events::{generate_match_id, MatchRecord};

/// Resource: every match record from the run, in execution order
#[derive(Resource, Debug, Default)]
pub struct MatchHistory {
    records: Vec<MatchRecord>,
    /// Rounds that never ran because a stake came out non-positive
    pub skipped: usize,
    next_match_id: u64,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next match ID
    pub fn next_id(&mut self) -> String {
        self.next_match_id += 1;
        generate_match_id(self.next_match_id)
    }

    pub fn push(&mut self, record: MatchRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records involving a specific agent, in order.
    pub fn records_for(&self, agent_id: &str) -> Vec<&MatchRecord> {
        self.records
            .iter()
            .filter(|record| record.involves_agent(agent_id))
            .collect()
    }
}

/// Resource for logging match records to a JSONL file
#[derive(Resource)]
pub struct MatchLog {
    writer: Option<BufWriter<File>>,
}

impl MatchLog {
    /// Create a new log writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
        })
    }

    /// Create a log that discards records (for testing)
    pub fn null() -> Self {
        Self { writer: None }
    }

    /// Append a record to the file
    pub fn log(&mut self, record: &MatchRecord) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            let json = record
                .to_jsonl()
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for MatchLog {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("Warning: Failed to flush match log: {}", e);
        }
    }
}
