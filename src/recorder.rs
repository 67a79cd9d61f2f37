//! Prompt recording.
//!
//! A [`PromptRecorder`] observes every successful (input, response) pair a bot
//! produces. Recording is opt-in: bots default to [`NoopRecorder`].
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`PromptRecord`] | One recorded exchange |
//! | [`PromptRecorder`] | Trait for record destinations |
//! | [`NoopRecorder`] | Default sink (records nothing) |
//! | [`InMemoryRecorder`] | Bounded in-memory sink for tests and inspection |

use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

fn timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// One recorded exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub prompt: String,
    pub response: String,
    pub timestamp: f64,
}

impl PromptRecord {
    pub fn new(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.into(),
            timestamp: timestamp(),
        }
    }
}

/// Destination for recorded exchanges.
pub trait PromptRecorder: Send + Sync {
    fn record(&self, record: PromptRecord) -> Result<()>;
}

/// Records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecorder;

impl PromptRecorder for NoopRecorder {
    fn record(&self, _record: PromptRecord) -> Result<()> {
        Ok(())
    }
}

pub fn noop_recorder() -> Arc<dyn PromptRecorder> {
    Arc::new(NoopRecorder)
}

/// In-memory recorder keeping the most recent `max_records` entries.
#[derive(Debug)]
pub struct InMemoryRecorder {
    records: RwLock<Vec<PromptRecord>>,
    max_records: usize,
}

impl InMemoryRecorder {
    pub fn new(max: usize) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            max_records: max.max(1),
        }
    }

    pub fn records(&self) -> Vec<PromptRecord> {
        match self.records.read() {
            Ok(r) => r.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut records = match self.records.write() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.clear();
    }
}

impl PromptRecorder for InMemoryRecorder {
    fn record(&self, record: PromptRecord) -> Result<()> {
        let mut records = match self.records.write() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push(record);
        if records.len() > self.max_records {
            records.remove(0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_keeps_latest() {
        let rec = InMemoryRecorder::new(2);
        for i in 0..3 {
            rec.record(PromptRecord::new(format!("p{}", i), format!("r{}", i)))
                .unwrap();
        }
        let got: Vec<_> = rec.records().into_iter().map(|r| r.prompt).collect();
        assert_eq!(got, vec!["p1", "p2"]);

        rec.clear();
        assert!(rec.is_empty());
    }

    #[test]
    fn test_noop_accepts_everything() {
        noop_recorder()
            .record(PromptRecord::new("in", "out"))
            .unwrap();
    }

    #[test]
    fn test_record_has_timestamp() {
        let r = PromptRecord::new("a", "b");
        assert!(r.timestamp > 0.0);
    }
}
