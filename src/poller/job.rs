use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PollError;
use crate::notes::NoteEntry;

/// The persisted reference to the job being tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub job_id: String,
    pub submitted_at: DateTime<Utc>,
    /// Name of the uploaded file, for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl JobHandle {
    pub fn new(job_id: String, file_name: Option<String>) -> Self {
        Self {
            job_id,
            submitted_at: Utc::now(),
            file_name,
        }
    }
}

/// Timing and failure budgets for the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay before each status request.
    pub interval: Duration,
    /// Ticks allowed before the job is declared timed out.
    pub max_attempts: u32,
    /// Consecutive transport failures tolerated before giving up.
    pub max_consecutive_failures: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 60,
            max_consecutive_failures: 3,
        }
    }
}

impl PollSettings {
    /// Longest a job can be tracked before timing out.
    pub fn deadline(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

/// How a tracked job ended.
#[derive(Debug)]
pub enum JobOutcome {
    Completed(Vec<NoteEntry>),
    Failed(PollError),
    TimedOut { attempts: u32 },
}
