use std::fmt;

use super::job::PollSettings;
use crate::api::{ApiError, TaskResponse, TaskStatus};
use crate::error::PollError;
use crate::notes::NoteEntry;

/// Lifecycle of the poller.
///
/// IDLE → SUBMITTING → POLLING → {COMPLETED, FAILED, TIMED_OUT}
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Submitting,
    Polling { job_id: String },
    Completed,
    Failed,
    TimedOut,
}

impl PollerState {
    pub fn job_id(&self) -> Option<&str> {
        match self {
            PollerState::Polling { job_id } => Some(job_id),
            _ => None,
        }
    }
}

impl fmt::Display for PollerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollerState::Idle => write!(f, "IDLE"),
            PollerState::Submitting => write!(f, "SUBMITTING"),
            PollerState::Polling { job_id } => write!(f, "POLLING({job_id})"),
            PollerState::Completed => write!(f, "COMPLETED"),
            PollerState::Failed => write!(f, "FAILED"),
            PollerState::TimedOut => write!(f, "TIMED_OUT"),
        }
    }
}

/// What the poll loop should do after one tick.
#[derive(Debug)]
pub enum Tick {
    Continue,
    Complete(Vec<NoteEntry>),
    Fail(PollError),
    TimeOut { attempts: u32 },
}

/// Counts ticks and transport failures, and turns each status response into
/// a [`Tick`].
#[derive(Debug, Clone)]
pub struct PollTracker {
    max_attempts: u32,
    max_failures: u32,
    attempts: u32,
    consecutive_failures: u32,
}

impl PollTracker {
    pub fn new(settings: &PollSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            max_failures: settings.max_consecutive_failures.max(1),
            attempts: 0,
            consecutive_failures: 0,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Record the result of one status request.
    ///
    /// Every call counts as an attempt. A terminal response on the last
    /// attempt wins over the timeout.
    pub fn observe(&mut self, response: Result<TaskResponse, ApiError>) -> Tick {
        self.attempts += 1;

        let tick = match response {
            Ok(resp) => {
                self.consecutive_failures = 0;
                Self::classify(resp)
            }
            Err(err) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures >= self.max_failures {
                    Tick::Fail(PollError::Exhausted {
                        failures: self.consecutive_failures,
                        last_error: err.to_string(),
                    })
                } else {
                    Tick::Continue
                }
            }
        };

        match tick {
            Tick::Continue if self.attempts >= self.max_attempts => Tick::TimeOut {
                attempts: self.attempts,
            },
            other => other,
        }
    }

    fn classify(resp: TaskResponse) -> Tick {
        match resp.status {
            TaskStatus::Completed => match resp.result {
                Some(notes) => Tick::Complete(notes.into_entries()),
                None => Tick::Fail(PollError::MissingResult),
            },
            TaskStatus::Failed => Tick::Fail(PollError::JobFailed {
                message: if resp.message.is_empty() {
                    "no details given".to_string()
                } else {
                    resp.message
                },
            }),
            TaskStatus::Pending | TaskStatus::Processing | TaskStatus::Unknown => Tick::Continue,
        }
    }
}
