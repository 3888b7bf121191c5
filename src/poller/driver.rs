use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::job::{JobHandle, JobOutcome, PollSettings};
use super::state::{PollTracker, PollerState, Tick};
use crate::api::{JobApi, TaskStatus};
use crate::document::DocumentUpload;
use crate::error::{PollError, StoreError, SubmissionError};
use crate::notes::NoteEntry;
use crate::store::HandleStore;

/// Receives progress and the final outcome of a job.
///
/// Exactly one of `on_completed`, `on_failed` or `on_timed_out` is called per
/// job.
pub trait JobListener: Send + Sync {
    fn on_submitted(&self, _handle: &JobHandle, _message: &str) {}

    /// Called after every tick. `status` is `None` when the request failed.
    fn on_tick(&self, _job_id: &str, _attempt: u32, _status: Option<TaskStatus>) {}

    fn on_completed(&self, job_id: &str, notes: &[NoteEntry]);

    fn on_failed(&self, job_id: &str, error: &PollError);

    fn on_timed_out(&self, job_id: &str, attempts: u32);
}

impl<T: JobListener + ?Sized> JobListener for Arc<T> {
    fn on_submitted(&self, handle: &JobHandle, message: &str) {
        (**self).on_submitted(handle, message)
    }

    fn on_tick(&self, job_id: &str, attempt: u32, status: Option<TaskStatus>) {
        (**self).on_tick(job_id, attempt, status)
    }

    fn on_completed(&self, job_id: &str, notes: &[NoteEntry]) {
        (**self).on_completed(job_id, notes)
    }

    fn on_failed(&self, job_id: &str, error: &PollError) {
        (**self).on_failed(job_id, error)
    }

    fn on_timed_out(&self, job_id: &str, attempts: u32) {
        (**self).on_timed_out(job_id, attempts)
    }
}

/// Submits a document and tracks the resulting job until it ends.
pub struct JobPoller<A, S, L> {
    api: A,
    store: S,
    listener: L,
    settings: PollSettings,
    state: PollerState,
}

impl<A: JobApi, S: HandleStore, L: JobListener> JobPoller<A, S, L> {
    pub fn new(api: A, store: S, listener: L, settings: PollSettings) -> Self {
        Self {
            api,
            store,
            listener,
            settings,
            state: PollerState::Idle,
        }
    }

    pub fn state(&self) -> &PollerState {
        &self.state
    }

    /// Upload `doc` and start tracking the job the server creates.
    ///
    /// Returns as soon as the handle is persisted; call [`run`](Self::run)
    /// to wait for the notes. On error the poller stays idle and nothing is
    /// persisted.
    pub async fn submit(&mut self, doc: &DocumentUpload) -> Result<JobHandle, SubmissionError> {
        if self.state != PollerState::Idle {
            return Err(SubmissionError::NotIdle);
        }
        if let Some(existing) = self.store.load().await? {
            return Err(SubmissionError::AlreadyActive {
                job_id: existing.job_id,
            });
        }

        self.state = PollerState::Submitting;
        info!(file = %doc.file_name, bytes = doc.bytes.len(), "uploading document");

        match self.create_job(doc).await {
            Ok(handle) => {
                info!(job_id = %handle.job_id, "notes job created");
                self.state = PollerState::Polling {
                    job_id: handle.job_id.clone(),
                };
                Ok(handle)
            }
            Err(e) => {
                warn!(error = %e, "submission failed");
                self.state = PollerState::Idle;
                Err(e)
            }
        }
    }

    async fn create_job(&self, doc: &DocumentUpload) -> Result<JobHandle, SubmissionError> {
        let resp = self.api.submit_document(doc).await?;
        if resp.task_id.trim().is_empty() {
            return Err(SubmissionError::MissingTaskId);
        }

        let handle = JobHandle::new(resp.task_id, Some(doc.file_name.clone()));
        self.store.save(&handle).await?;
        self.listener.on_submitted(&handle, &resp.message);
        Ok(handle)
    }

    /// Pick up a job persisted by an earlier run.
    ///
    /// No-op unless the poller is idle and a handle exists.
    pub async fn resume(&mut self) -> Result<Option<JobHandle>, StoreError> {
        if self.state != PollerState::Idle {
            return Ok(None);
        }
        let Some(handle) = self.store.load().await? else {
            debug!("no persisted notes job to resume");
            return Ok(None);
        };

        info!(job_id = %handle.job_id, "resuming notes job");
        self.state = PollerState::Polling {
            job_id: handle.job_id.clone(),
        };
        Ok(Some(handle))
    }

    /// Poll until the job ends or `cancel` fires.
    ///
    /// Returns `None` without touching the network when there is nothing to
    /// poll, and `None` on cancellation. A cancelled job keeps its persisted
    /// handle so it can be resumed later.
    pub async fn run(&mut self, cancel: &CancellationToken) -> Option<JobOutcome> {
        let job_id = self.state.job_id()?.to_string();
        let mut tracker = PollTracker::new(&self.settings);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(job_id = %job_id, attempts = tracker.attempts(), "polling cancelled, handle kept");
                    return None;
                }
                _ = sleep(self.settings.interval) => {}
            }

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(job_id = %job_id, attempts = tracker.attempts(), "polling cancelled mid-request, handle kept");
                    return None;
                }
                r = self.api.fetch_status(&job_id) => r,
            };

            let status = response.as_ref().ok().map(|r| r.status);
            let error = response.as_ref().err().map(ToString::to_string);

            let tick = tracker.observe(response);
            self.listener.on_tick(&job_id, tracker.attempts(), status);

            if let Some(error) = error {
                warn!(
                    job_id = %job_id,
                    attempt = tracker.attempts(),
                    failures = tracker.consecutive_failures(),
                    error = %error,
                    "status check failed"
                );
            }

            let outcome = match tick {
                Tick::Continue => {
                    debug!(
                        job_id = %job_id,
                        attempt = tracker.attempts(),
                        max = self.settings.max_attempts,
                        status = ?status,
                        "job still running"
                    );
                    continue;
                }
                Tick::Complete(notes) => JobOutcome::Completed(notes),
                Tick::Fail(err) => JobOutcome::Failed(err),
                Tick::TimeOut { attempts } => JobOutcome::TimedOut { attempts },
            };

            return Some(self.finish(&job_id, outcome).await);
        }
    }

    // Terminal transition: drop the handle, record the state, notify once.
    async fn finish(&mut self, job_id: &str, outcome: JobOutcome) -> JobOutcome {
        if let Err(e) = self.store.clear().await {
            warn!(job_id = %job_id, error = %e, "failed to clear persisted job handle");
        }

        match &outcome {
            JobOutcome::Completed(notes) => {
                info!(job_id = %job_id, sections = notes.len(), "notes generated");
                self.state = PollerState::Completed;
                self.listener.on_completed(job_id, notes);
            }
            JobOutcome::Failed(err) => {
                warn!(job_id = %job_id, error = %err, "notes job failed");
                self.state = PollerState::Failed;
                self.listener.on_failed(job_id, err);
            }
            JobOutcome::TimedOut { attempts } => {
                warn!(job_id = %job_id, attempts, "notes job timed out");
                self.state = PollerState::TimedOut;
                self.listener.on_timed_out(job_id, *attempts);
            }
        }

        outcome
    }
}

impl<A, S, L> JobPoller<A, S, L>
where
    A: JobApi + 'static,
    S: HandleStore + 'static,
    L: JobListener + 'static,
{
    /// Run the poll loop on its own task.
    pub fn spawn(mut self, cancel: CancellationToken) -> JoinHandle<Option<JobOutcome>> {
        tokio::spawn(async move { self.run(&cancel).await })
    }
}
