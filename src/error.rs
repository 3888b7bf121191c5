use thiserror::Error;

use crate::api::ApiError;

/// Failure to create a job. Never retried by the poller.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("a notes job is already in progress: {job_id}. Resume or clear it first.")]
    AlreadyActive { job_id: String },

    #[error("poller is busy; submissions are only accepted while idle")]
    NotIdle,

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("server accepted the upload but returned no task id")]
    MissingTaskId,

    #[error("upload failed: {0}")]
    Api(#[from] ApiError),

    #[error("could not persist job handle: {0}")]
    Store(#[from] StoreError),
}

/// Terminal failure of a job that was being polled.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("gave up after {failures} consecutive failed status checks: {last_error}")]
    Exhausted { failures: u32, last_error: String },

    #[error("notes generation failed on the server: {message}")]
    JobFailed { message: String },

    #[error("server reported the job completed but sent no notes")]
    MissingResult,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_active_names_the_job() {
        let err = SubmissionError::AlreadyActive {
            job_id: "t-42".into(),
        };
        assert!(err.to_string().contains("t-42"));
    }

    #[test]
    fn api_error_converts_into_submission_error() {
        let err: SubmissionError = ApiError::Status {
            status: 502,
            message: "bad gateway".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "upload failed: API error (status 502): bad gateway"
        );
    }

    #[test]
    fn exhausted_display() {
        let err = PollError::Exhausted {
            failures: 3,
            last_error: "network error: connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "gave up after 3 consecutive failed status checks: network error: connection refused"
        );
    }
}
