//! Client side of the PDF-to-notes workflow: upload a PDF, persist a handle
//! to the server-side job, poll until it ends, hand back the notes.

pub mod api;
pub mod config;
pub mod document;
pub mod error;
pub mod notes;
pub mod poller;
pub mod store;

pub use document::DocumentUpload;
pub use error::{PollError, StoreError, SubmissionError};
pub use notes::{GeneratedNote, NoteEntry};
pub use poller::{JobHandle, JobListener, JobOutcome, JobPoller, PollSettings, PollerState};
pub use store::{FileHandleStore, HandleStore, MemoryHandleStore};
