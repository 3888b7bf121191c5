pub mod client;
pub mod error;
pub mod types;

pub use client::{DEFAULT_API_URL, JobApi, NotesClient};
pub use error::ApiError;
pub use types::{NotesData, TaskResponse, TaskStatus, TopicSummary};
