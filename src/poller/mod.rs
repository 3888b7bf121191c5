mod driver;
mod job;
mod state;

pub use driver::{JobListener, JobPoller};
pub use job::{JobHandle, JobOutcome, PollSettings};
pub use state::{PollTracker, PollerState, Tick};
