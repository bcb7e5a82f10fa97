pub mod api;
pub mod assemble;
pub mod dashboard;
pub mod geo;
pub mod job;
pub mod upload;

pub use api::{AnalysisBackend, ApiClient, ApiError, JobStatus, ProgressReport, RunRequest};
pub use assemble::assemble;
pub use dashboard::{DashboardInput, DashboardView, View, render};
pub use job::{JobError, JobRunner, PollDecision, Poller};
pub use upload::{Slot, UploadError, UploadTracker};
