mod fixtures;
mod mock_backend;

pub use fixtures::*;
pub use mock_backend::*;

// Re-export commonly used types from minewatch for tests
pub use minewatch::config::ApiSettings;
pub use minewatch::core::{
    ApiClient, ApiError, DashboardInput, JobError, JobRunner, Slot, UploadTracker, render,
};
pub use minewatch::{AnalysisResults, Channel};
