use crate::{
    config::ApiSettings,
    core::{ApiClient, Poller, UploadTracker},
};

#[derive(Debug, Clone)]
pub struct ActiveJob {
    pub generation: u64,
    pub poller: Poller,
}

/// State shared by all screens for the lifetime of the window.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: ApiSettings,
    pub client: ApiClient,
    pub uploads: UploadTracker,
    job: Option<ActiveJob>,
    generation: u64,
}

impl AppState {
    pub fn new(settings: ApiSettings, client: ApiClient) -> Self {
        Self {
            settings,
            client,
            uploads: UploadTracker::new(),
            job: None,
            generation: 0,
        }
    }

    pub fn is_job_in_flight(&self) -> bool {
        self.job.is_some()
    }

    /// Reserve a new job generation, or `None` while another job is running.
    pub fn start_job(&mut self) -> Option<u64> {
        if self.job.is_some() {
            return None;
        }
        self.generation += 1;
        self.job = Some(ActiveJob {
            generation: self.generation,
            poller: Poller::new(self.settings.max_poll_attempts),
        });
        Some(self.generation)
    }

    pub fn active_job_mut(&mut self, generation: u64) -> Option<&mut ActiveJob> {
        self.job
            .as_mut()
            .filter(|job| job.generation == generation)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.job
            .as_ref()
            .is_some_and(|job| job.generation == generation)
    }

    pub fn finish_job(&mut self, generation: u64) {
        if self.is_current(generation) {
            self.job = None;
        }
    }

    pub fn cancel_job(&mut self) {
        if let Some(job) = self.job.take() {
            tracing::info!("Job {} cancelled by user", job.generation);
        }
    }
}
