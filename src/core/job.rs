use std::time::Duration;

use serde_json::Value;

use crate::config::ApiSettings;
use crate::core::api::{AnalysisBackend, ApiError, JobStatus, ProgressReport, RunRequest};
use crate::core::assemble::assemble;
use crate::models::AnalysisResults;

pub const DEFAULT_FAILURE_MESSAGE: &str = "Analysis failed. Check the analysis server logs.";

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("an analysis job is already running")]
    AlreadyRunning,
    #[error("failed to submit analysis job: {0}")]
    Submit(#[source] ApiError),
    #[error("failed to query analysis progress: {0}")]
    Progress(#[source] ApiError),
    #[error("{0}")]
    Failed(String),
    #[error("analysis did not finish after {attempts} status checks")]
    TimedOut { attempts: u32 },
    #[error("failed to fetch analysis results: {0}")]
    Results(#[source] ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollDecision {
    /// Still running; carries the reported progress in percent.
    Continue(f64),
    Done,
    Failed(String),
    TimedOut { attempts: u32 },
}

impl PollDecision {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollDecision::Continue(_))
    }
}

/// Turns successive `/progress` reports into a decision, bounded by a
/// maximum number of checks.
#[derive(Debug, Clone)]
pub struct Poller {
    attempts: u32,
    max_attempts: u32,
}

impl Poller {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempts: 0,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn observe(&mut self, report: &ProgressReport) -> PollDecision {
        self.attempts += 1;
        match report.status {
            JobStatus::Done => PollDecision::Done,
            JobStatus::Error => PollDecision::Failed(
                report
                    .error
                    .clone()
                    .filter(|msg| !msg.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            ),
            JobStatus::Idle | JobStatus::Running | JobStatus::Unknown => {
                if self.attempts >= self.max_attempts {
                    PollDecision::TimedOut {
                        attempts: self.attempts,
                    }
                } else {
                    PollDecision::Continue(report.progress.clamp(0.0, 100.0))
                }
            }
        }
    }
}

/// Submits one job at a time and follows it to completion.
#[derive(Debug)]
pub struct JobRunner<B> {
    backend: B,
    base_url: String,
    poll_interval: Duration,
    max_attempts: u32,
    in_flight: bool,
}

impl<B: AnalysisBackend> JobRunner<B> {
    pub fn new(backend: B, base_url: impl Into<String>, settings: &ApiSettings) -> Self {
        Self {
            backend,
            base_url: base_url.into(),
            poll_interval: settings.poll_interval(),
            max_attempts: settings.max_poll_attempts,
            in_flight: false,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Send both documents once. No retry.
    pub async fn submit(&mut self, legal: &Value, nogo: &Value) -> Result<(), JobError> {
        if self.in_flight {
            return Err(JobError::AlreadyRunning);
        }
        let request = RunRequest::new(legal.clone(), nogo.clone());
        self.backend.submit(&request).await.map_err(|e| {
            tracing::error!("Job submission failed: {}", e);
            JobError::Submit(e)
        })?;
        tracing::info!("Analysis job submitted");
        self.in_flight = true;
        Ok(())
    }

    /// Poll until the job reaches a terminal state, then fetch and assemble
    /// the results.
    pub async fn wait_for_results(
        &mut self,
        mut on_progress: impl FnMut(f64),
    ) -> Result<AnalysisResults, JobError> {
        {
            let _in_flight = InFlight(&mut self.in_flight);
            poll_until_terminal(
                &self.backend,
                self.poll_interval,
                self.max_attempts,
                &mut on_progress,
            )
            .await?;
        }

        let raw = self.backend.results().await.map_err(JobError::Results)?;
        let results = assemble(raw, &self.base_url);
        tracing::info!(
            "Loaded {} periods and {} no-go zone(s)",
            results.legal.len(),
            results.zones.len()
        );
        Ok(results)
    }

    /// Forget a submitted job without waiting for it. The backend is not
    /// told; its next result is simply never fetched.
    pub fn cancel(&mut self) {
        if std::mem::take(&mut self.in_flight) {
            tracing::info!("Analysis job abandoned");
        }
    }

    pub async fn run(
        &mut self,
        legal: &Value,
        nogo: &Value,
        on_progress: impl FnMut(f64),
    ) -> Result<AnalysisResults, JobError> {
        self.submit(legal, nogo).await?;
        self.wait_for_results(on_progress).await
    }
}

/// Clears the in-flight flag when polling ends, including when the polling
/// future is dropped part way.
struct InFlight<'a>(&'a mut bool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

async fn poll_until_terminal<B: AnalysisBackend>(
    backend: &B,
    poll_interval: Duration,
    max_attempts: u32,
    on_progress: &mut impl FnMut(f64),
) -> Result<(), JobError> {
    let mut poller = Poller::new(max_attempts);
    loop {
        tokio::time::sleep(poll_interval).await;
        let report = backend.progress().await.map_err(|e| {
            tracing::error!("Progress check failed: {}", e);
            JobError::Progress(e)
        })?;

        match poller.observe(&report) {
            PollDecision::Continue(progress) => {
                tracing::debug!("Job progress {}%", progress);
                on_progress(progress);
            }
            PollDecision::Done => {
                on_progress(100.0);
                tracing::info!("Analysis job finished after {} checks", poller.attempts());
                return Ok(());
            }
            PollDecision::Failed(message) => {
                tracing::error!("Analysis job failed: {}", message);
                return Err(JobError::Failed(message));
            }
            PollDecision::TimedOut { attempts } => {
                tracing::error!("Analysis job timed out after {} checks", attempts);
                return Err(JobError::TimedOut { attempts });
            }
        }
    }
}
