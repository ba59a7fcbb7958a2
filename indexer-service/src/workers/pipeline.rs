//! The two-step addok index refresh.
//!
//! `batch` ingests the daily input file, then `ngrams` rebuilds the lookup
//! structure over the index. Each step is followed by a fixed settle delay.
//! addok gives no completion signal for whatever it does asynchronously after
//! exiting, so the delay is a heuristic, not a guarantee.

use super::executor::{CommandOutput, CommandRunner};
use crate::config::AddokConfig;
use metrics::counter;
use service_core::error::AppError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Total wait reported to callers. Constant, not measured.
pub const REPORTED_WAIT_SECS: u64 = 10;

pub const COMPLETION_MESSAGE: &str = "Batch and ngrams processing completed successfully.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Batch,
    Ngrams,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Batch => "batch",
            Step::Ngrams => "ngrams",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Batch => f.write_str("Batch"),
            Step::Ngrams => f.write_str("Ngrams"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{step} failed: {stderr}")]
    StepFailed { step: Step, stderr: String },
}

impl PipelineError {
    pub fn step(&self) -> Step {
        match self {
            PipelineError::StepFailed { step, .. } => *step,
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::CommandFailed(err.to_string())
    }
}

/// Captured stdout of both steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    pub batch_output: String,
    pub ngrams_output: String,
}

#[derive(Clone)]
pub struct IndexPipeline {
    runner: Arc<dyn CommandRunner>,
    config: AddokConfig,
}

impl IndexPipeline {
    pub fn new(runner: Arc<dyn CommandRunner>, config: AddokConfig) -> Self {
        Self { runner, config }
    }

    /// Run `batch`, settle, `ngrams`, settle.
    ///
    /// Stops at the first failing step. Nothing is rolled back: a successful
    /// batch stays applied when ngrams fails.
    pub async fn run(&self) -> Result<IndexReport, PipelineError> {
        let batch = self
            .run_step(Step::Batch, &["batch", self.config.batch_file.as_str()])
            .await?;
        self.settle().await;

        let ngrams = self.run_step(Step::Ngrams, &["ngrams"]).await?;
        self.settle().await;

        tracing::info!(
            batch_output_size = batch.stdout.len(),
            ngrams_output_size = ngrams.stdout.len(),
            "Index refresh completed"
        );

        Ok(IndexReport {
            batch_output: batch.stdout,
            ngrams_output: ngrams.stdout,
        })
    }

    async fn run_step(&self, step: Step, args: &[&str]) -> Result<CommandOutput, PipelineError> {
        tracing::info!(
            step = step.as_str(),
            bin = %self.config.bin,
            args = ?args,
            "Starting step"
        );

        let stderr = match self.runner.run(&self.config.bin, args).await {
            Ok(output) if output.success => {
                counter!("indexer_steps_total", "step" => step.as_str(), "status" => "success")
                    .increment(1);
                tracing::info!(step = step.as_str(), "Step succeeded");
                return Ok(output);
            }
            Ok(output) => output.stderr,
            // Report a process that never started like one that exited badly.
            Err(e) => e.to_string(),
        };

        counter!("indexer_steps_total", "step" => step.as_str(), "status" => "failure")
            .increment(1);
        tracing::error!(step = step.as_str(), stderr = %stderr, "Step failed");

        Err(PipelineError::StepFailed { step, stderr })
    }

    async fn settle(&self) {
        let delay = self.config.settle_delay();
        if !delay.is_zero() {
            tracing::debug!(delay_secs = delay.as_secs(), "Waiting for addok to settle");
            tokio::time::sleep(delay).await;
        }
    }
}
