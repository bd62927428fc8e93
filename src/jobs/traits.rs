//! Job table trait and error types
//!
//! This module defines the interface a shard's job table must offer and the
//! errors its operations can produce.

use crate::jobs::{JobRecord, NewJob, NewWorker, WorkerRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur talking to a job table
#[derive(Debug, Error)]
pub enum JobTableError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("Malformed response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("No worker id in response from {0}")]
    MissingWorkerId(String),

    #[error("Shard {0} is unavailable")]
    Unavailable(String),
}

/// Result type for job table operations
pub type JobTableResult<T> = Result<T, JobTableError>;

/// One shard's job table
///
/// Implementations must be shareable across tasks. Query and create are
/// separate calls, so a query that reports a job as absent says nothing about
/// what another crawler creates a moment later.
#[async_trait]
pub trait JobTable: Send + Sync {
    /// Address of the shard, used for logging and worker identity
    fn endpoint(&self) -> &str;

    // ===== Workers =====

    /// Lists workers registered with the given purpose
    async fn find_workers(&self, purpose: &str) -> JobTableResult<Vec<WorkerRecord>>;

    /// Registers a new worker and returns its record
    async fn create_worker(&self, worker: &NewWorker) -> JobTableResult<WorkerRecord>;

    // ===== Jobs =====

    /// Lists jobs whose message equals `message`
    async fn find_jobs(&self, message: &str) -> JobTableResult<Vec<JobRecord>>;

    /// Creates a job, returning the `status_code` of the response envelope
    ///
    /// Only a transport-level failure is an error; a rejected job is an
    /// `Ok` with a status other than 200.
    async fn create_job(&self, job: &NewJob) -> JobTableResult<u16>;
}
