//! Worker identity and job submission against one shard

use crate::jobs::traits::{JobTable, JobTableResult};
use crate::jobs::{JobTableError, NewJob, NewWorker, SubmitOutcome, Worker};
use crate::state::DedupCache;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Status code the job table answers with on a successful creation
const CREATED: u16 = 200;

/// A crawler's worker on one shard
///
/// Holds the worker id the shard knows this crawler by and submits jobs
/// attributed to it.
pub struct WorkerDriver {
    table: Arc<dyn JobTable>,
    worker: Worker,
    author: String,
}

impl WorkerDriver {
    /// Adopts the first registered worker with `purpose`, or registers one
    pub async fn connect(
        table: Arc<dyn JobTable>,
        purpose: &str,
        author: &str,
    ) -> JobTableResult<Self> {
        let existing = table.find_workers(purpose).await?;

        let id = match existing.first().and_then(|record| record.id) {
            Some(id) => {
                info!("Adopted worker {} on {}", id, table.endpoint());
                id
            }
            None => {
                let created = table
                    .create_worker(&NewWorker {
                        purpose: purpose.to_string(),
                    })
                    .await?;
                let id = created
                    .id
                    .ok_or_else(|| JobTableError::MissingWorkerId(table.endpoint().to_string()))?;
                info!("Registered worker {} on {}", id, table.endpoint());
                id
            }
        };

        let worker = Worker {
            id,
            address: table.endpoint().to_string(),
            purpose: purpose.to_string(),
        };

        Ok(Self {
            table,
            worker,
            author: author.to_string(),
        })
    }

    pub fn worker(&self) -> &Worker {
        &self.worker
    }

    pub fn worker_id(&self) -> i64 {
        self.worker.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Submits `url` unless this process or the shard already has it
    ///
    /// The dedup cache is only marked once the URL is known to be on the
    /// shard, so a failed submission can be retried by a later call.
    pub async fn submit_if_absent(
        &self,
        url: &str,
        parent_url: &str,
        dedup: &DedupCache,
    ) -> SubmitOutcome {
        if dedup.contains(url) {
            debug!("{} already submitted by this crawler", url);
            return SubmitOutcome::AlreadyLocal;
        }

        match self.table.find_jobs(url).await {
            Ok(jobs) if !jobs.is_empty() => {
                debug!("{} already present on {}", url, self.table.endpoint());
                dedup.mark(url);
                return SubmitOutcome::AlreadyRemote;
            }
            Ok(_) => {}
            // Treated as absent; the creation below decides
            Err(e) => warn!("Job query for {} failed: {}", url, e),
        }

        let job = NewJob {
            message: url.to_string(),
            assigned_worker_id: self.worker.id,
            meta_data: parent_url.to_string(),
            author: self.author.clone(),
        };

        match self.table.create_job(&job).await {
            Ok(CREATED) => {
                debug!("Submitted {} to worker {}", url, self.worker.id);
                dedup.mark(url);
                SubmitOutcome::Submitted
            }
            Ok(status) => {
                warn!("Job table rejected {} with status {}", url, status);
                SubmitOutcome::Failed
            }
            Err(e) => {
                warn!("Could not submit {}: {}", url, e);
                SubmitOutcome::Failed
            }
        }
    }
}

impl std::fmt::Debug for WorkerDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerDriver")
            .field("worker", &self.worker)
            .field("author", &self.author)
            .finish()
    }
}
