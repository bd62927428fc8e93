//! In-process job table
//!
//! Backs `--dry-run` and the tests. Jobs and workers live in memory only and
//! the table can be told to reject creations or to act unreachable.

use crate::jobs::traits::{JobTable, JobTableError, JobTableResult};
use crate::jobs::{JobRecord, NewJob, NewWorker, WorkerRecord};
use async_trait::async_trait;
use parking_lot::Mutex;

/// Number of calls made against an [`InMemoryJobTable`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub find_workers: usize,
    pub create_worker: usize,
    pub find_jobs: usize,
    pub create_job: usize,
}

#[derive(Debug)]
struct TableState {
    workers: Vec<WorkerRecord>,
    jobs: Vec<NewJob>,
    next_worker_id: i64,
    calls: CallCounts,
    create_status: u16,
    unavailable: bool,
}

/// Job table held entirely in memory
#[derive(Debug)]
pub struct InMemoryJobTable {
    endpoint: String,
    state: Mutex<TableState>,
}

impl InMemoryJobTable {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            state: Mutex::new(TableState {
                workers: Vec::new(),
                jobs: Vec::new(),
                next_worker_id: 1,
                calls: CallCounts::default(),
                create_status: 200,
                unavailable: false,
            }),
        }
    }

    /// Preloads a job as if another crawler had already submitted it
    pub fn with_job(self, message: impl Into<String>) -> Self {
        self.state.lock().jobs.push(NewJob {
            message: message.into(),
            assigned_worker_id: 0,
            meta_data: String::new(),
            author: String::new(),
        });
        self
    }

    /// Preloads a registered worker
    pub fn with_worker(self, id: i64, purpose: impl Into<String>) -> Self {
        {
            let mut state = self.state.lock();
            state.workers.push(WorkerRecord {
                id: Some(id),
                purpose: Some(purpose.into()),
            });
            state.next_worker_id = state.next_worker_id.max(id + 1);
        }
        self
    }

    /// Makes every later job creation answer with `status`
    pub fn set_create_status(&self, status: u16) {
        self.state.lock().create_status = status;
    }

    /// Makes every later call fail as if the shard were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unavailable = unavailable;
    }

    /// Jobs stored so far, preloaded ones included
    pub fn jobs(&self) -> Vec<NewJob> {
        self.state.lock().jobs.clone()
    }

    /// Registered workers
    pub fn workers(&self) -> Vec<WorkerRecord> {
        self.state.lock().workers.clone()
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().calls
    }

    fn check_available(&self, state: &TableState) -> JobTableResult<()> {
        if state.unavailable {
            return Err(JobTableError::Unavailable(self.endpoint.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl JobTable for InMemoryJobTable {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn find_workers(&self, purpose: &str) -> JobTableResult<Vec<WorkerRecord>> {
        let mut state = self.state.lock();
        state.calls.find_workers += 1;
        self.check_available(&state)?;

        Ok(state
            .workers
            .iter()
            .filter(|w| w.purpose.as_deref() == Some(purpose))
            .cloned()
            .collect())
    }

    async fn create_worker(&self, worker: &NewWorker) -> JobTableResult<WorkerRecord> {
        let mut state = self.state.lock();
        state.calls.create_worker += 1;
        self.check_available(&state)?;

        let record = WorkerRecord {
            id: Some(state.next_worker_id),
            purpose: Some(worker.purpose.clone()),
        };
        state.next_worker_id += 1;
        state.workers.push(record.clone());
        Ok(record)
    }

    async fn find_jobs(&self, message: &str) -> JobTableResult<Vec<JobRecord>> {
        let mut state = self.state.lock();
        state.calls.find_jobs += 1;
        self.check_available(&state)?;

        Ok(state
            .jobs
            .iter()
            .enumerate()
            .filter(|(_, job)| job.message == message)
            .map(|(index, job)| JobRecord {
                id: Some(index as i64 + 1),
                message: Some(job.message.clone()),
            })
            .collect())
    }

    async fn create_job(&self, job: &NewJob) -> JobTableResult<u16> {
        let mut state = self.state.lock();
        state.calls.create_job += 1;
        self.check_available(&state)?;

        if state.create_status == 200 {
            state.jobs.push(job.clone());
        }
        Ok(state.create_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(message: &str) -> NewJob {
        NewJob {
            message: message.to_string(),
            assigned_worker_id: 1,
            meta_data: "https://a.com/".to_string(),
            author: "tester".to_string(),
        }
    }

    #[tokio::test]
    async fn test_created_jobs_are_found() {
        let table = InMemoryJobTable::new("memory://0");
        assert!(table.find_jobs("https://a.com/x.png").await.unwrap().is_empty());

        assert_eq!(table.create_job(&job("https://a.com/x.png")).await.unwrap(), 200);
        assert_eq!(table.find_jobs("https://a.com/x.png").await.unwrap().len(), 1);
        assert_eq!(table.calls().find_jobs, 2);
        assert_eq!(table.calls().create_job, 1);
    }

    #[tokio::test]
    async fn test_rejected_creation_is_not_stored() {
        let table = InMemoryJobTable::new("memory://0");
        table.set_create_status(500);

        assert_eq!(table.create_job(&job("https://a.com/x.png")).await.unwrap(), 500);
        assert!(table.jobs().is_empty());
    }

    #[tokio::test]
    async fn test_worker_ids_follow_preloaded() {
        let table = InMemoryJobTable::new("memory://0").with_worker(4, "Indexing");
        assert!(table.find_workers("Crawling").await.unwrap().is_empty());

        let created = table
            .create_worker(&NewWorker {
                purpose: "Crawling".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, Some(5));
        assert_eq!(table.find_workers("Crawling").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_table_errors() {
        let table = InMemoryJobTable::new("memory://0");
        table.set_unavailable(true);

        assert!(matches!(
            table.find_jobs("x").await,
            Err(JobTableError::Unavailable(_))
        ));
        assert!(table.create_job(&job("x")).await.is_err());
        assert_eq!(table.calls().create_job, 1);
    }
}
