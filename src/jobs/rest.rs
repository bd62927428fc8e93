//! JSON-over-HTTP job table client
//!
//! Queries are `GET` requests with the filter in the query string; creations
//! are `POST` requests with a JSON body. Both answer with an [`Envelope`].

use crate::config::JobTableConfig;
use crate::jobs::schema::Envelope;
use crate::jobs::traits::{JobTable, JobTableError, JobTableResult};
use crate::jobs::{JobRecord, NewJob, NewWorker, WorkerRecord};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Job table of one shard, reached over HTTP
#[derive(Debug, Clone)]
pub struct RestJobTable {
    client: Client,
    endpoint: String,
    job_url: String,
    worker_url: String,
}

impl RestJobTable {
    /// Creates a client for the shard at `endpoint` using the configured paths
    pub fn new(client: Client, endpoint: &str, config: &JobTableConfig) -> Self {
        Self::with_paths(client, endpoint, &config.job_path, &config.worker_path)
    }

    /// Creates a client with explicit resource paths
    pub fn with_paths(client: Client, endpoint: &str, job_path: &str, worker_path: &str) -> Self {
        let base = endpoint.trim_end_matches('/');
        Self {
            client,
            endpoint: base.to_string(),
            job_url: format!("{}{}", base, job_path),
            worker_url: format!("{}{}", base, worker_path),
        }
    }

    /// Runs a filtered `GET` and returns the elements of `data` untouched
    ///
    /// Elements are not decoded into records here, so an element in an
    /// unexpected shape still counts towards the result.
    async fn query(&self, url: &str, params: &[(&str, &str)]) -> JobTableResult<Vec<Value>> {
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(JobTableError::Status {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        let envelope: Envelope<Value> =
            response
                .json()
                .await
                .map_err(|e| JobTableError::Decode {
                    endpoint: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(envelope.into_records())
    }
}

#[async_trait]
impl JobTable for RestJobTable {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn find_workers(&self, purpose: &str) -> JobTableResult<Vec<WorkerRecord>> {
        let records = self.query(&self.worker_url, &[("purpose", purpose)]).await?;
        Ok(records.iter().map(WorkerRecord::from_value).collect())
    }

    async fn create_worker(&self, worker: &NewWorker) -> JobTableResult<WorkerRecord> {
        let response = self.client.post(&self.worker_url).json(worker).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(JobTableError::Status {
                endpoint: self.worker_url.clone(),
                status: status.as_u16(),
            });
        }

        let envelope: Envelope<Value> =
            response
                .json()
                .await
                .map_err(|e| JobTableError::Decode {
                    endpoint: self.worker_url.clone(),
                    message: e.to_string(),
                })?;

        envelope
            .into_records()
            .iter()
            .map(WorkerRecord::from_value)
            .find(|record| record.id.is_some())
            .ok_or_else(|| JobTableError::MissingWorkerId(self.endpoint.clone()))
    }

    async fn find_jobs(&self, message: &str) -> JobTableResult<Vec<JobRecord>> {
        let records = self.query(&self.job_url, &[("message", message)]).await?;
        Ok(records.iter().map(JobRecord::from_value).collect())
    }

    async fn create_job(&self, job: &NewJob) -> JobTableResult<u16> {
        let response = self.client.post(&self.job_url).json(job).send().await?;
        let http_status = response.status().as_u16();
        let body = response.text().await?;

        // The envelope's status_code wins; fall back to the HTTP status
        let status_code = serde_json::from_str::<Envelope<Value>>(&body)
            .ok()
            .and_then(|envelope| envelope.status_code)
            .unwrap_or(http_status);

        Ok(status_code)
    }
}
