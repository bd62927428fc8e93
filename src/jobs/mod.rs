//! Job table module for dispatching file targets to remote workers
//!
//! This module handles everything on the far side of the crawl:
//! - The `JobTable` interface a shard exposes, with a REST implementation and
//!   an in-memory one for dry runs
//! - Worker registration and query-before-create job submission
//! - Deterministic routing of URLs to shards
//!
//! Deduplication across crawler processes relies on querying a shard before
//! creating a job. The two calls are not atomic, so two crawlers can both see
//! a URL as absent and both submit it. Strict once-only delivery needs a
//! uniqueness constraint inside the job table itself.

mod driver;
mod memory;
mod rest;
mod router;
mod schema;
mod traits;

pub use driver::WorkerDriver;
pub use memory::{CallCounts, InMemoryJobTable};
pub use rest::RestJobTable;
pub use router::{shard_index, ShardRouter};
pub use schema::{Envelope, OneOrMany};
pub use traits::{JobTable, JobTableError, JobTableResult};

use serde::Serialize;
use serde_json::Value;

/// A job submission, as sent to the job table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewJob {
    /// The file URL to process
    pub message: String,
    /// Worker the job is attributed to
    #[serde(rename = "assignedWorker_id")]
    pub assigned_worker_id: i64,
    /// The page that referenced the file
    #[serde(rename = "metaData")]
    pub meta_data: String,
    pub author: String,
}

/// A worker registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewWorker {
    pub purpose: String,
}

/// A job as returned by a query
///
/// Fields the server sends in another shape are left empty; the record still
/// counts as a job being present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub id: Option<i64>,
    pub message: Option<String>,
}

impl JobRecord {
    /// Reads whatever fields fit out of one element of `data`
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: value.get("id").and_then(as_id),
            message: value.get("message").and_then(as_text),
        }
    }
}

/// A worker as returned by a query or registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRecord {
    pub id: Option<i64>,
    pub purpose: Option<String>,
}

impl WorkerRecord {
    /// Reads whatever fields fit out of one element of `data`
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: value.get("id").and_then(as_id),
            purpose: value.get("purpose").and_then(as_text),
        }
    }
}

/// An id sent as a number or as a numeric string
fn as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// The worker identity a crawler holds on one shard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    /// Id assigned by the job table
    pub id: i64,
    /// Endpoint of the shard the worker is registered on
    pub address: String,
    /// Declared purpose
    pub purpose: String,
}

/// Result of offering one file URL to the job tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmitOutcome {
    /// This process already handled the URL; no remote call was made
    AlreadyLocal,
    /// The shard already had a job for the URL
    AlreadyRemote,
    /// A new job was created
    Submitted,
    /// The job could not be created; the URL stays eligible for a retry
    Failed,
}
