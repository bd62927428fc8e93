//! Deterministic URL to shard routing

use crate::config::JobTableConfig;
use crate::jobs::driver::WorkerDriver;
use crate::jobs::rest::RestJobTable;
use crate::jobs::traits::{JobTable, JobTableResult};
use crate::jobs::SubmitOutcome;
use crate::state::DedupCache;
use crate::url::url_digest;
use crate::ConfigError;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Index of the shard responsible for `url` among `shard_count` shards
///
/// The first eight bytes of the URL's SHA-256 digest, read big-endian,
/// modulo the shard count. Returns `None` when there are no shards.
pub fn shard_index(url: &str, shard_count: usize) -> Option<usize> {
    if shard_count == 0 {
        return None;
    }
    let digest = url_digest(url);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    Some((u64::from_be_bytes(prefix) % shard_count as u64) as usize)
}

struct Shard {
    table: Arc<dyn JobTable>,
    driver: OnceCell<Arc<WorkerDriver>>,
}

/// Fixed, ordered pool of job table shards
pub struct ShardRouter {
    shards: Vec<Shard>,
    purpose: String,
    author: String,
}

impl ShardRouter {
    /// Creates a router over `tables`, in routing order
    pub fn new(
        tables: Vec<Arc<dyn JobTable>>,
        purpose: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        if tables.is_empty() {
            return Err(ConfigError::Validation(
                "at least one job table shard is required".to_string(),
            ));
        }

        let shards = tables
            .into_iter()
            .map(|table| Shard {
                table,
                driver: OnceCell::new(),
            })
            .collect();

        Ok(Self {
            shards,
            purpose: purpose.into(),
            author: author.into(),
        })
    }

    /// Creates a router with one REST job table per configured endpoint
    pub fn from_config(client: Client, config: &JobTableConfig) -> Result<Self, ConfigError> {
        let tables = config
            .shards
            .iter()
            .map(|endpoint| {
                Arc::new(RestJobTable::new(client.clone(), endpoint, config)) as Arc<dyn JobTable>
            })
            .collect();
        Self::new(tables, &config.purpose, &config.author)
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    /// Shard endpoints in routing order
    pub fn endpoints(&self) -> Vec<&str> {
        self.shards.iter().map(|shard| shard.table.endpoint()).collect()
    }

    /// Index of the shard that owns `url`
    pub fn route(&self, url: &str) -> usize {
        shard_index(url, self.shards.len()).unwrap_or(0)
    }

    /// The worker driver for the shard owning `url`
    ///
    /// The driver is built on first use. A failed build is not kept, so the
    /// next call for that shard tries again.
    pub async fn driver_for(&self, url: &str) -> JobTableResult<Arc<WorkerDriver>> {
        let shard = &self.shards[self.route(url)];
        let driver = shard
            .driver
            .get_or_try_init(|| async {
                WorkerDriver::connect(shard.table.clone(), &self.purpose, &self.author)
                    .await
                    .map(Arc::new)
            })
            .await?;
        Ok(driver.clone())
    }

    /// Offers a file URL to the shard that owns it
    pub async fn dispatch(&self, url: &str, parent_url: &str, dedup: &DedupCache) -> SubmitOutcome {
        if dedup.contains(url) {
            debug!("{} already submitted by this crawler", url);
            return SubmitOutcome::AlreadyLocal;
        }

        match self.driver_for(url).await {
            Ok(driver) => driver.submit_if_absent(url, parent_url, dedup).await,
            Err(e) => {
                warn!("No worker on shard {} for {}: {}", self.route(url), url, e);
                SubmitOutcome::Failed
            }
        }
    }
}

impl std::fmt::Debug for ShardRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardRouter")
            .field("shards", &self.endpoints())
            .field("purpose", &self.purpose)
            .field("author", &self.author)
            .finish()
    }
}
