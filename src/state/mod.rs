//! State module for tracking what a crawl has already handled
//!
//! # Components
//!
//! - `DedupCache`: file URLs already submitted to, or found on, a shard

mod dedup;

// Re-export main types
pub use dedup::DedupCache;
