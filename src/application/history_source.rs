// History source trait for bulk history fetches
use crate::domain::sample::HistoryPoint;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Per-entity history, each list ordered as the source delivered it
pub type HistoryBatch = HashMap<String, Vec<HistoryPoint>>;

#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch raw states for the given entities over `[start, end]`
    async fn fetch_history(
        &self,
        entity_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<HistoryBatch>;
}

/// A fetch the console wants performed
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// Monotonic per console; newer results supersede older ones
    pub generation: u64,
    pub entity_ids: Vec<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
