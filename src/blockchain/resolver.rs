//! Day window and start-block lookup

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone};
use moka::future::Cache;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::blockchain::client::ExplorerApi;
use crate::session::QueryError;

const WINDOW_OPEN_SECS: i64 = 8 * 3600;
const WINDOW_CLOSE_SECS: i64 = 24 * 3600 - 1;
/// Quarter-hour steps searched back for the offset in force before a DST gap.
const GAP_SEARCH_STEPS: i64 = 4 * 24;

/// Inclusive `[start, end]` range of unix seconds that a query analyses:
/// 08:00:00 through 23:59:59 local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayWindow {
    pub start: i64,
    pub end: i64,
}

impl DayWindow {
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn today() -> Self {
        Self::for_day(&Local::now())
    }

    /// Window for the calendar day `now` falls on, in `now`'s timezone.
    pub fn for_day<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let midnight = now.date_naive().and_time(NaiveTime::default());

        let start = local_timestamp(&tz, midnight + TimeDelta::seconds(WINDOW_OPEN_SECS));
        let end = local_timestamp(&tz, midnight + TimeDelta::seconds(WINDOW_CLOSE_SECS));
        Self { start, end }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

fn local_timestamp<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> i64 {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt.timestamp();
    }

    // Skipped by a DST jump: read the wall time with the offset in force
    // before the gap, which lands as far past the gap as it was into it.
    let offset = (1..=GAP_SEARCH_STEPS)
        .find_map(|step| {
            tz.from_local_datetime(&(naive - TimeDelta::minutes(15 * step)))
                .latest()
        })
        .map(|dt| dt.offset().fix().local_minus_utc())
        .unwrap_or(0);
    naive.and_utc().timestamp() - i64::from(offset)
}

/// Resolves a timestamp to the latest block at or before it.
#[derive(Clone)]
pub struct BlockWindowResolver {
    blocks: Cache<i64, u64>,
}

impl BlockWindowResolver {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let blocks = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self { blocks }
    }

    pub async fn resolve<A: ExplorerApi>(
        &self,
        api: &A,
        timestamp: i64,
        api_key: &str,
    ) -> Result<u64, QueryError> {
        if api_key.trim().is_empty() {
            return Err(QueryError::Configuration);
        }

        if let Some(block) = self.blocks.get(&timestamp).await {
            debug!("Block lookup cache hit: {} -> {}", timestamp, block);
            return Ok(block);
        }

        let response = api.block_by_timestamp(timestamp, api_key).await.map_err(|e| {
            warn!("Block lookup for {} failed: {}", timestamp, e);
            QueryError::from(e)
        })?;

        if !response.is_ok() {
            warn!("Block lookup for {} rejected: {}", timestamp, response.message);
            return Err(QueryError::Upstream(format!(
                "block lookup rejected: {}",
                response.message
            )));
        }

        let block = parse_block_number(&response.result)?;
        self.blocks.insert(timestamp, block).await;
        info!("Resolved timestamp {} to block {}", timestamp, block);
        Ok(block)
    }
}

fn parse_block_number(result: &Value) -> Result<u64, QueryError> {
    let parsed = match result {
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    parsed.ok_or_else(|| QueryError::Upstream(format!("unexpected block number: {}", result)))
}
