//! Query Descriptor for Stream Sources
//!
//! A passive value holder describing where a stream of records comes from:
//! the statement text, the owning organization and the time range it covers.
//! Time fields sit behind a lock so a descriptor shared between threads can be
//! cloned into an independent copy at any point.

use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Query descriptor construction errors
#[derive(Error, Debug, PartialEq)]
pub enum QueryError {
    #[error("Invalid time range: start {start:?} is after stop {stop:?}")]
    InvalidTimeRange { start: SystemTime, stop: SystemTime },
    #[error("Empty query statement provided")]
    EmptyStatement,
}

/// Time range covered by a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Start of the range (inclusive)
    pub start: SystemTime,
    /// End of the range (inclusive)
    pub stop: SystemTime,
}

impl TimeRange {
    /// Create a validated time range
    pub fn new(start: SystemTime, stop: SystemTime) -> Result<Self, QueryError> {
        if start > stop {
            return Err(QueryError::InvalidTimeRange { start, stop });
        }
        Ok(Self { start, stop })
    }

    /// Range covering everything from the epoch up to `now`
    pub fn until_now() -> Self {
        Self {
            start: UNIX_EPOCH,
            stop: SystemTime::now(),
        }
    }
}

/// Lock-guarded portion of the descriptor
#[derive(Debug, Clone, Copy)]
struct QueryTimes {
    range: TimeRange,
    now: SystemTime,
}

/// Query descriptor for a stream source
#[derive(Debug)]
pub struct FluxQuery {
    stmt: String,
    org: String,
    org_id: String,
    times: Mutex<QueryTimes>,
}

impl FluxQuery {
    /// Create a descriptor from a statement, organization and time range
    pub fn new(
        stmt: impl Into<String>,
        org: impl Into<String>,
        org_id: impl Into<String>,
        range: TimeRange,
    ) -> Result<Self, QueryError> {
        let stmt = stmt.into();
        if stmt.trim().is_empty() {
            return Err(QueryError::EmptyStatement);
        }

        Ok(Self {
            stmt,
            org: org.into(),
            org_id: org_id.into(),
            times: Mutex::new(QueryTimes {
                range,
                now: SystemTime::now(),
            }),
        })
    }

    /// The statement text
    pub fn stmt(&self) -> &str {
        &self.stmt
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// Current time range
    pub fn time_range(&self) -> TimeRange {
        self.lock_times().range
    }

    /// Reference "now" the query was evaluated against
    pub fn now(&self) -> SystemTime {
        self.lock_times().now
    }

    /// Move the start of the range, keeping it no later than the stop
    pub fn set_start_time(&self, start: SystemTime) -> Result<(), QueryError> {
        let mut times = self.lock_times();
        times.range = TimeRange::new(start, times.range.stop)?;
        Ok(())
    }

    /// Move the stop of the range, keeping it no earlier than the start
    pub fn set_stop_time(&self, stop: SystemTime) -> Result<(), QueryError> {
        let mut times = self.lock_times();
        times.range = TimeRange::new(times.range.start, stop)?;
        Ok(())
    }

    pub fn set_now(&self, now: SystemTime) {
        self.lock_times().now = now;
    }

    /// Serializable snapshot used in pipeline summaries
    pub fn summary(&self) -> QuerySummary {
        let times = *self.lock_times();
        QuerySummary {
            stmt: self.stmt.clone(),
            org: self.org.clone(),
            org_id: self.org_id.clone(),
            start: unix_seconds(times.range.start),
            stop: unix_seconds(times.range.stop),
        }
    }

    // Times are plain Copy data, so a poisoned lock still holds a valid value
    fn lock_times(&self) -> MutexGuard<'_, QueryTimes> {
        self.times.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for FluxQuery {
    /// Deep clone taken under the descriptor lock
    fn clone(&self) -> Self {
        let times = *self.lock_times();
        Self {
            stmt: self.stmt.clone(),
            org: self.org.clone(),
            org_id: self.org_id.clone(),
            times: Mutex::new(times),
        }
    }
}

impl fmt::Display for FluxQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stmt)
    }
}

/// Plain-data view of a [`FluxQuery`]
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuerySummary {
    pub stmt: String,
    pub org: String,
    pub org_id: String,
    /// Range start as seconds since the Unix epoch
    pub start: u64,
    /// Range stop as seconds since the Unix epoch
    pub stop: u64,
}

fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
