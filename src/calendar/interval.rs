use anyhow::{Result, bail};
use chrono::{DateTime, Duration, Utc};

/// A half-open time interval `[start, end)`. Timestamps are stored in
/// UTC so intervals reported with different offsets compare correctly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            bail!("interval start {} must be before end {}", start, end);
        }
        Ok(Self { start, end })
    }

    /// A one hour slot beginning at `start`, the default meeting length.
    pub fn hour_slot(start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: start + Duration::hours(1),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Half-open intersection test. Intervals that merely touch
    /// (`self.end == other.start`) do not overlap, so back-to-back
    /// meetings are not a conflict.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }
}
