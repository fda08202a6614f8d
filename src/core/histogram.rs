// LogSift - GPL-3.0-or-later
// This file is part of LogSift.
//
// Copyright (C) 2026 Daniel Freiermuth
//
// LogSift is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// LogSift is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with LogSift.  If not, see <https://www.gnu.org/licenses/>.

//! Per-minute event volume, filled while records are appended.

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;

/// Truncate a timestamp to the start of its minute
#[must_use]
pub fn minute_bucket(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub minute: NaiveDateTime,
    pub count: usize,
}

/// Volume per minute in time order. Minutes without events are absent, not
/// zero; callers that need a continuous series fill the gaps themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VolumeTrend {
    pub points: Vec<TrendPoint>,
    /// Records without a usable timestamp
    pub untimed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MinuteHistogram {
    buckets: BTreeMap<NaiveDateTime, usize>,
    untimed: usize,
}

impl MinuteHistogram {
    pub fn add(&mut self, timestamp: Option<NaiveDateTime>) {
        match timestamp {
            Some(ts) => *self.buckets.entry(minute_bucket(ts)).or_insert(0) += 1,
            None => self.untimed += 1,
        }
    }

    /// Number of distinct minutes seen
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    #[must_use]
    pub const fn untimed(&self) -> usize {
        self.untimed
    }

    #[must_use]
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.buckets.keys().next()?;
        let last = self.buckets.keys().next_back()?;
        Some((*first, *last))
    }

    #[must_use]
    pub fn trend(&self) -> VolumeTrend {
        profiling::scope!("MinuteHistogram::trend");
        VolumeTrend {
            points: self
                .buckets
                .iter()
                .map(|(&minute, &count)| TrendPoint { minute, count })
                .collect(),
            untimed: self.untimed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 4)
            .and_then(|d| d.and_hms_milli_opt(h, m, s, 250))
            .expect("valid test time")
    }

    #[test]
    fn test_buckets_are_ordered_and_sparse() {
        let mut histogram = MinuteHistogram::default();
        for ts in [at(11, 9, 1), at(11, 8, 44), at(11, 8, 2), at(11, 12, 0)] {
            histogram.add(Some(ts));
        }
        histogram.add(None);

        let trend = histogram.trend();
        let minutes: Vec<(u32, usize)> = trend
            .points
            .iter()
            .map(|p| (p.minute.minute(), p.count))
            .collect();
        assert_eq!(minutes, [(8, 2), (9, 1), (12, 1)]);
        assert_eq!(trend.untimed, 1);
        assert!(trend.points.iter().all(|p| p.minute.second() == 0 && p.minute.nanosecond() == 0));
    }

    #[test]
    fn test_time_range() {
        let mut histogram = MinuteHistogram::default();
        assert_eq!(histogram.time_range(), None);
        histogram.add(Some(at(10, 0, 30)));
        histogram.add(Some(at(9, 59, 59)));
        let (start, end) = histogram.time_range().expect("non-empty");
        assert_eq!((start.hour(), start.minute()), (9, 59));
        assert_eq!((end.hour(), end.minute()), (10, 0));
    }
}
