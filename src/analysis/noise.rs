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

//! Groups that take up a disproportionate share of their dimension.

use super::dimension::GroupCounts;
use super::ranking::{percentage, rank};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoiseCandidate {
    /// Dimension key the group belongs to
    pub category: &'static str,
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Every group whose share is at least `threshold` percent.
///
/// Scans all groups, not just the displayed top rows, so a heavy hitter that
/// ranks below the cut still shows up. Results are in rank order.
#[must_use]
pub fn find_noise(
    category: &'static str,
    counts: &GroupCounts,
    threshold: f64,
) -> Vec<NoiseCandidate> {
    rank(counts)
        .into_iter()
        .filter_map(|(label, stats)| {
            let share = percentage(stats.count, counts.total);
            (share >= threshold).then(|| NoiseCandidate {
                category,
                label: label.to_string(),
                count: stats.count,
                percentage: share,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dimension::GroupStats;

    fn spread(groups: usize, heavy: usize, heavy_count: usize) -> GroupCounts {
        let mut counts = GroupCounts::default();
        for i in 0..groups {
            let count = if i == heavy { heavy_count } else { 1 };
            counts
                .groups
                .insert(format!("g{i}"), GroupStats { count, bytes: None });
            counts.total += count;
        }
        counts
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 5 of 100 is exactly 5 %
        let counts = spread(96, 0, 5);
        let noise = find_noise("src_ip", &counts, 5.0);
        assert_eq!(noise.len(), 1);
        assert_eq!(noise[0].label, "g0");
        assert_eq!(noise[0].category, "src_ip");
        assert!((noise[0].percentage - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_threshold_flags_every_group() {
        let counts = spread(4, 0, 1);
        assert_eq!(find_noise("k", &counts, 0.0).len(), 4);
    }

    #[test]
    fn test_hundred_only_flags_a_single_group() {
        let mut counts = GroupCounts::default();
        counts.groups.insert("only".to_string(), GroupStats { count: 3, bytes: None });
        counts.total = 3;
        assert_eq!(find_noise("k", &counts, 100.0).len(), 1);
        assert!(find_noise("k", &spread(2, 0, 1), 100.0).is_empty());
    }
}
