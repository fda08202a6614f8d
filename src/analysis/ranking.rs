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

use super::dimension::{GroupCounts, GroupStats};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRow {
    pub label: String,
    pub count: usize,
    /// Share of the dimension total, 0..=100, unrounded
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

/// Top groups of one dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisTable {
    pub key: &'static str,
    pub title: &'static str,
    pub rows: Vec<AnalysisRow>,
    /// Number of groups before truncation
    pub distinct: usize,
    /// Sum of all group counts
    pub total: usize,
    pub truncated: bool,
}

impl AnalysisTable {
    /// Rank groups by count, most frequent first. Ties keep first-seen order.
    #[must_use]
    pub fn build(
        key: &'static str,
        title: &'static str,
        counts: &GroupCounts,
        top: usize,
    ) -> Self {
        let ranked = rank(counts);
        let distinct = ranked.len();

        let rows = ranked
            .into_iter()
            .take(top)
            .map(|(label, stats)| AnalysisRow {
                label: label.to_string(),
                count: stats.count,
                percentage: percentage(stats.count, counts.total),
                bytes: stats.bytes,
            })
            .collect();

        Self {
            key,
            title,
            rows,
            distinct,
            total: counts.total,
            truncated: distinct > top,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[must_use]
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// All groups sorted by count descending. `sort_by` is stable, so the
/// insertion order of [`GroupCounts`] breaks ties.
#[must_use]
pub fn rank(counts: &GroupCounts) -> Vec<(&str, GroupStats)> {
    let mut ranked: Vec<(&str, GroupStats)> = counts
        .groups
        .iter()
        .map(|(label, stats)| (label.as_str(), *stats))
        .collect();
    ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn counts(groups: &[(&str, usize)]) -> GroupCounts {
        let groups: IndexMap<String, GroupStats> = groups
            .iter()
            .map(|&(label, count)| {
                (
                    label.to_string(),
                    GroupStats {
                        count,
                        bytes: None,
                    },
                )
            })
            .collect();
        let total = groups.values().map(|stats| stats.count).sum();
        GroupCounts { groups, total }
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let table = AnalysisTable::build(
            "k",
            "K",
            &counts(&[("b", 2), ("a", 5), ("c", 2), ("d", 2)]),
            3,
        );
        let labels: Vec<&str> = table.rows.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
        assert!(table.truncated);
        assert_eq!(table.distinct, 4);
        assert_eq!(table.total, 11);
    }

    #[test]
    fn test_not_truncated_when_everything_fits() {
        let table = AnalysisTable::build("k", "K", &counts(&[("a", 1), ("b", 1)]), 2);
        assert!(!table.truncated);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_percentages_cover_the_total() {
        let table = AnalysisTable::build("k", "K", &counts(&[("a", 1), ("b", 1), ("c", 1)]), 10);
        let sum: f64 = table.rows.iter().map(|row| row.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        // Full precision, no rounding to two places
        assert!((table.rows[0].percentage - 100.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_counts() {
        let table = AnalysisTable::build("k", "K", &GroupCounts::default(), 5);
        assert!(table.is_empty());
        assert_eq!(table.total, 0);
        assert!(!table.truncated);
        assert!(percentage(0, 0).abs() < f64::EPSILON);
    }
}
