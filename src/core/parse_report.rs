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

use crate::parser::SkipReason;
use serde::Serialize;
use std::collections::BTreeMap;

/// Parsed vs skipped line counts. Only reasons that occurred are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub total_lines: usize,
    pub parsed: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl ParseReport {
    pub fn note_success(&mut self) {
        self.total_lines += 1;
        self.parsed += 1;
    }

    pub fn note_failure(&mut self, reason: SkipReason) {
        self.total_lines += 1;
        *self.skipped.entry(reason).or_insert(0) += 1;
    }

    #[must_use]
    pub fn skip_count(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    #[must_use]
    pub fn skip_ratio(&self) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        self.skipped_total() as f64 / self.total_lines as f64
    }

    /// `format-mismatch=12, empty=3`
    #[must_use]
    pub fn skip_summary(&self) -> String {
        self.skipped
            .iter()
            .map(|(reason, count)| format!("{reason}={count}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
