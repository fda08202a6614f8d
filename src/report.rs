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

//! Text and JSON renderings of a parse run and its analysis.

use crate::analysis::{AnalysisBundle, AnalysisTable};
use crate::core::ParseReport;
use crate::parser::ParseResult;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::{self, Write};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const LABEL_WIDTH: usize = 40;
/// Busiest minutes listed in the text report; JSON carries the full trend
const PEAK_MINUTES: usize = 5;

/// Serialized form of a whole run
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub parse: &'a ParseReport,
    /// First and last minute with timestamped records
    pub time_range: Option<(NaiveDateTime, NaiveDateTime)>,
    pub analysis: &'a AnalysisBundle,
}

impl<'a> Report<'a> {
    #[must_use]
    pub fn new(result: &'a ParseResult, analysis: &'a AnalysisBundle) -> Self {
        Self {
            parse: &result.report,
            time_range: result.records.volume().time_range(),
            analysis,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.parse;
        let bundle = self.analysis;

        writeln!(out, "{} log summary", bundle.vendor.name())?;
        write!(
            out,
            "  Lines: {}  Parsed: {}  Skipped: {}",
            report.total_lines,
            report.parsed,
            report.skipped_total()
        )?;
        if report.skipped.is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, " ({})", report.skip_summary())?;
        }

        let points = &bundle.trend.points;
        if let Some((first, last)) = self.time_range {
            writeln!(
                out,
                "  Time range: {} .. {} ({} active minutes)",
                first.format(TIME_FORMAT),
                last.format(TIME_FORMAT),
                points.len()
            )?;
        }
        if bundle.trend.untimed > 0 {
            writeln!(out, "  Records without timestamp: {}", bundle.trend.untimed)?;
        }

        for table in bundle.tables.iter().filter(|table| !table.is_empty()) {
            writeln!(out)?;
            write_table(out, table)?;
        }

        if !bundle.noise.is_empty() {
            writeln!(out)?;
            writeln!(out, "Noise candidates")?;
            for candidate in &bundle.noise {
                writeln!(
                    out,
                    "  {:<20} {:<LABEL_WIDTH$} {:>8} {:>7.2}%",
                    candidate.category,
                    truncate(&candidate.label),
                    candidate.count,
                    candidate.percentage
                )?;
            }
        }

        let mut peaks: Vec<_> = points.iter().collect();
        peaks.sort_by(|a, b| b.count.cmp(&a.count));
        if !peaks.is_empty() {
            writeln!(out)?;
            writeln!(out, "Busiest minutes")?;
            for point in peaks.into_iter().take(PEAK_MINUTES) {
                writeln!(out, "  {}  {:>8}", point.minute.format(TIME_FORMAT), point.count)?;
            }
        }

        Ok(())
    }
}

fn write_table(out: &mut impl Write, table: &AnalysisTable) -> fmt::Result {
    if table.truncated {
        writeln!(out, "{} (top {} of {})", table.title, table.rows.len(), table.distinct)?;
    } else {
        writeln!(out, "{}", table.title)?;
    }
    for row in &table.rows {
        write!(
            out,
            "  {:<LABEL_WIDTH$} {:>8} {:>7.2}%",
            truncate(&row.label),
            row.count,
            row.percentage
        )?;
        match row.bytes {
            Some(bytes) => writeln!(out, " {:>10}", format_bytes(bytes))?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}

fn truncate(label: &str) -> String {
    if label.chars().count() <= LABEL_WIDTH {
        return label.to_string();
    }
    let mut short: String = label.chars().take(LABEL_WIDTH - 3).collect();
    short.push_str("...");
    short
}

/// `1536` -> `1.5 KiB`
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
