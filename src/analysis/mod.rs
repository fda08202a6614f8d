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

//! Summary statistics over a finished parse run.

pub mod battery;
pub mod dimension;
pub mod noise;
pub mod ranking;

pub use battery::battery;
pub use dimension::{Dimension, GroupCounts, GroupStats, KeyExtractor};
pub use noise::{find_noise, NoiseCandidate};
pub use ranking::{AnalysisRow, AnalysisTable};

use crate::core::VolumeTrend;
use crate::error::{Error, Result};
use crate::parser::{ParseResult, Vendor};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

/// Everything the report shows for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisBundle {
    pub vendor: Vendor,
    pub record_count: usize,
    /// Vendor battery order
    pub tables: Vec<AnalysisTable>,
    pub trend: VolumeTrend,
    /// Battery order, then rank order within each dimension
    pub noise: Vec<NoiseCandidate>,
}

impl AnalysisBundle {
    #[must_use]
    pub fn table(&self, key: &str) -> Option<&AnalysisTable> {
        self.tables.iter().find(|table| table.key == key)
    }
}

fn validate(top: usize, noise_threshold: f64) -> Result<()> {
    if top == 0 {
        return Err(Error::InvalidParameter(
            "top must be at least 1".to_string(),
        ));
    }
    if !noise_threshold.is_finite() || !(0.0..=100.0).contains(&noise_threshold) {
        return Err(Error::InvalidParameter(format!(
            "noise threshold must be a percentage between 0 and 100, got {noise_threshold}"
        )));
    }
    Ok(())
}

/// Compute the vendor's tables, the per-minute trend and noise candidates.
///
/// Dimensions are independent and run in parallel; the output does not depend
/// on scheduling. An empty run yields empty tables rather than an error.
pub fn analyze(result: &ParseResult, top: usize, noise_threshold: f64) -> Result<AnalysisBundle> {
    profiling::scope!("analyze");
    validate(top, noise_threshold)?;

    let started = Instant::now();
    let records = &*result.records;
    let dimensions = battery(result.vendor);

    let computed: Vec<(AnalysisTable, Vec<NoiseCandidate>)> = dimensions
        .par_iter()
        .map(|dimension| {
            let counts = dimension.count(records);
            let table = AnalysisTable::build(dimension.key, dimension.title, &counts, top);
            let noise = if dimension.noise {
                find_noise(dimension.key, &counts, noise_threshold)
            } else {
                Vec::new()
            };
            tracing::debug!(
                "{}: {} groups over {} entries, {} noisy",
                dimension.key,
                table.distinct,
                table.total,
                noise.len()
            );
            (table, noise)
        })
        .collect();

    let (tables, noise): (Vec<_>, Vec<_>) = computed.into_iter().unzip();
    let noise: Vec<NoiseCandidate> = noise.into_iter().flatten().collect();

    tracing::info!(
        "Analyzed {} {} records into {} tables in {:?}",
        records.len(),
        result.vendor.name(),
        tables.len(),
        started.elapsed()
    );

    Ok(AnalysisBundle {
        vendor: result.vendor,
        record_count: records.len(),
        tables,
        trend: result.records.volume().trend(),
        noise,
    })
}
