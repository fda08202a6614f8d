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

//! Vendor syslog parsing and summary statistics.
//!
//! ```no_run
//! use logsift::{analyze, parse_file, ParseOptions, Vendor};
//!
//! # fn main() -> logsift::Result<()> {
//! let result = parse_file("fw.log".as_ref(), Vendor::PaloAlto, &ParseOptions::default())?;
//! let bundle = analyze(&result, 5, 5.0)?;
//! for table in &bundle.tables {
//!     println!("{}: {} distinct", table.title, table.distinct);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod core;
pub mod error;
pub mod parser;
pub mod report;

pub use analysis::{analyze, AnalysisBundle, AnalysisRow, AnalysisTable, NoiseCandidate};
pub use config::AnalyzerConfig;
pub use crate::core::{ParseReport, TrendPoint, VolumeTrend};
pub use error::{Error, Result};
pub use parser::record_types::{LogLevel, Record, RecordCore};
pub use parser::{parse, parse_file, parse_reader, ParseOptions, ParseResult, SkipReason, Vendor};
