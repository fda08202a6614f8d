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

//! Run-level errors.
//!
//! Malformed lines never end up here; they are counted as
//! [`SkipReason`](crate::parser::SkipReason)s in the parse report.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported vendor '{0}' (expected one of: palo-alto, unifi, watchguard, meraki)")]
    UnsupportedVendor(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Nothing could be decoded. Callers report the zero-record run and carry on.
    #[error("No records parsed (checked {total_lines} lines)")]
    EmptyInput { total_lines: usize },

    #[error("Cannot read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
