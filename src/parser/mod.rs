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

pub mod envelope;
pub mod kv;
pub mod meraki;
pub mod palo_alto;
pub mod record_types;
pub mod unifi;
pub mod watchguard;

use crate::core::{FrozenRecords, ParseReport, RecordStore};
use crate::error::{Error, Result};
use envelope::{Envelope, LineClassifier};
use fancy_regex::Regex;
use record_types::Record;
use serde::Serialize;
use std::fmt;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Instant;

// Template normalization patterns
static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}\b")
        .expect("valid regex literal")
});
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]+://[^\s]+").expect("valid regex literal"));
static MAC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[0-9a-f]{2}(?::[0-9a-f]{2}){5}\b").expect("valid regex literal")
});
static IPV4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,3}(?:\.\d{1,3}){3}(?::\d+)?\b").expect("valid regex literal")
});
static HEX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b0x[0-9a-f]+\b|\b[0-9a-f]{8,}\b").expect("valid regex literal")
});
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\b").expect("valid regex literal"));
static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex literal"));

/// Share of skipped lines above which a run is reported as suspicious
const SUSPICIOUS_SKIP_RATIO: f64 = 0.5;

/// Why a line did not produce a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// Syslog envelope present but the payload is not this vendor's shape
    FormatMismatch,
    /// Blank or whitespace-only line
    Empty,
    /// No `Mon D HH:MM:SS host` prefix
    MissingPrefix,
}

impl SkipReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FormatMismatch => "format-mismatch",
            Self::Empty => "empty",
            Self::MissingPrefix => "missing-prefix",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported log sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Vendor {
    PaloAlto,
    UniFi,
    WatchGuard,
    Meraki,
}

impl Vendor {
    pub const ALL: [Self; 4] = [Self::PaloAlto, Self::UniFi, Self::WatchGuard, Self::Meraki];

    /// Human readable product name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PaloAlto => "Palo Alto Networks",
            Self::UniFi => "UniFi",
            Self::WatchGuard => "WatchGuard",
            Self::Meraki => "Meraki",
        }
    }

    /// Rows per summary table when neither config nor CLI says otherwise
    #[must_use]
    pub const fn default_top(self) -> usize {
        match self {
            Self::PaloAlto => 5,
            Self::UniFi | Self::WatchGuard | Self::Meraki => 10,
        }
    }

    #[must_use]
    pub const fn decoder(self) -> &'static dyn Decoder {
        match self {
            Self::PaloAlto => &palo_alto::PaloAltoDecoder,
            Self::UniFi => &unifi::UniFiDecoder,
            Self::WatchGuard => &watchguard::WatchGuardDecoder,
            Self::Meraki => &meraki::MerakiDecoder,
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Vendor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "palo-alto" | "paloalto" | "palo_alto" | "palo" | "pan" => Ok(Self::PaloAlto),
            "unifi" => Ok(Self::UniFi),
            "watchguard" | "wg" => Ok(Self::WatchGuard),
            "meraki" => Ok(Self::Meraki),
            _ => Err(Error::UnsupportedVendor(s.to_string())),
        }
    }
}

/// Turns a classified line into a vendor record.
///
/// Implementations validate the payload shape before extracting fields and
/// only ever fail with [`SkipReason::FormatMismatch`].
pub trait Decoder: Send + Sync {
    fn decode(&self, envelope: &Envelope<'_>, line_number: usize) -> Result<Record, SkipReason>;

    fn vendor(&self) -> Vendor;
}

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Year assumed for syslog prefix timestamps
    pub year: i32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            year: envelope::current_year(),
        }
    }
}

/// Outcome of one parse run. Immutable once built.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub vendor: Vendor,
    pub records: FrozenRecords,
    pub report: ParseReport,
}

/// Streaming state of a single parse run
struct ParseSession {
    classifier: LineClassifier,
    decoder: &'static dyn Decoder,
    store: RecordStore,
    report: ParseReport,
}

impl ParseSession {
    fn new(vendor: Vendor, options: &ParseOptions) -> Self {
        Self {
            classifier: LineClassifier::new(options.year),
            decoder: vendor.decoder(),
            store: RecordStore::new(),
            report: ParseReport::default(),
        }
    }

    fn feed(&mut self, raw: &str) {
        let line_number = self.report.total_lines + 1;
        let line = raw.trim_end_matches(['\n', '\r']);

        let outcome = self
            .classifier
            .classify(line)
            .and_then(|envelope| self.decoder.decode(&envelope, line_number));

        match outcome {
            Ok(record) => {
                self.store.append(record);
                self.report.note_success();
            }
            Err(reason) => {
                tracing::trace!("line {line_number}: {reason}");
                self.report.note_failure(reason);
            }
        }
    }

    fn finish(self, started: Instant) -> ParseResult {
        let vendor = self.decoder.vendor();
        let report = self.report;

        tracing::info!(
            "Parsed {} {} records from {} lines in {:?}",
            report.parsed,
            vendor.name(),
            report.total_lines,
            started.elapsed()
        );
        if report.total_lines > 0 && report.skip_ratio() >= SUSPICIOUS_SKIP_RATIO {
            tracing::warn!(
                "{:.0}% of lines were skipped ({}); is {} the right parser?",
                report.skip_ratio() * 100.0,
                report.skip_summary(),
                vendor.name()
            );
        }

        ParseResult {
            vendor,
            records: self.store.finalize(),
            report,
        }
    }
}

/// Parse an in-memory sequence of lines with the given vendor's decoder.
///
/// Malformed lines never fail the run; they are counted in the report.
pub fn parse<I>(lines: I, vendor: Vendor, options: &ParseOptions) -> ParseResult
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    profiling::scope!("parse");
    let started = Instant::now();
    let mut session = ParseSession::new(vendor, options);
    for line in lines {
        session.feed(line.as_ref());
    }
    session.finish(started)
}

/// Parse lines from a reader. Invalid UTF-8 is replaced, read errors abort
/// the run without a partial result.
pub fn parse_reader<R: BufRead>(
    mut reader: R,
    vendor: Vendor,
    options: &ParseOptions,
) -> Result<ParseResult> {
    profiling::scope!("parse_reader");
    let started = Instant::now();
    let mut session = ParseSession::new(vendor, options);
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        session.feed(&String::from_utf8_lossy(&buffer));
    }

    Ok(session.finish(started))
}

pub fn parse_file(path: &Path, vendor: Vendor, options: &ParseOptions) -> Result<ParseResult> {
    tracing::info!("Parsing {} as {}", path.display(), vendor.name());
    let file = std::fs::File::open(path)?;
    parse_reader(std::io::BufReader::new(file), vendor, options)
}

/// Normalize a log message into a template key so that messages differing
/// only in addresses, ids and counters group together
#[must_use]
pub fn message_template(message: &str) -> String {
    let mut normalized = message.to_lowercase();

    // UUIDs before hex, since UUIDs contain hex runs
    normalized = UUID_PATTERN.replace_all(&normalized, "<UUID>").into_owned();
    normalized = URL_PATTERN.replace_all(&normalized, "<URL>").into_owned();
    normalized = MAC_PATTERN.replace_all(&normalized, "<MAC>").into_owned();
    normalized = IPV4_PATTERN.replace_all(&normalized, "<IP>").into_owned();
    normalized = HEX_PATTERN.replace_all(&normalized, "<HEX>").into_owned();
    normalized = NUMBER_PATTERN.replace_all(&normalized, "<NUM>").into_owned();
    normalized = WHITESPACE_PATTERN.replace_all(&normalized, " ").into_owned();

    normalized.trim().to_string()
}
