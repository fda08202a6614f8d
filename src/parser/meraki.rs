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

//! Meraki MX syslog.
//!
//! The device sends its own epoch clock, which replaces the relay's syslog
//! timestamp on the record.

use super::envelope::Envelope;
use super::kv::parse_key_values;
use super::record_types::{LogLevel, MerakiRecord, Origin, Record};
use super::{Decoder, SkipReason, Vendor};
use chrono::{DateTime, NaiveDateTime};
use fancy_regex::Regex;
use indexmap::IndexMap;
use std::sync::LazyLock;

static PAYLOAD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?<sequence>\d+)\s+(?<epoch>\d+(?:\.\d+)?)\s+(?<role>\S+)\s+(?<event_type>\S+)(?:\s+(?<tail>.*))?$",
    )
    .expect("valid regex literal")
});

const NANOS_DIGITS: usize = 9;

/// Keys without which an event of the given type carries no usable data
const fn required_keys(event_type: &str) -> &'static [&'static str] {
    match event_type.as_bytes() {
        b"ip_flow_start" | b"ip_flow_end" | b"firewall" => &["src", "dst", "protocol"],
        b"urls" => &["src", "dst"],
        _ => &[],
    }
}

#[must_use]
pub fn categorize_event(event_type: &str, message: &str) -> &'static str {
    match event_type {
        "ip_flow_start" | "ip_flow_end" => "network-flow",
        "urls" => "web-security",
        "firewall" => "firewall",
        "events" if message.to_lowercase().contains("dhcp") => "dhcp",
        "events" => "system-events",
        _ => "other",
    }
}

#[must_use]
pub fn infer_level(event_type: &str, message: &str) -> LogLevel {
    let message = message.to_lowercase();
    match event_type {
        "firewall" if message.contains("deny") || message.contains("block") => LogLevel::Warning,
        "events" if message.contains("error") || message.contains("fail") => LogLevel::Error,
        _ => LogLevel::Info,
    }
}

/// `1762300804.143040390` as UTC wall clock
fn epoch_to_datetime(epoch: &str) -> Option<NaiveDateTime> {
    let (seconds, fraction) = epoch.split_once('.').unwrap_or((epoch, ""));
    let seconds: i64 = seconds.parse().ok()?;
    let nanos = if fraction.is_empty() {
        0
    } else {
        let digits: String = fraction
            .chars()
            .chain(std::iter::repeat('0'))
            .take(NANOS_DIGITS)
            .collect();
        digits.parse().ok()?
    };
    DateTime::from_timestamp(seconds, nanos).map(|utc| utc.naive_utc())
}

pub struct MerakiDecoder;

impl Decoder for MerakiDecoder {
    fn decode(&self, envelope: &Envelope<'_>, line_number: usize) -> Result<Record, SkipReason> {
        let caps = PAYLOAD_PATTERN
            .captures(envelope.payload)
            .ok()
            .flatten()
            .ok_or(SkipReason::FormatMismatch)?;
        let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());

        let sequence = group("sequence")
            .parse()
            .map_err(|_| SkipReason::FormatMismatch)?;
        let epoch = group("epoch");
        let timestamp = epoch_to_datetime(epoch).ok_or(SkipReason::FormatMismatch)?;
        let event_type = group("event_type");
        let message = group("tail").trim();

        let fields: IndexMap<String, String> = parse_key_values(message);
        if !required_keys(event_type)
            .iter()
            .all(|key| fields.contains_key(*key))
        {
            return Err(SkipReason::FormatMismatch);
        }

        Ok(Record::Meraki(MerakiRecord {
            origin: Origin {
                line_number,
                timestamp: Some(timestamp),
                source_host: envelope.host.to_string(),
            },
            sequence,
            epoch_timestamp: epoch.to_string(),
            role: group("role").to_string(),
            event_type: event_type.to_string(),
            category: categorize_event(event_type, message),
            level: infer_level(event_type, message),
            message: message.to_string(),
            fields,
        }))
    }

    fn vendor(&self) -> Vendor {
        Vendor::Meraki
    }
}
