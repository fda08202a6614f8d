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

use super::envelope::Envelope;
use super::record_types::{LogLevel, Origin, Record, WatchGuardRecord};
use super::{Decoder, SkipReason, Vendor};
use chrono::NaiveDateTime;
use fancy_regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// `801304C6AA57D M370 (2025-11-04T00:00:03) loggerd[2545]: msg_id="3D01-0003" Archived log file`
static PAYLOAD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?<device_id>[0-9A-Fa-f]+)\s+(?<device_name>\S+)\s+\((?<timestamp>[^)]+)\)\s+(?<process>[^\[:]+?)(?:\[(?<pid>\d+)\])?:\s+(?:msg_id="(?<msg_id>[^"]+)"\s*)?(?<message>.*)$"#,
    )
    .expect("valid regex literal")
});

/// Appliance daemon to category, matched on the exact lower-cased name
static CATEGORIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("firewall", "firewall"),
        ("iked", "vpn"),
        ("sslvpn", "vpn"),
        ("dhcpd", "network-services"),
        ("sessiond", "session-management"),
        ("loggerd", "system"),
        ("admd", "system"),
        ("sigd", "security"),
        ("portald", "gateway"),
        ("gwcd", "gateway"),
        ("certd", "monitoring"),
        ("link-mon", "monitoring"),
    ])
});

/// Message id families that are always worth a look
const WARNING_MSG_IDS: &[&str] = &["3001-", "0207-", "020B-"];
const ERROR_MSG_IDS: &[&str] = &["4001-", "7600-"];

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// Length of `YYYY-MM-DDTHH:MM:SS`; fractions and offsets after it are ignored
const ISO_PREFIX_LEN: usize = 19;

#[must_use]
pub fn categorize_process(process: &str) -> &'static str {
    let process = process.trim().to_lowercase();
    CATEGORIES.get(process.as_str()).copied().unwrap_or("other")
}

#[must_use]
pub fn infer_level(msg_id: Option<&str>, message: &str) -> LogLevel {
    if let Some(id) = msg_id {
        if WARNING_MSG_IDS.iter().any(|prefix| id.starts_with(prefix)) {
            return LogLevel::Warning;
        }
        if ERROR_MSG_IDS.iter().any(|prefix| id.starts_with(prefix)) {
            return LogLevel::Error;
        }
    }

    let message = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|word| message.contains(word));
    if mentions(&["error", "failed", "failure", "critical", "fatal", "down"]) {
        LogLevel::Error
    } else if mentions(&["warning", "block", "deny", "reject", "unknown"]) {
        LogLevel::Warning
    } else {
        LogLevel::Info
    }
}

fn parse_iso_timestamp(text: &str) -> Option<NaiveDateTime> {
    let prefix = text.trim().get(..ISO_PREFIX_LEN)?;
    NaiveDateTime::parse_from_str(prefix, ISO_FORMAT).ok()
}

pub struct WatchGuardDecoder;

impl Decoder for WatchGuardDecoder {
    fn decode(&self, envelope: &Envelope<'_>, line_number: usize) -> Result<Record, SkipReason> {
        let caps = PAYLOAD_PATTERN
            .captures(envelope.payload)
            .ok()
            .flatten()
            .ok_or(SkipReason::FormatMismatch)?;
        let group = |name: &str| caps.name(name).map(|m| m.as_str());

        let iso_timestamp = group("timestamp")
            .and_then(parse_iso_timestamp)
            .ok_or(SkipReason::FormatMismatch)?;
        let process = group("process").unwrap_or_default().trim();
        let msg_id = group("msg_id");
        let message = group("message").unwrap_or_default();

        Ok(Record::WatchGuard(WatchGuardRecord {
            origin: Origin {
                line_number,
                timestamp: envelope.timestamp,
                source_host: envelope.host.to_string(),
            },
            device_id: group("device_id").unwrap_or_default().to_string(),
            device_name: group("device_name").unwrap_or_default().to_string(),
            iso_timestamp,
            process: process.to_string(),
            pid: group("pid").and_then(|pid| pid.parse().ok()),
            msg_id: msg_id.map(str::to_string),
            message: message.to_string(),
            category: categorize_process(process),
            level: infer_level(msg_id, message),
        }))
    }

    fn vendor(&self) -> Vendor {
        Vendor::WatchGuard
    }
}
