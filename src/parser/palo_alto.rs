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

//! PAN-OS CSV syslog.
//!
//! `<future>,<YYYY/MM/DD HH:MM:SS>,<serial>,<TYPE>,<subtype>,...`. Column
//! meaning and count depend on the log type in field 3, so the type is
//! checked before any positional field is read.

use super::envelope::Envelope;
use super::record_types::{LogLevel, Origin, PaloAltoRecord, Record};
use super::{Decoder, SkipReason, Vendor};
use chrono::NaiveDateTime;

const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

const RECEIVE_TIME: usize = 1;
const SERIAL: usize = 2;
const LOG_TYPE: usize = 3;
const SUBTYPE: usize = 4;
const GENERATED_TIME: usize = 6;

/// Positional columns for one log type
#[derive(Debug, Clone, Copy)]
struct Layout {
    min_fields: usize,
    src_ip: Option<usize>,
    dst_ip: Option<usize>,
    rule_name: Option<usize>,
    application: Option<usize>,
    action: Option<usize>,
    bytes: Option<usize>,
    bytes_sent: Option<usize>,
    bytes_received: Option<usize>,
    session_end_reason: Option<usize>,
    app_characteristics: Option<usize>,
    threat_severity: Option<usize>,
}

const HEADER_ONLY: Layout = Layout {
    min_fields: GENERATED_TIME + 1,
    src_ip: None,
    dst_ip: None,
    rule_name: None,
    application: None,
    action: None,
    bytes: None,
    bytes_sent: None,
    bytes_received: None,
    session_end_reason: None,
    app_characteristics: None,
    threat_severity: None,
};

const TRAFFIC: Layout = Layout {
    min_fields: 47,
    src_ip: Some(7),
    dst_ip: Some(8),
    rule_name: Some(11),
    application: Some(14),
    action: Some(30),
    bytes: Some(31),
    bytes_sent: Some(32),
    bytes_received: Some(33),
    session_end_reason: Some(46),
    // Only present on PAN-OS 10+ exports
    app_characteristics: Some(109),
    threat_severity: None,
};

const THREAT: Layout = Layout {
    min_fields: 35,
    src_ip: Some(7),
    dst_ip: Some(8),
    rule_name: Some(11),
    application: Some(14),
    action: Some(30),
    threat_severity: Some(34),
    ..HEADER_ONLY
};

const SYSTEM: Layout = Layout {
    min_fields: 15,
    ..HEADER_ONLY
};

const CONFIG: Layout = Layout {
    min_fields: 13,
    ..HEADER_ONLY
};

fn layout_for(log_type: &str) -> Layout {
    match log_type {
        "TRAFFIC" => TRAFFIC,
        "THREAT" => THREAT,
        "SYSTEM" => SYSTEM,
        "CONFIG" => CONFIG,
        _ => HEADER_ONLY,
    }
}

/// Split one CSV record. Quoted fields may contain commas and `""` escapes.
fn split_csv(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

fn is_log_type(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_uppercase() || c == '-')
}

fn infer_level(action: Option<&str>, severity: Option<&str>) -> LogLevel {
    match severity.map(str::to_ascii_lowercase).as_deref() {
        Some("critical") => return LogLevel::Error,
        Some("high" | "medium") => return LogLevel::Warning,
        _ => {}
    }
    let blocked = action.is_some_and(|a| {
        ["deny", "drop", "reset", "block"]
            .iter()
            .any(|prefix| a.starts_with(prefix))
    });
    if blocked {
        LogLevel::Warning
    } else {
        LogLevel::Info
    }
}

pub struct PaloAltoDecoder;

impl Decoder for PaloAltoDecoder {
    fn decode(&self, envelope: &Envelope<'_>, line_number: usize) -> Result<Record, SkipReason> {
        let fields = split_csv(envelope.payload);
        if fields.len() <= SUBTYPE {
            return Err(SkipReason::FormatMismatch);
        }

        let log_type = fields[LOG_TYPE].trim();
        if !is_log_type(log_type) {
            return Err(SkipReason::FormatMismatch);
        }
        let receive_time = NaiveDateTime::parse_from_str(fields[RECEIVE_TIME].trim(), TIME_FORMAT)
            .map_err(|_| SkipReason::FormatMismatch)?;

        let layout = layout_for(log_type);
        if fields.len() < layout.min_fields {
            return Err(SkipReason::FormatMismatch);
        }

        let text = |index: usize| {
            fields
                .get(index)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        let column = |index: Option<usize>| index.and_then(text);
        let count = |index: Option<usize>| {
            column(index).and_then(|value| value.replace(',', "").parse::<u64>().ok())
        };

        let action = column(layout.action);
        let threat_severity = column(layout.threat_severity);
        let level = infer_level(action.as_deref(), threat_severity.as_deref());

        Ok(Record::PaloAlto(PaloAltoRecord {
            origin: Origin {
                line_number,
                timestamp: envelope.timestamp,
                source_host: envelope.host.to_string(),
            },
            log_type: log_type.to_string(),
            subtype: text(SUBTYPE),
            serial: text(SERIAL),
            receive_time,
            generated_time: text(GENERATED_TIME)
                .and_then(|value| NaiveDateTime::parse_from_str(&value, TIME_FORMAT).ok()),
            src_ip: column(layout.src_ip),
            dst_ip: column(layout.dst_ip),
            rule_name: column(layout.rule_name),
            application: column(layout.application),
            action,
            session_end_reason: column(layout.session_end_reason),
            bytes: count(layout.bytes),
            bytes_sent: count(layout.bytes_sent),
            bytes_received: count(layout.bytes_received),
            app_characteristics: column(layout.app_characteristics),
            threat_severity,
            level,
        }))
    }

    fn vendor(&self) -> Vendor {
        Vendor::PaloAlto
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::parser::envelope::LineClassifier;
    use crate::parser::record_types::RecordCore;

    /// Build a PAN-OS line with `len` columns, the standard header and the
    /// given overrides
    pub(crate) fn pan_line(log_type: &str, len: usize, overrides: &[(usize, &str)]) -> String {
        let mut fields = vec![String::new(); len];
        fields[0] = "1".to_string();
        fields[1] = "2025/11/04 11:08:44".to_string();
        fields[2] = "026701019653".to_string();
        fields[3] = log_type.to_string();
        for &(index, value) in overrides {
            fields[index] = value.to_string();
        }
        format!("Nov 4 11:08:44 109.2.165.203 {}", fields.join(","))
    }

    fn decode(line: &str) -> Result<PaloAltoRecord, SkipReason> {
        let envelope = LineClassifier::new(2025)
            .classify(line)
            .expect("test lines carry a syslog prefix");
        let Record::PaloAlto(record) = PaloAltoDecoder.decode(&envelope, 1)? else {
            return Err(SkipReason::FormatMismatch);
        };
        Ok(record)
    }

    #[test]
    fn test_traffic_end() {
        let line = pan_line(
            "TRAFFIC",
            60,
            &[
                (4, "end"),
                (6, "2025/11/04 11:08:43"),
                (7, "10.0.0.5"),
                (8, "8.8.8.8"),
                (11, "allow-dns"),
                (14, "app1"),
                (30, "allow"),
                (31, "1500"),
                (32, "600"),
                (33, "900"),
                (46, "aged-out"),
            ],
        );
        let record = decode(&line).expect("valid traffic line");
        assert_eq!(record.log_type, "TRAFFIC");
        assert_eq!(record.subtype.as_deref(), Some("end"));
        assert_eq!(record.application.as_deref(), Some("app1"));
        assert_eq!(record.action.as_deref(), Some("allow"));
        assert_eq!(record.session_end_reason.as_deref(), Some("aged-out"));
        assert_eq!(record.bytes, Some(1500));
        assert_eq!(record.bytes_sent, Some(600));
        assert_eq!(record.src_ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(record.rule_name.as_deref(), Some("allow-dns"));
        assert_eq!(record.source_host(), "109.2.165.203");
        assert_eq!(record.category(), "TRAFFIC");
        assert_eq!(record.level(), LogLevel::Info);
        assert!(record.generated_time.is_some());
        assert_eq!(record.app_characteristics, None);
    }

    #[test]
    fn test_non_ascii_and_oversized_columns() {
        let line = pan_line(
            "TRAFFIC",
            60,
            &[
                (11, "règle-café"),
                (14, "日本語-app"),
                (30, "allow"),
                (31, "99999999999999999999999"),
                (32, "١٢٣"),
            ],
        );
        let record = decode(&line).expect("valid traffic line");
        assert_eq!(record.rule_name.as_deref(), Some("règle-café"));
        assert_eq!(record.application.as_deref(), Some("日本語-app"));
        assert_eq!(record.bytes, None);
        assert_eq!(record.bytes_sent, None);
    }

    #[test]
    fn test_quoted_characteristics() {
        let line = pan_line(
            "TRAFFIC",
            116,
            &[(30, "deny"), (109, "\"used-by-malware,evasive\"")],
        );
        let record = decode(&line).expect("valid traffic line");
        assert_eq!(
            record.app_characteristics.as_deref(),
            Some("used-by-malware,evasive")
        );
        assert_eq!(record.level(), LogLevel::Warning);
    }

    #[test]
    fn test_short_traffic_line_is_rejected() {
        let line = pan_line("TRAFFIC", 46, &[(14, "app1")]);
        assert_eq!(decode(&line).err(), Some(SkipReason::FormatMismatch));
    }

    #[test]
    fn test_system_line_has_no_traffic_columns() {
        let line = pan_line("SYSTEM", 20, &[(4, "general"), (7, "vsys1"), (14, "description")]);
        let record = decode(&line).expect("valid system line");
        assert_eq!(record.log_type, "SYSTEM");
        assert_eq!(record.src_ip, None);
        assert_eq!(record.application, None);
        assert_eq!(record.bytes, None);
    }

    #[test]
    fn test_threat_severity() {
        let line = pan_line("THREAT", 40, &[(14, "web-browsing"), (30, "alert"), (34, "critical")]);
        let record = decode(&line).expect("valid threat line");
        assert_eq!(record.threat_severity.as_deref(), Some("critical"));
        assert_eq!(record.level(), LogLevel::Error);
    }

    #[test]
    fn test_header_validation() {
        // Receive time is not a PAN-OS timestamp
        let line = "Nov 4 11:08:44 fw 1,yesterday,0267,TRAFFIC,end,x,y";
        assert_eq!(decode(line).err(), Some(SkipReason::FormatMismatch));
        // Log type must be an upper-case token
        let line = "Nov 4 11:08:44 fw 1,2025/11/04 11:08:44,0267,traffic,end,x,y";
        assert_eq!(decode(line).err(), Some(SkipReason::FormatMismatch));
    }

    #[test]
    fn test_foreign_payloads_are_rejected() {
        for line in [
            "Nov 4 11:08:44 192.168.1.1 UniFi-Express systemd[1]: Started Session 1.",
            "Nov 4 11:08:44 192.168.1.1 CEF:0|Ubiquiti|UniFi Network|9.0|201|Threat|7|src=10.0.0.1",
            "Nov 4 01:00:03 83.206.233.205 801304C6AA57D M370 (2025-11-04T00:00:03) loggerd[2545]: msg_id=\"3D01-0003\" Archived",
            "Nov 5 00:00:04 90.102.85.18 1 1762300804.14 ROUTER ip_flow_end src=1.1.1.1 dst=2.2.2.2 protocol=tcp",
        ] {
            assert_eq!(decode(line).err(), Some(SkipReason::FormatMismatch), "{line}");
        }
    }

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv("a,\"b,c\",\"d\"\"e\","), ["a", "b,c", "d\"e", ""]);
    }
}
