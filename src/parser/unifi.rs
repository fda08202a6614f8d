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

//! UniFi gateways and access points.
//!
//! Two payload grammars share the stream: classic `hostname process[pid]: msg`
//! lines and CEF security events, with or without a hostname in front.

use super::envelope::Envelope;
use super::kv::parse_cef;
use super::record_types::{LogLevel, Origin, Record, UniFiEvent, UniFiRecord};
use super::{Decoder, SkipReason, Vendor};
use fancy_regex::Regex;
use std::sync::LazyLock;

/// Process name and category given to CEF events
pub const SECURITY_PROCESS: &str = "unifi-security";

/// CEF severities at or above this are warnings
const CEF_WARNING_SEVERITY: u8 = 5;

// Access points add a build tag and a trailing colon to the hostname and may
// stack several `[pid]` groups:
// `84784804e1c0,U7-IW-8.2.17+17828: syswrapper[29735][6648]: message`
static PROCESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?<hostname>\S+?):?\s+(?<process>[^\[\]:]+?)(?:\[(?<pid>\d+)\])?(?:\[\d+\])*:\s+(?<message>.*)$",
    )
    .expect("valid regex literal")
});

/// Substring rules, first match wins
const CATEGORY_RULES: &[(&[&str], &str)] = &[
    (&["systemd"], "system"),
    (&["kernel", "dmesg"], "kernel"),
    (&["mcad", "stamgr", "wevent", "ubios"], "unifi-controller"),
    (&["hostapd", "wpa"], "wifi"),
    (&["dhcp", "dns", "named"], "network-services"),
    (&["ssh", "sshd", "login"], "auth"),
];

#[must_use]
pub fn categorize_process(process: &str) -> &'static str {
    let process = process.to_lowercase();
    if process == SECURITY_PROCESS {
        return SECURITY_PROCESS;
    }
    CATEGORY_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| process.contains(needle)))
        .map_or("other", |&(_, category)| category)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[must_use]
pub fn infer_level(message: &str) -> LogLevel {
    let message = message.to_lowercase();
    if contains_any(&message, &["error", "failed", "failure", "critical", "fatal"]) {
        LogLevel::Error
    } else if message.contains("warn") {
        LogLevel::Warning
    } else if contains_any(
        &message,
        &["starting", "started", "stopping", "stopped", "finished", "succeeded"],
    ) {
        LogLevel::Info
    } else if message.contains("debug") {
        LogLevel::Debug
    } else {
        LogLevel::Info
    }
}

fn cef_level(severity: &str) -> LogLevel {
    let severity = severity.trim();
    let high = severity
        .parse::<u8>()
        .map_or_else(
            |_| severity.eq_ignore_ascii_case("high") || severity.eq_ignore_ascii_case("very-high"),
            |value| value >= CEF_WARNING_SEVERITY,
        );
    if high {
        LogLevel::Warning
    } else {
        LogLevel::Info
    }
}

/// Split off the CEF body, with or without a hostname token in front
fn split_cef(payload: &str) -> Option<(Option<&str>, &str)> {
    if payload.starts_with("CEF:") {
        return Some((None, payload));
    }
    let (hostname, rest) = payload.split_once(char::is_whitespace)?;
    let rest = rest.trim_start();
    rest.starts_with("CEF:").then_some((Some(hostname), rest))
}

pub struct UniFiDecoder;

impl UniFiDecoder {
    fn decode_cef(
        origin: Origin,
        hostname: Option<&str>,
        body: &str,
    ) -> Result<UniFiRecord, SkipReason> {
        let cef = parse_cef(body).ok_or(SkipReason::FormatMismatch)?;
        Ok(UniFiRecord {
            origin,
            hostname: hostname.map(str::to_string),
            level: cef_level(&cef.severity),
            category: SECURITY_PROCESS,
            event: UniFiEvent::Cef(cef),
        })
    }

    fn decode_process(origin: Origin, payload: &str) -> Result<UniFiRecord, SkipReason> {
        let caps = PROCESS_PATTERN
            .captures(payload)
            .ok()
            .flatten()
            .ok_or(SkipReason::FormatMismatch)?;
        let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());

        let process = group("process").trim();
        if process.is_empty() {
            return Err(SkipReason::FormatMismatch);
        }
        let message = group("message");

        Ok(UniFiRecord {
            origin,
            hostname: Some(group("hostname").to_string()),
            category: categorize_process(process),
            level: infer_level(message),
            event: UniFiEvent::Process {
                process: process.to_string(),
                pid: caps.name("pid").and_then(|m| m.as_str().parse().ok()),
                message: message.to_string(),
            },
        })
    }
}

impl Decoder for UniFiDecoder {
    fn decode(&self, envelope: &Envelope<'_>, line_number: usize) -> Result<Record, SkipReason> {
        let origin = Origin {
            line_number,
            timestamp: envelope.timestamp,
            source_host: envelope.host.to_string(),
        };

        let record = match split_cef(envelope.payload) {
            Some((hostname, body)) => Self::decode_cef(origin, hostname, body)?,
            None => Self::decode_process(origin, envelope.payload)?,
        };
        Ok(Record::UniFi(record))
    }

    fn vendor(&self) -> Vendor {
        Vendor::UniFi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::envelope::LineClassifier;
    use crate::parser::record_types::RecordCore;

    fn decode(line: &str) -> Result<UniFiRecord, SkipReason> {
        let envelope = LineClassifier::new(2025)
            .classify(line)
            .expect("test lines carry a syslog prefix");
        let Record::UniFi(record) = UniFiDecoder.decode(&envelope, 7)? else {
            return Err(SkipReason::FormatMismatch);
        };
        Ok(record)
    }

    #[test]
    fn test_process_line() {
        let record = decode(
            "Nov 4 11:08:44 192.168.1.1 UniFi-Express systemd[1]: Started Session 42 of user root.",
        )
        .expect("valid process line");
        assert_eq!(record.hostname.as_deref(), Some("UniFi-Express"));
        assert_eq!(record.process(), "systemd");
        assert_eq!(record.message(), "Started Session 42 of user root.");
        assert_eq!(record.category(), "system");
        assert_eq!(record.level(), LogLevel::Info);
        assert_eq!(record.line_number(), 7);
        assert!(matches!(record.event, UniFiEvent::Process { pid: Some(1), .. }));
    }

    #[test]
    fn test_access_point_line_keeps_first_pid() {
        let record = decode(
            "Nov 4 11:09:01 192.168.1.20 84784804e1c0,U7-IW-8.2.17+17828: syswrapper[29735][6648]: wifi scan failed",
        )
        .expect("valid access point line");
        assert_eq!(record.hostname.as_deref(), Some("84784804e1c0,U7-IW-8.2.17+17828"));
        assert_eq!(record.process(), "syswrapper");
        assert!(matches!(record.event, UniFiEvent::Process { pid: Some(29735), .. }));
        assert_eq!(record.level(), LogLevel::Error);
        assert_eq!(record.category(), "other");
    }

    #[test]
    fn test_process_without_pid() {
        let record = decode("Nov 4 11:09:01 192.168.1.1 gw kernel: [UFW BLOCK] IN=eth8")
            .expect("valid kernel line");
        assert_eq!(record.process(), "kernel");
        assert_eq!(record.category(), "kernel");
        assert!(matches!(record.event, UniFiEvent::Process { pid: None, .. }));
    }

    #[test]
    fn test_cef_with_and_without_hostname() {
        let body = r"CEF:0|Ubiquiti|UniFi Network|9.0.114|201|Threat Detected|7|src=10.0.0.9 msg=blocked a\=b";
        for (line, hostname) in [
            (format!("Nov 4 11:10:00 192.168.1.1 {body}"), None),
            (format!("Nov 4 11:10:00 192.168.1.1 UDM-Pro {body}"), Some("UDM-Pro")),
        ] {
            let record = decode(&line).expect("valid cef line");
            assert_eq!(record.hostname.as_deref(), hostname);
            assert_eq!(record.process(), SECURITY_PROCESS);
            assert_eq!(record.category(), "unifi-security");
            assert_eq!(record.level(), LogLevel::Warning);
            assert_eq!(record.message(), "Threat Detected (severity=7)");
            match &record.event {
                UniFiEvent::Cef(cef) => {
                    assert_eq!(cef.device_product, "UniFi Network");
                    assert_eq!(cef.event_class, "201");
                    assert_eq!(cef.extensions.get("msg").map(String::as_str), Some("blocked a=b"));
                }
                UniFiEvent::Process { .. } => unreachable!("cef body decoded as process line"),
            }
        }
    }

    #[test]
    fn test_cef_with_non_ascii_extension() {
        let line = "Nov 4 11:10:00 192.168.1.1 CEF:0|Ubiquiti|UniFi Network|9.0|201|Blocked ünïcode|7|msg=a\u{a0}src=10.0.0.1\u{3000}UNIFIhost=Café-AP";
        let record = decode(line).expect("valid cef line");
        assert_eq!(record.message(), "Blocked ünïcode (severity=7)");
        match &record.event {
            UniFiEvent::Cef(cef) => {
                assert_eq!(cef.extensions.get("msg").map(String::as_str), Some("a"));
                assert_eq!(cef.extensions.get("src").map(String::as_str), Some("10.0.0.1"));
                assert_eq!(
                    cef.extensions.get("UNIFIhost").map(String::as_str),
                    Some("Café-AP")
                );
            }
            UniFiEvent::Process { .. } => unreachable!("cef body decoded as process line"),
        }
    }

    #[test]
    fn test_process_line_with_non_ascii_message() {
        let record = decode("Nov 4 11:09:01 192.168.1.1 gw hostapd[90]: wlan0: STA «Ünïcødé» 日本語\u{a0}connected")
            .expect("valid process line");
        assert_eq!(record.process(), "hostapd");
        assert_eq!(record.message(), "wlan0: STA «Ünïcødé» 日本語\u{a0}connected");
    }

    #[test]
    fn test_low_severity_cef_is_info() {
        let record = decode("Nov 4 11:10:00 gw CEF:0|Ubiquiti|UniFi Network|9.0|100|Client Roamed|Low|mac=aa")
            .expect("valid cef line");
        assert_eq!(record.level(), LogLevel::Info);
    }

    #[test]
    fn test_truncated_cef_is_rejected() {
        assert_eq!(
            decode("Nov 4 11:10:00 gw CEF:0|Ubiquiti|UniFi Network").err(),
            Some(SkipReason::FormatMismatch)
        );
    }

    #[test]
    fn test_payload_without_process_tag_is_rejected() {
        assert_eq!(
            decode("Nov 4 11:10:00 gw just some words").err(),
            Some(SkipReason::FormatMismatch)
        );
    }

    #[test]
    fn test_categories() {
        for (process, category) in [
            ("unifi-security", "unifi-security"),
            ("systemd-logind", "system"),
            ("mcad", "unifi-controller"),
            ("hostapd", "wifi"),
            ("wpa_supplicant", "wifi"),
            ("dnsmasq-dhcp", "network-services"),
            ("sshd", "auth"),
            ("dropbear", "other"),
        ] {
            assert_eq!(categorize_process(process), category, "{process}");
        }
    }

    #[test]
    fn test_levels() {
        assert_eq!(infer_level("Connection FAILED"), LogLevel::Error);
        assert_eq!(infer_level("warning: low memory"), LogLevel::Warning);
        assert_eq!(infer_level("Started debug shell"), LogLevel::Info);
        assert_eq!(infer_level("debug: tick"), LogLevel::Debug);
        assert_eq!(infer_level("hello"), LogLevel::Info);
    }
}
