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

use super::Vendor;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Common interface for all decoded records
pub trait RecordCore {
    /// Event time. Meraki records carry the device clock, everything else the
    /// syslog prefix time. `None` when the prefix named an impossible date.
    fn timestamp(&self) -> Option<NaiveDateTime>;

    /// Host token from the syslog prefix (usually the sending device's IP)
    fn source_host(&self) -> &str;

    /// Vendor-specific discriminator used for grouping
    fn category(&self) -> &str;

    fn level(&self) -> LogLevel;

    /// 1-based line number in the input; the record's identity
    fn line_number(&self) -> usize;
}

/// Where a record came from. Shared by every vendor schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub line_number: usize,
    pub timestamp: Option<NaiveDateTime>,
    pub source_host: String,
}

/// Enum wrapping all vendor record variants
#[derive(Debug, Clone)]
pub enum Record {
    PaloAlto(PaloAltoRecord),
    UniFi(UniFiRecord),
    WatchGuard(WatchGuardRecord),
    Meraki(MerakiRecord),
}

impl Record {
    #[must_use]
    pub const fn vendor(&self) -> Vendor {
        match self {
            Self::PaloAlto(_) => Vendor::PaloAlto,
            Self::UniFi(_) => Vendor::UniFi,
            Self::WatchGuard(_) => Vendor::WatchGuard,
            Self::Meraki(_) => Vendor::Meraki,
        }
    }

    const fn origin(&self) -> &Origin {
        match self {
            Self::PaloAlto(r) => &r.origin,
            Self::UniFi(r) => &r.origin,
            Self::WatchGuard(r) => &r.origin,
            Self::Meraki(r) => &r.origin,
        }
    }

    #[must_use]
    pub const fn as_palo_alto(&self) -> Option<&PaloAltoRecord> {
        match self {
            Self::PaloAlto(r) => Some(r),
            Self::UniFi(_) | Self::WatchGuard(_) | Self::Meraki(_) => None,
        }
    }

    #[must_use]
    pub const fn as_unifi(&self) -> Option<&UniFiRecord> {
        match self {
            Self::UniFi(r) => Some(r),
            Self::PaloAlto(_) | Self::WatchGuard(_) | Self::Meraki(_) => None,
        }
    }

    #[must_use]
    pub const fn as_watchguard(&self) -> Option<&WatchGuardRecord> {
        match self {
            Self::WatchGuard(r) => Some(r),
            Self::PaloAlto(_) | Self::UniFi(_) | Self::Meraki(_) => None,
        }
    }

    #[must_use]
    pub const fn as_meraki(&self) -> Option<&MerakiRecord> {
        match self {
            Self::Meraki(r) => Some(r),
            Self::PaloAlto(_) | Self::UniFi(_) | Self::WatchGuard(_) => None,
        }
    }
}

impl RecordCore for Record {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.origin().timestamp
    }

    fn source_host(&self) -> &str {
        &self.origin().source_host
    }

    fn category(&self) -> &str {
        match self {
            Self::PaloAlto(r) => r.category(),
            Self::UniFi(r) => r.category(),
            Self::WatchGuard(r) => r.category(),
            Self::Meraki(r) => r.category(),
        }
    }

    fn level(&self) -> LogLevel {
        match self {
            Self::PaloAlto(r) => r.level(),
            Self::UniFi(r) => r.level(),
            Self::WatchGuard(r) => r.level(),
            Self::Meraki(r) => r.level(),
        }
    }

    fn line_number(&self) -> usize {
        self.origin().line_number
    }
}

/// Implements the origin-backed part of `RecordCore` for a vendor struct
macro_rules! impl_record_core {
    ($ty:ty, |$r:ident| $category:expr) => {
        impl RecordCore for $ty {
            fn timestamp(&self) -> Option<NaiveDateTime> {
                self.origin.timestamp
            }

            fn source_host(&self) -> &str {
                &self.origin.source_host
            }

            fn category(&self) -> &str {
                let $r = self;
                $category
            }

            fn level(&self) -> LogLevel {
                self.level
            }

            fn line_number(&self) -> usize {
                self.origin.line_number
            }
        }
    };
}

// ============================================================================
// PaloAlto
// ============================================================================

/// PAN-OS CSV syslog entry. Positional fields that a log type does not carry
/// stay `None`.
#[derive(Debug, Clone)]
pub struct PaloAltoRecord {
    pub origin: Origin,
    pub log_type: String,
    pub subtype: Option<String>,
    pub serial: Option<String>,
    pub receive_time: NaiveDateTime,
    pub generated_time: Option<NaiveDateTime>,
    pub src_ip: Option<String>,
    pub dst_ip: Option<String>,
    pub rule_name: Option<String>,
    pub application: Option<String>,
    pub action: Option<String>,
    pub session_end_reason: Option<String>,
    pub bytes: Option<u64>,
    pub bytes_sent: Option<u64>,
    pub bytes_received: Option<u64>,
    /// Comma-separated characteristic list (`used-by-malware,evasive,...`)
    pub app_characteristics: Option<String>,
    pub threat_severity: Option<String>,
    pub level: LogLevel,
}

impl PaloAltoRecord {
    #[must_use]
    pub fn is_traffic(&self) -> bool {
        self.log_type == "TRAFFIC"
    }
}

impl_record_core!(PaloAltoRecord, |r| &r.log_type);

// ============================================================================
// UniFi
// ============================================================================

/// CEF security event as emitted by UniFi gateways
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CefEvent {
    pub version: String,
    pub device_vendor: String,
    pub device_product: String,
    pub device_version: String,
    pub event_class: String,
    pub name: String,
    pub severity: String,
    /// Extension fields in the order they appeared
    pub extensions: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniFiEvent {
    /// `process[pid]: message`
    Process {
        process: String,
        pid: Option<u32>,
        message: String,
    },
    Cef(CefEvent),
}

#[derive(Debug, Clone)]
pub struct UniFiRecord {
    pub origin: Origin,
    /// Device name in front of the process tag (or CEF header), if any
    pub hostname: Option<String>,
    pub event: UniFiEvent,
    pub category: &'static str,
    pub level: LogLevel,
}

impl UniFiRecord {
    /// Process name; CEF events are attributed to `unifi-security`
    #[must_use]
    pub fn process(&self) -> &str {
        match &self.event {
            UniFiEvent::Process { process, .. } => process,
            UniFiEvent::Cef(_) => super::unifi::SECURITY_PROCESS,
        }
    }

    #[must_use]
    pub fn message(&self) -> Cow<'_, str> {
        match &self.event {
            UniFiEvent::Process { message, .. } => Cow::Borrowed(message),
            UniFiEvent::Cef(cef) => Cow::Owned(format!("{} (severity={})", cef.name, cef.severity)),
        }
    }
}

impl_record_core!(UniFiRecord, |r| r.category);

// ============================================================================
// WatchGuard
// ============================================================================

#[derive(Debug, Clone)]
pub struct WatchGuardRecord {
    pub origin: Origin,
    pub device_id: String,
    pub device_name: String,
    /// Appliance clock from the `(...)` group
    pub iso_timestamp: NaiveDateTime,
    pub process: String,
    pub pid: Option<u32>,
    pub msg_id: Option<String>,
    pub message: String,
    pub category: &'static str,
    pub level: LogLevel,
}

impl_record_core!(WatchGuardRecord, |r| r.category);

// ============================================================================
// Meraki
// ============================================================================

#[derive(Debug, Clone)]
pub struct MerakiRecord {
    pub origin: Origin,
    pub sequence: u64,
    /// Raw `seconds.fraction` text as sent by the device
    pub epoch_timestamp: String,
    /// Device role such as `ROUTER`, `MX84` or `security_event`
    pub role: String,
    pub event_type: String,
    /// Key/value pairs from the message tail, in input order
    pub fields: IndexMap<String, String>,
    pub message: String,
    pub category: &'static str,
    pub level: LogLevel,
}

impl MerakiRecord {
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

impl_record_core!(MerakiRecord, |r| r.category);
