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

//! Which tables are produced for which vendor, in report order.

use super::dimension::Dimension;
use crate::parser::message_template;
use crate::parser::record_types::{Record, RecordCore};
use crate::parser::Vendor;
use std::borrow::Cow;

fn borrowed(value: Option<&String>) -> Option<Cow<'_, str>> {
    value.map(|v| Cow::Borrowed(v.as_str()))
}

// Shared

fn level(record: &Record) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(record.level().as_str()))
}

fn category(record: &Record) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(record.category()))
}

// Palo Alto

fn pan_bytes(record: &Record) -> Option<u64> {
    record.as_palo_alto()?.bytes
}

fn pan_log_type(record: &Record) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(record.as_palo_alto()?.log_type.as_str()))
}

fn pan_subtype(record: &Record) -> Option<Cow<'_, str>> {
    borrowed(record.as_palo_alto()?.subtype.as_ref())
}

fn pan_application(record: &Record) -> Option<Cow<'_, str>> {
    let pan = record.as_palo_alto().filter(|p| p.is_traffic())?;
    borrowed(pan.application.as_ref())
}

fn pan_rule(record: &Record) -> Option<Cow<'_, str>> {
    borrowed(record.as_palo_alto()?.rule_name.as_ref())
}

fn pan_action(record: &Record) -> Option<Cow<'_, str>> {
    borrowed(record.as_palo_alto()?.action.as_ref())
}

fn pan_end_reason(record: &Record) -> Option<Cow<'_, str>> {
    let pan = record.as_palo_alto().filter(|p| p.is_traffic())?;
    borrowed(pan.session_end_reason.as_ref())
}

fn pan_src_ip(record: &Record) -> Option<Cow<'_, str>> {
    borrowed(record.as_palo_alto()?.src_ip.as_ref())
}

fn pan_dst_ip(record: &Record) -> Option<Cow<'_, str>> {
    borrowed(record.as_palo_alto()?.dst_ip.as_ref())
}

fn pan_characteristics(record: &Record) -> Option<Cow<'_, str>> {
    borrowed(record.as_palo_alto()?.app_characteristics.as_ref())
}

// UniFi

fn unifi_process(record: &Record) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(record.as_unifi()?.process()))
}

fn unifi_hostname(record: &Record) -> Option<Cow<'_, str>> {
    borrowed(record.as_unifi()?.hostname.as_ref())
}

fn unifi_template(record: &Record) -> Option<Cow<'_, str>> {
    Some(Cow::Owned(message_template(&record.as_unifi()?.message())))
}

// WatchGuard

fn wg_process(record: &Record) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(record.as_watchguard()?.process.as_str()))
}

fn wg_msg_id(record: &Record) -> Option<Cow<'_, str>> {
    borrowed(record.as_watchguard()?.msg_id.as_ref())
}

fn wg_device(record: &Record) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(record.as_watchguard()?.device_name.as_str()))
}

fn wg_template(record: &Record) -> Option<Cow<'_, str>> {
    Some(Cow::Owned(message_template(&record.as_watchguard()?.message)))
}

// Meraki

fn meraki_event_type(record: &Record) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(record.as_meraki()?.event_type.as_str()))
}

fn meraki_protocol(record: &Record) -> Option<Cow<'_, str>> {
    record.as_meraki()?.field("protocol").map(Cow::Borrowed)
}

fn meraki_src(record: &Record) -> Option<Cow<'_, str>> {
    record.as_meraki()?.field("src").map(Cow::Borrowed)
}

fn meraki_dst(record: &Record) -> Option<Cow<'_, str>> {
    record.as_meraki()?.field("dst").map(Cow::Borrowed)
}

fn meraki_dport(record: &Record) -> Option<Cow<'_, str>> {
    record.as_meraki()?.field("dport").map(Cow::Borrowed)
}

/// Dimensions computed for `vendor`, in the order they are reported
#[must_use]
pub fn battery(vendor: Vendor) -> Vec<Dimension> {
    match vendor {
        Vendor::PaloAlto => [
            Dimension::new("log_type", "Log Types", pan_log_type),
            Dimension::new("subtype", "Log Subtypes", pan_subtype),
            Dimension::new("application", "Top Applications", pan_application),
            Dimension::new("rule_name", "Top Policies", pan_rule).with_noise(),
            Dimension::new("action", "Policy Actions", pan_action),
            Dimension::new("session_end_reason", "Session End Reasons", pan_end_reason),
            Dimension::new("src_ip", "Top Source IPs", pan_src_ip).with_noise(),
            Dimension::new("dst_ip", "Top Destination IPs", pan_dst_ip).with_noise(),
            Dimension::split(
                "app_characteristics",
                "Application Characteristics",
                pan_characteristics,
                ',',
            ),
        ]
        .into_iter()
        .map(|dimension| dimension.with_bytes(pan_bytes))
        .collect(),
        Vendor::UniFi => vec![
            Dimension::new("level", "Log Levels", level),
            Dimension::new("category", "Categories", category).with_noise(),
            Dimension::new("process", "Top Processes", unifi_process).with_noise(),
            Dimension::new("hostname", "Hostnames", unifi_hostname),
            Dimension::new("template", "Message Templates", unifi_template).with_noise(),
        ],
        Vendor::WatchGuard => vec![
            Dimension::new("level", "Log Levels", level),
            Dimension::new("category", "Categories", category).with_noise(),
            Dimension::new("process", "Top Processes", wg_process).with_noise(),
            Dimension::new("msg_id", "Message IDs", wg_msg_id).with_noise(),
            Dimension::new("device_name", "Devices", wg_device),
            Dimension::new("template", "Message Templates", wg_template),
        ],
        Vendor::Meraki => vec![
            Dimension::new("event_type", "Event Types", meraki_event_type).with_noise(),
            Dimension::new("category", "Categories", category),
            Dimension::new("level", "Log Levels", level),
            Dimension::new("protocol", "Protocols", meraki_protocol),
            Dimension::new("src", "Top Source IPs", meraki_src).with_noise(),
            Dimension::new("dst", "Top Destination IPs", meraki_dst).with_noise(),
            Dimension::new("dport", "Top Destination Ports", meraki_dport),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique_per_vendor() {
        for vendor in Vendor::ALL {
            let dimensions = battery(vendor);
            assert!(!dimensions.is_empty(), "{vendor}");
            let mut keys: Vec<&str> = dimensions.iter().map(|d| d.key).collect();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), dimensions.len(), "{vendor}");
        }
    }

    #[test]
    fn test_only_palo_alto_sums_bytes() {
        for vendor in Vendor::ALL {
            let with_bytes = battery(vendor).iter().all(|d| d.bytes.is_some());
            assert_eq!(with_bytes, vendor == Vendor::PaloAlto, "{vendor}");
        }
    }
}
