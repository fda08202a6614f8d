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

//! BSD syslog envelope: `Mon D HH:MM:SS <host> <payload>`.
//!
//! The prefix carries no year. Timestamps are built with the year the
//! classifier was created with, so a file spanning New Year's Eve gets its
//! January lines dated at the start of the same year. This is accepted.

use super::SkipReason;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use fancy_regex::Regex;
use std::sync::LazyLock;

static SYSLOG_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+(\d{1,2})\s+(\d{2}:\d{2}:\d{2})\s+(\S+)\s+(.*)$",
    )
    .expect("valid regex literal")
});

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Year used for syslog timestamps when none is configured
#[must_use]
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Decoded syslog prefix plus the vendor payload that follows the host token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    /// `None` if the prefix named an impossible date such as `Feb 30`
    pub timestamp: Option<NaiveDateTime>,
    pub host: &'a str,
    pub payload: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct LineClassifier {
    year: i32,
}

impl LineClassifier {
    #[must_use]
    pub const fn new(year: i32) -> Self {
        Self { year }
    }

    /// Strip the syslog envelope or say why the line cannot carry one
    pub fn classify<'a>(&self, line: &'a str) -> Result<Envelope<'a>, SkipReason> {
        if line.trim().is_empty() {
            return Err(SkipReason::Empty);
        }

        let Ok(Some(caps)) = SYSLOG_PREFIX.captures(line) else {
            return Err(SkipReason::MissingPrefix);
        };

        let (Some(month), Some(day), Some(time), Some(host), Some(payload)) =
            (caps.get(1), caps.get(2), caps.get(3), caps.get(4), caps.get(5))
        else {
            return Err(SkipReason::MissingPrefix);
        };

        Ok(Envelope {
            timestamp: self.parse_timestamp(month.as_str(), day.as_str(), time.as_str()),
            host: host.as_str(),
            payload: &line[payload.start()..],
        })
    }

    fn parse_timestamp(&self, month: &str, day: &str, time: &str) -> Option<NaiveDateTime> {
        let month = MONTHS.iter().position(|m| *m == month)? as u32 + 1;
        let day = day.parse().ok()?;
        let date = NaiveDate::from_ymd_opt(self.year, month, day)?;
        let time = NaiveTime::parse_from_str(time, "%H:%M:%S").ok()?;
        Some(date.and_time(time))
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(current_year())
    }
}
