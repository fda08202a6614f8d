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

use crate::parser::record_types::Record;
use indexmap::IndexMap;
use std::borrow::Cow;

/// Pulls a grouping key out of a record. `None` puts the record outside the
/// dimension (it neither forms a group nor counts towards the total).
pub type KeyFn = for<'a> fn(&'a Record) -> Option<Cow<'a, str>>;

/// Pulls a byte count out of a record for per-group volume sums
pub type BytesFn = fn(&Record) -> Option<u64>;

#[derive(Clone, Copy)]
pub enum KeyExtractor {
    /// One group per record
    Single(KeyFn),
    /// One group per non-empty item of a delimited list
    Split(KeyFn, char),
}

impl KeyExtractor {
    fn for_each_key(&self, record: &Record, mut f: impl FnMut(&str)) {
        match *self {
            Self::Single(extract) => {
                if let Some(key) = extract(record) {
                    f(&key);
                }
            }
            Self::Split(extract, delimiter) => {
                if let Some(list) = extract(record) {
                    list.split(delimiter)
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .for_each(f);
                }
            }
        }
    }
}

/// Count and optional byte volume of one group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupStats {
    pub count: usize,
    pub bytes: Option<u64>,
}

/// Groups in first-seen order
#[derive(Debug, Clone, Default)]
pub struct GroupCounts {
    pub groups: IndexMap<String, GroupStats>,
    pub total: usize,
}

/// One summary axis over a record set
#[derive(Clone, Copy)]
pub struct Dimension {
    pub key: &'static str,
    pub title: &'static str,
    pub extractor: KeyExtractor,
    /// Whether groups of this dimension are checked against the noise threshold
    pub noise: bool,
    pub bytes: Option<BytesFn>,
}

impl Dimension {
    #[must_use]
    pub const fn new(key: &'static str, title: &'static str, extractor: KeyFn) -> Self {
        Self {
            key,
            title,
            extractor: KeyExtractor::Single(extractor),
            noise: false,
            bytes: None,
        }
    }

    #[must_use]
    pub const fn split(
        key: &'static str,
        title: &'static str,
        extractor: KeyFn,
        delimiter: char,
    ) -> Self {
        Self {
            key,
            title,
            extractor: KeyExtractor::Split(extractor, delimiter),
            noise: false,
            bytes: None,
        }
    }

    #[must_use]
    pub const fn with_noise(mut self) -> Self {
        self.noise = true;
        self
    }

    #[must_use]
    pub const fn with_bytes(mut self, bytes: BytesFn) -> Self {
        self.bytes = Some(bytes);
        self
    }

    /// Count records per key in input order
    #[must_use]
    pub fn count(&self, records: &[Record]) -> GroupCounts {
        profiling::scope!("Dimension::count");
        let mut counts = GroupCounts::default();

        for record in records {
            let bytes = self.bytes.and_then(|extract| extract(record));
            self.extractor.for_each_key(record, |key| {
                if !counts.groups.contains_key(key) {
                    counts.groups.insert(key.to_string(), GroupStats::default());
                }
                let stats = &mut counts.groups[key];
                stats.count += 1;
                if self.bytes.is_some() {
                    // Counters near u64::MAX are clamped instead of wrapping
                    let sum = stats.bytes.unwrap_or(0).saturating_add(bytes.unwrap_or(0));
                    stats.bytes = Some(sum);
                }
                counts.total += 1;
            });
        }

        counts
    }
}
