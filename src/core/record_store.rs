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

use super::histogram::MinuteHistogram;
use crate::parser::record_types::{Record, RecordCore};
use std::ops::Deref;
use std::sync::Arc;

/// Append-only record collection used while a file is streamed.
///
/// The per-minute volume is maintained on append so the trend needs no second
/// scan. [`RecordStore::finalize`] consumes the store: nothing can be appended
/// after analysis may have started.
#[derive(Debug, Default)]
pub struct RecordStore {
    /// Records in input order (never reordered, merged or removed)
    records: Vec<Record>,
    volume: MinuteHistogram,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: Record) {
        self.volume.add(record.timestamp());
        self.records.push(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn finalize(self) -> FrozenRecords {
        tracing::debug!(
            "Freezing {} records over {} minutes",
            self.records.len(),
            self.volume.len()
        );
        FrozenRecords {
            records: self.records.into(),
            volume: Arc::new(self.volume),
        }
    }
}

/// Immutable, cheaply clonable view of a finished parse run
#[derive(Debug, Clone)]
pub struct FrozenRecords {
    records: Arc<[Record]>,
    volume: Arc<MinuteHistogram>,
}

impl FrozenRecords {
    #[must_use]
    pub fn volume(&self) -> &MinuteHistogram {
        &self.volume
    }
}

impl Default for FrozenRecords {
    fn default() -> Self {
        RecordStore::new().finalize()
    }
}

impl Deref for FrozenRecords {
    type Target = [Record];

    fn deref(&self) -> &[Record] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::envelope::LineClassifier;
    use crate::parser::Vendor;

    fn meraki_record(line: &str, line_number: usize) -> Record {
        let envelope = LineClassifier::new(2025).classify(line).expect("envelope");
        Vendor::Meraki
            .decoder()
            .decode(&envelope, line_number)
            .expect("meraki record")
    }

    #[test]
    fn test_append_then_freeze_keeps_order() {
        let mut store = RecordStore::new();
        store.append(meraki_record(
            "Nov 5 00:00:04 90.102.85.18 1 1762300804.1 ROUTER events dhcp lease",
            1,
        ));
        store.append(meraki_record(
            "Nov 5 00:01:04 90.102.85.18 2 1762300864.9 ROUTER events dhcp lease",
            3,
        ));
        assert_eq!(store.len(), 2);

        let frozen = store.finalize();
        let shared = frozen.clone();
        let numbers: Vec<usize> = shared.iter().map(RecordCore::line_number).collect();
        assert_eq!(numbers, [1, 3]);
        assert_eq!(frozen.volume().len(), 2);
        assert_eq!(frozen.volume().untimed(), 0);
    }

    #[test]
    fn test_default_is_empty() {
        let frozen = FrozenRecords::default();
        assert!(frozen.is_empty());
        assert!(frozen.volume().is_empty());
    }
}
