pub mod histogram;
pub mod parse_report;
pub mod record_store;

pub use histogram::{MinuteHistogram, TrendPoint, VolumeTrend};
pub use parse_report::ParseReport;
pub use record_store::{FrozenRecords, RecordStore};
