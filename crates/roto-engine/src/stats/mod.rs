pub mod record;

pub use record::{
    ArchivedRecord, ClassifyOptions, PlayerStats, RawStatEntry, StatKey, StatRecord, StatSource,
    StatValue,
};
