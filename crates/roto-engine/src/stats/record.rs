// Typed stat records built from ESPN's loosely-typed stat blobs.
//
// ESPN encodes every stat line as `{"<statId>": <value>, ...}` where values
// are usually numbers but occasionally numeric strings, infinities, or junk.
// Coercion is best-effort and never fails: keys that are not integers and
// values that are not numbers are retained as-is so callers can see them.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::catalog::{StatDomain, StatId};
use crate::lenient::{lenient_int, lenient_or_default};

// ---------------------------------------------------------------------------
// Raw ESPN shape
// ---------------------------------------------------------------------------

/// One element of a player's `stats` array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatEntry {
    #[serde(default, deserialize_with = "lenient_int")]
    pub stat_source_id: Option<i64>,
    /// Stat-set id (e.g. `"102025"`), not a stat id.
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub stat_split_type_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub scoring_period_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub season_id: Option<u16>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub stats: Option<Map<String, Value>>,
}

impl RawStatEntry {
    /// The stat-set id rendered as a string, whether ESPN sent it as a string
    /// or a number.
    pub fn set_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Keys, values, sources
// ---------------------------------------------------------------------------

/// A stat blob key: a coerced stat id, or the original key when it is not an
/// integer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatKey {
    Id(StatId),
    Raw(String),
}

/// A coerced stat value.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    /// A finite number.
    Number(f64),
    /// The raw value was positive or negative infinity; reads as 0.
    ClampedInfinite,
    /// The raw value could not be read as a number; kept unchanged.
    Raw(Value),
}

impl StatValue {
    /// Numeric reading of the value. `None` for retained raw values so that
    /// sums skip them instead of treating them as zero.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StatValue::Number(n) => Some(*n),
            StatValue::ClampedInfinite => Some(0.0),
            StatValue::Raw(_) => None,
        }
    }
}

/// Where a stat line comes from (`statSourceId`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatSource {
    Actual,
    Projected,
    Other(i64),
}

impl StatSource {
    pub fn from_id(id: i64) -> Self {
        match id {
            0 => StatSource::Actual,
            1 => StatSource::Projected,
            other => StatSource::Other(other),
        }
    }
}

/// Split type of the full-season primary stat line.
pub const SPLIT_FULL_SEASON: i64 = 0;
/// Split type of a single scoring period (daily) stat line.
pub const SPLIT_SCORING_PERIOD: i64 = 5;

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

fn coerce_key(key: &str) -> StatKey {
    match key.trim().parse::<u16>() {
        Ok(id) => StatKey::Id(StatId(id)),
        Err(_) => StatKey::Raw(key.to_string()),
    }
}

fn classify_float(f: f64, original: &Value) -> StatValue {
    if f.is_infinite() {
        StatValue::ClampedInfinite
    } else if f.is_nan() {
        StatValue::Raw(original.clone())
    } else {
        StatValue::Number(f)
    }
}

/// Coerce one raw blob value.
pub fn coerce_value(value: &Value) -> StatValue {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) => classify_float(f, value),
            None => StatValue::Raw(value.clone()),
        },
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) => classify_float(f, value),
            Err(_) => StatValue::Raw(value.clone()),
        },
        Value::Bool(b) => StatValue::Number(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => StatValue::Raw(value.clone()),
    }
}

// ---------------------------------------------------------------------------
// StatRecord
// ---------------------------------------------------------------------------

/// A single stat line with coerced keys and values.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRecord {
    pub source: StatSource,
    pub split_type: i64,
    values: BTreeMap<StatKey, StatValue>,
}

impl StatRecord {
    /// An empty record.
    pub fn new(source: StatSource, split_type: i64) -> Self {
        StatRecord {
            source,
            split_type,
            values: BTreeMap::new(),
        }
    }

    /// Build a record from a raw `{"key": value}` blob.
    pub fn from_blob(source: StatSource, split_type: i64, blob: &Map<String, Value>) -> Self {
        let values = blob
            .iter()
            .map(|(k, v)| (coerce_key(k), coerce_value(v)))
            .collect();
        StatRecord {
            source,
            split_type,
            values,
        }
    }

    /// Build a record from already-numeric pairs.
    pub fn from_numbers<I>(source: StatSource, split_type: i64, pairs: I) -> Self
    where
        I: IntoIterator<Item = (StatId, f64)>,
    {
        let mut record = StatRecord::new(source, split_type);
        for (id, value) in pairs {
            record.insert(StatKey::Id(id), StatValue::Number(value));
        }
        record
    }

    pub fn insert(&mut self, key: StatKey, value: StatValue) {
        self.values.insert(key, value);
    }

    pub fn get(&self, id: StatId) -> Option<&StatValue> {
        self.values.get(&StatKey::Id(id))
    }

    pub fn get_key(&self, key: &StatKey) -> Option<&StatValue> {
        self.values.get(key)
    }

    /// Numeric value for a stat id. `None` when absent or non-numeric.
    pub fn number(&self, id: StatId) -> Option<f64> {
        self.get(id).and_then(StatValue::as_number)
    }

    /// Numeric value for a stat id, defaulting to 0 when absent or non-numeric.
    pub fn number_or_zero(&self, id: StatId) -> f64 {
        self.number(id).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StatKey, &StatValue)> {
        self.values.iter()
    }

    /// Only the entries with an integer key and a numeric value.
    pub fn numeric(&self) -> impl Iterator<Item = (StatId, f64)> + '_ {
        self.values.iter().filter_map(|(k, v)| match k {
            StatKey::Id(id) => v.as_number().map(|n| (*id, n)),
            StatKey::Raw(_) => None,
        })
    }

    /// A copy holding only the integer-keyed entries in `domain`.
    pub fn restricted_to(&self, domain: StatDomain) -> StatRecord {
        let values = self
            .values
            .iter()
            .filter(|(k, _)| matches!(k, StatKey::Id(id) if id.domain() == Some(domain)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        StatRecord {
            source: self.source,
            split_type: self.split_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Per-player classification
// ---------------------------------------------------------------------------

/// A stat line that is kept for reference but never aggregated.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchivedRecord {
    pub id: Option<String>,
    pub split_type: Option<i64>,
    pub season_id: Option<u16>,
    pub record: StatRecord,
}

/// Which entries count as a player's canonical lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyOptions<'a> {
    /// Stat-set id of the league's season projection (e.g. `"102025"`).
    pub canonical_projection_id: Option<&'a str>,
    /// When set, actual full-season lines from other seasons are archived.
    pub season: Option<u16>,
}

/// All stat lines of one player, sorted into canonical and archived buckets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStats {
    pub projections: Option<StatRecord>,
    pub season: Option<StatRecord>,
    pub archived_projections: Vec<ArchivedRecord>,
    pub archived_splits: Vec<ArchivedRecord>,
    pub other_sources: BTreeMap<i64, StatRecord>,
}

impl PlayerStats {
    /// Classify a player's raw stat entries.
    ///
    /// Always builds from scratch: calling it again on the same input yields
    /// an identical value. A missing `stats` array yields empty buckets.
    pub fn classify(entries: Option<&[RawStatEntry]>, opts: ClassifyOptions<'_>) -> Self {
        let mut out = PlayerStats::default();
        let Some(entries) = entries else {
            return out;
        };

        let empty = Map::new();
        for entry in entries {
            let blob = entry.stats.as_ref().unwrap_or(&empty);
            let split_type = entry.stat_split_type_id;
            let Some(source_id) = entry.stat_source_id else {
                // Entries without a source id land with the other sources under -1.
                out.other_sources.insert(
                    -1,
                    StatRecord::from_blob(StatSource::Other(-1), split_type.unwrap_or(-1), blob),
                );
                continue;
            };
            let source = StatSource::from_id(source_id);
            let record = StatRecord::from_blob(source, split_type.unwrap_or(-1), blob);

            match source {
                StatSource::Projected => {
                    let set_id = entry.set_id();
                    let canonical = match (set_id.as_deref(), opts.canonical_projection_id) {
                        (Some(id), Some(want)) => id == want,
                        _ => false,
                    };
                    if canonical {
                        out.projections = Some(record);
                    } else {
                        out.archived_projections.push(ArchivedRecord {
                            id: set_id,
                            split_type,
                            season_id: entry.season_id,
                            record,
                        });
                    }
                }
                StatSource::Actual => {
                    let other_season = match (opts.season, entry.season_id) {
                        (Some(want), Some(got)) => want != got,
                        _ => false,
                    };
                    if split_type == Some(SPLIT_FULL_SEASON) && !other_season {
                        out.season = Some(record);
                    } else {
                        out.archived_splits.push(ArchivedRecord {
                            id: entry.set_id(),
                            split_type,
                            season_id: entry.season_id,
                            record,
                        });
                    }
                }
                StatSource::Other(id) => {
                    out.other_sources.insert(id, record);
                }
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
