// Stat catalog: ESPN numeric stat identifiers, display names, and domains.
//
// The catalog is a fixed-size table indexed by stat id. Ids that fall outside
// the table, or that ESPN emits without a documented meaning, display as the
// stringified id.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// ESPN stat identifier (the integer keys of every stat blob).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatId(pub u16);

/// Statistical domain of a stat id, derived purely from its numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatDomain {
    Hitting,
    Pitching,
    Fielding,
}

/// A single catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatDef {
    pub name: &'static str,
    /// True when the stat sums meaningfully across players (HR, SV, OUTS).
    /// False for ratios and derived scores (AVG, ERA, RC).
    pub additive: bool,
}

/// Inclusive id ranges for each domain. Id 32 (games pitched) sits between
/// the hitting and pitching ranges and belongs to neither.
pub const HITTING_RANGE: std::ops::RangeInclusive<u16> = 0..=31;
pub const PITCHING_RANGE: std::ops::RangeInclusive<u16> = 33..=66;
pub const FIELDING_RANGE: std::ops::RangeInclusive<u16> = 67..=73;

// ---------------------------------------------------------------------------
// Well-known ids used by aggregation and playing-time logic
// ---------------------------------------------------------------------------

pub mod ids {
    use super::StatId;

    // Hitting
    pub const AB: StatId = StatId(0);
    pub const H: StatId = StatId(1);
    pub const AVG: StatId = StatId(2);
    pub const HR: StatId = StatId(5);
    pub const TB: StatId = StatId(8);
    pub const SLG: StatId = StatId(9);
    pub const BB: StatId = StatId(10);
    pub const HBP: StatId = StatId(12);
    pub const SF: StatId = StatId(13);
    pub const PA: StatId = StatId(16);
    pub const OBP: StatId = StatId(17);
    pub const OPS: StatId = StatId(18);
    pub const R: StatId = StatId(20);
    pub const RBI: StatId = StatId(21);
    pub const SB: StatId = StatId(23);

    // Pitching
    pub const OUTS: StatId = StatId(34);
    pub const P_H: StatId = StatId(37);
    pub const P_BB: StatId = StatId(39);
    pub const WHIP: StatId = StatId(41);
    pub const ER: StatId = StatId(45);
    pub const ERA: StatId = StatId(47);
    pub const K: StatId = StatId(48);
    pub const K_PER_9: StatId = StatId(49);
    pub const W: StatId = StatId(53);
    pub const SV: StatId = StatId(57);
    pub const HLD: StatId = StatId(60);
    pub const QS: StatId = StatId(63);
}

// ---------------------------------------------------------------------------
// Catalog table
// ---------------------------------------------------------------------------

const fn count(name: &'static str) -> Option<StatDef> {
    Some(StatDef {
        name,
        additive: true,
    })
}

const fn ratio(name: &'static str) -> Option<StatDef> {
    Some(StatDef {
        name,
        additive: false,
    })
}

const CATALOG_LEN: usize = 74;

static CATALOG: [Option<StatDef>; CATALOG_LEN] = [
    // 0..=31 hitting
    count("AB"),
    count("H"),
    ratio("AVG"),
    count("2B"),
    count("3B"),
    count("HR"),
    count("XBH"),
    count("1B"),
    count("TB"),
    ratio("SLG"),
    count("BB"),
    count("IBB"),
    count("HBP"),
    count("SF"),
    count("SH"),
    count("SAC"),
    count("PA"),
    ratio("OBP"),
    ratio("OPS"),
    ratio("RC"),
    count("R"),
    count("RBI"),
    None,
    count("SB"),
    count("CS"),
    count("SB-CS"),
    count("GDP"),
    count("SO"),
    count("PS"),
    ratio("PPA"),
    None,
    count("CYC"),
    // 32..=66 pitching (32 is outside the scored pitching range)
    count("GP"),
    count("GS"),
    count("OUTS"),
    count("TBF"),
    count("P"),
    count("H"),
    ratio("OBA"),
    count("BB"),
    count("IBB"),
    ratio("WHIP"),
    count("HBP"),
    ratio("OOBP"),
    count("R"),
    count("ER"),
    count("HR"),
    ratio("ERA"),
    count("K"),
    ratio("K/9"),
    count("WP"),
    count("BK"),
    count("PK"),
    count("W"),
    count("L"),
    ratio("WPCT"),
    count("SVO"),
    count("SV"),
    count("BS"),
    ratio("SV%"),
    count("HLD"),
    None,
    count("CG"),
    count("QS"),
    None,
    count("NH"),
    count("PG"),
    // 67..=73 fielding
    count("TC"),
    count("PO"),
    count("A"),
    count("OFA"),
    ratio("FPCT"),
    count("E"),
    count("DP"),
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

impl StatId {
    /// Catalog entry for this id, if it has a documented meaning.
    pub fn def(self) -> Option<&'static StatDef> {
        CATALOG.get(self.0 as usize).and_then(Option::as_ref)
    }

    /// Display name, falling back to the stringified id.
    pub fn name(self) -> Cow<'static, str> {
        match self.def() {
            Some(def) => Cow::Borrowed(def.name),
            None => Cow::Owned(self.0.to_string()),
        }
    }

    /// Domain derived from the id range. `None` for ids outside every range.
    pub fn domain(self) -> Option<StatDomain> {
        if HITTING_RANGE.contains(&self.0) {
            Some(StatDomain::Hitting)
        } else if PITCHING_RANGE.contains(&self.0) {
            Some(StatDomain::Pitching)
        } else if FIELDING_RANGE.contains(&self.0) {
            Some(StatDomain::Fielding)
        } else {
            None
        }
    }

    /// Whether the stat sums meaningfully across players.
    pub fn is_additive(self) -> bool {
        self.def().is_some_and(|d| d.additive)
    }
}

impl fmt::Display for StatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<u16> for StatId {
    fn from(id: u16) -> Self {
        StatId(id)
    }
}

/// Display name for a stat id.
pub fn stat_name(id: StatId) -> Cow<'static, str> {
    id.name()
}

/// Domain for a stat id.
pub fn stat_domain(id: StatId) -> Option<StatDomain> {
    id.domain()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
