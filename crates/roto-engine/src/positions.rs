// ESPN position, lineup slot, and pro team identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ESPN lineup slot ID constants (from ESPN Fantasy API v3)
// ---------------------------------------------------------------------------

pub const ESPN_SLOT_C: u16 = 0;
pub const ESPN_SLOT_1B: u16 = 1;
pub const ESPN_SLOT_2B: u16 = 2;
pub const ESPN_SLOT_3B: u16 = 3;
pub const ESPN_SLOT_SS: u16 = 4;
pub const ESPN_SLOT_OF: u16 = 5;
pub const ESPN_SLOT_MI: u16 = 6; // 2B/SS combo
pub const ESPN_SLOT_CI: u16 = 7; // 1B/3B combo
pub const ESPN_SLOT_LF: u16 = 8;
pub const ESPN_SLOT_CF: u16 = 9;
pub const ESPN_SLOT_RF: u16 = 10;
pub const ESPN_SLOT_DH: u16 = 11;
pub const ESPN_SLOT_UTIL: u16 = 12;
pub const ESPN_SLOT_P: u16 = 13; // Generic pitcher
pub const ESPN_SLOT_SP: u16 = 14;
pub const ESPN_SLOT_RP: u16 = 15;
pub const ESPN_SLOT_BE: u16 = 16;
pub const ESPN_SLOT_IL: u16 = 17;
pub const ESPN_SLOT_IF: u16 = 19; // 1B/2B/SS/3B

/// Display name for a lineup slot id. Slots 18, 20+ have been observed in
/// ESPN payloads without a known meaning and display as `None`.
pub fn slot_name(slot_id: u16) -> Option<&'static str> {
    match slot_id {
        ESPN_SLOT_C => Some("C"),
        ESPN_SLOT_1B => Some("1B"),
        ESPN_SLOT_2B => Some("2B"),
        ESPN_SLOT_3B => Some("3B"),
        ESPN_SLOT_SS => Some("SS"),
        ESPN_SLOT_OF => Some("OF"),
        ESPN_SLOT_MI => Some("2B/SS"),
        ESPN_SLOT_CI => Some("1B/3B"),
        ESPN_SLOT_LF => Some("LF"),
        ESPN_SLOT_CF => Some("CF"),
        ESPN_SLOT_RF => Some("RF"),
        ESPN_SLOT_DH => Some("DH"),
        ESPN_SLOT_UTIL => Some("UTIL"),
        ESPN_SLOT_P => Some("P"),
        ESPN_SLOT_SP => Some("SP"),
        ESPN_SLOT_RP => Some("RP"),
        ESPN_SLOT_BE => Some("BE"),
        ESPN_SLOT_IL => Some("IL"),
        ESPN_SLOT_IF => Some("IF"),
        _ => None,
    }
}

/// Whether a lineup slot is an active hitting slot (counts toward hitting stats).
pub fn is_hitting_slot(slot_id: u16) -> bool {
    slot_id <= ESPN_SLOT_UTIL || slot_id == ESPN_SLOT_IF
}

/// Whether a lineup slot is an active pitching slot.
pub fn is_pitching_slot(slot_id: u16) -> bool {
    (ESPN_SLOT_P..=ESPN_SLOT_RP).contains(&slot_id)
}

// ---------------------------------------------------------------------------
// Default positions
// ---------------------------------------------------------------------------

/// A player's primary position, from ESPN's `defaultPositionId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    StartingPitcher,
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    LeftField,
    CenterField,
    RightField,
    DesignatedHitter,
    ReliefPitcher,
}

impl Position {
    /// Map ESPN's `defaultPositionId` to a position. Unknown ids return `None`.
    pub fn from_default_position_id(id: u16) -> Option<Self> {
        match id {
            1 => Some(Position::StartingPitcher),
            2 => Some(Position::Catcher),
            3 => Some(Position::FirstBase),
            4 => Some(Position::SecondBase),
            5 => Some(Position::ThirdBase),
            6 => Some(Position::ShortStop),
            7 => Some(Position::LeftField),
            8 => Some(Position::CenterField),
            9 => Some(Position::RightField),
            10 => Some(Position::DesignatedHitter),
            11 => Some(Position::ReliefPitcher),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::StartingPitcher => "SP",
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::ShortStop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::DesignatedHitter => "DH",
            Position::ReliefPitcher => "RP",
        }
    }

    pub fn is_pitcher(&self) -> bool {
        matches!(self, Position::StartingPitcher | Position::ReliefPitcher)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Pro teams
// ---------------------------------------------------------------------------

const PRO_TEAMS: [&str; 31] = [
    "FA", "Bal", "Bos", "LAA", "ChW", "Cle", "Det", "KC", "Mil", "Min", "NYY", "Oak", "Sea",
    "Tex", "Tor", "Atl", "ChC", "Cin", "Hou", "LAD", "Wsh", "NYM", "Phi", "Pit", "StL", "SD",
    "SF", "Col", "Mia", "Ari", "TB",
];

/// MLB team abbreviation for ESPN's `proTeamId` (0 = free agent).
pub fn pro_team_abbrev(pro_team_id: u16) -> Option<&'static str> {
    PRO_TEAMS.get(pro_team_id as usize).copied()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_position_ids_map() {
        assert_eq!(Position::from_default_position_id(1), Some(Position::StartingPitcher));
        assert_eq!(Position::from_default_position_id(2), Some(Position::Catcher));
        assert_eq!(Position::from_default_position_id(10), Some(Position::DesignatedHitter));
        assert_eq!(Position::from_default_position_id(11), Some(Position::ReliefPitcher));
        assert_eq!(Position::from_default_position_id(0), None);
        assert_eq!(Position::from_default_position_id(12), None);
    }

    #[test]
    fn only_sp_and_rp_are_pitchers() {
        for id in 1..=11u16 {
            let pos = Position::from_default_position_id(id).unwrap();
            assert_eq!(pos.is_pitcher(), id == 1 || id == 11, "id {id}");
        }
    }

    #[test]
    fn slot_names() {
        assert_eq!(slot_name(ESPN_SLOT_C), Some("C"));
        assert_eq!(slot_name(ESPN_SLOT_MI), Some("2B/SS"));
        assert_eq!(slot_name(ESPN_SLOT_IL), Some("IL"));
        assert_eq!(slot_name(ESPN_SLOT_IF), Some("IF"));
        assert_eq!(slot_name(18), None);
        assert_eq!(slot_name(21), None);
    }

    #[test]
    fn active_slot_classification() {
        assert!(is_hitting_slot(ESPN_SLOT_C));
        assert!(is_hitting_slot(ESPN_SLOT_UTIL));
        assert!(is_hitting_slot(ESPN_SLOT_IF));
        assert!(!is_hitting_slot(ESPN_SLOT_P));
        assert!(!is_hitting_slot(ESPN_SLOT_BE));

        assert!(is_pitching_slot(ESPN_SLOT_P));
        assert!(is_pitching_slot(ESPN_SLOT_SP));
        assert!(is_pitching_slot(ESPN_SLOT_RP));
        assert!(!is_pitching_slot(ESPN_SLOT_BE));
        assert!(!is_pitching_slot(ESPN_SLOT_IL));
        assert!(!is_pitching_slot(ESPN_SLOT_UTIL));
    }

    #[test]
    fn pro_team_lookup() {
        assert_eq!(pro_team_abbrev(0), Some("FA"));
        assert_eq!(pro_team_abbrev(10), Some("NYY"));
        assert_eq!(pro_team_abbrev(30), Some("TB"));
        assert_eq!(pro_team_abbrev(31), None);
    }

    #[test]
    fn position_display() {
        assert_eq!(Position::ShortStop.to_string(), "SS");
        assert_eq!(Position::ReliefPitcher.to_string(), "RP");
    }
}
