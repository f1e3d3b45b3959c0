// Player profiles: identity, roster status, classified stats, and the
// playing-time weighted projection.

use serde::Deserialize;
use tracing::warn;

use crate::catalog::{ids, StatId};
use crate::config::PlayingTimeConfig;
use crate::lenient::{lenient_int, lenient_list, lenient_opt_list};
use crate::positions::{pro_team_abbrev, slot_name, Position};
use crate::stats::{ClassifyOptions, PlayerStats, RawStatEntry};

pub type PlayerId = i64;

/// Waiver status ESPN reports for players not on waivers.
pub const WAIVER_NONE: &str = "NONE";

// ---------------------------------------------------------------------------
// Raw ESPN shapes
// ---------------------------------------------------------------------------

/// One element of the player list. ESPN nests the player either directly
/// (`{"player": ...}`) or under a pool entry (`{"playerPoolEntry": {"player": ...}}`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlayerEntry {
    pub player: Option<RawPlayer>,
    pub player_pool_entry: Option<RawPoolEntry>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub on_team_id: Option<u32>,
    pub waiver_status: Option<RawWaiverStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPoolEntry {
    pub player: Option<RawPlayer>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub on_team_id: Option<u32>,
    pub waiver_status: Option<RawWaiverStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWaiverStatus {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlayer {
    #[serde(default, deserialize_with = "lenient_int")]
    pub id: Option<PlayerId>,
    pub full_name: Option<String>,
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub default_position_id: Option<u16>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub pro_team_id: Option<u16>,
    pub injury_status: Option<String>,
    pub ownership: Option<RawOwnership>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub eligible_slots: Vec<u16>,
    #[serde(default, deserialize_with = "lenient_opt_list")]
    pub stats: Option<Vec<RawStatEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOwnership {
    pub percent_owned: Option<f64>,
}

impl RawPlayerEntry {
    /// The player payload regardless of nesting.
    pub fn player(&self) -> Option<&RawPlayer> {
        match &self.player_pool_entry {
            Some(pool) => pool.player.as_ref(),
            None => self.player.as_ref(),
        }
    }

    fn on_team_id(&self) -> Option<u32> {
        match &self.player_pool_entry {
            Some(pool) => pool.on_team_id.or(self.on_team_id),
            None => self.on_team_id,
        }
    }

    fn waiver_status(&self) -> Option<&str> {
        let status = match &self.player_pool_entry {
            Some(pool) => pool.waiver_status.as_ref().or(self.waiver_status.as_ref()),
            None => self.waiver_status.as_ref(),
        };
        status.and_then(|s| s.status.as_deref())
    }
}

// ---------------------------------------------------------------------------
// PlayerProfile
// ---------------------------------------------------------------------------

/// Fantasy roster assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FantasyTeam {
    Rostered(u32),
    FreeAgent,
}

impl FantasyTeam {
    /// ESPN uses `onTeamId == 0` for free agents.
    pub fn from_on_team_id(id: Option<u32>) -> Self {
        match id {
            Some(id) if id != 0 => FantasyTeam::Rostered(id),
            _ => FantasyTeam::FreeAgent,
        }
    }

    pub fn team_id(&self) -> Option<u32> {
        match self {
            FantasyTeam::Rostered(id) => Some(*id),
            FantasyTeam::FreeAgent => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub full_name: String,
    pub active: Option<bool>,
    pub default_position_id: Option<u16>,
    pub pro_team_id: Option<u16>,
    pub eligible_slots: Vec<u16>,
    pub ownership_percent: f64,
    pub injury_status: String,
    pub fantasy_team: FantasyTeam,
    pub waiver_status: String,
    pub stats: PlayerStats,
    /// Projected PA for hitters, projected IP for pitchers.
    pub expected_playing_time: Option<f64>,
}

impl PlayerProfile {
    /// Build a profile from a raw player-list entry. Returns `None` when the
    /// entry carries no player payload or no player id.
    pub fn from_entry(entry: &RawPlayerEntry, opts: ClassifyOptions<'_>) -> Option<Self> {
        let raw = entry.player()?;
        let id = raw.id?;
        let full_name = raw
            .full_name
            .clone()
            .unwrap_or_else(|| "Unknown Player".to_string());

        if raw.default_position_id.is_none() {
            warn!("player {full_name} (id {id}) has no defaultPositionId; projections are suppressed");
        }

        let mut profile = PlayerProfile {
            id,
            full_name,
            active: raw.active,
            default_position_id: raw.default_position_id,
            pro_team_id: raw.pro_team_id,
            eligible_slots: raw.eligible_slots.clone(),
            ownership_percent: raw
                .ownership
                .as_ref()
                .and_then(|o| o.percent_owned)
                .unwrap_or(0.0),
            injury_status: raw
                .injury_status
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            fantasy_team: FantasyTeam::from_on_team_id(entry.on_team_id()),
            waiver_status: entry.waiver_status().unwrap_or(WAIVER_NONE).to_string(),
            stats: PlayerStats::default(),
            expected_playing_time: None,
        };
        profile.refresh_stats(raw.stats.as_deref(), opts);
        Some(profile)
    }

    /// Rebuild all stat-derived fields from raw entries, discarding any
    /// previous classification.
    pub fn refresh_stats(&mut self, entries: Option<&[RawStatEntry]>, opts: ClassifyOptions<'_>) {
        self.stats = PlayerStats::classify(entries, opts);
        self.expected_playing_time = self.compute_playing_time();
    }

    fn compute_playing_time(&self) -> Option<f64> {
        self.default_position_id?;
        let projections = self.stats.projections.as_ref()?;
        if self.is_hitter() {
            projections.number(ids::PA)
        } else {
            // ESPN has no innings stat; innings are outs / 3.
            projections.number(ids::OUTS).map(|outs| outs / 3.0)
        }
    }

    /// True unless the default position is SP or RP. A missing position id
    /// counts as not a hitter.
    pub fn is_hitter(&self) -> bool {
        match self.default_position_id {
            None => false,
            Some(id) => Position::from_default_position_id(id).map_or(true, |p| !p.is_pitcher()),
        }
    }

    pub fn position(&self) -> Option<Position> {
        self.default_position_id
            .and_then(Position::from_default_position_id)
    }

    pub fn pro_team(&self) -> Option<&'static str> {
        self.pro_team_id.and_then(pro_team_abbrev)
    }

    pub fn eligible_slot_names(&self) -> Vec<&'static str> {
        self.eligible_slots
            .iter()
            .filter_map(|&slot| slot_name(slot))
            .collect()
    }

    pub fn is_on_waivers(&self) -> bool {
        self.waiver_status != WAIVER_NONE
    }

    /// Projection for `stat` scaled by the player's share of a full-season
    /// workload: `projection * playing_time / baseline`.
    ///
    /// Only meaningful for counting stats. Rate stats (AVG, OBP, SLG, ERA,
    /// WHIP) do not scale linearly with playing time; aggregate them from
    /// their weighted components instead.
    ///
    /// Returns 0 when there is no projection or no positive playing time.
    pub fn weighted_projection(&self, stat: StatId, baselines: &PlayingTimeConfig) -> f64 {
        let Some(projections) = self.stats.projections.as_ref() else {
            return 0.0;
        };
        let playing_time = match self.expected_playing_time {
            Some(pt) if pt > 0.0 => pt,
            _ => return 0.0,
        };
        let baseline = if self.is_hitter() {
            baselines.hitter_baseline_pa
        } else {
            baselines.pitcher_baseline_ip
        };
        projections.number_or_zero(stat) * (playing_time / baseline)
    }

    /// Actual season value for `stat`, if present and numeric.
    pub fn season_value(&self, stat: StatId) -> Option<f64> {
        self.stats.season.as_ref().and_then(|s| s.number(stat))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
