// League orchestration: builds the player pool, teams, and rosters from a
// snapshot of ESPN payloads, and runs aggregation and ranking over them.

pub mod daily;
pub mod player;
pub mod pool;
pub mod settings;
pub mod team;

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::lenient::{lenient_list, lenient_or_default};
use crate::stats::{ClassifyOptions, StatRecord};
use crate::valuation::{
    aggregate_league, aggregate_team, rank_standings, AggregationContext, CategoryMatrix,
    RosterGroups, RotoStandings, TeamAggregate,
};

use daily::DailyStats;
use player::{PlayerId, PlayerProfile, RawPlayerEntry};
use pool::PlayerPool;
use settings::{LeagueSettings, RawLeagueSettings};
use team::{RawTeam, Team, TeamSeasonTotals};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("failed to parse league snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("team {0} is not in the league")]
    UnknownTeam(u32),
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Already-fetched league payloads: settings (mSettings), the player list,
/// teams (mTeam) and, optionally, rosters (mRoster).
///
/// Only text that is not JSON at all fails to parse. Malformed list elements
/// are dropped with a warning and a malformed settings section reads as
/// empty settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeagueSnapshot {
    #[serde(deserialize_with = "lenient_or_default")]
    pub settings: RawLeagueSettings,
    #[serde(deserialize_with = "lenient_list")]
    pub players: Vec<RawPlayerEntry>,
    #[serde(deserialize_with = "lenient_list")]
    pub teams: Vec<RawTeam>,
    /// Roster payloads matched to teams by id. Teams without a match use
    /// the roster embedded in their own payload.
    #[serde(deserialize_with = "lenient_list")]
    pub rosters: Vec<RawTeam>,
}

impl LeagueSnapshot {
    pub fn from_json_str(text: &str) -> Result<Self, LeagueError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read league snapshot {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("failed to parse league snapshot {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Player projection rows
// ---------------------------------------------------------------------------

/// One rostered player with their canonical projections.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerProjectionRow {
    pub player_id: PlayerId,
    pub player_name: String,
    pub team_id: u32,
    pub team_name: String,
    pub default_position_id: Option<u16>,
    pub projections: Option<StatRecord>,
}

// ---------------------------------------------------------------------------
// League
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct League {
    pub settings: LeagueSettings,
    pub config: EngineConfig,
    pool: PlayerPool,
    teams: Vec<Team>,
}

impl League {
    /// Build the league from a snapshot. Never fails: unusable records are
    /// skipped with a warning.
    pub fn build(snapshot: &LeagueSnapshot, config: EngineConfig) -> Self {
        let settings = LeagueSettings::from_raw(&snapshot.settings);
        let season = config.league.season.or(settings.season_id);
        let projection_set_id = config.projection_set_id(settings.season_id);
        if projection_set_id.is_none() {
            warn!("no season or projection set id configured; all projections will be archived");
        }

        let opts = ClassifyOptions {
            canonical_projection_id: projection_set_id.as_deref(),
            season,
        };
        let mut pool = PlayerPool::from_entries(&snapshot.players, opts);

        let mut teams = Vec::with_capacity(snapshot.teams.len());
        for raw in &snapshot.teams {
            let Some(mut team) = Team::from_raw(raw) else {
                warn!("skipping team payload without an id");
                continue;
            };
            let roster = snapshot
                .rosters
                .iter()
                .find(|r| r.id == Some(team.id))
                .and_then(|r| r.roster.as_ref())
                .or(raw.roster.as_ref());
            if let Some(roster) = roster {
                team.update_roster(&roster.entries, &mut pool);
            }
            teams.push(team);
        }

        info!(
            "league built: {} teams, {} players, {} hitting / {} pitching categories",
            teams.len(),
            pool.len(),
            settings.hitting_categories.len(),
            settings.pitching_categories.len()
        );

        League {
            settings,
            config,
            pool,
            teams,
        }
    }

    // -- Pool and team queries --

    pub fn pool(&self) -> &PlayerPool {
        &self.pool
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, team_id: u32) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerProfile> {
        self.pool.get(player_id)
    }

    pub fn players_on_team(&self, team_id: u32) -> Vec<&PlayerProfile> {
        self.pool.players_on_team(team_id)
    }

    pub fn free_agents(&self) -> Vec<&PlayerProfile> {
        self.pool.free_agents()
    }

    pub fn players_on_waivers(&self) -> Vec<&PlayerProfile> {
        self.pool.players_on_waivers()
    }

    pub fn team_season_totals(&self, team_id: u32) -> Result<&TeamSeasonTotals, LeagueError> {
        self.team(team_id)
            .map(|t| &t.season_totals)
            .ok_or(LeagueError::UnknownTeam(team_id))
    }

    /// ESPN-reported season totals for every team, in team order.
    pub fn season_totals(&self) -> Vec<(&str, &TeamSeasonTotals)> {
        self.teams
            .iter()
            .map(|t| (t.name.as_str(), &t.season_totals))
            .collect()
    }

    /// One row per rostered player, in team then roster order.
    pub fn player_projection_rows(&self) -> Vec<PlayerProjectionRow> {
        let mut rows = Vec::new();
        for team in &self.teams {
            for player in self.pool.resolve(&team.roster_ids()) {
                if player.stats.projections.is_none() {
                    warn!("player {} (id {}) has no projections", player.full_name, player.id);
                }
                rows.push(PlayerProjectionRow {
                    player_id: player.id,
                    player_name: player.full_name.clone(),
                    team_id: team.id,
                    team_name: team.name.clone(),
                    default_position_id: player.default_position_id,
                    projections: player.stats.projections.clone(),
                });
            }
        }
        rows
    }

    // -- Aggregation and ranking --

    pub fn roster_groups(&self) -> Vec<RosterGroups<'_>> {
        self.teams.iter().map(|team| self.groups_for(team)).collect()
    }

    fn groups_for(&self, team: &Team) -> RosterGroups<'_> {
        let (hitters, pitchers) = team.partition(&self.pool);
        RosterGroups {
            team_id: team.id,
            team_name: team.name.clone(),
            hitters,
            pitchers,
        }
    }

    pub fn team_aggregates(&self) -> Vec<TeamAggregate> {
        let ctx = AggregationContext::from_config(&self.config);
        aggregate_league(
            &self.roster_groups(),
            &self.settings.category_list(),
            &ctx,
            self.config.aggregation.parallel,
        )
    }

    pub fn team_aggregate(&self, team_id: u32) -> Result<TeamAggregate, LeagueError> {
        let team = self.team(team_id).ok_or(LeagueError::UnknownTeam(team_id))?;
        let ctx = AggregationContext::from_config(&self.config);
        Ok(aggregate_team(
            &self.groups_for(team),
            &self.settings.category_list(),
            &ctx,
        ))
    }

    pub fn category_matrix(&self) -> CategoryMatrix {
        CategoryMatrix::from_aggregates(&self.team_aggregates())
    }

    pub fn roto_standings(&self) -> RotoStandings {
        rank_standings(&self.category_matrix(), &self.settings.category_list())
    }

    /// Active-slot stat lines from a scoring-period roster payload, limited
    /// to this league's teams.
    pub fn daily_stats(&self, payload: &[RawTeam]) -> DailyStats {
        daily::league_daily_stats(
            payload
                .iter()
                .filter(|t| t.id.is_some_and(|id| self.team(id).is_some())),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ids;

    fn snapshot_json() -> &'static str {
        r#"{
            "settings": {
                "seasonId": 2025,
                "settings": {"scoringSettings": {"scoringType": "ROTO", "scoringItems": [
                    {"statId": 5, "points": 1.0},
                    {"statId": 47, "points": 1.0, "isReverseItem": true}
                ]}}
            },
            "players": [
                {"onTeamId": 1, "player": {"id": 100, "fullName": "Slugger", "defaultPositionId": 3,
                  "stats": [{"statSourceId": 1, "id": "102025", "statSplitTypeId": 0,
                             "stats": {"16": 600, "5": 40}}]}},
                {"onTeamId": 2, "player": {"id": 200, "fullName": "Ace", "defaultPositionId": 1,
                  "stats": [{"statSourceId": 1, "id": "102025", "statSplitTypeId": 0,
                             "stats": {"34": 540, "45": 60}}]}},
                {"onTeamId": 0, "player": {"id": 300, "fullName": "Free Bat", "defaultPositionId": 7}}
            ],
            "teams": [
                {"id": 1, "name": "Bats", "roster": {"entries": [{"playerId": 100}]}},
                {"id": 2, "name": "Arms"}
            ],
            "rosters": [
                {"id": 2, "roster": {"entries": [{"playerId": 200}, {"playerId": 999}]}}
            ]
        }"#
    }

    fn league() -> League {
        let snapshot = LeagueSnapshot::from_json_str(snapshot_json()).unwrap();
        League::build(&snapshot, EngineConfig::default())
    }

    #[test]
    fn rosters_come_from_matching_payload_or_embedded_roster() {
        let league = league();
        assert_eq!(league.team(1).unwrap().roster_ids(), vec![100]);
        assert_eq!(league.team(2).unwrap().roster_ids(), vec![200]);
        assert_eq!(league.players_on_team(2).len(), 1);
        assert_eq!(league.free_agents().len(), 1);
    }

    #[test]
    fn season_id_selects_canonical_projections() {
        let league = league();
        let slugger = league.player(100).unwrap();
        assert!(slugger.stats.projections.is_some());
        assert_eq!(slugger.expected_playing_time, Some(600.0));
    }

    #[test]
    fn unknown_team_is_an_error() {
        let league = league();
        assert!(matches!(
            league.team_season_totals(42),
            Err(LeagueError::UnknownTeam(42))
        ));
        assert!(matches!(league.team_aggregate(42), Err(LeagueError::UnknownTeam(42))));
    }

    #[test]
    fn single_team_aggregate_matches_league_pass() {
        let league = league();
        for agg in league.team_aggregates() {
            assert_eq!(league.team_aggregate(agg.team_id).unwrap(), agg);
        }
    }

    #[test]
    fn one_sided_teams_get_nulls_and_rank_last() {
        let league = league();
        let bats = league.team_aggregate(1).unwrap();
        assert_eq!(bats.get(ids::HR), Some(Some(40.0)));
        assert_eq!(bats.get(ids::ERA), Some(None));

        let standings = league.roto_standings();
        assert_eq!(standings.columns, vec!["HR Rank", "ERA Rank"]);
        let era = standings.rank("Bats", ids::ERA).unwrap();
        assert_eq!(era.rank, 2);
        assert!(era.missing);
        // Bats: 1 + 2, Arms: 2 + 1
        assert!(standings.rows.iter().all(|r| r.total_points == 3));
    }

    #[test]
    fn projection_rows_cover_rostered_players() {
        let rows = league().player_projection_rows();
        let ids: Vec<PlayerId> = rows.iter().map(|r| r.player_id).collect();
        assert_eq!(ids, vec![100, 200]);
        assert_eq!(rows[1].team_name, "Arms");
        assert!(rows.iter().all(|r| r.projections.is_some()));
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let snapshot = LeagueSnapshot::from_json_str(
            r#"{
            "settings": {
                "seasonId": "2025",
                "settings": {"scoringSettings": {"scoringItems": [
                    {"statId": 5, "points": 1.0},
                    "not an item"
                ]}}
            },
            "players": [
                {"onTeamId": 1, "player": {"id": 100, "fullName": "Slugger", "defaultPositionId": 3,
                  "eligibleSlots": null,
                  "stats": [{"statSourceId": 1, "id": "102025", "statSplitTypeId": 0, "seasonId": "2025",
                             "stats": {"16": 600, "5": 40}}]}},
                {"onTeamId": 2, "player": {"id": 200, "fullName": "Masher", "defaultPositionId": 3,
                  "stats": [{"statSourceId": 1, "id": "102025", "statSplitTypeId": 0,
                             "stats": {"16": 600, "5": 25}}, 17]}},
                {"onTeamId": 2, "player": "not a player"}
            ],
            "teams": [
                {"id": 1, "name": "Bats", "roster": {"entries": [{"playerId": 100}]}},
                {"id": 2, "name": "Mashers", "roster": {"entries": [{"playerId": 200}, "junk"]}},
                {"id": 3, "name": ["not", "a", "name"]}
            ],
            "rosters": {"unexpected": "shape"}
        }"#,
        )
        .unwrap();
        assert_eq!(snapshot.players.len(), 2);
        assert_eq!(snapshot.teams.len(), 2);
        assert!(snapshot.rosters.is_empty());

        let league = League::build(&snapshot, EngineConfig::default());
        let slugger = league.player(100).unwrap();
        assert!(slugger.eligible_slots.is_empty());
        assert!(slugger.stats.projections.is_some());
        assert_eq!(league.team(2).unwrap().roster_ids(), vec![200]);

        let standings = league.roto_standings();
        assert_eq!(standings.columns, vec!["HR Rank"]);
        assert_eq!(standings.rank("Bats", ids::HR).unwrap().rank, 1);
        assert_eq!(standings.rank("Mashers", ids::HR).unwrap().rank, 2);
    }

    #[test]
    fn malformed_snapshot_is_a_parse_error() {
        let err = LeagueSnapshot::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, LeagueError::Parse(_)));
    }
}
