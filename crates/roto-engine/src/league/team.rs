// Fantasy teams: metadata, season totals, and rosters held as player ids.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::player::{FantasyTeam, PlayerId, PlayerProfile, RawPoolEntry};
use super::pool::PlayerPool;
use crate::catalog::StatDomain;
use crate::lenient::{lenient_int, lenient_list, lenient_or_default};
use crate::stats::{StatRecord, StatSource};
use crate::stats::record::SPLIT_FULL_SEASON;

// ---------------------------------------------------------------------------
// Raw ESPN shapes (mTeam / mRoster views)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTeam {
    #[serde(default, deserialize_with = "lenient_int")]
    pub id: Option<u32>,
    pub abbrev: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub division_id: Option<u32>,
    pub logo: Option<String>,
    pub primary_owner: Option<String>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub record: Option<RawTeamRecord>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub values_by_stat: Option<Map<String, Value>>,
    pub roster: Option<RawTeamRoster>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeamRecord {
    pub overall: Option<RawRecordLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRecordLine {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeamRoster {
    #[serde(default, deserialize_with = "lenient_list")]
    pub entries: Vec<RawRosterEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRosterEntry {
    #[serde(default, deserialize_with = "lenient_int")]
    pub player_id: Option<PlayerId>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub lineup_slot_id: Option<u16>,
    pub player_pool_entry: Option<RawPoolEntry>,
}

impl RawRosterEntry {
    /// Player id from the entry, or from the nested player payload.
    pub fn resolved_player_id(&self) -> Option<PlayerId> {
        self.player_id.or_else(|| {
            self.player_pool_entry
                .as_ref()
                .and_then(|p| p.player.as_ref())
                .and_then(|p| p.id)
        })
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub percentage: Option<f64>,
}

/// Team-level season totals as reported by ESPN, split by domain.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSeasonTotals {
    pub hitting: StatRecord,
    pub pitching: StatRecord,
}

impl Default for TeamSeasonTotals {
    fn default() -> Self {
        TeamSeasonTotals {
            hitting: StatRecord::new(StatSource::Actual, SPLIT_FULL_SEASON),
            pitching: StatRecord::new(StatSource::Actual, SPLIT_FULL_SEASON),
        }
    }
}

impl TeamSeasonTotals {
    pub fn from_values_by_stat(values: &Map<String, Value>) -> Self {
        let all = StatRecord::from_blob(StatSource::Actual, SPLIT_FULL_SEASON, values);
        TeamSeasonTotals {
            hitting: all.restricted_to(StatDomain::Hitting),
            pitching: all.restricted_to(StatDomain::Pitching),
        }
    }
}

/// A rostered player and the lineup slot they occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterSpot {
    pub player_id: PlayerId,
    pub lineup_slot_id: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct Team {
    pub id: u32,
    pub abbrev: String,
    pub name: String,
    pub division_id: Option<u32>,
    pub logo: Option<String>,
    pub primary_owner: Option<String>,
    pub record: TeamRecord,
    pub season_totals: TeamSeasonTotals,
    pub roster: Vec<RosterSpot>,
}

impl Team {
    /// Build a team from its raw payload. Returns `None` without a team id.
    /// The roster starts empty; see [`Team::update_roster`].
    pub fn from_raw(raw: &RawTeam) -> Option<Self> {
        let id = raw.id?;
        let name = match (&raw.name, &raw.location, &raw.nickname) {
            (Some(name), _, _) if !name.trim().is_empty() => name.clone(),
            (_, Some(location), Some(nickname)) => format!("{location} {nickname}").trim().to_string(),
            (_, Some(single), None) | (_, None, Some(single)) => single.trim().to_string(),
            _ => format!("Team {id}"),
        };
        let record = raw
            .record
            .as_ref()
            .and_then(|r| r.overall.as_ref())
            .map(|o| TeamRecord {
                wins: o.wins,
                losses: o.losses,
                ties: o.ties,
                percentage: o.percentage,
            })
            .unwrap_or_default();
        let season_totals = raw
            .values_by_stat
            .as_ref()
            .map(TeamSeasonTotals::from_values_by_stat)
            .unwrap_or_default();

        Some(Team {
            id,
            abbrev: raw.abbrev.clone().unwrap_or_default(),
            name,
            division_id: raw.division_id,
            logo: raw.logo.clone(),
            primary_owner: raw.primary_owner.clone(),
            record,
            season_totals,
            roster: Vec::new(),
        })
    }

    /// Replace the roster from raw entries, assigning each rostered player to
    /// this team in the pool. Players previously on this team become free
    /// agents unless re-rostered. Players missing from the pool are skipped.
    pub fn update_roster(&mut self, entries: &[RawRosterEntry], pool: &mut PlayerPool) {
        self.roster.clear();
        pool.release_team(self.id);
        for entry in entries {
            let Some(player_id) = entry.resolved_player_id() else {
                warn!("team {} ({}): roster entry without a player id", self.name, self.id);
                continue;
            };
            if !pool.assign_team(player_id, FantasyTeam::Rostered(self.id), None) {
                warn!(
                    "team {} ({}): rostered player {player_id} is not in the player pool",
                    self.name, self.id
                );
                continue;
            }
            self.roster.push(RosterSpot {
                player_id,
                lineup_slot_id: entry.lineup_slot_id,
            });
        }
    }

    pub fn roster_ids(&self) -> Vec<PlayerId> {
        self.roster.iter().map(|spot| spot.player_id).collect()
    }

    /// Rostered profiles split into (hitters, pitchers) by `is_hitter`.
    pub fn partition<'a>(
        &self,
        pool: &'a PlayerPool,
    ) -> (Vec<&'a PlayerProfile>, Vec<&'a PlayerProfile>) {
        self.roster
            .iter()
            .filter_map(|spot| pool.get(spot.player_id))
            .partition(|p| p.is_hitter())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ids;
    use crate::league::player::RawPlayerEntry;
    use crate::stats::ClassifyOptions;
    use serde_json::json;

    fn raw_team(v: Value) -> RawTeam {
        serde_json::from_value(v).unwrap()
    }

    fn pool() -> PlayerPool {
        let entries: Vec<RawPlayerEntry> = serde_json::from_value(json!([
            {"onTeamId": 0, "player": {"id": 1, "fullName": "Catcher", "defaultPositionId": 2}},
            {"onTeamId": 0, "player": {"id": 2, "fullName": "Starter", "defaultPositionId": 1}},
            {"onTeamId": 0, "player": {"id": 3, "fullName": "Fielder", "defaultPositionId": 8}}
        ]))
        .unwrap();
        PlayerPool::from_entries(&entries, ClassifyOptions::default())
    }

    #[test]
    fn parses_metadata_and_record() {
        let team = Team::from_raw(&raw_team(json!({
            "id": 4, "abbrev": "SLUG", "name": "Sluggers", "divisionId": 1,
            "logo": "https://example.invalid/logo.png", "primaryOwner": "{OWNER}",
            "record": {"overall": {"wins": 10, "losses": 5, "ties": 1, "percentage": 0.656}}
        })))
        .unwrap();
        assert_eq!(team.id, 4);
        assert_eq!(team.abbrev, "SLUG");
        assert_eq!(team.name, "Sluggers");
        assert_eq!(team.division_id, Some(1));
        assert_eq!(team.primary_owner.as_deref(), Some("{OWNER}"));
        assert_eq!(team.record.wins, 10);
        assert_eq!(team.record.ties, 1);
        assert!(team.roster.is_empty());
    }

    #[test]
    fn name_falls_back_to_location_and_nickname() {
        let team = Team::from_raw(&raw_team(json!({
            "id": 2, "location": "River City", "nickname": "Rafters"
        })))
        .unwrap();
        assert_eq!(team.name, "River City Rafters");

        let bare = Team::from_raw(&raw_team(json!({"id": 9}))).unwrap();
        assert_eq!(bare.name, "Team 9");
        assert_eq!(bare.record, TeamRecord::default());
    }

    #[test]
    fn team_without_id_is_rejected() {
        assert!(Team::from_raw(&raw_team(json!({"name": "Ghost"}))).is_none());
    }

    #[test]
    fn season_totals_split_by_domain() {
        let team = Team::from_raw(&raw_team(json!({
            "id": 1,
            "valuesByStat": {"5": 120.0, "20": 500.0, "32": 90.0, "47": 3.85, "48": 1200.0, "72": 44.0}
        })))
        .unwrap();
        let totals = &team.season_totals;
        assert_eq!(totals.hitting.len(), 2);
        assert_eq!(totals.hitting.number(ids::HR), Some(120.0));
        assert_eq!(totals.pitching.len(), 2);
        assert_eq!(totals.pitching.number(ids::ERA), Some(3.85));
        assert_eq!(totals.pitching.number(ids::K), Some(1200.0));
    }

    #[test]
    fn roster_assigns_through_pool_and_skips_unknown_players() {
        let mut pool = pool();
        let mut team = Team::from_raw(&raw_team(json!({"id": 7, "name": "Sevens"}))).unwrap();
        let entries: Vec<RawRosterEntry> = serde_json::from_value(json!([
            {"playerId": 1, "lineupSlotId": 0},
            {"lineupSlotId": 14, "playerPoolEntry": {"player": {"id": 2}}},
            {"playerId": 99, "lineupSlotId": 16},
            {"lineupSlotId": 16}
        ]))
        .unwrap();
        team.update_roster(&entries, &mut pool);

        assert_eq!(team.roster_ids(), vec![1, 2]);
        assert_eq!(team.roster[1].lineup_slot_id, Some(14));
        assert_eq!(pool.get(1).unwrap().fantasy_team, FantasyTeam::Rostered(7));
        assert_eq!(pool.get(3).unwrap().fantasy_team, FantasyTeam::FreeAgent);

        let (hitters, pitchers) = team.partition(&pool);
        assert_eq!(hitters.len(), 1);
        assert_eq!(hitters[0].full_name, "Catcher");
        assert_eq!(pitchers.len(), 1);
        assert_eq!(pitchers[0].full_name, "Starter");
    }

    #[test]
    fn update_roster_replaces_previous_roster() {
        let mut pool = pool();
        let mut team = Team::from_raw(&raw_team(json!({"id": 7}))).unwrap();
        let first: Vec<RawRosterEntry> =
            serde_json::from_value(json!([{"playerId": 1}, {"playerId": 2}])).unwrap();
        let second: Vec<RawRosterEntry> = serde_json::from_value(json!([{"playerId": 3}])).unwrap();
        team.update_roster(&first, &mut pool);
        team.update_roster(&second, &mut pool);
        assert_eq!(team.roster_ids(), vec![3]);

        let on_team: Vec<PlayerId> = pool.players_on_team(7).iter().map(|p| p.id).collect();
        assert_eq!(on_team, team.roster_ids());
        assert_eq!(pool.get(1).unwrap().fantasy_team, FantasyTeam::FreeAgent);
        assert_eq!(pool.get(2).unwrap().fantasy_team, FantasyTeam::FreeAgent);
        assert_eq!(pool.free_agents().len(), 2);
    }

    #[test]
    fn update_roster_leaves_other_teams_alone() {
        let mut pool = pool();
        let mut sevens = Team::from_raw(&raw_team(json!({"id": 7}))).unwrap();
        let mut eights = Team::from_raw(&raw_team(json!({"id": 8}))).unwrap();
        let one: Vec<RawRosterEntry> = serde_json::from_value(json!([{"playerId": 1}])).unwrap();
        let two: Vec<RawRosterEntry> = serde_json::from_value(json!([{"playerId": 2}])).unwrap();
        sevens.update_roster(&one, &mut pool);
        eights.update_roster(&two, &mut pool);
        sevens.update_roster(&[], &mut pool);

        assert!(pool.players_on_team(7).is_empty());
        assert_eq!(pool.get(2).unwrap().fantasy_team, FantasyTeam::Rostered(8));
    }
}
