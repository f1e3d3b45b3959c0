// Per-scoring-period stat lines for players in active lineup slots.

use tracing::debug;

use super::player::PlayerId;
use super::team::{RawRosterEntry, RawTeam};
use crate::catalog::StatDomain;
use crate::positions::{is_hitting_slot, is_pitching_slot, slot_name};
use crate::stats::record::SPLIT_SCORING_PERIOD;
use crate::stats::{StatRecord, StatSource};

/// One player's actual stats for a single scoring period.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStatLine {
    pub team_id: u32,
    pub player_id: Option<PlayerId>,
    pub player_name: String,
    pub lineup_slot_id: u16,
    pub slot_name: Option<&'static str>,
    pub scoring_period_id: Option<u32>,
    /// Hitting stats for hitting slots, pitching stats for pitching slots.
    pub stats: StatRecord,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyStats {
    pub hitting: Vec<DailyStatLine>,
    pub pitching: Vec<DailyStatLine>,
}

impl DailyStats {
    pub fn extend(&mut self, other: DailyStats) {
        self.hitting.extend(other.hitting);
        self.pitching.extend(other.pitching);
    }

    pub fn len(&self) -> usize {
        self.hitting.len() + self.pitching.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stat lines for one team's roster entries.
///
/// Only actual, single-period entries are used. Players in bench, IL, or
/// unknown slots contribute nothing.
pub fn team_daily_stats(team_id: u32, entries: &[RawRosterEntry]) -> DailyStats {
    let mut out = DailyStats::default();
    for entry in entries {
        let Some(slot) = entry.lineup_slot_id else {
            continue;
        };
        let domain = if is_hitting_slot(slot) {
            StatDomain::Hitting
        } else if is_pitching_slot(slot) {
            StatDomain::Pitching
        } else {
            continue;
        };
        let Some(player) = entry.player_pool_entry.as_ref().and_then(|p| p.player.as_ref()) else {
            debug!("team {team_id}: roster entry in slot {slot} has no player payload");
            continue;
        };

        for stat_set in player.stats.iter().flatten() {
            if stat_set.stat_source_id != Some(0)
                || stat_set.stat_split_type_id != Some(SPLIT_SCORING_PERIOD)
            {
                continue;
            }
            let Some(blob) = stat_set.stats.as_ref() else {
                continue;
            };
            let record = StatRecord::from_blob(StatSource::Actual, SPLIT_SCORING_PERIOD, blob)
                .restricted_to(domain);
            let line = DailyStatLine {
                team_id,
                player_id: entry.resolved_player_id(),
                player_name: player
                    .full_name
                    .clone()
                    .unwrap_or_else(|| "Unknown Player".to_string()),
                lineup_slot_id: slot,
                slot_name: slot_name(slot),
                scoring_period_id: stat_set.scoring_period_id,
                stats: record,
            };
            match domain {
                StatDomain::Hitting => out.hitting.push(line),
                _ => out.pitching.push(line),
            }
        }
    }
    out
}

/// Stat lines for every team in a scoring-period roster payload.
pub fn league_daily_stats<'a>(teams: impl IntoIterator<Item = &'a RawTeam>) -> DailyStats {
    let mut out = DailyStats::default();
    for team in teams {
        let (Some(team_id), Some(roster)) = (team.id, team.roster.as_ref()) else {
            continue;
        };
        out.extend(team_daily_stats(team_id, &roster.entries));
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ids;
    use serde_json::{json, Value};

    fn entry(player_id: i64, slot: u16, name: &str, stats: Value) -> Value {
        json!({
            "playerId": player_id,
            "lineupSlotId": slot,
            "playerPoolEntry": {"player": {"id": player_id, "fullName": name, "stats": stats}}
        })
    }

    fn daily(period: u32, stats: Value) -> Value {
        json!({"statSourceId": 0, "statSplitTypeId": 5, "scoringPeriodId": period, "stats": stats})
    }

    fn teams() -> Vec<RawTeam> {
        serde_json::from_value(json!([
            {"id": 1, "roster": {"entries": [
                entry(10, 5, "Outfielder", json!([
                    daily(12, json!({"5": 1, "20": 2, "48": 9})),
                    {"statSourceId": 0, "statSplitTypeId": 0, "stats": {"5": 30}},
                    {"statSourceId": 1, "statSplitTypeId": 5, "stats": {"5": 0.2}}
                ])),
                entry(11, 14, "Starter", json!([daily(12, json!({"34": 18, "48": 7, "5": 1}))])),
                entry(12, 16, "Bench Bat", json!([daily(12, json!({"5": 2}))])),
                entry(13, 17, "Injured Arm", json!([daily(12, json!({"48": 3}))]))
            ]}},
            {"id": 2, "roster": {"entries": [
                entry(20, 19, "Infielder", json!([daily(12, json!({"23": 1}))]))
            ]}},
            {"id": 3}
        ]))
        .unwrap()
    }

    #[test]
    fn active_slots_only_with_domain_filtered_stats() {
        let stats = league_daily_stats(&teams());
        assert_eq!(stats.hitting.len(), 2);
        assert_eq!(stats.pitching.len(), 1);
        assert_eq!(stats.len(), 3);

        let of = &stats.hitting[0];
        assert_eq!(of.team_id, 1);
        assert_eq!(of.player_id, Some(10));
        assert_eq!(of.player_name, "Outfielder");
        assert_eq!(of.slot_name, Some("OF"));
        assert_eq!(of.scoring_period_id, Some(12));
        assert_eq!(of.stats.number(ids::HR), Some(1.0));
        assert_eq!(of.stats.number(ids::R), Some(2.0));
        assert_eq!(of.stats.number(ids::K), None);

        let sp = &stats.pitching[0];
        assert_eq!(sp.slot_name, Some("SP"));
        assert_eq!(sp.stats.number(ids::OUTS), Some(18.0));
        assert_eq!(sp.stats.number(ids::HR), None);

        let inf = &stats.hitting[1];
        assert_eq!(inf.team_id, 2);
        assert_eq!(inf.slot_name, Some("IF"));
        assert_eq!(inf.stats.number(ids::SB), Some(1.0));
    }

    #[test]
    fn empty_payload_yields_no_lines() {
        assert!(league_daily_stats(&Vec::<RawTeam>::new()).is_empty());
    }
}
