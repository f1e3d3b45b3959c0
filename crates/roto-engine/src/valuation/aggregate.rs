// Team-level aggregation of player stats with per-stat aggregation rules.
//
// Counting stats average the group's summed contributions over the group
// size. Rate stats are never averaged: they are recomputed once from the
// group's summed components (e.g. ERA = 27 * sum(ER) / sum(OUTS)).

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{ids, StatDomain, StatId};
use crate::config::{EngineConfig, PlayingTimeConfig};
use crate::league::player::PlayerProfile;
use crate::league::settings::ScoringCategory;

/// Denominators smaller than this are treated as zero.
const DENOM_EPSILON: f64 = 1e-12;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Which per-player number feeds the aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatBasis {
    /// Playing-time weighted projections.
    #[default]
    Projected,
    /// Actual full-season stats.
    Actual,
}

/// Rate stats recomputed from summed components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateStat {
    Avg,
    Slg,
    Obp,
    Ops,
    Whip,
    Era,
    KPer9,
}

impl RateStat {
    pub fn for_stat(id: StatId) -> Option<Self> {
        match id {
            ids::AVG => Some(RateStat::Avg),
            ids::SLG => Some(RateStat::Slg),
            ids::OBP => Some(RateStat::Obp),
            ids::OPS => Some(RateStat::Ops),
            ids::WHIP => Some(RateStat::Whip),
            ids::ERA => Some(RateStat::Era),
            ids::K_PER_9 => Some(RateStat::KPer9),
            _ => None,
        }
    }

    /// Counting stats the rate is built from.
    pub fn components(self) -> &'static [StatId] {
        match self {
            RateStat::Avg => &[ids::H, ids::AB],
            RateStat::Slg => &[ids::TB, ids::AB],
            RateStat::Obp => &[ids::H, ids::BB, ids::HBP, ids::AB, ids::SF],
            RateStat::Ops => &[ids::H, ids::BB, ids::HBP, ids::AB, ids::SF, ids::TB],
            RateStat::Whip => &[ids::P_BB, ids::P_H, ids::OUTS],
            RateStat::Era => &[ids::ER, ids::OUTS],
            RateStat::KPer9 => &[ids::K, ids::OUTS],
        }
    }

    /// Recompute the rate from component totals. `None` on a zero denominator.
    pub fn compute<F>(self, total: &F) -> Option<f64>
    where
        F: Fn(StatId) -> f64,
    {
        match self {
            RateStat::Avg => ratio(total(ids::H), total(ids::AB)),
            RateStat::Slg => ratio(total(ids::TB), total(ids::AB)),
            RateStat::Obp => ratio(
                total(ids::H) + total(ids::BB) + total(ids::HBP),
                total(ids::AB) + total(ids::BB) + total(ids::HBP) + total(ids::SF),
            ),
            RateStat::Ops => Some(RateStat::Obp.compute(total)? + RateStat::Slg.compute(total)?),
            RateStat::Whip => ratio(total(ids::P_BB) + total(ids::P_H), total(ids::OUTS) / 3.0),
            RateStat::Era => ratio(total(ids::ER), total(ids::OUTS) / 27.0),
            RateStat::KPer9 => ratio(27.0 * total(ids::K), total(ids::OUTS)),
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if !denominator.is_finite() || denominator.abs() < DENOM_EPSILON {
        return None;
    }
    Some(numerator / denominator)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationRule {
    Counting,
    Rate(RateStat),
    /// No defined team-level rule; aggregates to null.
    Unsupported,
}

impl AggregationRule {
    pub fn for_stat(id: StatId) -> Self {
        if let Some(rate) = RateStat::for_stat(id) {
            AggregationRule::Rate(rate)
        } else if id.is_additive() {
            AggregationRule::Counting
        } else {
            AggregationRule::Unsupported
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationContext {
    pub basis: StatBasis,
    pub baselines: PlayingTimeConfig,
}

impl Default for AggregationContext {
    fn default() -> Self {
        AggregationContext {
            basis: StatBasis::Projected,
            baselines: PlayingTimeConfig::default(),
        }
    }
}

impl AggregationContext {
    pub fn from_config(config: &EngineConfig) -> Self {
        AggregationContext {
            basis: config.aggregation.basis,
            baselines: config.playing_time,
        }
    }

    /// One player's contribution to a group total. `None` means "no value"
    /// and is left out of the sum.
    fn contribution(&self, player: &PlayerProfile, stat: StatId) -> Option<f64> {
        match self.basis {
            StatBasis::Projected => Some(player.weighted_projection(stat, &self.baselines)),
            StatBasis::Actual => player.season_value(stat),
        }
    }

    fn group_total(&self, group: &[&PlayerProfile], stat: StatId) -> f64 {
        group
            .iter()
            .filter_map(|p| self.contribution(p, stat))
            .sum()
    }
}

/// A team's roster already split by `is_hitter`.
#[derive(Debug, Clone)]
pub struct RosterGroups<'a> {
    pub team_id: u32,
    pub team_name: String,
    pub hitters: Vec<&'a PlayerProfile>,
    pub pitchers: Vec<&'a PlayerProfile>,
}

/// Aggregated category values for one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAggregate {
    pub team_id: u32,
    pub team_name: String,
    pub hitters: usize,
    pub pitchers: usize,
    /// One entry per aggregated category, in category order.
    pub values: Vec<(StatId, Option<f64>)>,
}

impl TeamAggregate {
    /// Value for `stat`: outer `None` if the category was not aggregated,
    /// inner `None` if it aggregated to null.
    pub fn get(&self, stat: StatId) -> Option<Option<f64>> {
        self.values
            .iter()
            .find(|(id, _)| *id == stat)
            .map(|(_, value)| *value)
    }

    /// Values keyed by stat display name.
    pub fn named_values(&self) -> Vec<(String, Option<f64>)> {
        self.values
            .iter()
            .map(|(id, value)| (id.name().into_owned(), *value))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Aggregate one team over the scored categories. Hitting categories read
/// the hitter group, pitching categories the pitcher group; fielding and
/// out-of-range categories are skipped.
pub fn aggregate_team(
    groups: &RosterGroups<'_>,
    categories: &[ScoringCategory],
    ctx: &AggregationContext,
) -> TeamAggregate {
    let mut values = Vec::with_capacity(categories.len());
    for category in categories {
        let group: &[&PlayerProfile] = match category.domain() {
            Some(StatDomain::Hitting) => &groups.hitters,
            Some(StatDomain::Pitching) => &groups.pitchers,
            _ => continue,
        };
        let value = match AggregationRule::for_stat(category.stat_id) {
            AggregationRule::Counting => {
                if group.is_empty() {
                    None
                } else {
                    Some(ctx.group_total(group, category.stat_id) / group.len() as f64)
                }
            }
            AggregationRule::Rate(rate) => rate.compute(&|stat| ctx.group_total(group, stat)),
            AggregationRule::Unsupported => None,
        };
        values.push((category.stat_id, value));
    }

    TeamAggregate {
        team_id: groups.team_id,
        team_name: groups.team_name.clone(),
        hitters: groups.hitters.len(),
        pitchers: groups.pitchers.len(),
        values,
    }
}

/// Aggregate every team. Output order matches input order whether or not
/// the work runs in parallel.
pub fn aggregate_league(
    teams: &[RosterGroups<'_>],
    categories: &[ScoringCategory],
    ctx: &AggregationContext,
    parallel: bool,
) -> Vec<TeamAggregate> {
    if parallel {
        teams
            .par_iter()
            .map(|groups| aggregate_team(groups, categories, ctx))
            .collect()
    } else {
        teams
            .iter()
            .map(|groups| aggregate_team(groups, categories, ctx))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
