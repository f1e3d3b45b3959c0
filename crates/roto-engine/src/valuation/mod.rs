pub mod aggregate;
pub mod roto;

pub use aggregate::{
    aggregate_league, aggregate_team, AggregationContext, AggregationRule, RateStat, RosterGroups,
    StatBasis, TeamAggregate,
};
pub use roto::{
    category_labels, competition_ranks, rank_standings, CategoryMatrix, CategoryRank, RotoStandings,
};
