// Rotisserie standings: per-category competition ranks summed into a total.

use std::collections::HashMap;

use serde::Serialize;

use super::aggregate::TeamAggregate;
use crate::catalog::{StatDomain, StatId};
use crate::league::settings::ScoringCategory;

/// Values closer than this, relative to their magnitude, tie.
const TIE_EPSILON: f64 = 1e-9;

/// Display names for `categories`, in order. A pitching stat whose short
/// name collides with another listed category (H, BB, HR, R, ...) gets a
/// `" (P)"` suffix.
pub fn category_labels<'a, I>(categories: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a ScoringCategory>,
{
    let categories: Vec<&ScoringCategory> = categories.into_iter().collect();
    categories
        .iter()
        .map(|c| {
            let name = c.name();
            let collides = categories
                .iter()
                .any(|other| other.stat_id != c.stat_id && other.name() == name);
            if collides && c.domain() == Some(StatDomain::Pitching) {
                format!("{name} (P)")
            } else {
                name.into_owned()
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Input matrix
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub team_id: u32,
    pub team_name: String,
    /// A key present with `None` is a null value; a missing key means the
    /// category is absent for this team.
    pub values: HashMap<StatId, Option<f64>>,
}

/// Team x category value table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMatrix {
    pub rows: Vec<MatrixRow>,
}

impl CategoryMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_aggregates(aggregates: &[TeamAggregate]) -> Self {
        let rows = aggregates
            .iter()
            .map(|agg| MatrixRow {
                team_id: agg.team_id,
                team_name: agg.team_name.clone(),
                values: agg.values.iter().copied().collect(),
            })
            .collect();
        CategoryMatrix { rows }
    }

    pub fn push_row<I>(&mut self, team_id: u32, team_name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = (StatId, Option<f64>)>,
    {
        self.rows.push(MatrixRow {
            team_id,
            team_name: team_name.into(),
            values: values.into_iter().collect(),
        });
    }

    /// Whether any row carries `stat`, null or not.
    pub fn has_category(&self, stat: StatId) -> bool {
        self.rows.iter().any(|row| row.values.contains_key(&stat))
    }

    /// The column for `stat`; NaN and absent cells read as `None`.
    pub fn column(&self, stat: StatId) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .map(|row| row.values.get(&stat).copied().flatten().filter(|v| !v.is_nan()))
            .collect()
    }

    /// Rows keyed by stat display name (see [`category_labels`]), in
    /// `categories` order.
    pub fn named_rows(&self, categories: &[ScoringCategory]) -> Vec<(String, Vec<(String, Option<f64>)>)> {
        let labels = category_labels(categories);
        self.rows
            .iter()
            .map(|row| {
                let cells = categories
                    .iter()
                    .zip(&labels)
                    .filter_map(|(c, label)| {
                        row.values.get(&c.stat_id).map(|v| (label.clone(), *v))
                    })
                    .collect();
                (row.team_name.clone(), cells)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// A team's rank in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryRank {
    pub rank: u32,
    /// The team had no value for the category and was ranked last.
    pub missing: bool,
}

/// Competition ("min") ranking: ties share the best rank of the tie and the
/// next distinct value skips the tied count, so `[10, 10, 7]` descending
/// ranks `[1, 1, 3]`.
///
/// Values within a relative `1e-9` of each other tie. Null values all share
/// the rank after the last non-null value and are flagged `missing`.
pub fn competition_ranks(values: &[Option<f64>], higher_is_better: bool) -> Vec<CategoryRank> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let null_rank = present.len() as u32 + 1;

    values
        .iter()
        .map(|value| match value {
            Some(v) => {
                let tolerance = TIE_EPSILON * v.abs().max(1.0);
                let better = present
                    .iter()
                    .filter(|&&other| {
                        if higher_is_better {
                            other > *v + tolerance
                        } else {
                            other < *v - tolerance
                        }
                    })
                    .count() as u32;
                CategoryRank {
                    rank: better + 1,
                    missing: false,
                }
            }
            None => CategoryRank {
                rank: null_rank,
                missing: true,
            },
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsRow {
    pub team: String,
    /// One rank per entry of [`RotoStandings::categories`].
    pub ranks: Vec<CategoryRank>,
    pub total_points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotoStandings {
    pub categories: Vec<StatId>,
    /// `"<Name> Rank"` for each category, named by [`category_labels`].
    pub columns: Vec<String>,
    /// Sorted by total points ascending; ties keep input order.
    pub rows: Vec<StandingsRow>,
}

impl RotoStandings {
    /// `Team`, the rank columns, then `Total Points`.
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.columns.len() + 2);
        header.push("Team".to_string());
        header.extend(self.columns.iter().cloned());
        header.push("Total Points".to_string());
        header
    }

    pub fn row(&self, team: &str) -> Option<&StandingsRow> {
        self.rows.iter().find(|row| row.team == team)
    }

    /// Rank of `team` in `stat`, if both exist.
    pub fn rank(&self, team: &str, stat: StatId) -> Option<CategoryRank> {
        let col = self.categories.iter().position(|c| *c == stat)?;
        self.row(team).and_then(|row| row.ranks.get(col).copied())
    }
}

/// Rank every team in every scored category present in the matrix.
///
/// Hitting categories come first, then pitching, each in `categories`
/// order. Categories outside both domains, or absent from every row, are
/// skipped.
pub fn rank_standings(matrix: &CategoryMatrix, categories: &[ScoringCategory]) -> RotoStandings {
    let ordered: Vec<&ScoringCategory> = [StatDomain::Hitting, StatDomain::Pitching]
        .iter()
        .flat_map(|domain| {
            categories
                .iter()
                .filter(move |c| c.domain() == Some(*domain))
        })
        .filter(|c| matrix.has_category(c.stat_id))
        .collect();

    let rank_columns: Vec<Vec<CategoryRank>> = ordered
        .iter()
        .map(|c| competition_ranks(&matrix.column(c.stat_id), c.higher_is_better))
        .collect();

    let mut rows: Vec<StandingsRow> = matrix
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let ranks: Vec<CategoryRank> = rank_columns.iter().map(|col| col[i]).collect();
            let total_points = ranks.iter().map(|r| r.rank).sum();
            StandingsRow {
                team: row.team_name.clone(),
                ranks,
                total_points,
            }
        })
        .collect();
    rows.sort_by_key(|row| row.total_points);

    RotoStandings {
        categories: ordered.iter().map(|c| c.stat_id).collect(),
        columns: category_labels(ordered.iter().copied())
            .into_iter()
            .map(|label| format!("{label} Rank"))
            .collect(),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
