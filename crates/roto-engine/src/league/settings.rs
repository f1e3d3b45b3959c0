// League settings: scoring type, season, and the active roto categories.

use std::borrow::Cow;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::{StatDomain, StatId};
use crate::lenient::{int_from_value, lenient_int, lenient_list, lenient_or_default};

// ---------------------------------------------------------------------------
// Raw ESPN shape (mSettings view)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLeagueSettings {
    #[serde(default, deserialize_with = "lenient_int")]
    pub season_id: Option<u16>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub settings: Option<RawSettingsBody>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub status: Option<RawLeagueStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSettingsBody {
    pub name: Option<String>,
    pub scoring_settings: Option<RawScoringSettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScoringSettings {
    pub scoring_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub scoring_items: Vec<RawScoringItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScoringItem {
    /// Number or numeric string.
    pub stat_id: Option<Value>,
    pub points: Option<f64>,
    #[serde(default)]
    pub is_reverse_item: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLeagueStatus {
    pub final_scoring_period: Option<Value>,
}

// ---------------------------------------------------------------------------
// Scoring categories
// ---------------------------------------------------------------------------

/// A stat the league scores, with its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringCategory {
    pub stat_id: StatId,
    pub higher_is_better: bool,
}

impl ScoringCategory {
    pub fn new(stat_id: StatId, higher_is_better: bool) -> Self {
        ScoringCategory {
            stat_id,
            higher_is_better,
        }
    }

    pub fn name(&self) -> Cow<'static, str> {
        self.stat_id.name()
    }

    pub fn domain(&self) -> Option<StatDomain> {
        self.stat_id.domain()
    }
}

/// Parsed league settings.
#[derive(Debug, Clone, Default)]
pub struct LeagueSettings {
    pub name: Option<String>,
    pub season_id: Option<u16>,
    pub scoring_type: Option<String>,
    pub final_scoring_period: Option<u32>,
    pub hitting_categories: Vec<ScoringCategory>,
    pub pitching_categories: Vec<ScoringCategory>,
}

impl LeagueSettings {
    /// Build settings from the raw payload.
    ///
    /// Only items with `points > 0` become categories, and only when the stat
    /// id falls in the hitting or pitching range. A repeated stat id keeps
    /// its first position and takes the last item's direction.
    pub fn from_raw(raw: &RawLeagueSettings) -> Self {
        let body = raw.settings.as_ref();
        let scoring = body.and_then(|b| b.scoring_settings.as_ref());

        let mut settings = LeagueSettings {
            name: body.and_then(|b| b.name.clone()),
            season_id: raw.season_id,
            scoring_type: scoring.and_then(|s| s.scoring_type.clone()),
            final_scoring_period: raw
                .status
                .as_ref()
                .and_then(|s| s.final_scoring_period.as_ref())
                .and_then(int_from_value)
                .and_then(|p| u32::try_from(p).ok()),
            ..Default::default()
        };

        let Some(scoring) = scoring else {
            warn!("league settings carry no scoringSettings; no categories are scored");
            return settings;
        };

        for item in &scoring.scoring_items {
            let Some(stat_id) = item
                .stat_id
                .as_ref()
                .and_then(int_from_value)
                .and_then(|id| u16::try_from(id).ok())
                .map(StatId)
            else {
                warn!("skipping scoring item with unreadable statId: {:?}", item.stat_id);
                continue;
            };

            let points = item.points.unwrap_or(0.0);
            if points <= 0.0 {
                debug!("stat {stat_id} ({}) has points {points}; not scored", stat_id.0);
                continue;
            }

            let category = ScoringCategory::new(stat_id, !item.is_reverse_item);
            match stat_id.domain() {
                Some(StatDomain::Hitting) => upsert(&mut settings.hitting_categories, category),
                Some(StatDomain::Pitching) => upsert(&mut settings.pitching_categories, category),
                _ => debug!("stat {stat_id} ({}) is outside the scored ranges", stat_id.0),
            }
        }

        settings
    }

    /// All scored categories, hitting first.
    pub fn categories(&self) -> impl Iterator<Item = &ScoringCategory> {
        self.hitting_categories
            .iter()
            .chain(self.pitching_categories.iter())
    }

    /// All scored categories, hitting first, as an owned list.
    pub fn category_list(&self) -> Vec<ScoringCategory> {
        self.categories().copied().collect()
    }

    pub fn category(&self, stat_id: StatId) -> Option<&ScoringCategory> {
        self.categories().find(|c| c.stat_id == stat_id)
    }

    pub fn is_scored(&self, stat_id: StatId) -> bool {
        self.category(stat_id).is_some()
    }
}

fn upsert(list: &mut Vec<ScoringCategory>, category: ScoringCategory) {
    match list.iter_mut().find(|c| c.stat_id == category.stat_id) {
        Some(existing) => *existing = category,
        None => list.push(category),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ids;
    use serde_json::json;

    fn parse(v: Value) -> LeagueSettings {
        let raw: RawLeagueSettings = serde_json::from_value(v).unwrap();
        LeagueSettings::from_raw(&raw)
    }

    fn standard() -> Value {
        json!({
            "seasonId": 2025,
            "status": {"finalScoringPeriod": 186},
            "settings": {
                "name": "Test League",
                "scoringSettings": {
                    "scoringType": "ROTO",
                    "scoringItems": [
                        {"statId": 20, "points": 1.0, "isReverseItem": false},
                        {"statId": 5, "points": 1.0, "isReverseItem": false},
                        {"statId": 17, "points": 1.0, "isReverseItem": false},
                        {"statId": 47, "points": 1.0, "isReverseItem": true},
                        {"statId": 41, "points": 1.0, "isReverseItem": true},
                        {"statId": 48, "points": 1.0, "isReverseItem": false}
                    ]
                }
            }
        })
    }

    #[test]
    fn parses_metadata() {
        let s = parse(standard());
        assert_eq!(s.season_id, Some(2025));
        assert_eq!(s.final_scoring_period, Some(186));
        assert_eq!(s.scoring_type.as_deref(), Some("ROTO"));
        assert_eq!(s.name.as_deref(), Some("Test League"));
    }

    #[test]
    fn categories_split_by_range_in_payload_order() {
        let s = parse(standard());
        let hitting: Vec<StatId> = s.hitting_categories.iter().map(|c| c.stat_id).collect();
        let pitching: Vec<StatId> = s.pitching_categories.iter().map(|c| c.stat_id).collect();
        assert_eq!(hitting, vec![ids::R, ids::HR, ids::OBP]);
        assert_eq!(pitching, vec![ids::ERA, ids::WHIP, ids::K]);
    }

    #[test]
    fn reverse_items_are_lower_is_better() {
        let s = parse(standard());
        assert!(s.category(ids::HR).unwrap().higher_is_better);
        assert!(s.category(ids::K).unwrap().higher_is_better);
        assert!(!s.category(ids::ERA).unwrap().higher_is_better);
        assert!(!s.category(ids::WHIP).unwrap().higher_is_better);
    }

    #[test]
    fn non_positive_points_are_excluded() {
        let s = parse(json!({
            "settings": {"scoringSettings": {"scoringType": "ROTO", "scoringItems": [
                {"statId": 5, "points": 0.0},
                {"statId": 20, "points": -1.0},
                {"statId": 21},
                {"statId": 23, "points": 2.0}
            ]}}
        }));
        assert_eq!(s.category_list(), vec![ScoringCategory::new(ids::SB, true)]);
        assert!(!s.is_scored(ids::HR));
    }

    #[test]
    fn out_of_range_ids_are_excluded() {
        let s = parse(json!({
            "settings": {"scoringSettings": {"scoringItems": [
                {"statId": 32, "points": 1.0},
                {"statId": 72, "points": 1.0},
                {"statId": 99, "points": 1.0},
                {"statId": 53, "points": 1.0}
            ]}}
        }));
        assert!(s.hitting_categories.is_empty());
        assert_eq!(s.pitching_categories, vec![ScoringCategory::new(ids::W, true)]);
    }

    #[test]
    fn string_stat_ids_and_duplicates() {
        let s = parse(json!({
            "settings": {"scoringSettings": {"scoringItems": [
                {"statId": "5", "points": 1.0},
                {"statId": "20", "points": 1.0},
                {"statId": 5, "points": 1.0, "isReverseItem": true},
                {"statId": "abc", "points": 1.0}
            ]}}
        }));
        assert_eq!(
            s.hitting_categories,
            vec![
                ScoringCategory::new(ids::HR, false),
                ScoringCategory::new(ids::R, true)
            ]
        );
    }

    #[test]
    fn missing_sections_yield_empty_settings() {
        let s = parse(json!({}));
        assert!(s.category_list().is_empty());
        assert_eq!(s.final_scoring_period, None);
        assert_eq!(s.season_id, None);
    }

    #[test]
    fn categories_iterate_hitting_first() {
        let s = parse(standard());
        let all: Vec<StatId> = s.categories().map(|c| c.stat_id).collect();
        assert_eq!(all.first(), Some(&ids::R));
        assert_eq!(all.last(), Some(&ids::K));
        assert_eq!(s.category(ids::ERA).unwrap().name(), "ERA");
    }
}
