// League-wide player pool: an arena of profiles addressed by player id.
//
// Teams hold player ids, never copies, so a team assignment made here is
// visible to every holder.

use std::collections::HashMap;

use tracing::warn;

use super::player::{FantasyTeam, PlayerId, PlayerProfile, RawPlayerEntry};
use crate::stats::ClassifyOptions;

#[derive(Debug, Clone, Default)]
pub struct PlayerPool {
    players: Vec<PlayerProfile>,
    index: HashMap<PlayerId, usize>,
}

impl PlayerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh pool from the raw player list. Entries without a player
    /// id are skipped; a repeated id replaces the earlier profile.
    pub fn from_entries(entries: &[RawPlayerEntry], opts: ClassifyOptions<'_>) -> Self {
        let mut pool = PlayerPool::new();
        let mut skipped = 0usize;
        for entry in entries {
            match PlayerProfile::from_entry(entry, opts) {
                Some(profile) => pool.insert(profile),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!("skipped {skipped} player entries without a player id");
        }
        pool
    }

    pub fn insert(&mut self, profile: PlayerProfile) {
        match self.index.get(&profile.id) {
            Some(&slot) => self.players[slot] = profile,
            None => {
                self.index.insert(profile.id, self.players.len());
                self.players.push(profile);
            }
        }
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerProfile> {
        self.index.get(&id).map(|&slot| &self.players[slot])
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut PlayerProfile> {
        match self.index.get(&id) {
            Some(&slot) => self.players.get_mut(slot),
            None => None,
        }
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.index.contains_key(&id)
    }

    /// Set a player's fantasy team and, when given, waiver status.
    /// Returns false if the player is not in the pool.
    pub fn assign_team(
        &mut self,
        id: PlayerId,
        team: FantasyTeam,
        waiver_status: Option<&str>,
    ) -> bool {
        let Some(player) = self.get_mut(id) else {
            return false;
        };
        player.fantasy_team = team;
        if let Some(status) = waiver_status {
            player.waiver_status = status.to_string();
        }
        true
    }

    /// Make every player rostered on `team_id` a free agent. Returns how
    /// many were released.
    pub fn release_team(&mut self, team_id: u32) -> usize {
        let mut released = 0;
        for player in &mut self.players {
            if player.fantasy_team == FantasyTeam::Rostered(team_id) {
                player.fantasy_team = FantasyTeam::FreeAgent;
                released += 1;
            }
        }
        released
    }

    pub fn players_on_team(&self, team_id: u32) -> Vec<&PlayerProfile> {
        self.players
            .iter()
            .filter(|p| p.fantasy_team == FantasyTeam::Rostered(team_id))
            .collect()
    }

    pub fn free_agents(&self) -> Vec<&PlayerProfile> {
        self.players
            .iter()
            .filter(|p| p.fantasy_team == FantasyTeam::FreeAgent)
            .collect()
    }

    pub fn players_on_waivers(&self) -> Vec<&PlayerProfile> {
        self.players.iter().filter(|p| p.is_on_waivers()).collect()
    }

    /// Profiles for `ids`, in order, skipping ids not in the pool.
    pub fn resolve<'a>(&'a self, ids: &'a [PlayerId]) -> impl Iterator<Item = &'a PlayerProfile> + 'a {
        ids.iter().filter_map(move |&id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerProfile> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
