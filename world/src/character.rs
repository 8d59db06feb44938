//! Authoritative character state.

use tatooine_rescue_core::{ArchetypeStats, BoardCoord, CharacterKind, CharacterSnapshot};

/// Result of applying damage to the character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DamageOutcome {
    /// Health after clamping.
    pub(crate) health: u32,
    /// Set only on the hit that first brought health to zero.
    pub(crate) defeated: bool,
}

/// The single player-controlled character.
#[derive(Clone, Debug)]
pub(crate) struct Character {
    kind: CharacterKind,
    health: u32,
    max_health: u32,
    action_points: u32,
    max_action_points: u32,
    position: BoardCoord,
    defeat_reported: bool,
}

impl Character {
    pub(crate) fn new(kind: CharacterKind, stats: ArchetypeStats, position: BoardCoord) -> Self {
        Self {
            kind,
            health: stats.health,
            max_health: stats.health,
            action_points: stats.action_points,
            max_action_points: stats.action_points,
            position,
            defeat_reported: false,
        }
    }

    pub(crate) fn kind(&self) -> CharacterKind {
        self.kind
    }

    pub(crate) fn position(&self) -> BoardCoord {
        self.position
    }

    pub(crate) fn move_to(&mut self, to: BoardCoord) {
        self.position = to;
    }

    pub(crate) fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        self.health = self.health.saturating_sub(amount);
        let defeated = self.health == 0 && !self.defeat_reported;
        if defeated {
            self.defeat_reported = true;
        }
        DamageOutcome {
            health: self.health,
            defeated,
        }
    }

    pub(crate) fn heal(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health
    }

    /// Consumes one action point; returns `false` without mutating when none remain.
    pub(crate) fn spend_action_point(&mut self) -> bool {
        if self.action_points == 0 {
            return false;
        }
        self.action_points -= 1;
        true
    }

    pub(crate) fn reset_action_points(&mut self) -> u32 {
        self.action_points = self.max_action_points;
        self.action_points
    }

    pub(crate) fn grant_action_point(&mut self) -> u32 {
        self.action_points = self
            .action_points
            .saturating_add(1)
            .min(self.max_action_points);
        self.action_points
    }

    pub(crate) fn action_points(&self) -> u32 {
        self.action_points
    }

    pub(crate) fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            kind: self.kind,
            health: self.health,
            max_health: self.max_health,
            action_points: self.action_points,
            max_action_points: self.max_action_points,
            position: self.position,
        }
    }
}
