//! Outcomes drawn when the character lands on an event tile.

/// Narrative outcome of an event tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RandomEvent {
    /// Pushes the character back to the tile it came from.
    Sandstorm,
    /// Restores one health.
    Supplies,
    /// Deals one damage.
    Ambush,
    /// Carries the character one tile further along its heading.
    Shortcut,
    /// Grants one action point.
    ForceSurge,
    /// Costs the character its next turn.
    DangerousTerrain,
}

impl RandomEvent {
    /// Every outcome, in draw order.
    pub const ALL: [Self; 6] = [
        Self::Sandstorm,
        Self::Supplies,
        Self::Ambush,
        Self::Shortcut,
        Self::ForceSurge,
        Self::DangerousTerrain,
    ];

    /// Text shown to the player.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Sandstorm => "A sandstorm approaches! Move back 1 space.",
            Self::Supplies => "You found supplies! Gain 1 health.",
            Self::Ambush => "Enemy ambush! Lose 1 health.",
            Self::Shortcut => "You found a shortcut! Move forward 1 space.",
            Self::ForceSurge => "The force is with you! Gain 1 action point.",
            Self::DangerousTerrain => "Dangerous terrain! Skip your next turn.",
        }
    }
}
