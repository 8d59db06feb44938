//! Session configuration loaded from TOML.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tatooine_rescue_core::{
    ArchetypeTable, BoardDefinition, CharacterKind, DiceFace, DEFAULT_MESSAGE_LOG_CAPACITY,
};
use tatooine_rescue_system_dice::{DiceError, STANDARD_FACES};
use tatooine_rescue_system_turn::TurnConfig;
use tatooine_rescue_world::{Board, BoardError};
use thiserror::Error;

/// Reasons a configuration is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema.
    #[error("failed to parse session configuration")]
    Parse(#[from] toml::de::Error),
    /// The board definition is malformed.
    #[error("invalid board definition")]
    Board(#[from] BoardError),
    /// The dice definition is unusable.
    #[error("invalid dice definition")]
    Dice(#[from] DiceError),
    /// An archetype would start the game already defeated.
    #[error("{} must start with at least 1 health", kind.label())]
    NoStartingHealth {
        /// Archetype with zero health.
        kind: CharacterKind,
    },
}

/// Everything needed to start games.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Seed for dice and event draws.
    pub seed: u64,
    /// Number of messages the log keeps.
    pub message_log_capacity: usize,
    /// Board layout.
    pub board: BoardDefinition,
    /// Dice faces.
    pub dice: DiceSettings,
    /// Starting statistics per archetype.
    pub archetypes: ArchetypeTable,
    /// Pacing and tile effects.
    pub turn: TurnSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            message_log_capacity: DEFAULT_MESSAGE_LOG_CAPACITY,
            board: BoardDefinition::tatooine(),
            dice: DiceSettings::default(),
            archetypes: ArchetypeTable::default(),
            turn: TurnSettings::default(),
        }
    }
}

impl SessionConfig {
    /// Parses and validates a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the board, dice and archetype definitions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = Board::from_definition(&self.board)?;
        if self.dice.faces.is_empty() {
            return Err(DiceError::NoFaces.into());
        }
        if let Some(kind) = CharacterKind::ALL
            .into_iter()
            .find(|kind| self.archetypes.get(*kind).health == 0)
        {
            return Err(ConfigError::NoStartingHealth { kind });
        }
        Ok(())
    }

    /// Turn tunables for the game with the provided index.
    #[must_use]
    pub fn turn_config(&self, game: u64) -> TurnConfig {
        TurnConfig {
            end_turn_delay: Duration::from_millis(self.turn.end_turn_delay_ms),
            event_delay: Duration::from_millis(self.turn.event_delay_ms),
            quicksand_sword_damage: self.turn.quicksand_sword_damage,
            event_effects: self.turn.event_effects,
            seed: self.game_seed(game),
        }
    }

    /// Seed used by the game with the provided index.
    #[must_use]
    pub const fn game_seed(&self, game: u64) -> u64 {
        self.seed.wrapping_add(game)
    }
}

/// `[dice]` section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiceSettings {
    /// Faces printed on the die; repeating a face weights it.
    pub faces: Vec<DiceFace>,
}

impl Default for DiceSettings {
    fn default() -> Self {
        Self {
            faces: STANDARD_FACES.to_vec(),
        }
    }
}

/// `[turn]` section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TurnSettings {
    /// Pause before the next turn, in milliseconds.
    pub end_turn_delay_ms: u64,
    /// Pause after a random event, in milliseconds.
    pub event_delay_ms: u64,
    /// Damage dealt by a failed quicksand escape.
    pub quicksand_sword_damage: u32,
    /// Whether random events change the game.
    pub event_effects: bool,
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self {
            end_turn_delay_ms: 1_500,
            event_delay_ms: 2_000,
            quicksand_sword_damage: 1,
            event_effects: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tatooine_rescue_core::ArchetypeStats;

    #[test]
    fn empty_document_yields_reference_values() {
        let config = SessionConfig::from_toml_str("").expect("defaults are valid");
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.message_log_capacity, 10);
        assert_eq!(config.dice.faces, STANDARD_FACES.to_vec());

        let turn = config.turn_config(0);
        assert_eq!(turn.end_turn_delay, Duration::from_millis(1_500));
        assert_eq!(turn.event_delay, Duration::from_millis(2_000));
    }

    #[test]
    fn sections_override_their_defaults() {
        let config = SessionConfig::from_toml_str(
            r#"
            seed = 42

            [board]
            rows = [[1, 0, 4], [0, 5, 2]]

            [dice]
            faces = ["sword", "sword", "foot"]

            [archetypes.droid]
            health = 5
            action_points = 1

            [turn]
            end_turn_delay_ms = 0
            event_effects = false
            "#,
        )
        .expect("valid configuration");

        assert_eq!(config.seed, 42);
        assert_eq!(config.board.rows(), &[vec![1, 0, 4], vec![0, 5, 2]]);
        assert_eq!(
            config.dice.faces,
            vec![DiceFace::Sword, DiceFace::Sword, DiceFace::Foot]
        );
        assert_eq!(
            config.archetypes.get(CharacterKind::Droid),
            ArchetypeStats {
                health: 5,
                action_points: 1,
            }
        );
        assert_eq!(
            config.archetypes.get(CharacterKind::Jedi),
            ArchetypeStats::default()
        );
        assert_eq!(config.turn.event_delay_ms, 2_000);
        assert!(!config.turn.event_effects);
        assert_eq!(config.turn_config(3).seed, 45);
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(
            SessionConfig::from_toml_str("seed = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("colour = true"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("[board]\nrows = [[0, 2]]"),
            Err(ConfigError::Board(BoardError::MissingStart))
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("[board]\nrows = [[1, 9, 2]]"),
            Err(ConfigError::Board(BoardError::UnknownTileCode { .. }))
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("[dice]\nfaces = []"),
            Err(ConfigError::Dice(DiceError::NoFaces))
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("[dice]\nfaces = [\"wand\"]"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn archetypes_must_start_alive() {
        let error = SessionConfig::from_toml_str(
            "[archetypes.clone]\nhealth = 0\naction_points = 2",
        )
        .expect_err("zero health is rejected");
        assert!(matches!(
            error,
            ConfigError::NoStartingHealth {
                kind: CharacterKind::Clone
            }
        ));
        assert_eq!(error.to_string(), "Clone must start with at least 1 health");

        let spent = SessionConfig::from_toml_str("[archetypes.jedi]\nhealth = 1\naction_points = 0");
        assert!(spent.is_ok());
    }
}
