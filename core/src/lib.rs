#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tatooine Rescue engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the turn systems. Systems submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! actually changed. Anything the player should see leaves the core through
//! the [`Presenter`] capability, which adapters implement.

use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tatooine Rescue.";

/// Number of messages the presentation layer keeps in its log by default.
pub const DEFAULT_MESSAGE_LOG_CAPACITY: usize = 10;

/// Kinds of tile that can appear on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileKind {
    /// Open floor.
    Empty,
    /// Tile the character spawns on.
    Start,
    /// Reaching this tile wins the game.
    Goal,
    /// Impassable terrain.
    Obstacle,
    /// Hostile occupant that can be attacked and removed.
    Enemy,
    /// Traversable tile that demands an escape roll.
    Quicksand,
    /// Traversable tile that draws a random event.
    Event,
}

impl TileKind {
    /// Every tile kind ordered by its numeric map code.
    pub const ALL: [TileKind; 7] = [
        Self::Empty,
        Self::Start,
        Self::Goal,
        Self::Obstacle,
        Self::Enemy,
        Self::Quicksand,
        Self::Event,
    ];

    /// Numeric code used by board definitions.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Start => 1,
            Self::Goal => 2,
            Self::Obstacle => 3,
            Self::Enemy => 4,
            Self::Quicksand => 5,
            Self::Event => 6,
        }
    }

    /// Resolves a numeric map code, returning `None` for unknown codes.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Start),
            2 => Some(Self::Goal),
            3 => Some(Self::Obstacle),
            4 => Some(Self::Enemy),
            5 => Some(Self::Quicksand),
            6 => Some(Self::Event),
            _ => None,
        }
    }

    /// Reports whether the character may move onto the tile.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        !matches!(self, Self::Obstacle | Self::Enemy)
    }

    /// Reports whether the tile may be the target of an attack.
    #[must_use]
    pub const fn is_attackable(self) -> bool {
        matches!(self, Self::Enemy)
    }
}

/// Location of a single board tile. `x` is the column, `z` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoardCoord {
    x: u32,
    z: u32,
}

impl BoardCoord {
    /// Creates a new board coordinate.
    #[must_use]
    pub const fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn z(&self) -> u32 {
        self.z
    }

    /// Applies a signed offset, returning `None` when either axis would go negative.
    ///
    /// Upper bounds are not checked here; the board rejects coordinates past
    /// its edge when they are looked up.
    #[must_use]
    pub fn offset(self, dx: i32, dz: i32) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let z = self.z.checked_add_signed(dz)?;
        Some(Self { x, z })
    }

    /// Unit step along each axis pointing from `self` toward `other`.
    #[must_use]
    pub fn heading_to(self, other: BoardCoord) -> (i32, i32) {
        (axis_heading(self.x, other.x), axis_heading(self.z, other.z))
    }
}

fn axis_heading(from: u32, to: u32) -> i32 {
    match to.cmp(&from) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
    }
}

impl fmt::Display for BoardCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Faces printed on the action die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiceFace {
    /// Grants an attack against an adjacent enemy.
    Sword,
    /// Grants a single step of movement.
    Foot,
}

impl DiceFace {
    /// Symbol shown on the die.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Sword => "\u{1F5E1}\u{FE0F}",
            Self::Foot => "\u{1F9B5}",
        }
    }

    /// Lowercase name used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sword => "sword",
            Self::Foot => "foot",
        }
    }
}

/// Playable character archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterKind {
    /// Force user who can dash two tiles.
    Jedi,
    /// Droid that can repair itself once per game.
    Droid,
    /// Trooper that can shoot enemies two tiles away.
    Clone,
}

impl CharacterKind {
    /// Every archetype in selection order.
    pub const ALL: [CharacterKind; 3] = [Self::Jedi, Self::Droid, Self::Clone];

    /// Capitalised label for stat displays.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Jedi => "Jedi",
            Self::Droid => "Droid",
            Self::Clone => "Clone",
        }
    }

    /// Special ability granted to the archetype.
    #[must_use]
    pub const fn ability(self) -> Ability {
        match self {
            Self::Jedi => Ability::ForceDash,
            Self::Droid => Ability::Repair,
            Self::Clone => Ability::RangedAttack,
        }
    }
}

impl FromStr for CharacterKind {
    type Err = UnknownCharacterKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jedi" => Ok(Self::Jedi),
            "droid" => Ok(Self::Droid),
            "clone" => Ok(Self::Clone),
            _ => Err(UnknownCharacterKind(value.to_owned())),
        }
    }
}

/// Error returned when parsing an unrecognised archetype name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownCharacterKind(pub String);

impl fmt::Display for UnknownCharacterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown character `{}` (expected jedi, droid or clone)",
            self.0
        )
    }
}

impl Error for UnknownCharacterKind {}

/// Special abilities, one per archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    /// Movement reaching diagonals and two tiles along each axis.
    ForceDash,
    /// Immediate self-heal, usable once per game.
    Repair,
    /// Attack reaching diagonals and two tiles along each axis.
    RangedAttack,
}

impl Ability {
    /// Target selection the ability opens, or `None` for immediate effects.
    #[must_use]
    pub const fn targeting(self) -> Option<TargetIntent> {
        match self {
            Self::ForceDash => Some(TargetIntent::Move),
            Self::RangedAttack => Some(TargetIntent::Attack),
            Self::Repair => None,
        }
    }

    /// Health restored when the ability fires.
    #[must_use]
    pub const fn repair_amount(self) -> u32 {
        match self {
            Self::Repair => 1,
            Self::ForceDash | Self::RangedAttack => 0,
        }
    }

    /// Whether the ability is exhausted after its first use in a game.
    #[must_use]
    pub const fn once_per_game(self) -> bool {
        matches!(self, Self::Repair)
    }

    /// Short description shown next to the ability button.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ForceDash => "Move 2 spaces",
            Self::Repair => "Repair 1 health",
            Self::RangedAttack => "Range attack",
        }
    }
}

/// What a selected target will be used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetIntent {
    /// The selected tile holds an enemy to defeat.
    Attack,
    /// The selected tile is a destination.
    Move,
}

/// Geometry used to enumerate candidate targets around the character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reach {
    /// The four orthogonal neighbours.
    Adjacent,
    /// Orthogonal neighbours, diagonals, and two tiles along each axis.
    Extended,
}

const ADJACENT_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const EXTENDED_OFFSETS: [(i32, i32); 12] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (2, 0),
    (-2, 0),
    (0, 2),
    (0, -2),
];

impl Reach {
    /// Offsets `(dx, dz)` covered by the reach, in a fixed order.
    #[must_use]
    pub const fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::Adjacent => &ADJACENT_OFFSETS,
            Self::Extended => &EXTENDED_OFFSETS,
        }
    }
}

/// Phases of the turn state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// Waiting for a dice roll or a special ability.
    Ready,
    /// Resolving a roll, or waiting for a quicksand escape roll.
    Rolling,
    /// Waiting for the player to pick a destination.
    Moving,
    /// Waiting for the player to pick an enemy.
    Fighting,
    /// Waiting for the player to pick a target for an extended ability.
    SpecialAbility,
    /// The game has ended; every input is rejected.
    GameOver,
}

/// Terminal result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// The goal was reached or every enemy was defeated.
    Victory,
    /// The character's health reached zero.
    Defeat,
}

/// Colour family used when highlighting selectable tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HighlightTone {
    /// Enemies that can be attacked.
    Attack,
    /// Destinations reachable with a foot roll.
    Move,
    /// Destinations reachable with the Jedi dash.
    Dash,
}

/// Starting statistics for a character archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeStats {
    /// Maximum and starting health.
    pub health: u32,
    /// Maximum and starting action points.
    pub action_points: u32,
}

impl Default for ArchetypeStats {
    fn default() -> Self {
        Self {
            health: 3,
            action_points: 2,
        }
    }
}

/// Archetype stat table keyed by character kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeTable {
    /// Jedi statistics.
    pub jedi: ArchetypeStats,
    /// Droid statistics.
    pub droid: ArchetypeStats,
    /// Clone statistics.
    pub clone: ArchetypeStats,
}

impl ArchetypeTable {
    /// Statistics for the provided archetype.
    #[must_use]
    pub const fn get(&self, kind: CharacterKind) -> ArchetypeStats {
        match kind {
            CharacterKind::Jedi => self.jedi,
            CharacterKind::Droid => self.droid,
            CharacterKind::Clone => self.clone,
        }
    }
}

const TATOOINE_ROWS: [[u8; 9]; 9] = [
    [0, 0, 0, 3, 0, 0, 0, 0, 0],
    [1, 0, 0, 3, 0, 4, 0, 0, 0],
    [0, 0, 4, 0, 0, 0, 0, 0, 0],
    [0, 3, 3, 0, 5, 0, 0, 0, 0],
    [0, 0, 0, 0, 3, 0, 3, 0, 0],
    [0, 4, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 6, 0, 4, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 2, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// Static board layout expressed as row-major tile codes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDefinition {
    rows: Vec<Vec<u8>>,
}

impl BoardDefinition {
    /// Creates a definition from raw rows of tile codes. Validation happens
    /// when the world builds a board from it.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Self {
        Self { rows }
    }

    /// The reference 9×9 Tatooine rescue map.
    #[must_use]
    pub fn tatooine() -> Self {
        Self {
            rows: TATOOINE_ROWS.iter().map(|row| row.to_vec()).collect(),
        }
    }

    /// Rows of tile codes, outer index is `z`.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }
}

impl Default for BoardDefinition {
    fn default() -> Self {
        Self::tatooine()
    }
}

/// Immutable representation of the character used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterSnapshot {
    /// Archetype of the character.
    pub kind: CharacterKind,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Current action points.
    pub action_points: u32,
    /// Maximum action points.
    pub max_action_points: u32,
    /// Tile the character occupies.
    pub position: BoardCoord,
}

/// Values shown in the stats panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatsDisplay {
    /// Current health.
    pub health: u32,
    /// Current action points.
    pub action_points: u32,
    /// Capitalised archetype label.
    pub label: &'static str,
    /// Whether the special ability can be invoked right now.
    pub special_ready: bool,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Creates the character on the board's start tile.
    SpawnCharacter {
        /// Archetype to create.
        kind: CharacterKind,
        /// Starting statistics.
        stats: ArchetypeStats,
    },
    /// Moves the character to the provided tile.
    MoveCharacter {
        /// Destination tile.
        to: BoardCoord,
    },
    /// Removes the enemy at the provided tile.
    DefeatEnemy {
        /// Tile holding the enemy.
        at: BoardCoord,
    },
    /// Reduces the character's health.
    DamageCharacter {
        /// Health to remove.
        amount: u32,
    },
    /// Restores the character's health.
    HealCharacter {
        /// Health to restore.
        amount: u32,
    },
    /// Consumes one action point.
    SpendActionPoint,
    /// Restores action points to their maximum.
    RestoreActionPoints,
    /// Grants one action point, never exceeding the maximum.
    GrantActionPoint,
    /// Spends an action point on the character's special ability, applying
    /// self-contained effects immediately.
    ActivateSpecialAbility,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The character was created.
    CharacterSpawned {
        /// Archetype created.
        kind: CharacterKind,
        /// Start tile.
        at: BoardCoord,
    },
    /// The board has no start tile, so no character was created.
    CharacterSpawnRejected,
    /// The character moved.
    CharacterMoved {
        /// Tile left.
        from: BoardCoord,
        /// Tile entered.
        to: BoardCoord,
        /// Kind of the tile entered.
        landed: TileKind,
    },
    /// A move request named a tile outside the board.
    MoveRejected {
        /// Requested destination.
        to: BoardCoord,
    },
    /// An enemy tile was cleared.
    EnemyDefeated {
        /// Tile that held the enemy.
        at: BoardCoord,
        /// Enemies left on the board.
        remaining: u32,
    },
    /// An attack named a tile without an enemy.
    AttackMissed {
        /// Tile that was attacked.
        at: BoardCoord,
    },
    /// The character lost health.
    CharacterDamaged {
        /// Damage requested.
        amount: u32,
        /// Health after clamping.
        health: u32,
    },
    /// The character's health reached zero. Reported once per game.
    CharacterDefeated,
    /// The character regained health.
    CharacterHealed {
        /// Health after clamping.
        health: u32,
    },
    /// An action point was consumed.
    ActionPointSpent {
        /// Action points left.
        remaining: u32,
    },
    /// No action point was available to spend; nothing changed.
    ActionPointUnavailable,
    /// Action points changed through a restore or grant.
    ActionPointsRestored {
        /// Action points after the change.
        action_points: u32,
    },
    /// A special ability fired and its action point was spent.
    SpecialAbilityActivated {
        /// Ability that fired.
        ability: Ability,
        /// Action points left.
        remaining: u32,
    },
    /// A special ability was requested without an action point available.
    SpecialAbilityRejected {
        /// Ability that was requested.
        ability: Ability,
    },
}

/// Outbound capability the core drives to show state to the player.
///
/// Implementations own every visual concern; the core only reports what
/// should be shown.
pub trait Presenter {
    /// Marks the provided tiles as selectable.
    fn highlight_tiles(&mut self, tiles: &[BoardCoord], tone: HighlightTone);

    /// Removes every highlight from the board.
    fn clear_highlights(&mut self);

    /// Moves the character's visual to the provided tile.
    fn move_character_visual(&mut self, to: BoardCoord);

    /// Refreshes the stats panel.
    fn update_stats_display(&mut self, stats: StatsDisplay);

    /// Appends a line to the message log.
    fn post_message(&mut self, text: &str);

    /// Announces the end of the game.
    fn signal_game_over(&mut self, outcome: GameOutcome);
}
