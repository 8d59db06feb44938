#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tatooine Rescue.
//!
//! The world owns the board and the character. It changes only through
//! [`apply`], and every change is reported back as an [`Event`].

mod board;
mod character;

use tatooine_rescue_core::{Command, Event, TileKind, WELCOME_BANNER};
use tracing::{debug, warn};

pub use board::{Board, BoardError};

use character::Character;

/// Represents the authoritative Tatooine Rescue world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    board: Board,
    character: Option<Character>,
}

impl World {
    /// Creates a world around the provided board with no character yet.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            banner: WELCOME_BANNER,
            board,
            character: None,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    debug!(?command, "applying world command");

    if let Command::SpawnCharacter { kind, stats } = command {
        match world.board.find_first(TileKind::Start) {
            Some(at) => {
                world.character = Some(Character::new(kind, stats, at));
                out_events.push(Event::CharacterSpawned { kind, at });
            }
            None => {
                warn!("board has no start tile; character not spawned");
                out_events.push(Event::CharacterSpawnRejected);
            }
        }
        return;
    }

    if let Command::DefeatEnemy { at } = command {
        if world.board.tile_at(at) == Some(TileKind::Enemy)
            && world.board.set_tile(at, TileKind::Empty)
        {
            out_events.push(Event::EnemyDefeated {
                at,
                remaining: world.board.enemy_count(),
            });
        } else {
            out_events.push(Event::AttackMissed { at });
        }
        return;
    }

    let Some(character) = world.character.as_mut() else {
        warn!(?command, "command requires a character but none exists");
        return;
    };

    match command {
        Command::MoveCharacter { to } => match world.board.tile_at(to) {
            Some(landed) => {
                let from = character.position();
                character.move_to(to);
                out_events.push(Event::CharacterMoved { from, to, landed });
            }
            None => out_events.push(Event::MoveRejected { to }),
        },
        Command::DamageCharacter { amount } => {
            let outcome = character.apply_damage(amount);
            out_events.push(Event::CharacterDamaged {
                amount,
                health: outcome.health,
            });
            if outcome.defeated {
                out_events.push(Event::CharacterDefeated);
            }
        }
        Command::HealCharacter { amount } => {
            let health = character.heal(amount);
            out_events.push(Event::CharacterHealed { health });
        }
        Command::SpendActionPoint => {
            if character.spend_action_point() {
                out_events.push(Event::ActionPointSpent {
                    remaining: character.action_points(),
                });
            } else {
                out_events.push(Event::ActionPointUnavailable);
            }
        }
        Command::RestoreActionPoints => {
            let action_points = character.reset_action_points();
            out_events.push(Event::ActionPointsRestored { action_points });
        }
        Command::GrantActionPoint => {
            let action_points = character.grant_action_point();
            out_events.push(Event::ActionPointsRestored { action_points });
        }
        Command::ActivateSpecialAbility => {
            let ability = character.kind().ability();
            if !character.spend_action_point() {
                out_events.push(Event::SpecialAbilityRejected { ability });
                return;
            }
            out_events.push(Event::SpecialAbilityActivated {
                ability,
                remaining: character.action_points(),
            });
            let repair = ability.repair_amount();
            if repair > 0 {
                let health = character.heal(repair);
                out_events.push(Event::CharacterHealed { health });
            }
        }
        Command::SpawnCharacter { .. } | Command::DefeatEnemy { .. } => {}
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Board, World};
    use tatooine_rescue_core::{BoardCoord, CharacterSnapshot, TileKind};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Tile at the coordinate, or `None` off the board.
    #[must_use]
    pub fn tile_at(world: &World, coord: BoardCoord) -> Option<TileKind> {
        world.board.tile_at(coord)
    }

    /// Number of enemies left on the board.
    #[must_use]
    pub fn enemy_count(world: &World) -> u32 {
        world.board.enemy_count()
    }

    /// Captures the character's state, if one has been spawned.
    #[must_use]
    pub fn character(world: &World) -> Option<CharacterSnapshot> {
        world.character.as_ref().map(|character| character.snapshot())
    }

    /// Kind of the tile the character stands on.
    #[must_use]
    pub fn character_tile(world: &World) -> Option<TileKind> {
        world
            .character
            .as_ref()
            .and_then(|character| world.board.tile_at(character.position()))
    }
}
