#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session wiring for Tatooine Rescue.
//!
//! A [`Session`] owns the world, the die and the turn manager of the game in
//! progress. Settled dice faces go to the turn manager only while it expects
//! one; anything else is dropped rather than buffered.

mod config;

use std::time::Duration;

use tatooine_rescue_core::{BoardCoord, CharacterKind, DiceFace, Presenter};
use tatooine_rescue_system_dice::{Dice, DiceError};
use tatooine_rescue_system_turn::{Response, TurnManager};
use tatooine_rescue_world::{Board, World};
use tracing::{info, warn};

pub use config::{ConfigError, DiceSettings, SessionConfig, TurnSettings};

/// What happened to a settled dice face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RollDelivery {
    /// The turn manager consumed the face.
    Delivered(DiceFace),
    /// No listener expected a roll, so the face was discarded.
    Dropped(DiceFace),
}

impl RollDelivery {
    /// Face that was rolled.
    #[must_use]
    pub const fn face(self) -> DiceFace {
        match self {
            Self::Delivered(face) | Self::Dropped(face) => face,
        }
    }
}

/// One player's sequence of games.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    board: Board,
    world: World,
    dice: Dice,
    turn: TurnManager,
    character: Option<CharacterKind>,
    games_started: u64,
}

impl Session {
    /// Validates the configuration and prepares an idle session.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::from_definition(&config.board)?;
        let dice = Dice::new(config.dice.faces.clone(), config.game_seed(0))?;
        let turn = TurnManager::new(config.turn_config(0));
        Ok(Self {
            world: World::new(board.clone()),
            board,
            dice,
            turn,
            character: None,
            games_started: 0,
            config,
        })
    }

    /// Configuration the session was created with.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// World of the game in progress.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Turn manager of the game in progress.
    #[must_use]
    pub const fn turn(&self) -> &TurnManager {
        &self.turn
    }

    /// Die of the game in progress.
    #[must_use]
    pub const fn dice(&self) -> &Dice {
        &self.dice
    }

    /// Archetype chosen for the game in progress.
    #[must_use]
    pub const fn character(&self) -> Option<CharacterKind> {
        self.character
    }

    /// Number of games started in this session.
    #[must_use]
    pub const fn games_started(&self) -> u64 {
        self.games_started
    }

    /// Discards the current game and starts a fresh one with `kind`.
    ///
    /// The board is rebuilt from its definition, counters and one-shot flags
    /// are reset, and any pending transition is cancelled.
    pub fn new_game(&mut self, kind: CharacterKind, presenter: &mut dyn Presenter) -> Response {
        let game = self.games_started;
        self.games_started += 1;
        self.world = World::new(self.board.clone());
        self.turn = TurnManager::new(self.config.turn_config(game));
        self.dice.reseed(self.config.game_seed(game));
        self.character = Some(kind);

        info!(?kind, game, "new game");
        presenter.clear_highlights();
        self.turn.start_game(
            &mut self.world,
            kind,
            self.config.archetypes.get(kind),
            presenter,
        )
    }

    /// Reports whether a roll could start and be consumed right now.
    #[must_use]
    pub fn can_roll(&self) -> bool {
        !self.dice.is_rolling() && self.turn.accepts_roll()
    }

    /// Starts a roll in flight.
    pub fn begin_roll(&mut self) -> Result<(), DiceError> {
        self.dice.begin_roll()
    }

    /// Preview face for a spinning die.
    pub fn spin(&mut self) -> Option<DiceFace> {
        self.dice.spin()
    }

    /// Settles the roll in flight and hands the face to the turn manager.
    pub fn settle_roll(
        &mut self,
        presenter: &mut dyn Presenter,
    ) -> Result<RollDelivery, DiceError> {
        let face = self.dice.settle()?;
        Ok(self.deliver(face, presenter))
    }

    /// Rolls and settles in one step.
    pub fn roll_dice(&mut self, presenter: &mut dyn Presenter) -> Result<RollDelivery, DiceError> {
        self.begin_roll()?;
        self.settle_roll(presenter)
    }

    /// Forwards a tile selection to the turn manager.
    pub fn select_tile(&mut self, coord: BoardCoord, presenter: &mut dyn Presenter) -> Response {
        self.turn
            .handle_tile_selected(coord, &mut self.world, presenter)
    }

    /// Forwards a special-ability request to the turn manager.
    pub fn use_special_ability(&mut self, presenter: &mut dyn Presenter) -> Response {
        self.turn.handle_special_ability(&mut self.world, presenter)
    }

    /// Applies damage from outside the turn flow.
    pub fn inflict_damage(&mut self, amount: u32, presenter: &mut dyn Presenter) -> Response {
        self.turn.inflict_damage(amount, &mut self.world, presenter)
    }

    /// Advances pending presentation delays.
    pub fn advance(&mut self, dt: Duration, presenter: &mut dyn Presenter) {
        self.turn.advance(dt, &mut self.world, presenter);
    }

    fn deliver(&mut self, face: DiceFace, presenter: &mut dyn Presenter) -> RollDelivery {
        match self.turn.handle_roll(face, &mut self.world, presenter) {
            Response::Accepted => RollDelivery::Delivered(face),
            Response::Ignored => {
                warn!(?face, phase = ?self.turn.phase(), "dice outcome dropped");
                RollDelivery::Dropped(face)
            }
        }
    }
}
