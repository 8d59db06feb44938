#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn state machine for Tatooine Rescue.
//!
//! The [`TurnManager`] reacts to exactly three stimuli: a settled dice face,
//! a tile selection, and a special-ability request. It computes the legal
//! targets for the current phase, keeps them as an explicit [`TargetSet`],
//! resolves selections against that set, mutates the world through commands,
//! and decides victory or defeat. Everything the player should see is pushed
//! through the [`Presenter`] passed into each call.

mod random_event;
mod targeting;

use std::{collections::BTreeSet, time::Duration};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tatooine_rescue_core::{
    Ability, ArchetypeStats, BoardCoord, CharacterKind, Command, DiceFace, Event, GameOutcome,
    HighlightTone, Presenter, Reach, StatsDisplay, TargetIntent, TileKind, TurnPhase,
};
use tatooine_rescue_world::{self as world, query, World};
use tracing::{info, warn};

pub use random_event::RandomEvent;
pub use targeting::{legal_targets, reach_for, TargetSet};

/// Tunables for pacing and tile effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnConfig {
    /// Pause between a resolution message and the next turn.
    pub end_turn_delay: Duration,
    /// Pause after a random event before the next turn.
    pub event_delay: Duration,
    /// Damage taken when a quicksand escape roll shows a sword.
    pub quicksand_sword_damage: u32,
    /// Whether random events change the game or are only narrated.
    pub event_effects: bool,
    /// Seed for random event draws.
    pub seed: u64,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            end_turn_delay: Duration::from_millis(1_500),
            event_delay: Duration::from_millis(2_000),
            quicksand_sword_damage: 1,
            event_effects: true,
            seed: 0,
        }
    }
}

impl TurnConfig {
    /// Reference tunables without presentation pauses.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            end_turn_delay: Duration::ZERO,
            event_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Whether an inbound stimulus was consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// The stimulus changed the game.
    Accepted,
    /// The stimulus was not valid in the current state and was dropped.
    Ignored,
}

/// Central orchestrator of a single game.
#[derive(Debug)]
pub struct TurnManager {
    config: TurnConfig,
    phase: TurnPhase,
    started: bool,
    targets: Option<TargetSet>,
    turn_count: u32,
    enemies_defeated: u32,
    exhausted_abilities: BTreeSet<CharacterKind>,
    pending_end_turn: Option<Duration>,
    awaiting_escape_roll: bool,
    skip_next_turn: bool,
    last_move: Option<(BoardCoord, BoardCoord)>,
    outcome: Option<GameOutcome>,
    rng: ChaCha8Rng,
}

impl TurnManager {
    /// Creates a turn manager for a fresh game.
    #[must_use]
    pub fn new(config: TurnConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            phase: TurnPhase::Ready,
            started: false,
            targets: None,
            turn_count: 0,
            enemies_defeated: 0,
            exhausted_abilities: BTreeSet::new(),
            pending_end_turn: None,
            awaiting_escape_roll: false,
            skip_next_turn: false,
            last_move: None,
            outcome: None,
            rng,
        }
    }

    /// Reports whether a character has been placed and the game is under way.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Number of turns started so far.
    #[must_use]
    pub const fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Number of enemies defeated so far.
    #[must_use]
    pub const fn enemies_defeated(&self) -> u32 {
        self.enemies_defeated
    }

    /// Terminal result, once the game is over.
    #[must_use]
    pub const fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Targets currently open for selection.
    #[must_use]
    pub fn targets(&self) -> Option<&TargetSet> {
        self.targets.as_ref()
    }

    /// Reports whether a delayed end of turn is waiting to fire.
    #[must_use]
    pub const fn has_pending_transition(&self) -> bool {
        self.pending_end_turn.is_some()
    }

    /// Reports whether the next settled dice face would be consumed.
    #[must_use]
    pub fn accepts_roll(&self) -> bool {
        if !self.started || self.pending_end_turn.is_some() {
            return false;
        }
        match self.phase {
            TurnPhase::Ready => true,
            TurnPhase::Rolling => self.awaiting_escape_roll,
            _ => false,
        }
    }

    /// Reports whether the special ability may be invoked right now.
    #[must_use]
    pub fn special_ability_available(&self, world: &World) -> bool {
        if !self.started
            || self.phase != TurnPhase::Ready
            || self.pending_end_turn.is_some()
        {
            return false;
        }
        query::character(world).is_some_and(|character| {
            character.action_points > 0 && !self.is_exhausted(character.kind)
        })
    }

    /// Legal targets for `intent` given the current phase and board.
    #[must_use]
    pub fn legal_targets(&self, world: &World, intent: TargetIntent) -> Vec<BoardCoord> {
        match query::character(world) {
            Some(character) => legal_targets(
                query::board(world),
                character.position,
                intent,
                reach_for(character.kind, self.phase, intent),
            ),
            None => Vec::new(),
        }
    }

    /// Spawns the character on the start tile and opens the first turn.
    pub fn start_game(
        &mut self,
        world: &mut World,
        kind: CharacterKind,
        stats: ArchetypeStats,
        presenter: &mut dyn Presenter,
    ) -> Response {
        let mut events = Vec::new();
        world::apply(world, Command::SpawnCharacter { kind, stats }, &mut events);
        let Some(at) = events.iter().find_map(|event| match event {
            Event::CharacterSpawned { at, .. } => Some(*at),
            _ => None,
        }) else {
            presenter.post_message("No start tile found on the map!");
            return Response::Ignored;
        };

        info!(?kind, %at, "game started");
        self.started = true;
        presenter.move_character_visual(at);
        if stats.health == 0 {
            self.refresh_stats(world, presenter);
            self.finish(GameOutcome::Defeat, presenter);
            return Response::Accepted;
        }
        self.start_turn(world, presenter);
        Response::Accepted
    }

    /// Consumes a settled dice face.
    pub fn handle_roll(
        &mut self,
        face: DiceFace,
        world: &mut World,
        presenter: &mut dyn Presenter,
    ) -> Response {
        if !self.accepts_roll() {
            warn!(?face, phase = ?self.phase, "roll ignored");
            return Response::Ignored;
        }

        if self.awaiting_escape_roll {
            self.resolve_escape(face, world, presenter);
            return Response::Accepted;
        }

        self.set_phase(TurnPhase::Rolling);
        match face {
            DiceFace::Sword => {
                presenter.post_message("You rolled a sword! You can attack an adjacent enemy.");
                self.offer_targets(
                    TargetIntent::Attack,
                    TurnPhase::Fighting,
                    "No enemies nearby to attack. Turn ends.",
                    world,
                    presenter,
                );
            }
            DiceFace::Foot => {
                presenter.post_message("You rolled a foot! You can move 1 space.");
                self.offer_targets(
                    TargetIntent::Move,
                    TurnPhase::Moving,
                    "No valid moves available. Turn ends.",
                    world,
                    presenter,
                );
            }
        }
        self.refresh_stats(world, presenter);
        Response::Accepted
    }

    /// Consumes a tile selection, ignoring tiles outside the open target set.
    pub fn handle_tile_selected(
        &mut self,
        coord: BoardCoord,
        world: &mut World,
        presenter: &mut dyn Presenter,
    ) -> Response {
        if !self.started || self.pending_end_turn.is_some() {
            return Response::Ignored;
        }
        let Some(intent) = self
            .targets
            .as_ref()
            .filter(|targets| targets.contains(coord))
            .map(TargetSet::intent)
        else {
            warn!(%coord, phase = ?self.phase, "selection outside the legal set ignored");
            return Response::Ignored;
        };

        self.targets = None;
        presenter.clear_highlights();
        match intent {
            TargetIntent::Attack => self.resolve_attack(coord, world, presenter),
            TargetIntent::Move => self.resolve_move(coord, world, presenter),
        }
        Response::Accepted
    }

    /// Consumes a special-ability request.
    pub fn handle_special_ability(
        &mut self,
        world: &mut World,
        presenter: &mut dyn Presenter,
    ) -> Response {
        if !self.started
            || self.phase != TurnPhase::Ready
            || self.pending_end_turn.is_some()
        {
            return Response::Ignored;
        }
        let Some(character) = query::character(world) else {
            return Response::Ignored;
        };
        if character.action_points == 0 {
            presenter.post_message("Not enough action points!");
            return Response::Ignored;
        }

        let ability = character.kind.ability();
        if self.is_exhausted(character.kind) {
            presenter.post_message(exhausted_message(ability));
            return Response::Ignored;
        }

        match ability.targeting() {
            None => {
                if character.health >= character.max_health {
                    presenter.post_message("Already at full health!");
                    return Response::Ignored;
                }
                presenter.post_message(activation_message(ability));
                let events = self.execute(world, Command::ActivateSpecialAbility, presenter);
                if events
                    .iter()
                    .any(|event| matches!(event, Event::SpecialAbilityActivated { .. }))
                    && ability.once_per_game()
                {
                    let _ = self.exhausted_abilities.insert(character.kind);
                }
                self.schedule_end_turn(self.config.end_turn_delay, world, presenter);
            }
            Some(intent) => {
                presenter.post_message(activation_message(ability));
                self.set_phase(TurnPhase::SpecialAbility);
                let _ = self.execute(world, Command::ActivateSpecialAbility, presenter);
                let empty_message = match intent {
                    TargetIntent::Attack => "No enemies within range. Turn ends.",
                    TargetIntent::Move => "No valid moves available. Turn ends.",
                };
                self.offer_targets(
                    intent,
                    TurnPhase::SpecialAbility,
                    empty_message,
                    world,
                    presenter,
                );
            }
        }
        self.refresh_stats(world, presenter);
        Response::Accepted
    }

    /// Applies damage from outside the turn flow, ending the game on defeat.
    pub fn inflict_damage(
        &mut self,
        amount: u32,
        world: &mut World,
        presenter: &mut dyn Presenter,
    ) -> Response {
        if !self.started || self.phase == TurnPhase::GameOver {
            return Response::Ignored;
        }
        let _ = self.execute(world, Command::DamageCharacter { amount }, presenter);
        Response::Accepted
    }

    /// Advances presentation timers, firing a pending end of turn when due.
    pub fn advance(&mut self, dt: Duration, world: &mut World, presenter: &mut dyn Presenter) {
        let Some(remaining) = self.pending_end_turn else {
            return;
        };
        let remaining = remaining.saturating_sub(dt);
        if remaining.is_zero() {
            self.pending_end_turn = None;
            self.end_turn(world, presenter);
        } else {
            self.pending_end_turn = Some(remaining);
        }
    }

    /// Ends the current turn and opens the next one unless the game is over.
    pub fn end_turn(&mut self, world: &mut World, presenter: &mut dyn Presenter) {
        if !self.started || self.phase == TurnPhase::GameOver {
            return;
        }
        self.pending_end_turn = None;
        self.start_turn(world, presenter);
    }

    fn start_turn(&mut self, world: &mut World, presenter: &mut dyn Presenter) {
        self.turn_count += 1;
        if self.skip_next_turn {
            self.skip_next_turn = false;
            presenter.post_message(&format!(
                "Turn {} skipped - dangerous terrain.",
                self.turn_count
            ));
            self.turn_count += 1;
        }

        self.set_phase(TurnPhase::Ready);
        self.targets = None;
        self.awaiting_escape_roll = false;
        presenter.clear_highlights();

        if self.turn_count > 1 {
            let _ = self.execute(world, Command::RestoreActionPoints, presenter);
        }

        presenter.post_message(&format!(
            "Turn {} - Roll dice or use special ability",
            self.turn_count
        ));
        self.refresh_stats(world, presenter);
    }

    fn offer_targets(
        &mut self,
        intent: TargetIntent,
        selecting: TurnPhase,
        empty_message: &str,
        world: &mut World,
        presenter: &mut dyn Presenter,
    ) {
        let Some(character) = query::character(world) else {
            return;
        };
        let reach = reach_for(character.kind, self.phase, intent);
        let tiles = legal_targets(query::board(world), character.position, intent, reach);

        presenter.clear_highlights();
        if tiles.is_empty() {
            self.targets = None;
            presenter.post_message(empty_message);
            self.schedule_end_turn(self.config.end_turn_delay, world, presenter);
            return;
        }

        let tone = match (intent, reach) {
            (TargetIntent::Attack, _) => HighlightTone::Attack,
            (TargetIntent::Move, Reach::Adjacent) => HighlightTone::Move,
            (TargetIntent::Move, Reach::Extended) => HighlightTone::Dash,
        };
        presenter.highlight_tiles(&tiles, tone);
        self.set_phase(selecting);
        self.targets = Some(TargetSet::new(intent, tiles));
    }

    fn resolve_attack(&mut self, at: BoardCoord, world: &mut World, presenter: &mut dyn Presenter) {
        presenter.post_message(&format!("Attacking enemy at {at}!"));
        let events = self.execute(world, Command::DefeatEnemy { at }, presenter);
        if events
            .iter()
            .any(|event| matches!(event, Event::EnemyDefeated { .. }))
        {
            self.enemies_defeated += 1;
            presenter.post_message(&format!(
                "Enemy defeated! ({} total)",
                self.enemies_defeated
            ));
        }

        if self.victory_reached(world) {
            self.finish(GameOutcome::Victory, presenter);
        } else {
            self.schedule_end_turn(self.config.end_turn_delay, world, presenter);
        }
    }

    fn resolve_move(&mut self, to: BoardCoord, world: &mut World, presenter: &mut dyn Presenter) {
        presenter.post_message(&format!("Moving to {to}"));
        let events = self.execute(world, Command::MoveCharacter { to }, presenter);
        let landed = events.iter().find_map(|event| match event {
            Event::CharacterMoved { from, to, landed } => Some((*from, *to, *landed)),
            _ => None,
        });
        let Some((from, to, landed)) = landed else {
            self.schedule_end_turn(self.config.end_turn_delay, world, presenter);
            return;
        };

        presenter.move_character_visual(to);
        self.last_move = Some((from, to));
        self.on_landing(landed, world, presenter);
    }

    fn on_landing(&mut self, landed: TileKind, world: &mut World, presenter: &mut dyn Presenter) {
        match landed {
            TileKind::Goal => {
                presenter.post_message("You reached the goal!");
                self.finish(GameOutcome::Victory, presenter);
            }
            TileKind::Quicksand => {
                presenter.post_message("You entered quicksand! Roll dice to escape...");
                self.set_phase(TurnPhase::Rolling);
                self.awaiting_escape_roll = true;
            }
            TileKind::Event => self.trigger_random_event(world, presenter),
            _ => {
                if self.victory_reached(world) {
                    self.finish(GameOutcome::Victory, presenter);
                } else {
                    self.schedule_end_turn(self.config.end_turn_delay, world, presenter);
                }
            }
        }
    }

    fn resolve_escape(&mut self, face: DiceFace, world: &mut World, presenter: &mut dyn Presenter) {
        self.awaiting_escape_roll = false;
        match face {
            DiceFace::Foot => presenter.post_message("You escaped the quicksand!"),
            DiceFace::Sword => {
                presenter.post_message("The quicksand holds you fast!");
                let damage = self.config.quicksand_sword_damage;
                if damage > 0 {
                    let _ = self.execute(
                        world,
                        Command::DamageCharacter { amount: damage },
                        presenter,
                    );
                }
            }
        }
        if self.phase != TurnPhase::GameOver {
            self.schedule_end_turn(self.config.end_turn_delay, world, presenter);
        }
    }

    fn trigger_random_event(&mut self, world: &mut World, presenter: &mut dyn Presenter) {
        let index = self.rng.gen_range(0..RandomEvent::ALL.len());
        let event = RandomEvent::ALL[index];
        info!(?event, "random event drawn");
        presenter.post_message(&format!("Event: {}", event.message()));

        if self.config.event_effects {
            self.apply_random_event(event, world, presenter);
        }
        if self.phase != TurnPhase::GameOver {
            self.schedule_end_turn(self.config.event_delay, world, presenter);
        }
    }

    fn apply_random_event(
        &mut self,
        event: RandomEvent,
        world: &mut World,
        presenter: &mut dyn Presenter,
    ) {
        match event {
            RandomEvent::Sandstorm => {
                if let Some((from, _)) = self.last_move {
                    let _ = self.relocate(from, world, presenter);
                }
            }
            RandomEvent::Supplies => {
                let _ = self.execute(world, Command::HealCharacter { amount: 1 }, presenter);
            }
            RandomEvent::Ambush => {
                let _ = self.execute(world, Command::DamageCharacter { amount: 1 }, presenter);
            }
            RandomEvent::Shortcut => {
                let ahead = self.last_move.and_then(|(from, to)| {
                    let (dx, dz) = from.heading_to(to);
                    to.offset(dx, dz)
                });
                let open = ahead.filter(|coord| {
                    query::tile_at(world, *coord).is_some_and(TileKind::is_traversable)
                });
                match open {
                    Some(coord) => {
                        if self.relocate(coord, world, presenter) == Some(TileKind::Goal) {
                            presenter.post_message("You reached the goal!");
                            self.finish(GameOutcome::Victory, presenter);
                        }
                    }
                    None => presenter.post_message("The shortcut is blocked."),
                }
            }
            RandomEvent::ForceSurge => {
                let _ = self.execute(world, Command::GrantActionPoint, presenter);
            }
            RandomEvent::DangerousTerrain => self.skip_next_turn = true,
        }
    }

    /// Moves the character without evaluating landing effects.
    fn relocate(
        &mut self,
        to: BoardCoord,
        world: &mut World,
        presenter: &mut dyn Presenter,
    ) -> Option<TileKind> {
        let events = self.execute(world, Command::MoveCharacter { to }, presenter);
        events.iter().find_map(|event| match event {
            Event::CharacterMoved { to, landed, .. } => {
                presenter.move_character_visual(*to);
                Some(*landed)
            }
            _ => None,
        })
    }

    fn victory_reached(&self, world: &World) -> bool {
        query::character_tile(world) == Some(TileKind::Goal) || query::enemy_count(world) == 0
    }

    fn schedule_end_turn(
        &mut self,
        delay: Duration,
        world: &mut World,
        presenter: &mut dyn Presenter,
    ) {
        self.targets = None;
        if delay.is_zero() {
            self.end_turn(world, presenter);
        } else {
            self.pending_end_turn = Some(delay);
        }
    }

    fn finish(&mut self, outcome: GameOutcome, presenter: &mut dyn Presenter) {
        if self.phase == TurnPhase::GameOver {
            return;
        }
        info!(?outcome, turns = self.turn_count, "game over");
        self.set_phase(TurnPhase::GameOver);
        self.outcome = Some(outcome);
        self.targets = None;
        self.pending_end_turn = None;
        self.awaiting_escape_roll = false;
        presenter.clear_highlights();
        presenter.post_message(match outcome {
            GameOutcome::Victory => "Victory! Mission accomplished!",
            GameOutcome::Defeat => "Defeat! Your character has fallen.",
        });
        presenter.signal_game_over(outcome);
    }

    /// Applies a world command, ending the game if it defeated the character.
    fn execute(
        &mut self,
        world: &mut World,
        command: Command,
        presenter: &mut dyn Presenter,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(world, command, &mut events);
        if events.contains(&Event::CharacterDefeated) {
            self.finish(GameOutcome::Defeat, presenter);
        }
        self.refresh_stats(world, presenter);
        events
    }

    fn refresh_stats(&self, world: &World, presenter: &mut dyn Presenter) {
        if let Some(character) = query::character(world) {
            presenter.update_stats_display(StatsDisplay {
                health: character.health,
                action_points: character.action_points,
                label: character.kind.label(),
                special_ready: self.special_ability_available(world),
            });
        }
    }

    fn is_exhausted(&self, kind: CharacterKind) -> bool {
        self.exhausted_abilities.contains(&kind)
    }

    fn set_phase(&mut self, phase: TurnPhase) {
        if self.phase != phase {
            info!(from = ?self.phase, to = ?phase, "turn phase changed");
            self.phase = phase;
        }
    }
}

fn activation_message(ability: Ability) -> &'static str {
    match ability {
        Ability::ForceDash => "Using Jedi movement ability! Move up to 2 spaces.",
        Ability::Repair => "Using Droid repair ability! Gaining 1 health.",
        Ability::RangedAttack => {
            "Using Clone ranged attack ability! Attack enemies up to 2 spaces away."
        }
    }
}

fn exhausted_message(ability: Ability) -> &'static str {
    match ability {
        Ability::Repair => "Repair ability already used this game!",
        Ability::ForceDash | Ability::RangedAttack => "Ability already used this game!",
    }
}
