use std::time::Duration;

use tatooine_rescue_core::{BoardCoord, CharacterKind, DiceFace, GameOutcome, TurnPhase};
use tatooine_rescue_presentation::Hud;
use tatooine_rescue_system_dice::DiceError;
use tatooine_rescue_system_session::{ConfigError, RollDelivery, Session, SessionConfig};
use tatooine_rescue_system_turn::Response;
use tatooine_rescue_world::query;

fn immediate(extra: &str) -> SessionConfig {
    SessionConfig::from_toml_str(&format!(
        "[turn]\nend_turn_delay_ms = 0\nevent_delay_ms = 0\n{extra}"
    ))
    .expect("valid configuration")
}

fn started(config: SessionConfig, kind: CharacterKind) -> (Session, Hud) {
    let mut session = Session::new(config).expect("valid session");
    let mut hud = Hud::default();
    assert_eq!(session.new_game(kind, &mut hud), Response::Accepted);
    (session, hud)
}

#[test]
fn rolls_reach_the_turn_manager_when_ready() {
    let (mut session, mut hud) = started(immediate(""), CharacterKind::Jedi);
    assert!(session.can_roll());

    let delivery = session.roll_dice(&mut hud).expect("die was idle");

    assert!(matches!(delivery, RollDelivery::Delivered(_)));
    assert!(hud.messages().contains(match delivery.face() {
        DiceFace::Sword => "You rolled a sword! You can attack an adjacent enemy.",
        DiceFace::Foot => "You rolled a foot! You can move 1 space.",
    }));
}

#[test]
fn rolls_without_a_listener_are_dropped() {
    let config = SessionConfig::from_toml_str("[dice]\nfaces = [\"foot\"]").expect("valid");
    let (mut session, mut hud) = started(config, CharacterKind::Clone);

    assert_eq!(
        session.roll_dice(&mut hud),
        Ok(RollDelivery::Delivered(DiceFace::Foot))
    );
    assert_eq!(session.turn().phase(), TurnPhase::Moving);
    assert!(!session.can_roll());

    assert_eq!(
        session.roll_dice(&mut hud),
        Ok(RollDelivery::Dropped(DiceFace::Foot))
    );
    assert_eq!(session.turn().phase(), TurnPhase::Moving);
}

#[test]
fn only_one_roll_is_in_flight() {
    let (mut session, mut hud) = started(immediate(""), CharacterKind::Droid);

    session.begin_roll().expect("die was idle");
    assert!(!session.can_roll());
    assert_eq!(session.begin_roll(), Err(DiceError::Busy));
    assert!(session.spin().is_some());
    assert!(session.settle_roll(&mut hud).is_ok());
    assert_eq!(session.settle_roll(&mut hud), Err(DiceError::Idle));
}

#[test]
fn a_full_game_can_be_won_through_the_session() {
    let config = immediate("[board]\nrows = [[1, 0, 2], [0, 0, 4]]\n[dice]\nfaces = [\"foot\"]");
    let (mut session, mut hud) = started(config, CharacterKind::Jedi);

    let _ = session.roll_dice(&mut hud);
    assert_eq!(
        session.select_tile(BoardCoord::new(1, 0), &mut hud),
        Response::Accepted
    );
    assert_eq!(session.turn().turn_count(), 2);

    let _ = session.roll_dice(&mut hud);
    let _ = session.select_tile(BoardCoord::new(2, 0), &mut hud);

    assert_eq!(session.turn().outcome(), Some(GameOutcome::Victory));
    assert_eq!(hud.outcome(), Some(GameOutcome::Victory));
    assert_eq!(
        session.roll_dice(&mut hud),
        Ok(RollDelivery::Dropped(DiceFace::Foot))
    );
}

#[test]
fn new_game_discards_the_previous_one() {
    let config = SessionConfig::from_toml_str("[dice]\nfaces = [\"sword\"]").expect("valid");
    let (mut session, mut hud) = started(config, CharacterKind::Droid);

    let _ = session.roll_dice(&mut hud);
    assert!(session.turn().has_pending_transition());

    hud.reset();
    let _ = session.new_game(CharacterKind::Clone, &mut hud);

    assert_eq!(session.games_started(), 2);
    assert_eq!(session.character(), Some(CharacterKind::Clone));
    assert!(!session.turn().has_pending_transition());
    assert_eq!(session.turn().turn_count(), 1);
    assert_eq!(session.turn().phase(), TurnPhase::Ready);
    let character = query::character(session.world()).expect("character");
    assert_eq!(character.kind, CharacterKind::Clone);
    assert_eq!(character.position, BoardCoord::new(0, 1));

    session.advance(Duration::from_secs(10), &mut hud);
    assert_eq!(session.turn().turn_count(), 1);
}

#[test]
fn defeated_enemies_return_in_the_next_game() {
    let config = immediate("[board]\nrows = [[1, 4, 0], [0, 0, 2], [4, 0, 0]]\n[dice]\nfaces = [\"sword\"]");
    let (mut session, mut hud) = started(config, CharacterKind::Jedi);

    let _ = session.roll_dice(&mut hud);
    let _ = session.select_tile(BoardCoord::new(1, 0), &mut hud);
    assert_eq!(query::enemy_count(session.world()), 1);

    let _ = session.new_game(CharacterKind::Jedi, &mut hud);
    assert_eq!(query::enemy_count(session.world()), 2);
    assert_eq!(session.turn().enemies_defeated(), 0);
}

#[test]
fn droid_repair_is_available_again_after_new_game() {
    let (mut session, mut hud) = started(immediate(""), CharacterKind::Droid);
    let full = query::character(session.world()).expect("character").health;

    assert_eq!(session.inflict_damage(1, &mut hud), Response::Accepted);
    assert_eq!(session.use_special_ability(&mut hud), Response::Accepted);
    assert_eq!(
        query::character(session.world()).expect("character").health,
        full
    );

    assert_eq!(session.inflict_damage(1, &mut hud), Response::Accepted);
    assert_eq!(session.use_special_ability(&mut hud), Response::Ignored);
    assert_eq!(
        hud.messages().latest(),
        Some("Repair ability already used this game!")
    );

    assert_eq!(session.new_game(CharacterKind::Droid, &mut hud), Response::Accepted);
    assert_eq!(session.inflict_damage(1, &mut hud), Response::Accepted);
    assert!(session.turn().special_ability_available(session.world()));
    assert_eq!(session.use_special_ability(&mut hud), Response::Accepted);
    assert_eq!(
        query::character(session.world()).expect("character").health,
        full
    );
}

#[test]
fn rolls_before_a_game_are_dropped() {
    let mut session = Session::new(immediate("")).expect("valid session");
    let mut hud = Hud::default();
    assert!(!session.can_roll());

    let delivery = session.roll_dice(&mut hud).expect("die was idle");

    assert!(matches!(delivery, RollDelivery::Dropped(_)));
    assert_eq!(session.turn().phase(), TurnPhase::Ready);
    assert!(!session.dice().is_rolling());
    assert_eq!(session.use_special_ability(&mut hud), Response::Ignored);
    assert_eq!(
        session.select_tile(BoardCoord::new(0, 0), &mut hud),
        Response::Ignored
    );
    assert_eq!(session.inflict_damage(1, &mut hud), Response::Ignored);
}

#[test]
fn invalid_configuration_is_refused() {
    let mut config = SessionConfig::default();
    config.dice.faces.clear();
    assert!(matches!(Session::new(config), Err(ConfigError::Dice(_))));

    let mut config = SessionConfig::default();
    config.archetypes.droid.health = 0;
    assert!(matches!(
        Session::new(config),
        Err(ConfigError::NoStartingHealth {
            kind: CharacterKind::Droid
        })
    ));
}
