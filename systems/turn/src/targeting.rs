//! Legal-target computation.

use tatooine_rescue_core::{BoardCoord, CharacterKind, Reach, TargetIntent, TurnPhase};
use tatooine_rescue_world::Board;

/// Geometry used for the provided intent.
///
/// Only a character whose ability extends `intent` gets extended reach, and
/// only while the turn is in [`TurnPhase::SpecialAbility`].
#[must_use]
pub fn reach_for(kind: CharacterKind, phase: TurnPhase, intent: TargetIntent) -> Reach {
    if phase == TurnPhase::SpecialAbility && kind.ability().targeting() == Some(intent) {
        Reach::Extended
    } else {
        Reach::Adjacent
    }
}

/// Tiles around `origin` that are legal targets for `intent`.
///
/// Tiles off the board are skipped. Attacks need an enemy; moves need a
/// tile that is neither an obstacle nor an enemy. The order follows
/// [`Reach::offsets`], so repeated calls on an unchanged board agree.
#[must_use]
pub fn legal_targets(
    board: &Board,
    origin: BoardCoord,
    intent: TargetIntent,
    reach: Reach,
) -> Vec<BoardCoord> {
    reach
        .offsets()
        .iter()
        .filter_map(|(dx, dz)| origin.offset(*dx, *dz))
        .filter(|coord| {
            board.tile_at(*coord).is_some_and(|tile| match intent {
                TargetIntent::Attack => tile.is_attackable(),
                TargetIntent::Move => tile.is_traversable(),
            })
        })
        .collect()
}

/// Legal targets frozen for the current selection step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetSet {
    intent: TargetIntent,
    tiles: Vec<BoardCoord>,
}

impl TargetSet {
    pub(crate) fn new(intent: TargetIntent, tiles: Vec<BoardCoord>) -> Self {
        Self { intent, tiles }
    }

    /// What a selection from this set will do.
    #[must_use]
    pub const fn intent(&self) -> TargetIntent {
        self.intent
    }

    /// Selectable tiles.
    #[must_use]
    pub fn tiles(&self) -> &[BoardCoord] {
        &self.tiles
    }

    /// Reports whether `coord` is selectable.
    #[must_use]
    pub fn contains(&self, coord: BoardCoord) -> bool {
        self.tiles.contains(&coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tatooine_rescue_core::BoardDefinition;

    fn board(rows: Vec<Vec<u8>>) -> Board {
        Board::from_definition(&BoardDefinition::from_rows(rows)).expect("valid board")
    }

    #[test]
    fn extended_reach_only_during_matching_special_ability() {
        use TargetIntent::{Attack, Move};
        let special = TurnPhase::SpecialAbility;

        assert_eq!(reach_for(CharacterKind::Jedi, special, Move), Reach::Extended);
        assert_eq!(reach_for(CharacterKind::Jedi, special, Attack), Reach::Adjacent);
        assert_eq!(reach_for(CharacterKind::Clone, special, Attack), Reach::Extended);
        assert_eq!(reach_for(CharacterKind::Clone, special, Move), Reach::Adjacent);
        assert_eq!(reach_for(CharacterKind::Droid, special, Move), Reach::Adjacent);
        assert_eq!(
            reach_for(CharacterKind::Jedi, TurnPhase::Rolling, Move),
            Reach::Adjacent
        );
        assert_eq!(
            reach_for(CharacterKind::Clone, TurnPhase::Fighting, Attack),
            Reach::Adjacent
        );
    }

    #[test]
    fn movement_skips_blocked_and_off_board_tiles() {
        let board = board(vec![
            vec![0, 3, 0],
            vec![1, 4, 5],
            vec![6, 0, 2],
        ]);
        let targets = legal_targets(
            &board,
            BoardCoord::new(0, 1),
            TargetIntent::Move,
            Reach::Adjacent,
        );
        assert_eq!(targets, vec![BoardCoord::new(0, 2), BoardCoord::new(0, 0)]);
    }

    #[test]
    fn attacks_need_an_enemy() {
        let board = board(vec![
            vec![4, 0, 4],
            vec![1, 4, 0],
            vec![0, 0, 2],
        ]);
        let origin = BoardCoord::new(0, 1);
        assert_eq!(
            legal_targets(&board, origin, TargetIntent::Attack, Reach::Adjacent),
            vec![BoardCoord::new(1, 1), BoardCoord::new(0, 0)]
        );
        assert_eq!(
            legal_targets(&board, origin, TargetIntent::Attack, Reach::Extended),
            vec![BoardCoord::new(1, 1), BoardCoord::new(0, 0)]
        );
        assert_eq!(
            legal_targets(
                &board,
                BoardCoord::new(2, 2),
                TargetIntent::Attack,
                Reach::Extended
            ),
            vec![BoardCoord::new(1, 1), BoardCoord::new(2, 0)]
        );
    }

    #[test]
    fn computing_twice_yields_identical_sets() {
        let board = Board::tatooine().expect("reference map is valid");
        let origin = BoardCoord::new(4, 4);
        for intent in [TargetIntent::Attack, TargetIntent::Move] {
            for reach in [Reach::Adjacent, Reach::Extended] {
                assert_eq!(
                    legal_targets(&board, origin, intent, reach),
                    legal_targets(&board, origin, intent, reach)
                );
            }
        }
    }
}
