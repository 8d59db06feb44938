use tatooine_rescue_core::{
    BoardCoord, GameOutcome, HighlightTone, Presenter, StatsDisplay,
};
use tatooine_rescue_presentation::Hud;

/// Presenter that echoes messages to stdout as they are posted.
pub(crate) struct Terminal {
    hud: Hud,
}

impl Terminal {
    pub(crate) fn new(message_capacity: usize) -> Self {
        Self {
            hud: Hud::new(message_capacity),
        }
    }

    pub(crate) const fn hud(&self) -> &Hud {
        &self.hud
    }

    pub(crate) fn reset(&mut self) {
        self.hud.reset();
    }
}

impl Presenter for Terminal {
    fn highlight_tiles(&mut self, tiles: &[BoardCoord], tone: HighlightTone) {
        self.hud.highlight_tiles(tiles, tone);
    }

    fn clear_highlights(&mut self) {
        self.hud.clear_highlights();
    }

    fn move_character_visual(&mut self, to: BoardCoord) {
        self.hud.move_character_visual(to);
    }

    fn update_stats_display(&mut self, stats: StatsDisplay) {
        self.hud.update_stats_display(stats);
    }

    fn post_message(&mut self, text: &str) {
        println!("> {text}");
        self.hud.post_message(text);
    }

    fn signal_game_over(&mut self, outcome: GameOutcome) {
        self.hud.signal_game_over(outcome);
        let banner = match outcome {
            GameOutcome::Victory => "*** VICTORY ***",
            GameOutcome::Defeat => "*** DEFEAT ***",
        };
        println!("{banner}  (type `new jedi|droid|clone` to play again)");
    }
}

/// One-line stats summary.
pub(crate) fn status_line(stats: StatsDisplay) -> String {
    format!(
        "{}  health {}  action points {}  special {}",
        stats.label,
        stats.health,
        stats.action_points,
        if stats.special_ready {
            "ready"
        } else {
            "unavailable"
        }
    )
}
