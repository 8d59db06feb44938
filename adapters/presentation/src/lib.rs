#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Tatooine Rescue adapters.
//!
//! [`Hud`] is a retained implementation of [`Presenter`]: it records what the
//! game asked to show so that any front-end can draw it on its own schedule.

mod message_log;

use std::collections::BTreeMap;

use tatooine_rescue_core::{
    BoardCoord, GameOutcome, HighlightTone, Presenter, StatsDisplay, TileKind,
    DEFAULT_MESSAGE_LOG_CAPACITY,
};
use tracing::debug;

pub use message_log::MessageLog;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self {
            red: ((rgb >> 16) & 0xff) as f32 / 255.0,
            green: ((rgb >> 8) & 0xff) as f32 / 255.0,
            blue: (rgb & 0xff) as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Byte channels, for terminals and image encoders.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        [
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        ]
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Base color of a tile.
#[must_use]
pub const fn tile_color(kind: TileKind) -> Color {
    Color::from_hex(match kind {
        TileKind::Empty => 0xcc_cccc,
        TileKind::Start => 0x00_cc00,
        TileKind::Goal => 0x00_00cc,
        TileKind::Obstacle => 0x66_6666,
        TileKind::Enemy => 0xcc_0000,
        TileKind::Quicksand => 0xcc_cc00,
        TileKind::Event => 0xff_6600,
    })
}

/// Ring color drawn around a highlighted tile.
#[must_use]
pub const fn highlight_color(tone: HighlightTone) -> Color {
    Color::from_hex(match tone {
        HighlightTone::Attack => 0xff_0000,
        HighlightTone::Move => 0x00_ff00,
        HighlightTone::Dash => 0x00_ffff,
    })
}

/// Retained record of everything the game asked to present.
#[derive(Clone, Debug)]
pub struct Hud {
    highlights: BTreeMap<BoardCoord, HighlightTone>,
    character: Option<BoardCoord>,
    stats: Option<StatsDisplay>,
    messages: MessageLog,
    outcome: Option<GameOutcome>,
}

impl Hud {
    /// Creates an empty HUD whose log keeps `message_capacity` messages.
    #[must_use]
    pub fn new(message_capacity: usize) -> Self {
        Self {
            highlights: BTreeMap::new(),
            character: None,
            stats: None,
            messages: MessageLog::new(message_capacity),
            outcome: None,
        }
    }

    /// Forgets everything recorded for the previous game.
    pub fn reset(&mut self) {
        self.highlights.clear();
        self.character = None;
        self.stats = None;
        self.messages.clear();
        self.outcome = None;
    }

    /// Tone of the highlight on `coord`, if any.
    #[must_use]
    pub fn highlight_at(&self, coord: BoardCoord) -> Option<HighlightTone> {
        self.highlights.get(&coord).copied()
    }

    /// Highlighted tiles in row-major order.
    #[must_use]
    pub fn highlighted(&self) -> Vec<BoardCoord> {
        let mut tiles: Vec<_> = self.highlights.keys().copied().collect();
        tiles.sort_by_key(|coord| (coord.z(), coord.x()));
        tiles
    }

    /// Tile the character figure stands on.
    #[must_use]
    pub const fn character_position(&self) -> Option<BoardCoord> {
        self.character
    }

    /// Last stats pushed to the panel.
    #[must_use]
    pub const fn stats(&self) -> Option<StatsDisplay> {
        self.stats
    }

    /// Message log.
    #[must_use]
    pub const fn messages(&self) -> &MessageLog {
        &self.messages
    }

    /// Terminal result announced by the game.
    #[must_use]
    pub const fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }
}

impl Default for Hud {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_LOG_CAPACITY)
    }
}

impl Presenter for Hud {
    fn highlight_tiles(&mut self, tiles: &[BoardCoord], tone: HighlightTone) {
        for tile in tiles {
            let _ = self.highlights.insert(*tile, tone);
        }
    }

    fn clear_highlights(&mut self) {
        self.highlights.clear();
    }

    fn move_character_visual(&mut self, to: BoardCoord) {
        self.character = Some(to);
    }

    fn update_stats_display(&mut self, stats: StatsDisplay) {
        self.stats = Some(stats);
    }

    fn post_message(&mut self, text: &str) {
        debug!(text, "message posted");
        self.messages.push(text);
    }

    fn signal_game_over(&mut self, outcome: GameOutcome) {
        self.outcome = Some(outcome);
    }
}
