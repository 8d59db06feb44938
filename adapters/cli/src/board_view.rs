use std::fmt::Write as _;

use tatooine_rescue_core::{BoardCoord, TileKind};
use tatooine_rescue_presentation::{highlight_color, tile_color, Color, Hud};
use tatooine_rescue_world::Board;

const RESET: &str = "\x1b[0m";

fn glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Empty => '.',
        TileKind::Start => 'S',
        TileKind::Goal => 'G',
        TileKind::Obstacle => '#',
        TileKind::Enemy => 'E',
        TileKind::Quicksand => '~',
        TileKind::Event => '?',
    }
}

fn paint(out: &mut String, color: Color, text: &str) {
    let [red, green, blue] = color.to_rgb_u8();
    let _ = write!(out, "\x1b[38;2;{red};{green};{blue}m{text}{RESET}");
}

/// Draws the board with the character as `@` and highlighted tiles in brackets.
pub(crate) fn render(board: &Board, hud: &Hud, color: bool) -> String {
    let mut out = String::from("   ");
    for x in 0..board.columns() {
        let _ = write!(out, "{x:^3}");
    }
    out.push('\n');

    for z in 0..board.rows() {
        let _ = write!(out, "{z:>2} ");
        for x in 0..board.columns() {
            let coord = BoardCoord::new(x, z);
            let kind = board.tile_at(coord).unwrap_or(TileKind::Empty);
            let symbol = if hud.character_position() == Some(coord) {
                '@'
            } else {
                glyph(kind)
            };
            let (open, close) = match hud.highlight_at(coord) {
                Some(_) => ('[', ']'),
                None => (' ', ' '),
            };
            let cell = format!("{open}{symbol}{close}");

            if !color {
                out.push_str(&cell);
            } else if let Some(tone) = hud.highlight_at(coord) {
                paint(&mut out, highlight_color(tone), &cell);
            } else {
                paint(&mut out, tile_color(kind), &cell);
            }
        }
        out.push('\n');
    }
    out.push_str("   @ you  S start  G goal  # rock  E enemy  ~ quicksand  ? event");
    out
}
