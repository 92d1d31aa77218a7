//! Colours used by the board window.

use eframe::egui::Color32;
use shared::domain::{CellState, GameStatus};

pub const BOARD_FELT: Color32 = Color32::from_rgb(0x1f, 0x6e, 0x3a);
pub const REJECTION: Color32 = Color32::from_rgb(0xb7, 0x00, 0x00);

/// Headline colour for a status; `None` keeps the theme's text colour.
pub fn headline_color(status: GameStatus) -> Option<Color32> {
    match status {
        GameStatus::InProgress => None,
        GameStatus::LocalWon => Some(Color32::from_rgb(0x24, 0xb7, 0x49)),
        GameStatus::LocalLost => Some(Color32::from_rgb(0xb7, 0x31, 0x31)),
        GameStatus::Tied => Some(Color32::from_rgb(0x26, 0x89, 0xaf)),
        GameStatus::Error => Some(Color32::from_rgb(0xb7, 0x00, 0x00)),
    }
}

pub fn disc_color(cell: CellState) -> Option<Color32> {
    match cell {
        CellState::Empty => None,
        CellState::PlayerOne => Some(Color32::from_rgb(0x14, 0x14, 0x14)),
        CellState::PlayerTwo => Some(Color32::from_rgb(0xf2, 0xf2, 0xf2)),
    }
}

pub fn lighten_color(c: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |channel: u8| -> u8 {
        let channel = channel as f32;
        (channel + (255.0 - channel) * t).round().clamp(0.0, 255.0) as u8
    };
    Color32::from_rgba_unmultiplied(mix(c.r()), mix(c.g()), mix(c.b()), c.a())
}
