//! UI layer: the board window and its colours.

pub mod app;
pub mod theme;

pub use app::ReversiApp;
