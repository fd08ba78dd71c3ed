//! Terminal Snake with bombs, short-lived pineapples and obstacle levels.
//!
//! The engine in [`game`] is driven entirely by caller-supplied timestamps;
//! the terminal frontend lives in the `hazard-snake` binary.

pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod highscore;
pub mod input;
pub mod renderer;
pub mod snake;
pub mod spawn;
pub mod terminal_runtime;
pub mod timers;

pub mod ui {
    pub mod hud;
    pub mod menu;
}
