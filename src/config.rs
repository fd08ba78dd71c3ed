use std::fs;
use std::path::Path;
use std::time::Duration;

use ratatui::style::Color;
use ratatui::symbols::border;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GameError};

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Square grid with `cells` columns and rows.
    #[must_use]
    pub fn square(cells: u16) -> Self {
        Self {
            width: cells,
            height: cells,
        }
    }
}

/// Default board edge length in cells.
pub const DEFAULT_GRID_CELLS: u16 = 40;

/// Smallest accepted board edge: one playable row above the reserved bottom row
/// is not enough to turn around in.
pub const MIN_GRID_CELLS: u16 = 3;
/// Longest accepted timer duration, one hour.
pub const MAX_TIMER_MS: u64 = 3_600_000;

/// Probability weights for the next spawn kind. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeights {
    pub cherry: f64,
    pub pineapple: f64,
    pub hazard: f64,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            cherry: 0.75,
            pineapple: 0.15,
            hazard: 0.10,
        }
    }
}

/// Tunable gameplay parameters.
///
/// Durations are kept in milliseconds so the JSON form stays flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridSize,
    /// Time allowed to eat the current food before the game ends.
    pub food_timer_ms: u64,
    /// Lifetime of a sequential hazard before food replaces it.
    pub hazard_timer_ms: u64,
    /// Lifetime of a pineapple before it turns back into a cherry.
    pub pineapple_timer_ms: u64,
    pub spawn_weights: SpawnWeights,
    /// Chance that a hazard shares the board with food instead of preceding it.
    pub simultaneous_hazard_chance: f64,
    /// Chance that food replacing a hazard (or paired with one) is a cherry.
    pub replacement_cherry_chance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::square(DEFAULT_GRID_CELLS),
            food_timer_ms: 10_000,
            hazard_timer_ms: 4_000,
            pineapple_timer_ms: 3_000,
            spawn_weights: SpawnWeights::default(),
            simultaneous_hazard_chance: 0.5,
            replacement_cherry_chance: 0.7,
        }
    }
}

impl GameConfig {
    /// Reads a JSON config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks dimensions, durations and probability tables.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.grid.width < MIN_GRID_CELLS || self.grid.height < MIN_GRID_CELLS {
            return Err(GameError::InvalidConfig(format!(
                "grid must be at least {MIN_GRID_CELLS}x{MIN_GRID_CELLS}, got {}x{}",
                self.grid.width, self.grid.height
            )));
        }

        for (name, value) in [
            ("food_timer_ms", self.food_timer_ms),
            ("hazard_timer_ms", self.hazard_timer_ms),
            ("pineapple_timer_ms", self.pineapple_timer_ms),
        ] {
            if value == 0 {
                return Err(GameError::InvalidConfig(format!("{name} must be non-zero")));
            }
            if value > MAX_TIMER_MS {
                return Err(GameError::InvalidConfig(format!(
                    "{name} must be at most {MAX_TIMER_MS}, got {value}"
                )));
            }
        }

        let weights = self.spawn_weights;
        for (name, value) in [
            ("spawn_weights.cherry", weights.cherry),
            ("spawn_weights.pineapple", weights.pineapple),
            ("spawn_weights.hazard", weights.hazard),
            ("simultaneous_hazard_chance", self.simultaneous_hazard_chance),
            ("replacement_cherry_chance", self.replacement_cherry_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GameError::InvalidConfig(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }

        let total = weights.cherry + weights.pineapple + weights.hazard;
        if (total - 1.0).abs() > 1e-6 {
            return Err(GameError::InvalidConfig(format!(
                "spawn weights must sum to 1, got {total}"
            )));
        }
        if weights.cherry + weights.pineapple <= 0.0 {
            return Err(GameError::InvalidConfig(
                "at least one food kind needs a non-zero weight".to_owned(),
            ));
        }

        Ok(())
    }

    #[must_use]
    pub fn food_timer(&self) -> Duration {
        Duration::from_millis(self.food_timer_ms)
    }

    #[must_use]
    pub fn hazard_timer(&self) -> Duration {
        Duration::from_millis(self.hazard_timer_ms)
    }

    #[must_use]
    pub fn pineapple_timer(&self) -> Duration {
        Duration::from_millis(self.pineapple_timer_ms)
    }
}

/// A color theme applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    pub snake_head: Color,
    pub snake_body: Color,
    /// Segments still carrying a growth marker.
    pub snake_growth: Color,
    pub cherry: Color,
    pub pineapple: Color,
    pub hazard: Color,
    pub obstacle: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub border_bg: Color,
    pub hud_score: Color,
    pub timer_ok: Color,
    pub timer_warn: Color,
    pub timer_low: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

/// Green snake on black, brown walls.
pub const THEME_CLASSIC: Theme = Theme {
    name: "classic",
    snake_head: Color::LightGreen,
    snake_body: Color::Green,
    snake_growth: Color::White,
    cherry: Color::Red,
    pineapple: Color::Yellow,
    hazard: Color::Magenta,
    obstacle: Color::Rgb(139, 69, 19),
    play_bg: Color::Black,
    border_fg: Color::White,
    border_bg: Color::DarkGray,
    hud_score: Color::White,
    timer_ok: Color::Green,
    timer_warn: Color::Yellow,
    timer_low: Color::Red,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

/// Ocean cyan theme.
pub const THEME_OCEAN: Theme = Theme {
    name: "ocean",
    snake_head: Color::White,
    snake_body: Color::Cyan,
    snake_growth: Color::LightCyan,
    cherry: Color::LightRed,
    pineapple: Color::Yellow,
    hazard: Color::LightMagenta,
    obstacle: Color::Blue,
    play_bg: Color::Black,
    border_fg: Color::Cyan,
    border_bg: Color::DarkGray,
    hud_score: Color::Cyan,
    timer_ok: Color::Cyan,
    timer_warn: Color::Yellow,
    timer_low: Color::LightRed,
    menu_title: Color::Cyan,
    menu_footer: Color::DarkGray,
};

/// All available themes in cycle order.
pub const THEMES: &[Theme] = &[THEME_CLASSIC, THEME_OCEAN];

/// Looks up a theme by name, case-insensitively.
#[must_use]
pub fn theme_by_name(name: &str) -> Option<&'static Theme> {
    THEMES
        .iter()
        .find(|theme| theme.name.eq_ignore_ascii_case(name))
}

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

pub const GLYPH_SNAKE_HEAD: &str = "█";
pub const GLYPH_SNAKE_BODY: &str = "▓";
pub const GLYPH_CHERRY: &str = "●";
pub const GLYPH_PINEAPPLE: &str = "◆";
pub const GLYPH_HAZARD: &str = "✖";
pub const GLYPH_OBSTACLE: &str = "▒";
pub const GLYPH_TIMER: &str = "▀";

/// Gameplay tick interval in milliseconds (ten moves per second).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Frame redraw interval in milliseconds.
pub const FRAME_INTERVAL_MS: u64 = 16;

#[cfg(test)]
mod tests {
    use super::{GameConfig, GridSize, MAX_TIMER_MS, theme_by_name};
    use crate::error::GameError;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.grid, GridSize::square(40));
        assert_eq!(config.food_timer().as_secs(), 10);
        assert_eq!(config.hazard_timer().as_secs(), 4);
        assert_eq!(config.pineapple_timer().as_secs(), 3);
    }

    #[test]
    fn weights_not_summing_to_one_are_rejected() {
        let mut config = GameConfig::default();
        config.spawn_weights.hazard = 0.5;

        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn tiny_grid_is_rejected() {
        let config = GameConfig {
            grid: GridSize {
                width: 2,
                height: 10,
            },
            ..GameConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_timers_are_rejected() {
        let config = GameConfig {
            food_timer_ms: u64::MAX / 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig(message)) if message.contains("food_timer_ms")
        ));

        let config = GameConfig {
            hazard_timer_ms: MAX_TIMER_MS,
            pineapple_timer_ms: MAX_TIMER_MS,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"food_timer_ms": 5000}"#).expect("partial config parses");

        assert_eq!(config.food_timer_ms, 5000);
        assert_eq!(config.hazard_timer_ms, 4000);
        assert_eq!(config.grid.width, 40);
    }

    #[test]
    fn theme_lookup_ignores_case() {
        assert_eq!(theme_by_name("OCEAN").map(|theme| theme.name), Some("ocean"));
        assert!(theme_by_name("missing").is_none());
    }
}
