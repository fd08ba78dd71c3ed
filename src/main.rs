use std::collections::VecDeque;
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use hazard_snake::config::{
    DEFAULT_TICK_INTERVAL_MS, FRAME_INTERVAL_MS, GameConfig, GridSize, THEMES, Theme,
    theme_by_name,
};
use hazard_snake::error::GameError;
use hazard_snake::game::{GameState, GameStatus};
use hazard_snake::grid::Level;
use hazard_snake::highscore::{HighScores, MAX_NAME_LEN};
use hazard_snake::input::{Direction, GameInput, poll_input};
use hazard_snake::renderer;
use hazard_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use hazard_snake::ui::hud::HudInfo;
use hazard_snake::ui::menu::Overlay;

/// Pending turns buffered between ticks.
const MAX_QUEUED_TURNS: usize = 2;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LevelArg {
    Classic,
    Obstacles,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Classic => Self::Classic,
            LevelArg::Obstacles => Self::Obstacles,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "Terminal Snake with hazards and timed bonus food")]
struct Cli {
    /// JSON gameplay config; missing keys use defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Square board edge length in cells.
    #[arg(long)]
    grid: Option<u16>,
    /// Level preselected on the start screen.
    #[arg(long, value_enum)]
    level: Option<LevelArg>,
    /// Seed for reproducible sessions.
    #[arg(long)]
    seed: Option<u64>,
    /// Color theme name.
    #[arg(long, default_value = "classic")]
    theme: String,
    /// Write logs here; without it logging is off, since stderr would tear the screen.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Screen {
    Start,
    Playing,
    Paused,
    GameOver {
        name_entry: Option<String>,
        saved_rank: Option<usize>,
    },
    HighScores,
}

enum Flow {
    Continue,
    Quit,
}

struct App {
    config: GameConfig,
    seed: Option<u64>,
    level: Level,
    theme: &'static Theme,
    state: GameState,
    screen: Screen,
    scores: HighScores,
    queued_turns: VecDeque<Direction>,
    /// Set while a session left with Esc waits paused behind the start screen.
    suspended: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(cells) = cli.grid {
        config.grid = GridSize::square(cells);
    }
    config.validate()?;

    let theme = theme_by_name(&cli.theme).ok_or_else(|| {
        let names: Vec<&str> = THEMES.iter().map(|theme| theme.name).collect();
        format!("unknown theme '{}', expected one of: {}", cli.theme, names.join(", "))
    })?;

    let scores = HighScores::load().unwrap_or_else(|error| {
        eprintln!("Failed to load high scores, starting with an empty table: {error}");
        HighScores::new()
    });

    let level = cli.level.map_or(Level::Classic, Level::from);
    let mut app = App::new(config, cli.seed, level, theme, scores)?;

    install_panic_hook();
    let mut session = TerminalSession::enter()?;
    app.run(&mut session)
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    log::info!("logging to {}", path.display());
    Ok(())
}

impl App {
    fn new(
        config: GameConfig,
        seed: Option<u64>,
        level: Level,
        theme: &'static Theme,
        scores: HighScores,
    ) -> Result<Self, Box<dyn Error>> {
        let state = new_state(&config, seed, level, Instant::now())?;
        Ok(Self {
            config,
            seed,
            level,
            theme,
            state,
            screen: Screen::Start,
            scores,
            queued_turns: VecDeque::with_capacity(MAX_QUEUED_TURNS),
            suspended: false,
        })
    }

    fn run(&mut self, session: &mut TerminalSession) -> Result<(), Box<dyn Error>> {
        let tick_interval = Duration::from_millis(DEFAULT_TICK_INTERVAL_MS);
        let mut last_tick = Instant::now();

        loop {
            self.draw(session)?;

            let text_entry = matches!(
                self.screen,
                Screen::GameOver {
                    name_entry: Some(_),
                    ..
                }
            );
            if let Some(input) = poll_input(Duration::from_millis(FRAME_INTERVAL_MS), text_entry)? {
                if let Flow::Quit = self.handle_input(input, Instant::now())? {
                    break;
                }
            }

            if self.screen == Screen::Playing && last_tick.elapsed() >= tick_interval {
                let now = Instant::now();
                self.tick(now)?;
                last_tick = now;
            }
        }

        log::info!("quitting");
        Ok(())
    }

    fn draw(&self, session: &mut TerminalSession) -> Result<(), Box<dyn Error>> {
        let snapshot = self.state.snapshot();
        let overlay = match &self.screen {
            Screen::Start => Overlay::Start {
                level: self.level,
                best: self.scores.best(),
                can_continue: self.suspended,
            },
            Screen::Playing => Overlay::None,
            Screen::Paused => Overlay::Paused,
            Screen::GameOver {
                name_entry,
                saved_rank,
            } => Overlay::GameOver {
                score: snapshot.score,
                cause: self.state.death_cause,
                name_entry: name_entry.as_deref(),
                saved_rank: *saved_rank,
            },
            Screen::HighScores => Overlay::HighScores(&self.scores),
        };
        let hud = HudInfo {
            best_score: self.scores.best(),
            theme: self.theme,
        };

        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &snapshot, &overlay, &hud))?;
        Ok(())
    }

    fn tick(&mut self, now: Instant) -> Result<(), Box<dyn Error>> {
        let turn = self.queued_turns.pop_front();
        let outcome = match self.state.tick(turn, now) {
            Ok(outcome) => outcome,
            Err(GameError::BoardSaturated { width, height }) => {
                log::info!("no free cell left on the {width}x{height} board");
                self.enter_game_over();
                return Ok(());
            }
            Err(error) => return Err(error.into()),
        };
        if !outcome.alive {
            self.enter_game_over();
        }
        Ok(())
    }

    fn enter_game_over(&mut self) {
        self.queued_turns.clear();
        let name_entry = self
            .scores
            .qualifies(self.state.score)
            .then(String::new);
        self.screen = Screen::GameOver {
            name_entry,
            saved_rank: None,
        };
    }

    fn start_game(&mut self, now: Instant) -> Result<(), Box<dyn Error>> {
        self.state = new_state(&self.config, self.seed, self.level, now)?;
        self.queued_turns.clear();
        self.suspended = false;
        self.screen = Screen::Playing;
        Ok(())
    }

    fn suspend_game(&mut self, now: Instant) {
        if !self.state.is_paused() {
            self.state.pause(now);
        }
        self.queued_turns.clear();
        self.suspended = true;
        self.screen = Screen::Start;
    }

    fn continue_game(&mut self, now: Instant) {
        self.state.resume(now);
        self.suspended = false;
        self.screen = Screen::Playing;
    }

    fn queue_turn(&mut self, direction: Direction) {
        let last = self
            .queued_turns
            .back()
            .copied()
            .unwrap_or_else(|| self.state.snake.direction());
        if direction == last || self.queued_turns.len() >= MAX_QUEUED_TURNS {
            return;
        }
        self.queued_turns.push_back(direction);
    }

    fn handle_input(&mut self, input: GameInput, now: Instant) -> Result<Flow, Box<dyn Error>> {
        if input == GameInput::Quit {
            return Ok(Flow::Quit);
        }

        match (&mut self.screen, input) {
            (Screen::Start, GameInput::Select('1')) => self.level = Level::Classic,
            (Screen::Start, GameInput::Select('2')) => self.level = Level::Obstacles,
            (Screen::Start, GameInput::Select('c' | 'C')) if self.suspended => {
                self.continue_game(now);
            }
            (Screen::Start, GameInput::Select('h' | 'H')) => self.screen = Screen::HighScores,
            (Screen::Start, GameInput::Confirm) => self.start_game(now)?,
            (Screen::Start, GameInput::Back) => return Ok(Flow::Quit),

            (Screen::Playing, GameInput::Direction(direction)) => self.queue_turn(direction),
            (Screen::Playing, GameInput::Pause) => {
                self.state.pause(now);
                self.screen = Screen::Paused;
            }
            (Screen::Paused, GameInput::Pause | GameInput::Confirm) => {
                self.state.resume(now);
                self.screen = Screen::Playing;
            }
            (Screen::Playing | Screen::Paused, GameInput::Restart) => self.start_game(now)?,
            (Screen::Playing | Screen::Paused, GameInput::Back) => self.suspend_game(now),

            (
                Screen::GameOver {
                    name_entry: Some(name),
                    ..
                },
                GameInput::Char(ch),
            ) => {
                if name.chars().count() < MAX_NAME_LEN {
                    name.push(ch);
                }
            }
            (
                Screen::GameOver {
                    name_entry: Some(name),
                    ..
                },
                GameInput::Backspace,
            ) => {
                name.pop();
            }
            (
                Screen::GameOver {
                    name_entry: Some(name),
                    ..
                },
                GameInput::Confirm,
            ) => {
                let name = std::mem::take(name);
                self.save_score(&name);
            }
            (
                Screen::GameOver {
                    name_entry: name_entry @ Some(_),
                    ..
                },
                GameInput::Back,
            ) => *name_entry = None,

            (Screen::GameOver { .. }, GameInput::Confirm | GameInput::Back) => {
                self.screen = Screen::Start;
            }
            (Screen::GameOver { .. }, GameInput::Restart) => self.start_game(now)?,
            (Screen::GameOver { .. }, GameInput::Select('h' | 'H')) => {
                self.screen = Screen::HighScores;
            }

            (Screen::HighScores, GameInput::Confirm | GameInput::Back) => {
                self.screen = Screen::Start;
            }

            _ => {}
        }

        Ok(Flow::Continue)
    }

    fn save_score(&mut self, name: &str) {
        debug_assert_eq!(self.state.status, GameStatus::GameOver);
        let saved_rank = self.scores.add_score(name, self.state.score);
        if let Err(error) = self.scores.save() {
            log::warn!("failed to save high scores: {error}");
        }
        self.screen = Screen::GameOver {
            name_entry: None,
            saved_rank,
        };
    }
}

fn new_state(
    config: &GameConfig,
    seed: Option<u64>,
    level: Level,
    now: Instant,
) -> Result<GameState, Box<dyn Error>> {
    let state = match seed {
        Some(seed) => GameState::new_with_seed(config.clone(), level, seed, now)?,
        None => GameState::new(config.clone(), level, now)?,
    };
    Ok(state)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use hazard_snake::config::{GameConfig, GridSize, THEMES};
    use hazard_snake::food::{Food, SpawnPlan};
    use hazard_snake::game::GameStatus;
    use hazard_snake::grid::Level;
    use hazard_snake::highscore::HighScores;
    use hazard_snake::input::{Direction, GameInput};
    use hazard_snake::snake::{Position, Snake};

    use super::{App, Screen};

    fn app(config: GameConfig) -> App {
        App::new(config, Some(1), Level::Classic, &THEMES[0], HighScores::new())
            .expect("app starts")
    }

    #[test]
    fn esc_keeps_the_session_for_continue() {
        let t0 = Instant::now();
        let mut app = app(GameConfig::default());
        app.start_game(t0).expect("start");
        app.tick(t0 + Duration::from_millis(100)).expect("tick");
        let head = app.state.snake.head();

        app.handle_input(GameInput::Back, t0 + Duration::from_millis(150))
            .expect("back");
        assert_eq!(app.screen, Screen::Start);
        assert!(app.state.is_paused());

        app.handle_input(GameInput::Select('c'), t0 + Duration::from_millis(5_000))
            .expect("continue");
        assert_eq!(app.screen, Screen::Playing);
        assert!(!app.state.is_paused());
        assert_eq!(app.state.snake.head(), head);
        assert_eq!(app.state.status, GameStatus::Playing);
    }

    #[test]
    fn continue_is_ignored_without_a_suspended_session() {
        let t0 = Instant::now();
        let mut app = app(GameConfig::default());

        app.handle_input(GameInput::Select('c'), t0).expect("select");

        assert_eq!(app.screen, Screen::Start);
    }

    #[test]
    fn full_board_shows_game_over() {
        let t0 = Instant::now();
        let config = GameConfig {
            grid: GridSize::square(3),
            ..GameConfig::default()
        };
        let mut app = app(config);
        app.start_game(t0).expect("start");
        app.state.snake = Snake::from_segments(
            vec![
                Position::new(1, 1),
                Position::new(2, 1),
                Position::new(2, 0),
                Position::new(1, 0),
                Position::new(0, 0),
            ],
            Direction::Left,
        );
        app.state
            .commit_spawn(SpawnPlan::Food(Food::cherry(Position::new(0, 1))));

        app.tick(t0 + Duration::from_millis(100))
            .expect("saturation is not fatal");

        assert!(matches!(app.screen, Screen::GameOver { .. }));
        assert_eq!(app.state.score, 1);
    }
}
