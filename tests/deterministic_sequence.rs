use std::time::{Duration, Instant};

use hazard_snake::config::{GameConfig, GridSize};
use hazard_snake::food::{Food, SpawnPlan};
use hazard_snake::game::{DeathCause, GameState, GameStatus, TickEvent};
use hazard_snake::grid::Level;
use hazard_snake::input::Direction;
use hazard_snake::snake::{Position, Snake};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn stepwise_food_collection_and_wall_collision() {
    let t0 = Instant::now();
    let config = GameConfig {
        grid: GridSize {
            width: 6,
            height: 4,
        },
        ..GameConfig::default()
    };
    let mut state =
        GameState::new_with_seed(config, Level::Classic, 42, t0).expect("small board starts");

    state.snake = Snake::new(Position::new(1, 1), Direction::Right);
    state.commit_spawn(SpawnPlan::Food(Food::cherry(Position::new(2, 1))));

    let eaten = state.tick(None, t0 + ms(100)).expect("tick");
    assert!(eaten.has(TickEvent::FoodEaten));
    assert_eq!(state.status, GameStatus::Playing);
    assert_eq!(state.score, 1);
    assert_eq!(state.snake.len(), 2);
    assert_eq!(state.snake.head(), Position::new(2, 1));

    // Whatever spawned next is somewhere on rows 0..3, away from the snake.
    let snapshot = state.snapshot();
    for cell in snapshot
        .food
        .map(|food| food.position)
        .into_iter()
        .chain(snapshot.hazard.map(|hazard| hazard.position))
    {
        assert!(!snapshot.body.contains(&cell));
        assert!(cell.y < 3);
    }

    // Clear the board so the walk below cannot run into the new spawn.
    state.commit_spawn(SpawnPlan::Food(Food::cherry(Position::new(5, 0))));
    state.tick(Some(Direction::Down), t0 + ms(200)).expect("tick");
    assert_eq!(state.snake.head(), Position::new(2, 2));

    state.tick(None, t0 + ms(300)).expect("tick");
    assert_eq!(state.snake.head(), Position::new(2, 3));

    let outcome = state.tick(None, t0 + ms(400)).expect("tick");
    assert!(!outcome.alive);
    assert_eq!(outcome.cause, Some(DeathCause::OutOfBounds));
    assert_eq!(state.status, GameStatus::GameOver);
}

#[test]
fn same_seed_replays_the_same_session() {
    let t0 = Instant::now();
    let turns = [
        None,
        Some(Direction::Up),
        None,
        Some(Direction::Left),
        None,
        None,
        Some(Direction::Down),
        None,
        Some(Direction::Right),
        None,
    ];

    let play = |seed: u64| {
        let mut state = GameState::new_with_seed(GameConfig::default(), Level::Obstacles, seed, t0)
            .expect("starts");
        let mut snapshots = vec![state.snapshot()];
        for (step, turn) in turns.iter().enumerate() {
            let at = t0 + ms(100 * (step as u64 + 1));
            state.tick(*turn, at).expect("tick");
            snapshots.push(state.snapshot());
        }
        snapshots
    };

    assert_eq!(play(99), play(99));
}

#[test]
fn reset_starts_over_on_the_requested_level() {
    let t0 = Instant::now();
    let mut state =
        GameState::new_with_seed(GameConfig::default(), Level::Classic, 5, t0).expect("starts");
    state.snake = Snake::new(Position::new(0, 0), Direction::Left);
    state.tick(None, t0 + ms(100)).expect("tick");
    assert_eq!(state.status, GameStatus::GameOver);

    state.reset(Level::Obstacles, t0 + ms(200)).expect("reset");

    let snapshot = state.snapshot();
    assert_eq!(snapshot.status, GameStatus::Playing);
    assert_eq!(snapshot.level, Level::Obstacles);
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.body.len(), 1);
    assert!(!snapshot.obstacles.is_empty());
    assert!(!snapshot.obstacles.contains(&snapshot.body[0]));
    assert_eq!(snapshot.timers.food, ms(10_000));
}
