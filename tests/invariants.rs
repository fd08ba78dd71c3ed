use std::collections::HashSet;
use std::time::{Duration, Instant};

use hazard_snake::config::{GameConfig, GridSize};
use hazard_snake::game::{GameState, TickEvent};
use hazard_snake::grid::{GridWorld, Level};
use hazard_snake::input::Direction;
use hazard_snake::snake::{Position, Snake};
use hazard_snake::spawn::find_cell;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn direction() -> impl Strategy<Value = Option<Direction>> {
    prop_oneof![
        3 => Just(None),
        1 => Just(Some(Direction::Up)),
        1 => Just(Some(Direction::Down)),
        1 => Just(Some(Direction::Left)),
        1 => Just(Some(Direction::Right)),
    ]
}

fn level() -> impl Strategy<Value = Level> {
    prop_oneof![Just(Level::Classic), Just(Level::Obstacles)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn consumables_never_overlap_snake_or_walls(
        seed in any::<u64>(),
        level in level(),
        turns in prop::collection::vec(direction(), 1..200),
        step_ms in 50u64..400,
    ) {
        let t0 = Instant::now();
        let config = GameConfig {
            grid: GridSize::square(20),
            ..GameConfig::default()
        };
        let mut state = GameState::new_with_seed(config, level, seed, t0).expect("starts");
        let mut foods_eaten = 0usize;
        let mut last_score = 0;

        for (step, turn) in turns.into_iter().enumerate() {
            let at = t0 + Duration::from_millis(step_ms * (step as u64 + 1));
            let outcome = state.tick(turn, at).expect("20x20 never saturates this quickly");
            if outcome.has(TickEvent::FoodEaten) {
                foods_eaten += 1;
            }
            if !outcome.alive {
                break;
            }

            let snapshot = state.snapshot();
            let body: HashSet<Position> = snapshot.body.iter().copied().collect();
            prop_assert_eq!(body.len(), snapshot.body.len(), "body cells are distinct");
            prop_assert_eq!(snapshot.body.len(), 1 + foods_eaten);
            prop_assert!(snapshot.score >= last_score);
            last_score = snapshot.score;

            for cell in snapshot
                .food
                .map(|food| food.position)
                .into_iter()
                .chain(snapshot.hazard.map(|hazard| hazard.position))
            {
                prop_assert!(!body.contains(&cell));
                prop_assert!(!state.world().is_obstacle(cell));
                prop_assert!(cell.y < 19, "bottom row stays clear");
            }
            if let (Some(food), Some(hazard)) = (snapshot.food, snapshot.hazard) {
                prop_assert_ne!(food.position, hazard.position);
            }
        }
    }

    #[test]
    fn placement_respects_snake_and_avoid_list(
        seed in any::<u64>(),
        avoid in prop::collection::vec((0i32..8, 0i32..7), 0..20),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let world = GridWorld::classic(GridSize::square(8));
        let snake = Snake::from_segments(
            vec![Position::new(3, 3), Position::new(3, 4), Position::new(3, 5)],
            Direction::Up,
        );
        let avoid: Vec<Position> = avoid.into_iter().map(|(x, y)| Position::new(x, y)).collect();

        let cell = find_cell(&mut rng, &world, &snake, &avoid).expect("at most 23 of 56 cells are taken");

        prop_assert!(!snake.occupies(cell));
        prop_assert!(!avoid.contains(&cell));
        prop_assert!(world.is_spawn_cell(cell));
    }
}
