use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{GameConfig, GridSize};
use crate::error::GameError;
use crate::food::{Food, FoodKind, Hazard, HazardStrategy, SpawnPlan};
use crate::grid::{GridWorld, Level};
use crate::input::Direction;
use crate::snake::{Position, Snake};
use crate::spawn::{SpawnPlanner, find_cell};
use crate::timers::{ActiveClock, TimerSet, TimersRemaining};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathCause {
    OutOfBounds,
    SelfCollision,
    ObstacleCollision,
    HazardCollision,
    FoodTimerExpired,
}

impl DeathCause {
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::OutOfBounds => "hit the edge",
            Self::SelfCollision => "bit yourself",
            Self::ObstacleCollision => "hit a wall",
            Self::HazardCollision => "touched a bomb",
            Self::FoodTimerExpired => "starved",
        }
    }
}

/// Notable things that happened during one tick, for sound and effects.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TickEvent {
    FoodEaten,
    HazardHit,
    HazardReplaced,
    PineappleExpired,
}

/// Result of one [`GameState::tick`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TickOutcome {
    pub alive: bool,
    pub score_delta: u32,
    /// Each event appears at most once, in the order it happened.
    pub events: Vec<TickEvent>,
    pub cause: Option<DeathCause>,
}

impl TickOutcome {
    fn alive() -> Self {
        Self {
            alive: true,
            score_delta: 0,
            events: Vec::new(),
            cause: None,
        }
    }

    fn record(&mut self, event: TickEvent) {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
    }

    #[must_use]
    pub fn has(&self, event: TickEvent) -> bool {
        self.events.contains(&event)
    }
}

/// Immutable copy of everything a renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub size: GridSize,
    pub level: Level,
    pub body: Vec<Position>,
    pub growth_markers: Vec<u8>,
    pub direction: Direction,
    pub obstacles: Vec<Position>,
    pub food: Option<Food>,
    pub hazard: Option<Hazard>,
    pub timers: TimersRemaining,
    pub score: u32,
    pub status: GameStatus,
    pub paused: bool,
}

/// How the food timer check resolved for this tick.
enum FoodClock {
    Running,
    /// Lenient branch: the tick ends alive without moving the snake.
    Held,
    Expired,
}

/// Complete mutable game state for one session, advanced only by [`tick`](Self::tick).
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Option<Food>,
    pub hazard: Option<Hazard>,
    pub score: u32,
    pub status: GameStatus,
    pub death_cause: Option<DeathCause>,
    pub tick_count: u64,
    config: GameConfig,
    level: Level,
    world: GridWorld,
    planner: SpawnPlanner,
    timers: TimerSet,
    clock: ActiveClock,
    rng: StdRng,
}

impl GameState {
    /// Starts a session seeded from the OS entropy source.
    pub fn new(config: GameConfig, level: Level, now: Instant) -> Result<Self, GameError> {
        Self::with_rng(config, level, StdRng::from_entropy(), now)
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    pub fn new_with_seed(
        config: GameConfig,
        level: Level,
        seed: u64,
        now: Instant,
    ) -> Result<Self, GameError> {
        Self::with_rng(config, level, StdRng::seed_from_u64(seed), now)
    }

    fn with_rng(
        config: GameConfig,
        level: Level,
        mut rng: StdRng,
        now: Instant,
    ) -> Result<Self, GameError> {
        config.validate()?;

        let start = start_position(config.grid);
        let world = GridWorld::generate(level, config.grid, start, &mut rng);
        let planner = SpawnPlanner::from_config(&config);
        let snake = Snake::new(start, Direction::Right);
        let plan = planner.draw(&mut rng, &world, &snake)?;

        let mut state = Self {
            snake,
            food: None,
            hazard: None,
            score: 0,
            status: GameStatus::Playing,
            death_cause: None,
            tick_count: 0,
            timers: TimerSet::new(&config, Duration::ZERO),
            clock: ActiveClock::start(now),
            config,
            level,
            world,
            planner,
            rng,
        };
        state.commit_spawn_at(plan, Duration::ZERO);

        log::info!(
            "new {} session on a {}x{} grid with {} obstacle cells",
            level.label(),
            state.config.grid.width,
            state.config.grid.height,
            state.world.obstacle_count()
        );
        Ok(state)
    }

    /// Discards the session and starts a fresh one on `level`, keeping the
    /// config and continuing the random stream.
    pub fn reset(&mut self, level: Level, now: Instant) -> Result<(), GameError> {
        let rng = StdRng::from_rng(&mut self.rng).unwrap_or_else(|_| StdRng::from_entropy());
        *self = Self::with_rng(self.config.clone(), level, rng, now)?;
        Ok(())
    }

    /// Advances the simulation by one move.
    ///
    /// `direction` turns the snake first unless it points straight back.
    /// Gameplay deaths are reported in the outcome; `Err` only signals that
    /// no cell was left for a new consumable. When that happens after eating,
    /// the session ends with the snake grown and the points counted.
    pub fn tick(
        &mut self,
        direction: Option<Direction>,
        now: Instant,
    ) -> Result<TickOutcome, GameError> {
        if self.status == GameStatus::GameOver {
            return Ok(TickOutcome {
                alive: false,
                score_delta: 0,
                events: Vec::new(),
                cause: self.death_cause,
            });
        }

        let now = self.clock.advance(now);
        let mut outcome = TickOutcome::alive();
        if self.clock.is_paused() {
            return Ok(outcome);
        }
        self.tick_count += 1;

        let hazard_replaced = self.resolve_timers(now, &mut outcome)?;

        if let Some(direction) = direction {
            self.snake.steer(direction);
        }
        let candidate = self.snake.next_head_position();
        let eating = self.food.is_some_and(|food| food.position == candidate);

        if !self.world.contains(candidate) {
            return Ok(self.end(outcome, DeathCause::OutOfBounds));
        }
        if self.snake.would_collide(candidate, !eating) {
            return Ok(self.end(outcome, DeathCause::SelfCollision));
        }
        if self.world.is_obstacle(candidate) {
            return Ok(self.end(outcome, DeathCause::ObstacleCollision));
        }
        match self.food_clock(now, hazard_replaced, &mut outcome)? {
            FoodClock::Running => {}
            FoodClock::Held => return Ok(outcome),
            FoodClock::Expired => return Ok(self.end(outcome, DeathCause::FoodTimerExpired)),
        }
        if self.hazard.is_some_and(|hazard| hazard.position == candidate) {
            outcome.record(TickEvent::HazardHit);
            return Ok(self.end(outcome, DeathCause::HazardCollision));
        }

        match self.food {
            Some(food) if eating => self.eat(food, candidate, now, &mut outcome)?,
            _ => self.snake.slide_into(candidate),
        }

        Ok(outcome)
    }

    /// Timer-driven transitions that run before the snake moves. Returns
    /// whether a hazard was replaced by food.
    fn resolve_timers(
        &mut self,
        now: Duration,
        outcome: &mut TickOutcome,
    ) -> Result<bool, GameError> {
        let mut hazard_replaced = false;

        if self
            .hazard
            .is_some_and(|hazard| hazard.strategy == HazardStrategy::Sequential)
            && self.timers.hazard_expired(now)
        {
            self.replace_hazard_with_food(now)?;
            outcome.record(TickEvent::HazardReplaced);
            hazard_replaced = true;
        }

        if self.food.is_none() && self.hazard.is_some() && self.timers.hazard_overrun(now) {
            log::warn!("hazard outlived its timer without being replaced, forcing replacement");
            self.replace_hazard_with_food(now)?;
            outcome.record(TickEvent::HazardReplaced);
            hazard_replaced = true;
        }

        if self.food.is_none() && self.hazard.is_none() {
            log::debug!("board has neither food nor hazard, spawning food");
            let food = self
                .planner
                .fresh_food(&mut self.rng, &self.world, &self.snake, &[])?;
            self.place_food(food, now);
            self.timers.restart_food(now);
        }

        if let Some(food) = self
            .food
            .filter(|food| food.kind == FoodKind::Pineapple && self.timers.pineapple_expired(now))
        {
            let mut avoid = vec![food.position];
            avoid.extend(self.hazard.map(|hazard| hazard.position));
            let position = find_cell(&mut self.rng, &self.world, &self.snake, &avoid)?;
            log::debug!("pineapple at {:?} expired, cherry moves to {position:?}", food.position);
            self.food = Some(Food::cherry(position));
            self.timers.clear_pineapple();
            outcome.record(TickEvent::PineappleExpired);
        }

        Ok(hazard_replaced)
    }

    /// Food timer check, including its lenient branches.
    fn food_clock(
        &mut self,
        now: Duration,
        hazard_replaced: bool,
        outcome: &mut TickOutcome,
    ) -> Result<FoodClock, GameError> {
        if self.food.is_none()
            && self
                .hazard
                .is_some_and(|hazard| hazard.strategy == HazardStrategy::Sequential)
        {
            // A lone sequential hazard suspends the food timer until it is replaced.
            return Ok(FoodClock::Running);
        }

        if !self.timers.food_expired(now) {
            return Ok(FoodClock::Running);
        }

        if self.food.is_none() {
            log::debug!("food timer expired with no food on the board, replacing hazard");
            self.replace_hazard_with_food(now)?;
            outcome.record(TickEvent::HazardReplaced);
            return Ok(FoodClock::Held);
        }

        if hazard_replaced {
            log::debug!("food timer expired on the tick a hazard was replaced, restarting it");
            self.timers.restart_food(now);
            return Ok(FoodClock::Held);
        }

        Ok(FoodClock::Expired)
    }

    fn eat(
        &mut self,
        food: Food,
        head: Position,
        now: Duration,
        outcome: &mut TickOutcome,
    ) -> Result<(), GameError> {
        self.snake.grow_into(head);

        let mut points = food.points();
        if self.timers.bonus().is_some() {
            let bonus = self.timers.bonus_points(now);
            log::debug!("bonus window claimed for {bonus} points");
            points = points.saturating_add(bonus);
            self.timers.close_bonus();
        }
        self.score = self.score.saturating_add(points);
        outcome.score_delta = outcome.score_delta.saturating_add(points);
        outcome.record(TickEvent::FoodEaten);

        match self.planner.draw(&mut self.rng, &self.world, &self.snake) {
            Ok(plan) => {
                self.commit_spawn_at(plan, now);
                Ok(())
            }
            Err(error) => {
                self.fill_board();
                Err(error)
            }
        }
    }

    /// Ends the session once the snake has taken every spawnable cell.
    fn fill_board(&mut self) {
        log::info!(
            "board filled after {} ticks with score {}",
            self.tick_count,
            self.score
        );
        self.food = None;
        self.hazard = None;
        self.timers.close_bonus();
        self.timers.clear_hazard();
        self.timers.clear_pineapple();
        self.status = GameStatus::GameOver;
    }

    /// Swaps the hazard for food, opening the bonus window. The food timer keeps running.
    fn replace_hazard_with_food(&mut self, now: Duration) -> Result<(), GameError> {
        let Some(hazard) = self.hazard else {
            return Ok(());
        };
        let food =
            self.planner
                .hazard_replacement(&mut self.rng, &self.world, &self.snake, hazard.position)?;

        log::debug!("hazard at {:?} replaced by {food:?}", hazard.position);
        self.hazard = None;
        self.timers.clear_hazard();
        self.place_food(food, now);
        self.timers.open_bonus(now);
        Ok(())
    }

    fn place_food(&mut self, food: Food, now: Duration) {
        match food.kind {
            FoodKind::Pineapple => self.timers.start_pineapple(now),
            FoodKind::Cherry => self.timers.clear_pineapple(),
        }
        self.food = Some(food);
    }

    /// Replaces the active consumables with `plan` and restarts the food timer,
    /// exactly as a spawn after eating does.
    pub fn commit_spawn(&mut self, plan: SpawnPlan) {
        let now = self.clock.elapsed();
        self.commit_spawn_at(plan, now);
    }

    fn commit_spawn_at(&mut self, plan: SpawnPlan, now: Duration) {
        debug_assert!(
            plan.food()
                .map(|food| food.position)
                .into_iter()
                .chain(plan.hazard().map(|hazard| hazard.position))
                .all(|cell| !self.snake.occupies(cell))
        );

        self.timers.close_bonus();
        self.timers.clear_hazard();
        self.timers.clear_pineapple();

        self.hazard = plan.hazard();
        if self
            .hazard
            .is_some_and(|hazard| hazard.strategy == HazardStrategy::Sequential)
        {
            self.timers.start_hazard(now);
        }

        self.food = None;
        if let Some(food) = plan.food() {
            self.place_food(food, now);
        }
        self.timers.restart_food(now);
    }

    fn end(&mut self, mut outcome: TickOutcome, cause: DeathCause) -> TickOutcome {
        log::info!("game over after {} ticks: {cause:?}, score {}", self.tick_count, self.score);
        self.status = GameStatus::GameOver;
        self.death_cause = Some(cause);
        outcome.alive = false;
        outcome.cause = Some(cause);
        outcome
    }

    /// Stops active time. Ticks while paused change nothing.
    pub fn pause(&mut self, now: Instant) {
        self.clock.pause(now);
    }

    pub fn resume(&mut self, now: Instant) {
        self.clock.resume(now);
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Timer values as of the most recent tick.
    #[must_use]
    pub fn timers_remaining(&self) -> TimersRemaining {
        self.timers.remaining(self.clock.elapsed())
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut obstacles: Vec<Position> = self.world.obstacles().copied().collect();
        obstacles.sort_unstable();

        Snapshot {
            size: self.world.size(),
            level: self.level,
            body: self.snake.segments().copied().collect(),
            growth_markers: self.snake.growth_markers().copied().collect(),
            direction: self.snake.direction(),
            obstacles,
            food: self.food,
            hazard: self.hazard,
            timers: self.timers_remaining(),
            score: self.score,
            status: self.status,
            paused: self.is_paused(),
        }
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn world(&self) -> &GridWorld {
        &self.world
    }
}

fn start_position(grid: GridSize) -> Position {
    Position::new(i32::from(grid.width / 2), i32::from(grid.height / 2))
}
