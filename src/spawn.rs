use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::{GameConfig, SpawnWeights};
use crate::error::GameError;
use crate::food::{Food, FoodKind, Hazard, SpawnPlan};
use crate::grid::GridWorld;
use crate::snake::{Position, Snake};

/// Uniform random draws tried before falling back to enumerating free cells.
pub const MAX_RANDOM_ATTEMPTS: usize = 100;

/// Chooses what spawns next and where.
#[derive(Debug, Clone)]
pub struct SpawnPlanner {
    weights: SpawnWeights,
    simultaneous_hazard_chance: f64,
    replacement_cherry_chance: f64,
}

impl SpawnPlanner {
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            weights: config.spawn_weights,
            simultaneous_hazard_chance: config.simultaneous_hazard_chance,
            replacement_cherry_chance: config.replacement_cherry_chance,
        }
    }

    /// Draws the next spawn: cherry, pineapple, or a hazard with its strategy.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        world: &GridWorld,
        snake: &Snake,
    ) -> Result<SpawnPlan, GameError> {
        let roll: f64 = rng.gen_range(0.0..1.0);
        let plan = if roll < self.weights.cherry {
            SpawnPlan::Food(Food::cherry(find_cell(rng, world, snake, &[])?))
        } else if roll < self.weights.cherry + self.weights.pineapple {
            SpawnPlan::Food(Food::pineapple(find_cell(rng, world, snake, &[])?))
        } else if rng.gen_bool(self.simultaneous_hazard_chance) {
            let hazard = Hazard::simultaneous(find_cell(rng, world, snake, &[])?);
            let food = Food {
                position: find_cell(rng, world, snake, &[hazard.position])?,
                kind: self.replacement_kind(rng),
            };
            SpawnPlan::HazardWithFood { hazard, food }
        } else {
            SpawnPlan::HazardAlone(Hazard::sequential(find_cell(rng, world, snake, &[])?))
        };

        log::debug!("spawn drawn: {plan:?}");
        Ok(plan)
    }

    /// Food that takes over from a timed-out hazard, never on the hazard's cell.
    pub fn hazard_replacement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        world: &GridWorld,
        snake: &Snake,
        former_hazard: Position,
    ) -> Result<Food, GameError> {
        let position = find_cell(rng, world, snake, &[former_hazard])?;
        Ok(Food {
            position,
            kind: self.replacement_kind(rng),
        })
    }

    /// Cherry or pineapple drawn with the spawn weights restricted to food kinds.
    pub fn fresh_food<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        world: &GridWorld,
        snake: &Snake,
        avoid: &[Position],
    ) -> Result<Food, GameError> {
        let food_weight = self.weights.cherry + self.weights.pineapple;
        let cherry_share = if food_weight > 0.0 {
            self.weights.cherry / food_weight
        } else {
            1.0
        };
        let kind = if rng.gen_bool(cherry_share.clamp(0.0, 1.0)) {
            FoodKind::Cherry
        } else {
            FoodKind::Pineapple
        };
        Ok(Food {
            position: find_cell(rng, world, snake, avoid)?,
            kind,
        })
    }

    fn replacement_kind<R: Rng + ?Sized>(&self, rng: &mut R) -> FoodKind {
        if rng.gen_bool(self.replacement_cherry_chance) {
            FoodKind::Cherry
        } else {
            FoodKind::Pineapple
        }
    }
}

/// Picks a spawn cell outside the snake, the obstacles and `avoid`.
///
/// Starts with [`MAX_RANDOM_ATTEMPTS`] uniform draws, then picks uniformly
/// from the enumerated free cells. When only obstacle cells remain, obstacle
/// avoidance is dropped; the snake and `avoid` are always respected. Fails
/// with [`GameError::BoardSaturated`] when nothing is left.
pub fn find_cell<R: Rng + ?Sized>(
    rng: &mut R,
    world: &GridWorld,
    snake: &Snake,
    avoid: &[Position],
) -> Result<Position, GameError> {
    let size = world.size();
    let width = i32::from(size.width);
    let rows = world.spawn_rows();

    let open = |cell: Position| !snake.occupies(cell) && !avoid.contains(&cell);

    if rows > 0 && width > 0 {
        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let cell = Position::new(rng.gen_range(0..width), rng.gen_range(0..rows));
            if open(cell) && !world.is_obstacle(cell) {
                return Ok(cell);
            }
        }
    }

    let free: Vec<Position> = world
        .spawn_cells()
        .filter(|cell| open(*cell) && !world.is_obstacle(*cell))
        .collect();
    if let Some(cell) = free.choose(rng) {
        return Ok(*cell);
    }

    let relaxed: Vec<Position> = world.spawn_cells().filter(|cell| open(*cell)).collect();
    if let Some(cell) = relaxed.choose(rng) {
        log::warn!("no obstacle-free cell left, placing consumable on wall cell {cell:?}");
        return Ok(*cell);
    }

    Err(GameError::BoardSaturated {
        width: size.width,
        height: size.height,
    })
}
