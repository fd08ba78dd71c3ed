use crate::snake::Position;

/// Edible item kinds.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FoodKind {
    /// Base food, worth one point.
    Cherry,
    /// Short-lived bonus food that turns back into a cherry when ignored.
    Pineapple,
}

impl FoodKind {
    /// Returns the score value granted when eaten.
    #[must_use]
    pub fn points(self) -> u32 {
        match self {
            Self::Cherry => 1,
            Self::Pineapple => 3,
        }
    }
}

/// Food entity currently active on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
    pub kind: FoodKind,
}

impl Food {
    #[must_use]
    pub fn cherry(position: Position) -> Self {
        Self {
            position,
            kind: FoodKind::Cherry,
        }
    }

    #[must_use]
    pub fn pineapple(position: Position) -> Self {
        Self {
            position,
            kind: FoodKind::Pineapple,
        }
    }

    #[must_use]
    pub fn points(self) -> u32 {
        self.kind.points()
    }
}

/// How a hazard relates to the food around it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum HazardStrategy {
    /// Hazard and food share the board; the hazard leaves when the food is eaten.
    Simultaneous,
    /// Hazard appears alone and is replaced by food when its timer runs out.
    Sequential,
}

/// A cell that ends the game when entered.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Hazard {
    pub position: Position,
    pub strategy: HazardStrategy,
}

impl Hazard {
    #[must_use]
    pub fn sequential(position: Position) -> Self {
        Self {
            position,
            strategy: HazardStrategy::Sequential,
        }
    }

    #[must_use]
    pub fn simultaneous(position: Position) -> Self {
        Self {
            position,
            strategy: HazardStrategy::Simultaneous,
        }
    }
}

/// The consumables one spawn event puts on the board.
///
/// Each variant is one legal board state, so a sequential hazard can never
/// carry food and food can never appear without a kind.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SpawnPlan {
    Food(Food),
    /// Simultaneous strategy: hazard and food coexist on distinct cells.
    HazardWithFood { hazard: Hazard, food: Food },
    /// Sequential strategy: the hazard stands alone until it times out.
    HazardAlone(Hazard),
}

impl SpawnPlan {
    #[must_use]
    pub fn food(&self) -> Option<Food> {
        match *self {
            Self::Food(food) | Self::HazardWithFood { food, .. } => Some(food),
            Self::HazardAlone(_) => None,
        }
    }

    #[must_use]
    pub fn hazard(&self) -> Option<Hazard> {
        match *self {
            Self::Food(_) => None,
            Self::HazardWithFood { hazard, .. } | Self::HazardAlone(hazard) => Some(hazard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Food, FoodKind, Hazard, SpawnPlan};
    use crate::snake::Position;

    #[test]
    fn pineapple_is_worth_more_than_cherry() {
        assert_eq!(FoodKind::Cherry.points(), 1);
        assert_eq!(FoodKind::Pineapple.points(), 3);
        assert_eq!(Food::pineapple(Position::new(1, 1)).points(), 3);
    }

    #[test]
    fn spawn_plan_exposes_its_parts() {
        let food = Food::cherry(Position::new(1, 1));
        let hazard = Hazard::simultaneous(Position::new(2, 2));

        let paired = SpawnPlan::HazardWithFood { hazard, food };
        assert_eq!(paired.food(), Some(food));
        assert_eq!(paired.hazard(), Some(hazard));

        let alone = SpawnPlan::HazardAlone(Hazard::sequential(Position::new(3, 3)));
        assert_eq!(alone.food(), None);
        assert!(alone.hazard().is_some());

        assert_eq!(SpawnPlan::Food(food).hazard(), None);
    }
}
