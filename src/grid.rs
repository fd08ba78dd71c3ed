use std::collections::HashSet;

use rand::Rng;

use crate::config::GridSize;
use crate::snake::Position;

/// Cluster placements tried before a cluster is skipped.
const CLUSTER_ATTEMPTS: usize = 20;

/// Wall clusters generated per quadrant.
const CLUSTERS_PER_QUADRANT: usize = 3;

/// Board layout chosen at session start.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Level {
    /// Open board without obstacles.
    #[default]
    Classic,
    /// Fixed wall segments plus random clusters in each quadrant.
    Obstacles,
}

impl Level {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Classic => "Classic",
            Self::Obstacles => "Obstacles",
        }
    }
}

/// Static playfield: dimensions and obstacle cells. Never mutated during a session.
#[derive(Debug, Clone)]
pub struct GridWorld {
    size: GridSize,
    obstacles: HashSet<Position>,
}

impl GridWorld {
    /// Open board of `size`.
    #[must_use]
    pub fn classic(size: GridSize) -> Self {
        Self {
            size,
            obstacles: HashSet::new(),
        }
    }

    /// Builds the board for `level`, keeping `keep_clear` free of walls.
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(
        level: Level,
        size: GridSize,
        keep_clear: Position,
        rng: &mut R,
    ) -> Self {
        match level {
            Level::Classic => Self::classic(size),
            Level::Obstacles => Self::with_walls(size, keep_clear, rng),
        }
    }

    /// Board with an explicit obstacle set. Out-of-bounds cells are dropped.
    #[must_use]
    pub fn with_obstacles(size: GridSize, obstacles: impl IntoIterator<Item = Position>) -> Self {
        Self {
            size,
            obstacles: obstacles
                .into_iter()
                .filter(|cell| cell.is_within_bounds(size))
                .collect(),
        }
    }

    fn with_walls<R: Rng + ?Sized>(size: GridSize, keep_clear: Position, rng: &mut R) -> Self {
        let mut layout = WallLayout::new(size, keep_clear);
        layout.fixed_walls();
        layout.quadrant_clusters(rng);
        Self {
            size,
            obstacles: layout.cells,
        }
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.is_within_bounds(self.size)
    }

    #[must_use]
    pub fn is_obstacle(&self, position: Position) -> bool {
        self.obstacles.contains(&position)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Position> {
        self.obstacles.iter()
    }

    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Rows consumables may spawn in. The bottom row is reserved for the
    /// food timer bar.
    #[must_use]
    pub fn spawn_rows(&self) -> i32 {
        i32::from(self.size.height) - 1
    }

    /// Returns true when a consumable may be placed at `position`, ignoring occupancy.
    #[must_use]
    pub fn is_spawn_cell(&self, position: Position) -> bool {
        self.contains(position) && position.y < self.spawn_rows()
    }

    /// Iterates every spawnable cell in row-major order.
    pub fn spawn_cells(&self) -> impl Iterator<Item = Position> + '_ {
        let width = i32::from(self.size.width);
        (0..self.spawn_rows()).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }
}

/// Accumulates wall cells while enforcing the per-strip fill limit.
struct WallLayout {
    size: GridSize,
    keep_clear: Position,
    cells: HashSet<Position>,
    row_fill: Vec<usize>,
    column_fill: Vec<usize>,
}

impl WallLayout {
    fn new(size: GridSize, keep_clear: Position) -> Self {
        Self {
            size,
            keep_clear,
            cells: HashSet::new(),
            row_fill: vec![0; usize::from(size.height)],
            column_fill: vec![0; usize::from(size.width)],
        }
    }

    fn fixed_walls(&mut self) {
        let width = i32::from(self.size.width);
        let height = i32::from(self.size.height);
        let mid_y = height / 2;
        let third_x = width / 3;
        let two_thirds_x = width * 2 / 3;

        let in_vertical_gap = |y: i32| (mid_y - 2..=mid_y + 2).contains(&y);
        let in_horizontal_gap = |x: i32| {
            (third_x - 1..=third_x + 1).contains(&x)
                || (two_thirds_x - 1..=two_thirds_x + 1).contains(&x)
        };

        for y in (5..height - 10).filter(|y| !in_vertical_gap(*y)) {
            self.try_add(Position::new(third_x, y));
        }
        for y in (10..height - 5).filter(|y| !in_vertical_gap(*y)) {
            self.try_add(Position::new(two_thirds_x, y));
        }
        for wall_y in [height / 3, height * 2 / 3] {
            for x in (5..width - 5).filter(|x| !in_horizontal_gap(*x)) {
                self.try_add(Position::new(x, wall_y));
            }
        }
    }

    fn quadrant_clusters<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let width = i32::from(self.size.width);
        let height = i32::from(self.size.height);
        let left = 3..=width / 3 - 3;
        let right = width * 2 / 3 + 3..=width - 3;
        let top = 3..=height / 3 - 3;
        let bottom = height * 2 / 3 + 3..=height - 5;

        // (x range, y range, horizontal extension, vertical extension)
        let quadrants = [
            (left.clone(), top.clone(), 1, 1),
            (right.clone(), top, -1, 1),
            (left, bottom.clone(), 1, -1),
            (right, bottom, -1, -1),
        ];

        for (xs, ys, dx, dy) in quadrants {
            if xs.is_empty() || ys.is_empty() {
                continue;
            }
            for _ in 0..CLUSTERS_PER_QUADRANT {
                for _ in 0..CLUSTER_ATTEMPTS {
                    let anchor = Position::new(rng.gen_range(xs.clone()), rng.gen_range(ys.clone()));
                    let extension = if rng.gen_bool(0.5) {
                        Position::new(anchor.x + dx, anchor.y)
                    } else {
                        Position::new(anchor.x, anchor.y + dy)
                    };
                    if self.try_add_cluster([anchor, extension]) {
                        break;
                    }
                }
            }
        }
    }

    fn try_add_cluster(&mut self, cluster: [Position; 2]) -> bool {
        let fresh: Vec<Position> = cluster
            .into_iter()
            .filter(|cell| !self.cells.contains(cell))
            .collect();
        if !fresh.iter().all(|cell| self.accepts(*cell)) {
            return false;
        }
        // Both fresh cells may share a strip.
        if fresh.len() == 2 && !self.accepts_pair(fresh[0], fresh[1]) {
            return false;
        }
        for cell in fresh {
            self.insert(cell);
        }
        true
    }

    fn try_add(&mut self, cell: Position) {
        if !self.cells.contains(&cell) && self.accepts(cell) {
            self.insert(cell);
        }
    }

    fn accepts(&self, cell: Position) -> bool {
        cell.is_within_bounds(self.size)
            && cell != self.keep_clear
            && self.row_fill[cell.y as usize] < self.strip_limit(self.size.width)
            && self.column_fill[cell.x as usize] < self.strip_limit(self.size.height)
    }

    fn accepts_pair(&self, a: Position, b: Position) -> bool {
        if a.y == b.y && self.row_fill[a.y as usize] + 2 > self.strip_limit(self.size.width) {
            return false;
        }
        if a.x == b.x && self.column_fill[a.x as usize] + 2 > self.strip_limit(self.size.height) {
            return false;
        }
        true
    }

    /// At most two thirds of a strip may be wall.
    fn strip_limit(&self, strip_len: u16) -> usize {
        usize::from(strip_len) * 2 / 3
    }

    fn insert(&mut self, cell: Position) {
        self.row_fill[cell.y as usize] += 1;
        self.column_fill[cell.x as usize] += 1;
        self.cells.insert(cell);
    }
}
