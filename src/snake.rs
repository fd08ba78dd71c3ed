use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::{Direction, direction_change_is_valid};

/// Intensity given to a freshly grown segment. Decays by one per tick.
pub const GROWTH_MARKER_INTENSITY: u8 = 10;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Mutable snake state: body cells, heading and growth markers.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    /// Index-aligned with `body`; trailing zero markers are dropped.
    growth_markers: VecDeque<u8>,
}

impl Snake {
    /// Creates a one-cell snake at `start` with the provided direction.
    #[must_use]
    pub fn new(start: Position, direction: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_front(start);

        Self {
            body,
            direction,
            growth_markers: VecDeque::new(),
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        debug_assert!(!segments.is_empty());
        Self {
            body: VecDeque::from(segments),
            direction,
            growth_markers: VecDeque::new(),
        }
    }

    /// Turns toward `direction` unless it would reverse onto the neck.
    /// Returns whether the heading changed.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.direction, direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Returns the head position for the next movement tick.
    #[must_use]
    pub fn next_head_position(&self) -> Position {
        self.head().step(self.direction)
    }

    /// Returns true if `candidate` would hit the body after this tick's move.
    ///
    /// The head itself is skipped, and the tail is skipped when it is about
    /// to be vacated (`tail_vacates`), i.e. the move does not grow the snake.
    #[must_use]
    pub fn would_collide(&self, candidate: Position, tail_vacates: bool) -> bool {
        let len = self.body.len();
        let end = if tail_vacates { len - 1 } else { len };
        self.body
            .iter()
            .take(end)
            .skip(1)
            .any(|segment| *segment == candidate)
    }

    /// Moves the head to `next_head` and grows by one segment.
    pub fn grow_into(&mut self, next_head: Position) {
        self.decay_growth();
        self.body.push_front(next_head);
        self.growth_markers.push_front(GROWTH_MARKER_INTENSITY);
    }

    /// Moves the head to `next_head` keeping the length unchanged.
    pub fn slide_into(&mut self, next_head: Position) {
        self.decay_growth();
        self.body.push_front(next_head);
        let _ = self.body.pop_back();
        if !self.growth_markers.is_empty() {
            // Markers follow their segments toward the tail; the oldest drops off there.
            self.growth_markers.push_front(0);
            self.growth_markers.truncate(self.body.len());
        }
    }

    fn decay_growth(&mut self) {
        for marker in &mut self.growth_markers {
            *marker = marker.saturating_sub(1);
        }
        while self.growth_markers.back() == Some(&0) {
            let _ = self.growth_markers.pop_back();
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the current movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    /// Growth intensities aligned with [`segments`](Self::segments) from the head.
    pub fn growth_markers(&self) -> impl Iterator<Item = &u8> {
        self.growth_markers.iter()
    }
}
