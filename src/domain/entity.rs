/// Entities: the snake and the timed powerup.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::grid::{Cell, Direction};

pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Ordered body cells, index 0 = head, last = tail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Straight snake with its head at `head`, body trailing opposite `facing`.
    pub fn new(head: Cell, len: usize, facing: Direction) -> Self {
        let (dx, dy) = facing.delta();
        let body = (0..len.max(1) as i32)
            .map(|i| Cell::new(head.x - dx * i, head.y - dy * i))
            .collect();
        Snake { body }
    }

    pub fn from_cells(cells: &[Cell]) -> Self {
        Snake { body: cells.iter().copied().collect() }
    }

    pub fn head(&self) -> Cell {
        // Body is never empty: `new` builds at least one cell and the step
        // function only trims after prepending.
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn contains(&self, c: Cell) -> bool {
        self.body.contains(&c)
    }

    /// Does `c` hit any segment other than the head?
    pub fn body_hit(&self, c: Cell) -> bool {
        self.body.iter().skip(1).any(|&b| b == c)
    }

    pub fn push_head(&mut self, c: Cell) {
        self.body.push_front(c);
    }

    pub fn trim_tail(&mut self) -> Option<Cell> {
        if self.body.len() > 1 { self.body.pop_back() } else { None }
    }

    /// Append `n` copies of the tail cell. They separate out over the
    /// next `n` moves.
    pub fn extend_tail(&mut self, n: usize) {
        let tail = self.tail();
        for _ in 0..n {
            self.body.push_back(tail);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Powerup {
    pub cell: Cell,
    pub spawned_at: Instant,
}

impl Powerup {
    pub fn new(cell: Cell, spawned_at: Instant) -> Self {
        Powerup { cell, spawned_at }
    }

    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.spawned_at)
    }

    pub fn expired(&self, now: Instant, lifetime: Duration) -> bool {
        self.age(now) >= lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snake_trails_behind_head() {
        let s = Snake::new(Cell::new(5, 5), 3, Direction::Right);
        let cells: Vec<Cell> = s.cells().copied().collect();
        assert_eq!(cells, vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)]);
        assert_eq!(s.head(), Cell::new(5, 5));
        assert_eq!(s.tail(), Cell::new(3, 5));
    }

    #[test]
    fn body_hit_ignores_head() {
        let s = Snake::from_cells(&[Cell::new(1, 1), Cell::new(1, 2)]);
        assert!(!s.body_hit(Cell::new(1, 1)));
        assert!(s.body_hit(Cell::new(1, 2)));
    }

    #[test]
    fn trim_never_empties() {
        let mut s = Snake::from_cells(&[Cell::new(0, 0)]);
        assert_eq!(s.trim_tail(), None);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn extend_tail_duplicates_tail_cell() {
        let mut s = Snake::new(Cell::new(5, 5), 3, Direction::Right);
        s.extend_tail(2);
        assert_eq!(s.len(), 5);
        assert!(s.cells().skip(2).all(|&c| c == Cell::new(3, 5)));
    }

    #[test]
    fn powerup_expiry_is_inclusive() {
        let t0 = Instant::now();
        let p = Powerup::new(Cell::new(0, 0), t0);
        let life = Duration::from_millis(10_000);
        assert!(!p.expired(t0 + Duration::from_millis(9_999), life));
        assert!(p.expired(t0 + life, life));
    }
}
