/// GameState: the complete snapshot of a running game.
///
/// One owned value. The step function takes `&mut GameState`, the
/// renderer takes `&GameState`, and nothing else holds game data.
///
/// ## Board invariants
///   - `food` never lies on the snake or the powerup
///   - `powerup`, when present, never lies on the snake or the food
///   - `high_score >= score` and never decreases

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;

use crate::domain::entity::{Powerup, Snake, INITIAL_SNAKE_LENGTH};
use crate::domain::grid::{Cell, Direction, Grid};
use crate::domain::placement::place_random_cell;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Menu,
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn from_name(s: &str) -> Option<Difficulty> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "normal" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    /// Step through the levels cyclically; negative `by` goes backwards.
    pub fn cycle(self, by: i32) -> Difficulty {
        let n = Self::ALL.len() as i32;
        let idx = (self.index() as i32 + by).rem_euclid(n);
        Self::ALL[idx as usize]
    }
}

/// Tunables that shape a game. Built from config; the core never reads
/// files itself.
#[derive(Clone, Debug)]
pub struct Rules {
    pub grid: Grid,
    pub easy_period: Duration,
    pub medium_period: Duration,
    pub hard_period: Duration,
    pub powerup_chance: f64,
    pub powerup_lifetime: Duration,
}

impl Rules {
    pub fn period(&self, d: Difficulty) -> Duration {
        match d {
            Difficulty::Easy => self.easy_period,
            Difficulty::Medium => self.medium_period,
            Difficulty::Hard => self.hard_period,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            grid: Grid::new(30, 18),
            easy_period: Duration::from_millis(150),
            medium_period: Duration::from_millis(100),
            hard_period: Duration::from_millis(70),
            powerup_chance: 0.01,
            powerup_lifetime: Duration::from_millis(10_000),
        }
    }
}

pub struct GameState {
    pub rules: Rules,

    // ── Entities ──
    pub snake: Snake,
    pub direction: Direction,
    /// Set once a turn has been accepted; cleared at the start of each tick.
    pub turned_this_tick: bool,
    pub food: Option<Cell>,
    pub powerup: Option<Powerup>,

    // ── Meta ──
    pub phase: Phase,
    pub difficulty: Difficulty,
    pub score: u32,
    pub high_score: u32,
    /// High score as it stood when the current game began.
    pub high_score_at_start: u32,
    pub tick: u64,
}

impl GameState {
    pub fn new(rules: Rules, high_score: u32, difficulty: Difficulty) -> Self {
        let grid = rules.grid;
        GameState {
            rules,
            snake: Snake::new(start_cell(&grid), INITIAL_SNAKE_LENGTH, Direction::Right),
            direction: Direction::Right,
            turned_this_tick: false,
            food: None,
            powerup: None,
            phase: Phase::Menu,
            difficulty,
            score: 0,
            high_score,
            high_score_at_start: high_score,
            tick: 0,
        }
    }

    pub fn grid(&self) -> Grid {
        self.rules.grid
    }

    pub fn tick_period(&self) -> Duration {
        self.rules.period(self.difficulty)
    }

    /// Fresh snake, score and food for a new game. High score survives.
    pub fn reset_board<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let grid = self.grid();
        self.snake = Snake::new(start_cell(&grid), INITIAL_SNAKE_LENGTH, Direction::Right);
        self.direction = Direction::Right;
        self.turned_this_tick = false;
        self.powerup = None;
        self.score = 0;
        self.tick = 0;
        self.high_score_at_start = self.high_score;
        self.food = None;
        self.place_food(rng);
    }

    /// Accept a turn unless one was already taken this tick or `dir`
    /// would fold the snake back onto itself.
    pub fn request_turn(&mut self, dir: Direction) -> bool {
        if self.turned_this_tick || dir == self.direction.opposite() {
            return false;
        }
        self.direction = dir;
        self.turned_this_tick = true;
        true
    }

    /// Add points and lift the high score with them.
    /// Returns true if the high score moved.
    pub fn add_score(&mut self, points: u32) -> bool {
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    pub fn place_food<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut excluded = self.snake_cells();
        if let Some(p) = self.powerup {
            excluded.insert(p.cell);
        }
        self.food = place_random_cell(&self.grid(), &excluded, rng);
    }

    /// Choose a powerup cell clear of the snake and food.
    pub fn powerup_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let mut excluded = self.snake_cells();
        if let Some(f) = self.food {
            excluded.insert(f);
        }
        place_random_cell(&self.grid(), &excluded, rng)
    }

    fn snake_cells(&self) -> HashSet<Cell> {
        self.snake.cells().copied().collect()
    }

    pub fn is_new_high_score(&self) -> bool {
        self.score > self.high_score_at_start
    }
}

/// Head at the board centre, body trailing to the left.
fn start_cell(grid: &Grid) -> Cell {
    let c = grid.center();
    let min_x = INITIAL_SNAKE_LENGTH as i32 - 1;
    Cell::new(c.x.max(min_x.min(grid.width - 1)), c.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn difficulty_cycles_both_ways() {
        assert_eq!(Difficulty::Easy.cycle(1), Difficulty::Medium);
        assert_eq!(Difficulty::Hard.cycle(1), Difficulty::Easy);
        assert_eq!(Difficulty::Easy.cycle(-1), Difficulty::Hard);
        assert_eq!(Difficulty::Medium.cycle(3), Difficulty::Medium);
    }

    #[test]
    fn difficulty_periods() {
        let r = Rules::default();
        assert_eq!(r.period(Difficulty::Easy), Duration::from_millis(150));
        assert_eq!(r.period(Difficulty::Medium), Duration::from_millis(100));
        assert_eq!(r.period(Difficulty::Hard), Duration::from_millis(70));
    }

    #[test]
    fn difficulty_from_name() {
        assert_eq!(Difficulty::from_name(" HARD "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_name("nightmare"), None);
    }

    #[test]
    fn reset_board_places_centered_snake_and_free_food() {
        let mut s = GameState::new(Rules::default(), 7, Difficulty::Medium);
        s.score = 4;
        s.reset_board(&mut StdRng::seed_from_u64(1));
        assert_eq!(s.snake.len(), INITIAL_SNAKE_LENGTH);
        assert_eq!(s.snake.head(), Cell::new(15, 9));
        assert_eq!(s.direction, Direction::Right);
        assert_eq!(s.score, 0);
        assert_eq!(s.high_score, 7);
        let food = s.food.expect("food placed");
        assert!(!s.snake.contains(food));
    }

    #[test]
    fn reverse_turn_rejected() {
        let mut s = GameState::new(Rules::default(), 0, Difficulty::Medium);
        assert!(!s.request_turn(Direction::Left));
        assert_eq!(s.direction, Direction::Right);
    }

    #[test]
    fn one_turn_per_tick() {
        let mut s = GameState::new(Rules::default(), 0, Difficulty::Medium);
        assert!(s.request_turn(Direction::Up));
        // Up then Left within one tick would be a sneaky reversal; refuse it.
        assert!(!s.request_turn(Direction::Left));
        assert_eq!(s.direction, Direction::Up);
    }

    #[test]
    fn high_score_follows_score_upward_only() {
        let mut s = GameState::new(Rules::default(), 3, Difficulty::Medium);
        assert!(!s.add_score(2));
        assert_eq!(s.high_score, 3);
        assert!(s.add_score(5));
        assert_eq!(s.high_score, 7);
    }
}
