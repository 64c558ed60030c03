/// Session state machine.
///
/// ```text
///   Menu ──Start──▶ Playing ◀──TogglePause──▶ Paused
///    ▲                 │                         │
///    │           self-collision             ReturnToMenu
///    │                 ▼                         │
///    └──ReturnToMenu── GameOver ──Restart──▶ Playing
/// ```
///
/// The session owns the `GameState` and the `TickTimer`. The timer is
/// armed only while Playing. Commands that make no sense in the current
/// phase are ignored and reported as `false`.

use std::time::Instant;

use rand::Rng;

use crate::domain::grid::Direction;
use super::event::GameEvent;
use super::step::{self, TickInput};
use super::timer::TickTimer;
use super::world::{Difficulty, GameState, Phase, Rules};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Start,
    Restart,
    TogglePause,
    ReturnToMenu,
    CycleDifficulty(i32),
    SelectDifficulty(Difficulty),
    Steer(Direction),
}

pub struct Session {
    pub state: GameState,
    timer: TickTimer,
}

impl Session {
    pub fn new(rules: Rules, high_score: u32, difficulty: Difficulty) -> Self {
        Session {
            state: GameState::new(rules, high_score, difficulty),
            timer: TickTimer::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    /// Apply one command. Returns true if it changed anything.
    pub fn apply<R: Rng + ?Sized>(&mut self, cmd: Command, now: Instant, rng: &mut R) -> bool {
        match (self.state.phase, cmd) {
            (Phase::Menu, Command::Start) | (Phase::GameOver, Command::Restart) => {
                self.begin(now, rng);
                true
            }
            (Phase::Menu, Command::CycleDifficulty(by)) => {
                self.state.difficulty = self.state.difficulty.cycle(by);
                true
            }
            (Phase::Menu, Command::SelectDifficulty(d)) => {
                self.state.difficulty = d;
                true
            }
            (Phase::Playing, Command::TogglePause) => {
                self.state.phase = Phase::Paused;
                self.timer.disarm();
                true
            }
            (Phase::Paused, Command::TogglePause) => {
                self.state.phase = Phase::Playing;
                self.timer.arm(self.state.tick_period(), now);
                true
            }
            (Phase::Playing | Phase::Paused | Phase::GameOver, Command::ReturnToMenu) => {
                self.state.phase = Phase::Menu;
                self.timer.disarm();
                true
            }
            (Phase::Playing, Command::Steer(dir)) => self.state.request_turn(dir),
            _ => false,
        }
    }

    /// Run a tick if the timer says one is due.
    pub fn poll<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> Vec<GameEvent> {
        if !self.timer.fire(now) {
            return vec![];
        }
        self.tick(now, rng)
    }

    /// Advance one tick unconditionally (still a no-op outside Playing).
    pub fn tick<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> Vec<GameEvent> {
        let events = step::step(&mut self.state, TickInput { now }, rng);
        if self.state.phase == Phase::GameOver {
            self.timer.disarm();
        }
        events
    }

    fn begin<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) {
        self.state.reset_board(rng);
        self.state.phase = Phase::Playing;
        // Re-arming replaces any schedule still pending.
        self.timer.arm(self.state.tick_period(), now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::domain::entity::Snake;
    use crate::domain::grid::Cell;

    fn session() -> (Session, StdRng, Instant) {
        let rules = Rules { powerup_chance: 0.0, ..Rules::default() };
        (Session::new(rules, 0, Difficulty::Medium), StdRng::seed_from_u64(11), Instant::now())
    }

    #[test]
    fn starts_in_menu_with_timer_off() {
        let (s, _, _) = session();
        assert_eq!(s.phase(), Phase::Menu);
        assert!(!s.timer().is_armed());
    }

    #[test]
    fn start_arms_timer_at_difficulty_period() {
        let (mut s, mut rng, t0) = session();
        assert!(s.apply(Command::CycleDifficulty(1), t0, &mut rng));
        assert_eq!(s.state.difficulty, Difficulty::Hard);
        assert!(s.apply(Command::Start, t0, &mut rng));
        assert_eq!(s.phase(), Phase::Playing);
        assert!(s.timer().is_armed());
        assert_eq!(s.timer().period(), Duration::from_millis(70));
        assert!(s.state.food.is_some());
    }

    #[test]
    fn pause_disarms_and_resume_rearms() {
        let (mut s, mut rng, t0) = session();
        s.apply(Command::Start, t0, &mut rng);
        assert!(s.apply(Command::TogglePause, t0, &mut rng));
        assert_eq!(s.phase(), Phase::Paused);
        assert!(!s.timer().is_armed());

        let head = s.state.snake.head();
        assert!(s.poll(t0 + Duration::from_secs(1), &mut rng).is_empty());
        assert_eq!(s.state.snake.head(), head);

        assert!(s.apply(Command::TogglePause, t0, &mut rng));
        assert_eq!(s.phase(), Phase::Playing);
        assert_eq!(s.timer().period(), Duration::from_millis(100));
    }

    #[test]
    fn poll_ticks_on_schedule() {
        let (mut s, mut rng, t0) = session();
        s.apply(Command::Start, t0, &mut rng);
        let head = s.state.snake.head();
        s.poll(t0 + Duration::from_millis(50), &mut rng);
        assert_eq!(s.state.snake.head(), head);
        s.poll(t0 + Duration::from_millis(100), &mut rng);
        assert_eq!(s.state.snake.head(), Cell::new(head.x + 1, head.y));
    }

    #[test]
    fn invalid_phase_commands_are_noops() {
        let (mut s, mut rng, t0) = session();
        assert!(!s.apply(Command::TogglePause, t0, &mut rng));
        assert!(!s.apply(Command::Restart, t0, &mut rng));
        assert!(!s.apply(Command::ReturnToMenu, t0, &mut rng));
        assert!(!s.apply(Command::Steer(Direction::Up), t0, &mut rng));
        assert_eq!(s.phase(), Phase::Menu);

        s.apply(Command::Start, t0, &mut rng);
        assert!(!s.apply(Command::Start, t0, &mut rng));
        assert!(!s.apply(Command::CycleDifficulty(1), t0, &mut rng));
        assert_eq!(s.state.difficulty, Difficulty::Medium);
    }

    #[test]
    fn steering_rules() {
        let (mut s, mut rng, t0) = session();
        s.apply(Command::Start, t0, &mut rng);
        assert!(!s.apply(Command::Steer(Direction::Left), t0, &mut rng));
        assert!(s.apply(Command::Steer(Direction::Up), t0, &mut rng));
        assert!(!s.apply(Command::Steer(Direction::Right), t0, &mut rng));
        assert_eq!(s.state.direction, Direction::Up);

        s.apply(Command::TogglePause, t0, &mut rng);
        assert!(!s.apply(Command::Steer(Direction::Left), t0, &mut rng));
    }

    fn crash(s: &mut Session, rng: &mut StdRng, t0: Instant) {
        s.state.snake = Snake::from_cells(&[
            Cell::new(2, 2), Cell::new(3, 2), Cell::new(3, 3), Cell::new(2, 3), Cell::new(1, 3),
        ]);
        s.state.direction = Direction::Down;
        s.state.food = Some(Cell::new(20, 15));
        let ev = s.tick(t0, rng);
        assert!(ev.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn collision_stops_timer() {
        let (mut s, mut rng, t0) = session();
        s.apply(Command::Start, t0, &mut rng);
        crash(&mut s, &mut rng, t0);
        assert_eq!(s.phase(), Phase::GameOver);
        assert!(!s.timer().is_armed());
        assert!(s.poll(t0 + Duration::from_secs(5), &mut rng).is_empty());
        assert!(!s.apply(Command::TogglePause, t0, &mut rng));
    }

    #[test]
    fn restart_from_game_over_resets_board_keeps_high_score() {
        let (mut s, mut rng, t0) = session();
        s.apply(Command::Start, t0, &mut rng);
        s.state.add_score(9);
        crash(&mut s, &mut rng, t0);

        assert!(s.apply(Command::Restart, t0, &mut rng));
        assert_eq!(s.phase(), Phase::Playing);
        assert_eq!(s.state.score, 0);
        assert_eq!(s.state.high_score, 9);
        assert_eq!(s.state.snake.len(), 3);
        assert!(s.timer().is_armed());
    }

    #[test]
    fn game_over_to_menu_then_difficulty_applies_next_start() {
        let (mut s, mut rng, t0) = session();
        s.apply(Command::Start, t0, &mut rng);
        crash(&mut s, &mut rng, t0);
        assert!(s.apply(Command::ReturnToMenu, t0, &mut rng));
        assert_eq!(s.phase(), Phase::Menu);
        assert!(s.apply(Command::SelectDifficulty(Difficulty::Easy), t0, &mut rng));
        s.apply(Command::Start, t0, &mut rng);
        assert_eq!(s.timer().period(), Duration::from_millis(150));
    }

    #[test]
    fn menu_from_play_stops_timer() {
        let (mut s, mut rng, t0) = session();
        s.apply(Command::Start, t0, &mut rng);
        assert!(s.apply(Command::ReturnToMenu, t0, &mut rng));
        assert_eq!(s.phase(), Phase::Menu);
        assert!(!s.timer().is_armed());
    }
}
