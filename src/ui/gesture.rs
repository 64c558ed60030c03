/// Mouse gestures: swipes, double-clicks and on-screen buttons.
///
/// A press on the board starts a potential swipe; the release decides the
/// direction by the dominant axis of the drag, provided the drag exceeds
/// the threshold (in grid cells). Two presses on the board within the
/// double-click window toggle pause. Presses on the menu buttons or the
/// on-screen d-pad map straight to commands.

use std::time::{Duration, Instant};

use crate::config::InputConfig;
use crate::domain::grid::Direction;
use crate::sim::session::Command;
use crate::sim::world::Phase;
use super::input::PointerEvent;
use super::layout::{Layout, MenuButton, CELL_W};

/// Direction of a drag of (`dx`, `dy`) cells, or `None` when the
/// dominant component does not exceed `threshold`.
pub fn classify_swipe(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx > threshold {
            Some(Direction::Right)
        } else if dx < -threshold {
            Some(Direction::Left)
        } else {
            None
        }
    } else if dy > threshold {
        Some(Direction::Down)
    } else if dy < -threshold {
        Some(Direction::Up)
    } else {
        None
    }
}

pub struct PointerTracker {
    threshold: f32,
    double_click: Duration,
    press: Option<(u16, u16)>,
    last_tap: Option<Instant>,
}

impl PointerTracker {
    pub fn new(cfg: &InputConfig) -> Self {
        PointerTracker {
            threshold: cfg.swipe_threshold,
            double_click: cfg.double_click,
            press: None,
            last_tap: None,
        }
    }

    /// Feed one pointer event. Commands that do not fit the phase are
    /// still returned; the session decides whether they apply.
    pub fn handle(&mut self, ev: PointerEvent, phase: Phase, layout: &Layout, now: Instant) -> Option<Command> {
        match ev {
            PointerEvent::Down { col, row } => self.press_at(col, row, phase, layout, now),
            PointerEvent::Up { col, row } => self.release_at(col, row),
        }
    }

    fn press_at(&mut self, col: u16, row: u16, phase: Phase, layout: &Layout, now: Instant) -> Option<Command> {
        self.press = None;
        match phase {
            Phase::Menu => match layout.menu_hit(col, row)? {
                MenuButton::Difficulty(d) => Some(Command::SelectDifficulty(d)),
                MenuButton::Start => Some(Command::Start),
            },
            Phase::Playing | Phase::Paused => {
                if let Some(dir) = layout.dpad_hit(col, row) {
                    return Some(Command::Steer(dir));
                }
                layout.board_cell(col, row)?;
                self.press = Some((col, row));
                match self.last_tap {
                    Some(t) if now.saturating_duration_since(t) < self.double_click => {
                        self.last_tap = None;
                        Some(Command::TogglePause)
                    }
                    _ => {
                        self.last_tap = Some(now);
                        None
                    }
                }
            }
            Phase::GameOver => None,
        }
    }

    fn release_at(&mut self, col: u16, row: u16) -> Option<Command> {
        let (c0, r0) = self.press.take()?;
        let dx = (col as f32 - c0 as f32) / CELL_W as f32;
        let dy = row as f32 - r0 as f32;
        classify_swipe(dx, dy, self.threshold).map(Command::Steer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Grid;
    use crate::sim::world::Difficulty;

    fn tracker() -> PointerTracker {
        PointerTracker::new(&InputConfig {
            swipe_threshold: 2.5,
            double_click: Duration::from_millis(300),
        })
    }

    fn layout() -> Layout {
        Layout::new(80, 24, Grid::new(30, 18))
    }

    #[test]
    fn swipe_uses_dominant_axis() {
        assert_eq!(classify_swipe(3.0, 1.0, 2.5), Some(Direction::Right));
        assert_eq!(classify_swipe(-3.0, 2.9, 2.5), Some(Direction::Left));
        assert_eq!(classify_swipe(1.0, -4.0, 2.5), Some(Direction::Up));
        assert_eq!(classify_swipe(0.0, 2.6, 2.5), Some(Direction::Down));
    }

    #[test]
    fn short_drags_are_ignored() {
        assert_eq!(classify_swipe(2.5, 0.0, 2.5), None);
        assert_eq!(classify_swipe(-1.0, 2.0, 2.5), None);
        assert_eq!(classify_swipe(0.0, 0.0, 2.5), None);
    }

    #[test]
    fn drag_across_board_steers() {
        let (mut t, l, now) = (tracker(), layout(), Instant::now());
        assert_eq!(t.handle(PointerEvent::Down { col: 10, row: 8 }, Phase::Playing, &l, now), None);
        // 8 columns = 4 cells to the left
        assert_eq!(
            t.handle(PointerEvent::Up { col: 2, row: 9 }, Phase::Playing, &l, now),
            Some(Command::Steer(Direction::Left))
        );
        // A release without a press does nothing
        assert_eq!(t.handle(PointerEvent::Up { col: 2, row: 2 }, Phase::Playing, &l, now), None);
    }

    #[test]
    fn horizontal_threshold_is_in_cells() {
        let (mut t, l, now) = (tracker(), layout(), Instant::now());
        t.handle(PointerEvent::Down { col: 10, row: 8 }, Phase::Playing, &l, now);
        // 4 columns is only 2 cells
        assert_eq!(t.handle(PointerEvent::Up { col: 14, row: 8 }, Phase::Playing, &l, now), None);
    }

    #[test]
    fn double_click_toggles_pause() {
        let (mut t, l, now) = (tracker(), layout(), Instant::now());
        let down = PointerEvent::Down { col: 20, row: 5 };
        assert_eq!(t.handle(down, Phase::Playing, &l, now), None);
        assert_eq!(
            t.handle(down, Phase::Playing, &l, now + Duration::from_millis(200)),
            Some(Command::TogglePause)
        );
        // The pair is consumed; a third quick click starts a new pair
        assert_eq!(t.handle(down, Phase::Paused, &l, now + Duration::from_millis(250)), None);
    }

    #[test]
    fn slow_clicks_do_not_pause() {
        let (mut t, l, now) = (tracker(), layout(), Instant::now());
        let down = PointerEvent::Down { col: 20, row: 5 };
        t.handle(down, Phase::Playing, &l, now);
        assert_eq!(t.handle(down, Phase::Playing, &l, now + Duration::from_millis(400)), None);
    }

    #[test]
    fn menu_buttons_select_and_start() {
        let (mut t, l, now) = (tracker(), layout(), Instant::now());
        assert_eq!(
            t.handle(PointerEvent::Down { col: 40, row: 14 }, Phase::Menu, &l, now),
            Some(Command::SelectDifficulty(Difficulty::Hard))
        );
        assert_eq!(
            t.handle(PointerEvent::Down { col: 35, row: 17 }, Phase::Menu, &l, now),
            Some(Command::Start)
        );
        assert_eq!(t.handle(PointerEvent::Down { col: 0, row: 0 }, Phase::Menu, &l, now), None);
    }

    #[test]
    fn dpad_buttons_steer() {
        let (mut t, l, now) = (tracker(), layout(), Instant::now());
        let (_, down) = l.dpad[3];
        assert_eq!(
            t.handle(PointerEvent::Down { col: down.col, row: down.row }, Phase::Playing, &l, now),
            Some(Command::Steer(Direction::Down))
        );
    }

    #[test]
    fn clicks_outside_board_are_not_taps() {
        let (mut t, l, now) = (tracker(), layout(), Instant::now());
        let outside = PointerEvent::Down { col: 0, row: 23 };
        assert_eq!(t.handle(outside, Phase::Playing, &l, now), None);
        assert_eq!(t.handle(outside, Phase::Playing, &l, now), None);
    }
}
