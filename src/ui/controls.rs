/// Keyboard and gamepad bindings, per phase.
///
///   Menu      ↑/W ↓/S cycle difficulty, Enter/Space start, Esc/Q quit
///   Playing   arrows/WASD steer, P/F1 pause, M menu
///   Paused    P/F1 resume, M menu
///   GameOver  Enter/R restart, M menu
///
/// Ctrl+C quits from anywhere; that check lives in the input collector.

use crossterm::event::KeyCode;

use crate::domain::grid::Direction;
use crate::sim::session::Command;
use crate::sim::world::Phase;
use super::gamepad::GamepadState;

pub const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
pub const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
pub const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
pub const KEYS_RESTART: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char('r'), KeyCode::Char('R')];
pub const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P'), KeyCode::F(1)];
pub const KEYS_MENU: &[KeyCode] = &[KeyCode::Char('m'), KeyCode::Char('M')];
pub const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

fn key_direction(code: KeyCode) -> Option<Direction> {
    if KEYS_UP.contains(&code) {
        Some(Direction::Up)
    } else if KEYS_DOWN.contains(&code) {
        Some(Direction::Down)
    } else if KEYS_LEFT.contains(&code) {
        Some(Direction::Left)
    } else if KEYS_RIGHT.contains(&code) {
        Some(Direction::Right)
    } else {
        None
    }
}

/// Command for one key press in `phase`; unbound keys give `None`.
pub fn key_command(phase: Phase, code: KeyCode) -> Option<Command> {
    match phase {
        Phase::Menu => {
            if KEYS_UP.contains(&code) {
                Some(Command::CycleDifficulty(-1))
            } else if KEYS_DOWN.contains(&code) {
                Some(Command::CycleDifficulty(1))
            } else if KEYS_CONFIRM.contains(&code) {
                Some(Command::Start)
            } else {
                None
            }
        }
        Phase::Playing | Phase::Paused => {
            if KEYS_PAUSE.contains(&code) {
                Some(Command::TogglePause)
            } else if KEYS_MENU.contains(&code) {
                Some(Command::ReturnToMenu)
            } else if phase == Phase::Playing {
                key_direction(code).map(Command::Steer)
            } else {
                None
            }
        }
        Phase::GameOver => {
            if KEYS_RESTART.contains(&code) {
                Some(Command::Restart)
            } else if KEYS_MENU.contains(&code) {
                Some(Command::ReturnToMenu)
            } else {
                None
            }
        }
    }
}

/// Quit is only offered from the menu so a stray Esc never ends a run.
pub fn quits(phase: Phase, code: KeyCode) -> bool {
    phase == Phase::Menu && KEYS_QUIT.contains(&code)
}

/// Commands from this frame's gamepad edges.
pub fn gamepad_commands(phase: Phase, pad: &GamepadState) -> Vec<Command> {
    let mut cmds = Vec::new();
    let dir = pad.direction_pressed();
    match phase {
        Phase::Menu => {
            match dir {
                Some(Direction::Up) => cmds.push(Command::CycleDifficulty(-1)),
                Some(Direction::Down) => cmds.push(Command::CycleDifficulty(1)),
                _ => {}
            }
            if pad.confirm_pressed() {
                cmds.push(Command::Start);
            }
        }
        Phase::Playing | Phase::Paused => {
            if let Some(d) = dir {
                cmds.push(Command::Steer(d));
            }
            if pad.pause_pressed() {
                cmds.push(Command::TogglePause);
            }
            if pad.menu_pressed() {
                cmds.push(Command::ReturnToMenu);
            }
        }
        Phase::GameOver => {
            if pad.confirm_pressed() {
                cmds.push(Command::Restart);
            }
            if pad.menu_pressed() {
                cmds.push(Command::ReturnToMenu);
            }
        }
    }
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_keys() {
        assert_eq!(key_command(Phase::Menu, KeyCode::Up), Some(Command::CycleDifficulty(-1)));
        assert_eq!(key_command(Phase::Menu, KeyCode::Char('s')), Some(Command::CycleDifficulty(1)));
        assert_eq!(key_command(Phase::Menu, KeyCode::Enter), Some(Command::Start));
        assert_eq!(key_command(Phase::Menu, KeyCode::Char(' ')), Some(Command::Start));
        assert_eq!(key_command(Phase::Menu, KeyCode::Char('x')), None);
    }

    #[test]
    fn playing_keys_steer() {
        assert_eq!(key_command(Phase::Playing, KeyCode::Char('a')), Some(Command::Steer(Direction::Left)));
        assert_eq!(key_command(Phase::Playing, KeyCode::Down), Some(Command::Steer(Direction::Down)));
        assert_eq!(key_command(Phase::Playing, KeyCode::Char('P')), Some(Command::TogglePause));
        assert_eq!(key_command(Phase::Playing, KeyCode::Char('m')), Some(Command::ReturnToMenu));
        assert_eq!(key_command(Phase::Playing, KeyCode::Enter), None);
    }

    #[test]
    fn paused_ignores_steering() {
        assert_eq!(key_command(Phase::Paused, KeyCode::Left), None);
        assert_eq!(key_command(Phase::Paused, KeyCode::F(1)), Some(Command::TogglePause));
    }

    #[test]
    fn game_over_keys() {
        assert_eq!(key_command(Phase::GameOver, KeyCode::Enter), Some(Command::Restart));
        assert_eq!(key_command(Phase::GameOver, KeyCode::Char('r')), Some(Command::Restart));
        assert_eq!(key_command(Phase::GameOver, KeyCode::Char('M')), Some(Command::ReturnToMenu));
        assert_eq!(key_command(Phase::GameOver, KeyCode::Up), None);
    }

    #[test]
    fn quit_only_from_menu() {
        assert!(quits(Phase::Menu, KeyCode::Esc));
        assert!(quits(Phase::Menu, KeyCode::Char('q')));
        assert!(!quits(Phase::Playing, KeyCode::Esc));
        assert!(!quits(Phase::GameOver, KeyCode::Char('q')));
    }

    #[test]
    fn idle_gamepad_gives_nothing() {
        let pad = GamepadState::new();
        for phase in [Phase::Menu, Phase::Playing, Phase::Paused, Phase::GameOver] {
            assert!(gamepad_commands(phase, &pad).is_empty());
        }
    }
}
