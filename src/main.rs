/// Entry point and game loop.

mod config;
mod domain;
mod logger;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use rand::Rng;

use config::GameConfig;
use sim::event::GameEvent;
use sim::save::{self, HighScoreStore};
use sim::session::{Command, Session};
use sim::world::Phase;
use ui::controls;
use ui::effects::Effects;
use ui::gamepad::GamepadState;
use ui::gesture::PointerTracker;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const NOTICE_TIME: Duration = Duration::from_secs(3);
/// Blink and pulse animations advance once per this many milliseconds.
const ANIM_STEP_MS: u128 = 50;

fn main() {
    let config = GameConfig::load();

    if config.log_file {
        let path = save::data_dir().join("wrapsnake.log");
        if let Err(e) = logger::init_logger(Some(&path)) {
            eprintln!("Warning: {e}");
        }
    }
    log!(
        "start: board {}x{}, difficulty {}",
        config.rules.grid.width,
        config.rules.grid.height,
        config.difficulty.label()
    );

    let mut store = HighScoreStore::open_default();
    log!("high score {} from {}", store.best(), store.path().display());

    let mut session = Session::new(config.rules.clone(), store.best(), config.difficulty);
    let mut renderer = Renderer::new(config.rules.grid);

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    if sound.is_none() {
        log!("no audio output; sound disabled");
    }

    let result = game_loop(&mut session, &mut store, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log!("game error: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Wrap Snake!");
    println!("High Score: {}", session.state.high_score);
}

/// Frame-local state the loop threads through its helpers.
struct Frame<'a> {
    sound: Option<&'a SoundEngine>,
    effects: Effects,
    notice: Option<(String, Instant)>,
}

fn game_loop(
    session: &mut Session,
    store: &mut HighScoreStore,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut pointer = PointerTracker::new(&config.input);
    let mut rng = rand::rng();
    let mut frame = Frame { sound, effects: Effects::new(), notice: None };

    let started = Instant::now();
    let mut last_frame = started;

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        let now = Instant::now();

        // Commands are applied one at a time so a key that changes the
        // phase is seen by the next key in the same frame.
        for &code in kb.presses() {
            let phase = session.phase();
            if controls::quits(phase, code) {
                return Ok(());
            }
            if let Some(cmd) = controls::key_command(phase, code) {
                run_command(session, cmd, now, &mut rng, &mut frame);
            }
        }
        for &ev in &kb.pointer {
            if let Some(cmd) = pointer.handle(ev, session.phase(), renderer.layout(), now) {
                run_command(session, cmd, now, &mut rng, &mut frame);
            }
        }
        for cmd in controls::gamepad_commands(session.phase(), &gp) {
            run_command(session, cmd, now, &mut rng, &mut frame);
        }

        for ev in session.poll(now, &mut rng) {
            handle_event(&ev, session, store, &mut rng, &mut frame, now);
        }

        if !frame.effects.is_empty() {
            frame.effects.update(now.saturating_duration_since(last_frame));
        }
        last_frame = now;
        if matches!(frame.notice, Some((_, until)) if until <= now) {
            frame.notice = None;
        }

        let anim = (now.duration_since(started).as_millis() / ANIM_STEP_MS) as u64;
        let notice = frame.notice.as_ref().map(|(m, _)| m.as_str());
        renderer.render(session, &frame.effects, notice, now, anim)?;

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn run_command<R: Rng + ?Sized>(session: &mut Session, cmd: Command, now: Instant, rng: &mut R, frame: &mut Frame) {
    let before = session.phase();
    if !session.apply(cmd, now, rng) {
        return;
    }
    let after = session.phase();
    if before != after {
        log!("{:?} -> {:?} ({:?})", before, after, cmd);
    }
    if matches!(cmd, Command::Start | Command::Restart) {
        frame.effects.clear();
        log!("new game on {}", session.state.difficulty.label());
    }
}

fn handle_event<R: Rng + ?Sized>(
    ev: &GameEvent,
    session: &Session,
    store: &mut HighScoreStore,
    rng: &mut R,
    frame: &mut Frame,
    now: Instant,
) {
    frame.effects.on_event(ev, rng);
    match *ev {
        GameEvent::AteFood { .. } => {
            if let Some(s) = frame.sound { s.play_eat(); }
        }
        GameEvent::AtePowerup { cell } => {
            if let Some(s) = frame.sound { s.play_powerup(); }
            log!("powerup taken at ({}, {})", cell.x, cell.y);
        }
        GameEvent::PowerupSpawned { cell } => {
            log!("powerup spawned at ({}, {})", cell.x, cell.y);
        }
        GameEvent::PowerupExpired { cell } => {
            log!("powerup expired at ({}, {})", cell.x, cell.y);
        }
        GameEvent::NewHighScore { score } => {
            if let Err(e) = store.record(score) {
                log!("{e}");
                frame.notice = Some((e, now + NOTICE_TIME));
            }
        }
        GameEvent::GameOver { score } => {
            if let Some(s) = frame.sound { s.play_game_over(); }
            let state = &session.state;
            if state.is_new_high_score() {
                log!("game over: score {score}, new high score (was {})", state.high_score_at_start);
            } else {
                log!("game over: score {score}, high score {}", state.high_score);
            }
            debug_assert_eq!(session.phase(), Phase::GameOver);
        }
    }
}
