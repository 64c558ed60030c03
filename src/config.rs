/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::grid::Grid;
use crate::sim::world::{Difficulty, Rules};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub rules: Rules,
    pub difficulty: Difficulty,
    pub input: InputConfig,
    pub gamepad: GamepadConfig,
    pub log_file: bool,
}

#[derive(Clone, Debug)]
pub struct InputConfig {
    /// Minimum drag distance, in board cells, that counts as a swipe.
    pub swipe_threshold: f32,
    pub double_click: Duration,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub pause: Vec<String>,
    pub menu: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    powerup: TomlPowerup,
    #[serde(default)]
    input: TomlInput,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default = "default_width")]
    width: i32,
    #[serde(default = "default_height")]
    height: i32,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_easy")]
    easy_ms: u64,
    #[serde(default = "default_medium")]
    medium_ms: u64,
    #[serde(default = "default_hard")]
    hard_ms: u64,
    #[serde(default = "default_difficulty")]
    default_difficulty: String,
}

#[derive(Deserialize, Debug)]
struct TomlPowerup {
    #[serde(default = "default_spawn_chance")]
    spawn_chance: f64,
    #[serde(default = "default_lifetime")]
    lifetime_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlInput {
    #[serde(default = "default_swipe_threshold")]
    swipe_threshold: f32,
    #[serde(default = "default_double_click")]
    double_click_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default = "default_menu")]
    menu: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_log_file")]
    log_file: bool,
}

// ── Defaults ──

fn default_width() -> i32 { 30 }
fn default_height() -> i32 { 18 }
fn default_easy() -> u64 { 150 }
fn default_medium() -> u64 { 100 }
fn default_hard() -> u64 { 70 }
fn default_difficulty() -> String { "medium".into() }
fn default_spawn_chance() -> f64 { 0.01 }
fn default_lifetime() -> u64 { 10_000 }
fn default_swipe_threshold() -> f32 { 2.5 } // 50px at 20px per cell
fn default_double_click() -> u64 { 300 }
fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_pause() -> Vec<String> { vec!["Select".into()] }
fn default_menu() -> Vec<String> { vec!["B".into()] }
fn default_log_file() -> bool { true }

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard { width: default_width(), height: default_height() }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            easy_ms: default_easy(),
            medium_ms: default_medium(),
            hard_ms: default_hard(),
            default_difficulty: default_difficulty(),
        }
    }
}

impl Default for TomlPowerup {
    fn default() -> Self {
        TomlPowerup { spawn_chance: default_spawn_chance(), lifetime_ms: default_lifetime() }
    }
}

impl Default for TomlInput {
    fn default() -> Self {
        TomlInput {
            swipe_threshold: default_swipe_threshold(),
            double_click_ms: default_double_click(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            pause: default_pause(),
            menu: default_menu(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { log_file: default_log_file() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        Self::from_toml(load_toml(&search_dirs))
    }

    /// Parse config text directly. Errors carry the TOML diagnostic.
    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str::<TomlConfig>(text)
            .map(Self::from_toml)
            .map_err(|e| e.to_string())
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let difficulty = Difficulty::from_name(&cfg.speed.default_difficulty).unwrap_or_else(|| {
            // Config loads before the logger is up, so warn on stderr too.
            eprintln!("Warning: unknown default_difficulty {:?}, using Medium", cfg.speed.default_difficulty);
            crate::log!("unknown default_difficulty {:?}, using Medium", cfg.speed.default_difficulty);
            Difficulty::Medium
        });

        GameConfig {
            rules: Rules {
                grid: Grid::new(cfg.board.width.clamp(4, 200), cfg.board.height.clamp(2, 100)),
                easy_period: period(cfg.speed.easy_ms),
                medium_period: period(cfg.speed.medium_ms),
                hard_period: period(cfg.speed.hard_ms),
                powerup_chance: cfg.powerup.spawn_chance.clamp(0.0, 1.0),
                powerup_lifetime: Duration::from_millis(cfg.powerup.lifetime_ms),
            },
            difficulty,
            input: InputConfig {
                swipe_threshold: cfg.input.swipe_threshold.max(0.5),
                double_click: Duration::from_millis(cfg.input.double_click_ms),
            },
            gamepad: GamepadConfig {
                confirm: cfg.gamepad.confirm,
                pause: cfg.gamepad.pause,
                menu: cfg.gamepad.menu,
            },
            log_file: cfg.general.log_file,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}

/// Tick periods below 10ms are unplayable in a terminal.
fn period(ms: u64) -> Duration {
    Duration::from_millis(ms.max(10))
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/wrapsnake)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/wrapsnake");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/wrapsnake");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        crate::log!("config.toml parse error: {e}");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
