/// High score persistence.
///
/// ## File format:
///   Key-value lines. One key is used: `snakeHighScore=<n>`.
///   Unknown keys are ignored; a missing or garbled file reads as 0.
///
/// Stored as `highscore.dat` in the data directory (see `data_dir`).
/// The in-memory value only ever rises; `record` writes the file the
/// moment a higher score arrives.

use std::path::{Path, PathBuf};

const HIGH_SCORE_FILE: &str = "highscore.dat";
const HIGH_SCORE_KEY: &str = "snakeHighScore";

// ══════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════

/// Where persistent files (high score, log) live.
pub fn data_dir() -> PathBuf {
    // 1. Try exe directory (works for local/portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // Check if writable (system installs like /usr/games/ won't be)
            let test_path = parent.join(".write_test_wrapsnake");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home (~/.local/share/wrapsnake) for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/wrapsnake");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. Fallback to CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// ══════════════════════════════════════════════════════════════
// Store
// ══════════════════════════════════════════════════════════════

pub struct HighScoreStore {
    path: PathBuf,
    best: u32,
}

impl HighScoreStore {
    /// Open the store at `path`, reading the current best if present.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = read_best(&path);
        HighScoreStore { path, best }
    }

    pub fn open_default() -> Self {
        Self::open(data_dir().join(HIGH_SCORE_FILE))
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `score` if it beats the stored best.
    /// Returns `Ok(true)` when the file was written.
    pub fn record(&mut self, score: u32) -> Result<bool, String> {
        if score <= self.best {
            return Ok(false);
        }
        self.best = score;
        std::fs::write(&self.path, serialize(score))
            .map_err(|e| format!("Saving high score to {} failed: {}", self.path.display(), e))?;
        Ok(true)
    }
}

fn read_best(path: &Path) -> u32 {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| parse_high_score(&content))
        .unwrap_or(0)
}

// ══════════════════════════════════════════════════════════════
// Serialization
// ══════════════════════════════════════════════════════════════

fn serialize(score: u32) -> String {
    format!("{}={}\n", HIGH_SCORE_KEY, score)
}

fn parse_high_score(content: &str) -> Option<u32> {
    content.lines().find_map(|line| {
        let (key, val) = line.split_once('=')?;
        if key.trim() == HIGH_SCORE_KEY {
            val.trim().parse().ok()
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("wrapsnake_{}_{}.dat", tag, std::process::id()))
    }

    #[test]
    fn parse_finds_key_among_others() {
        assert_eq!(parse_high_score("foo=1\nsnakeHighScore = 42\n"), Some(42));
        assert_eq!(parse_high_score("snakeHighScore=abc"), None);
        assert_eq!(parse_high_score(""), None);
    }

    #[test]
    fn missing_file_reads_zero() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);
        assert_eq!(HighScoreStore::open(&path).best(), 0);
    }

    #[test]
    fn record_only_raises() {
        let path = temp_path("raise");
        let _ = std::fs::remove_file(&path);

        let mut store = HighScoreStore::open(&path);
        assert_eq!(store.record(12), Ok(true));
        assert_eq!(store.record(5), Ok(false));
        assert_eq!(store.record(12), Ok(false));
        assert_eq!(store.best(), 12);

        // Survives a reopen (next session).
        let reopened = HighScoreStore::open(&path);
        assert_eq!(reopened.best(), 12);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn write_failure_is_reported() {
        let dir = std::env::temp_dir().join(format!("wrapsnake_dir_{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        // A directory cannot be overwritten as a file.
        let mut store = HighScoreStore::open(&dir);
        assert!(store.record(3).is_err());
        let _ = std::fs::remove_dir(&dir);
    }
}
