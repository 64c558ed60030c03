/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound, effects and persistence.

use crate::domain::grid::Cell;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    AteFood { cell: Cell },
    AtePowerup { cell: Cell },
    PowerupSpawned { cell: Cell },
    PowerupExpired { cell: Cell },
    NewHighScore { score: u32 },
    GameOver { score: u32 },
}
