/// Cosmetic effects: particle bursts and rising score popups.
///
/// Driven purely by `GameEvent`s and wall-clock frame time; nothing here
/// feeds back into the game. Positions are in grid cells (fractional),
/// so the renderer maps them through the same layout as the board.

use std::time::Duration;

use crossterm::style::Color;
use rand::Rng;

use crate::domain::grid::Cell;
use crate::sim::event::GameEvent;
use crate::sim::step::{FOOD_SCORE, POWERUP_SCORE};

pub const FOOD_PARTICLES: usize = 15;
pub const POWERUP_PARTICLES: usize = 25;

/// Max particle speed, cells per second.
const PARTICLE_SPEED: f32 = 4.0;
/// Life lost per second (life starts at 1.0).
const PARTICLE_FADE: f32 = 1.5;
const POPUP_RISE: f32 = 2.0;
const POPUP_FADE: f32 = 1.0;

pub const FOOD_COLOR: Color = Color::Rgb { r: 231, g: 76, b: 60 };
pub const POWERUP_COLOR: Color = Color::Rgb { r: 243, g: 156, b: 18 };

#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    vx: f32,
    vy: f32,
    pub life: f32,
    pub color: Color,
}

#[derive(Clone, Debug)]
pub struct Popup {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub life: f32,
    pub color: Color,
}

#[derive(Default)]
pub struct Effects {
    particles: Vec<Particle>,
    popups: Vec<Popup>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_event<R: Rng + ?Sized>(&mut self, ev: &GameEvent, rng: &mut R) {
        match *ev {
            GameEvent::AteFood { cell } => {
                self.burst(cell, FOOD_PARTICLES, FOOD_COLOR, rng);
                self.popup(cell, FOOD_SCORE, FOOD_COLOR);
            }
            GameEvent::AtePowerup { cell } => {
                self.burst(cell, POWERUP_PARTICLES, POWERUP_COLOR, rng);
                self.popup(cell, POWERUP_SCORE, POWERUP_COLOR);
            }
            _ => {}
        }
    }

    fn burst<R: Rng + ?Sized>(&mut self, cell: Cell, count: usize, color: Color, rng: &mut R) {
        let (cx, cy) = (cell.x as f32 + 0.5, cell.y as f32 + 0.5);
        for _ in 0..count {
            self.particles.push(Particle {
                x: cx,
                y: cy,
                vx: rng.random_range(-PARTICLE_SPEED..=PARTICLE_SPEED),
                vy: rng.random_range(-PARTICLE_SPEED..=PARTICLE_SPEED),
                life: 1.0,
                color,
            });
        }
    }

    fn popup(&mut self, cell: Cell, points: u32, color: Color) {
        self.popups.push(Popup {
            text: format!("+{points}"),
            x: cell.x as f32,
            y: cell.y as f32,
            life: 1.0,
            color,
        });
    }

    /// Advance by one frame of `dt`; dead entries are dropped.
    pub fn update(&mut self, dt: Duration) {
        let s = dt.as_secs_f32();
        for p in &mut self.particles {
            p.x += p.vx * s;
            p.y += p.vy * s;
            p.life -= PARTICLE_FADE * s;
        }
        self.particles.retain(|p| p.life > 0.0);

        for p in &mut self.popups {
            p.y -= POPUP_RISE * s;
            p.life -= POPUP_FADE * s;
        }
        self.popups.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.popups.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn popups(&self) -> &[Popup] {
        &self.popups
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty() && self.popups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn food_and_powerup_bursts() {
        let mut fx = Effects::new();
        let mut rng = StdRng::seed_from_u64(3);
        fx.on_event(&GameEvent::AteFood { cell: Cell::new(4, 4) }, &mut rng);
        assert_eq!(fx.particles().len(), FOOD_PARTICLES);
        assert_eq!(fx.popups()[0].text, "+1");

        fx.on_event(&GameEvent::AtePowerup { cell: Cell::new(1, 2) }, &mut rng);
        assert_eq!(fx.particles().len(), FOOD_PARTICLES + POWERUP_PARTICLES);
        assert_eq!(fx.popups()[1].text, "+5");
        assert_eq!(fx.popups()[1].color, POWERUP_COLOR);
    }

    #[test]
    fn other_events_are_ignored() {
        let mut fx = Effects::new();
        let mut rng = StdRng::seed_from_u64(3);
        fx.on_event(&GameEvent::GameOver { score: 9 }, &mut rng);
        fx.on_event(&GameEvent::PowerupSpawned { cell: Cell::new(0, 0) }, &mut rng);
        assert!(fx.is_empty());
    }

    #[test]
    fn popups_rise_and_everything_fades() {
        let mut fx = Effects::new();
        let mut rng = StdRng::seed_from_u64(3);
        fx.on_event(&GameEvent::AteFood { cell: Cell::new(4, 4) }, &mut rng);

        fx.update(Duration::from_millis(100));
        assert!(fx.popups()[0].y < 4.0);
        assert!(fx.particles().iter().all(|p| p.life < 1.0));

        fx.update(Duration::from_secs(2));
        assert!(fx.is_empty());
    }

    #[test]
    fn clear_drops_all() {
        let mut fx = Effects::new();
        fx.on_event(&GameEvent::AteFood { cell: Cell::new(0, 0) }, &mut StdRng::seed_from_u64(1));
        fx.clear();
        assert!(fx.is_empty());
    }
}
