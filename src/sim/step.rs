/// The step function: advances the game by one tick.
///
/// Processing order:
///   1. Advance head one cell in the current direction (wrapping)
///   2. Food pickup  → +1 score, grow by 1, respawn food
///   3. Powerup pickup → +5 score, grow by 3
///   4. Otherwise trim the tail
///   5. Self-collision → GameOver
///   6. Powerup spawn roll (only if none on the board)
///   7. Powerup expiry
///
/// Food is tested before the powerup. The placement rules keep the two
/// on different cells, so at most one pickup happens per tick.

use std::time::Instant;

use rand::Rng;

use crate::domain::entity::Powerup;
use crate::domain::grid::Cell;
use super::event::GameEvent;
use super::world::{GameState, Phase};

pub const FOOD_SCORE: u32 = 1;
pub const POWERUP_SCORE: u32 = 5;
/// Extra segments on top of the untrimmed tail.
pub const POWERUP_EXTRA_SEGMENTS: usize = 2;

/// Per-tick input. Turns are applied between ticks through
/// `GameState::request_turn`; the tick itself only needs the clock.
#[derive(Clone, Copy, Debug)]
pub struct TickInput {
    pub now: Instant,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step<R: Rng + ?Sized>(state: &mut GameState, input: TickInput, rng: &mut R) -> Vec<GameEvent> {
    if state.phase != Phase::Playing { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    state.tick += 1;
    state.turned_this_tick = false;

    let head = advance_head(state);
    if !resolve_food(state, head, rng, &mut events)
        && !resolve_powerup_pickup(state, head, &mut events)
    {
        state.snake.trim_tail();
    }
    resolve_food_refill(state, rng);
    resolve_collision(state, &mut events);
    resolve_powerup_spawn(state, input.now, rng, &mut events);
    resolve_powerup_expiry(state, input.now, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn advance_head(state: &mut GameState) -> Cell {
    let head = state.grid().advance(state.snake.head(), state.direction);
    state.snake.push_head(head);
    head
}

// ══════════════════════════════════════════════════════════════
// Pickups
// ══════════════════════════════════════════════════════════════

fn resolve_food<R: Rng + ?Sized>(
    state: &mut GameState,
    head: Cell,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> bool {
    if state.food != Some(head) { return false; }
    debug_assert!(
        state.powerup.map_or(true, |p| p.cell != head),
        "food and powerup share a cell",
    );

    if state.add_score(FOOD_SCORE) {
        events.push(GameEvent::NewHighScore { score: state.high_score });
    }
    state.place_food(rng);
    events.push(GameEvent::AteFood { cell: head });
    true
}

/// Food that found no free cell is retried every tick until the snake or
/// an expiring powerup opens one up.
fn resolve_food_refill<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    if state.food.is_none() {
        state.place_food(rng);
    }
}

fn resolve_powerup_pickup(
    state: &mut GameState,
    head: Cell,
    events: &mut Vec<GameEvent>,
) -> bool {
    match state.powerup {
        Some(p) if p.cell == head => {}
        _ => return false,
    }

    if state.add_score(POWERUP_SCORE) {
        events.push(GameEvent::NewHighScore { score: state.high_score });
    }
    state.snake.extend_tail(POWERUP_EXTRA_SEGMENTS);
    state.powerup = None;
    events.push(GameEvent::AtePowerup { cell: head });
    true
}

// ══════════════════════════════════════════════════════════════
// Collision
// ══════════════════════════════════════════════════════════════

/// Must run after the tail is trimmed. The cell the tail leaves this
/// tick is free, so chasing your own tail into it is legal and not a
/// collision. Checking before the trim would end games on that move.
fn resolve_collision(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.snake.body_hit(state.snake.head()) {
        state.phase = Phase::GameOver;
        events.push(GameEvent::GameOver { score: state.score });
    }
}

// ══════════════════════════════════════════════════════════════
// Powerup lifecycle
// ══════════════════════════════════════════════════════════════

fn resolve_powerup_spawn<R: Rng + ?Sized>(
    state: &mut GameState,
    now: Instant,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    if state.powerup.is_some() { return; }
    let chance = state.rules.powerup_chance.clamp(0.0, 1.0);
    if !rng.random_bool(chance) { return; }

    if let Some(cell) = state.powerup_cell(rng) {
        state.powerup = Some(Powerup::new(cell, now));
        events.push(GameEvent::PowerupSpawned { cell });
    }
}

fn resolve_powerup_expiry(state: &mut GameState, now: Instant, events: &mut Vec<GameEvent>) {
    let lifetime = state.rules.powerup_lifetime;
    if let Some(p) = state.powerup {
        if p.expired(now, lifetime) {
            state.powerup = None;
            events.push(GameEvent::PowerupExpired { cell: p.cell });
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
