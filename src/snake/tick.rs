//! Snake update step
//!
//! Frames between move ticks only advance cosmetic timers; the body moves
//! exactly one cell per move tick. Direction intent is buffered and takes
//! effect at the next move tick, never mid-tick.

use super::state::*;
use crate::Mode;
use crate::fx::Burst;
use rand::Rng;

/// Input snapshot consumed by one update step
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Direction intent (already de-duplicated by the input adapter)
    pub turn: Option<Dir>,
    /// Pause toggle edge
    pub pause: bool,
}

const FOOD_BURST: Burst = Burst {
    count: 10,
    jitter: 0.1,
    speed: 0.1,
    life: 1.0,
    min_size: 0.2,
    max_size: 0.5,
    color: "#00ff88",
};

const PICKUP_BURST: Burst = Burst {
    count: 12,
    jitter: 0.1,
    speed: 0.1,
    life: 1.0,
    min_size: 0.2,
    max_size: 0.5,
    color: "#ffd700",
};

const REWARD_BURST: Burst = Burst {
    count: 12,
    jitter: 0.2,
    speed: 0.1,
    life: 1.5,
    min_size: 0.2,
    max_size: 0.5,
    color: "#ffd700",
};

const EXPLOSION_BURST: Burst = Burst {
    count: 20,
    jitter: 0.2,
    speed: 0.15,
    life: 1.0,
    min_size: 0.2,
    max_size: 0.5,
    color: "#ff4444",
};

/// Advance the snake simulation by `elapsed_ms` of wall-clock time
pub fn tick(state: &mut SnakeState, input: &TickInput, elapsed_ms: f64) {
    // A pause toggle consumes the whole frame, so toggling twice in
    // succession leaves gameplay state untouched
    if input.pause {
        match state.mode {
            Mode::Running => state.mode = Mode::Paused,
            Mode::Paused => state.mode = Mode::Running,
            _ => {}
        }
        return;
    }
    if !state.mode.is_running() {
        return;
    }

    let frames = crate::frames(elapsed_ms);

    // Buffer direction intent; an exact reversal would walk the head into
    // its own neck, so it is rejected
    if let Some(dir) = input.turn {
        if dir != state.dir.opposite() {
            state.next_dir = dir;
        }
    }

    state.milestones.step(frames);
    if state.combo_timer > 0.0 {
        state.combo_timer -= frames;
        if state.combo_timer <= 0.0 {
            state.combo = 0;
            state.combo_timer = 0.0;
        }
    }
    if let Some(mut active) = state.active {
        active.remaining -= frames;
        state.active = (active.remaining > 0.0).then_some(active);
    }
    state.particles.step(frames);

    // Sub-tick frames re-render but do not advance the body
    state.move_accum += elapsed_ms;
    if state.move_accum < state.effective_tick_ms() {
        return;
    }
    state.move_accum = 0.0;

    advance_body(state);
}

/// One move tick: turn, step with wrap, collide, grow or shed
fn advance_body(state: &mut SnakeState) {
    state.dir = state.next_dir;
    let head = state.body[0];
    let new_head = step_wrapped(head, state.dir, state.grid);

    // Growth is decided first: it determines whether the tail cell is
    // vacated this tick and therefore exempt from self-collision
    let grows = new_head == state.food;

    let len = state.body.len();
    let hit_self = state
        .body
        .iter()
        .enumerate()
        .any(|(i, &c)| c == new_head && (grows || i != len - 1));
    if hit_self && !state.invincible() {
        let at = cell_center(new_head);
        state.particles.spawn(&mut state.rng, at, EXPLOSION_BURST);
        state.finish_run();
        return;
    }

    state.body.push_front(new_head);

    if grows {
        eat_food(state);
        if state.mode == Mode::Over {
            return;
        }
    } else {
        state.body.pop_back();
    }

    // Power-up pickup: exactly one effect active at a time, newest wins
    if let Some(p) = state.power_up {
        if new_head == p.cell {
            state.active = Some(ActiveEffect {
                kind: p.kind,
                remaining: p.kind.duration_frames(),
            });
            let at = cell_center(p.cell);
            state
                .particles
                .spawn(&mut state.rng, at, Burst { color: p.kind.color(), ..PICKUP_BURST });
            state.power_up = None;
        }
    }
}

/// Scoring, regrowth, spawns, cadence and milestone checks after a bite
fn eat_food(state: &mut SnakeState) {
    let gained = if state.multiplier_active() { 2 } else { 1 };
    state.score += gained;
    state.combo += 1;
    state.combo_timer = COMBO_WINDOW_FRAMES;

    let at = cell_center(state.food);
    state.particles.spawn(&mut state.rng, at, FOOD_BURST);

    if !state.spawn_food() {
        // Board completely filled by the body: the run is won, and over
        log::info!("board full at score {}", state.score);
        state.finish_run();
        return;
    }

    if state.power_up.is_none() && state.rng.random_bool(POWER_UP_CHANCE) {
        state.spawn_power_up();
    }

    if state.score.is_multiple_of(SCORE_PER_SPEEDUP) {
        state.tick_ms = (state.tick_ms - TICK_STEP_MS).max(MIN_TICK_MS);
    }

    if state.milestones.check(state.score) {
        let at = cell_center(state.body[0]);
        state.particles.spawn(&mut state.rng, at, REWARD_BURST);
    }
}
