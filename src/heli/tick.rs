//! Helicopter update step
//!
//! Pure function of (state, input, elapsed frames) -> next state. Ordering
//! within a step: physics, world scroll, scoring, obstacle recycling,
//! cosmetic timers, then collision. A terminal collision transitions the
//! mode to `Over` in the same step and persists the best score.

use glam::Vec2;

use super::state::*;
use crate::fx::Burst;

/// Input snapshot consumed by one update step
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Thrust held (pointer/touch pressed or Space/ArrowUp down)
    pub thrust: bool,
}

const EXHAUST_BURST: Burst = Burst {
    count: 3,
    jitter: 5.0,
    speed: 2.0,
    life: 1.0,
    min_size: 1.0,
    max_size: 4.0,
    color: "#ff6b35",
};

const SCORE_BURST: Burst = Burst {
    count: 3,
    jitter: 5.0,
    speed: 2.0,
    life: 1.0,
    min_size: 1.0,
    max_size: 4.0,
    color: "#00ff88",
};

const REWARD_BURST: Burst = Burst {
    count: 8,
    jitter: 10.0,
    speed: 3.0,
    life: 1.5,
    min_size: 2.0,
    max_size: 6.0,
    color: "#ffd700",
};

const EXPLOSION_BURST: Burst = Burst {
    count: 60,
    jitter: 5.0,
    speed: 2.0,
    life: 1.0,
    min_size: 1.0,
    max_size: 4.0,
    color: "#ff4444",
};

/// Advance the helicopter simulation by `frames` reference frames
pub fn tick(state: &mut HeliState, input: &TickInput, frames: f32) {
    if !state.mode.is_running() {
        return;
    }

    // Exhaust puff on the rising edge of thrust only; holding the key
    // does not re-trigger
    if input.thrust && !state.thrusting {
        let at = state.copter.pos() + Vec2::new(-COPTER_RADIUS, 5.0);
        state.particles.spawn(&mut state.rng, at, EXHAUST_BURST);
    }
    state.thrusting = input.thrust;

    // Thrust and gravity are both accelerations, so momentum carries
    // through input toggles
    let c = &mut state.copter;
    if input.thrust {
        c.vel = (c.vel + THRUST * frames).max(-MAX_VELOCITY);
    } else {
        c.vel = (c.vel + GRAVITY * frames).min(MAX_VELOCITY);
    }
    c.y += c.vel * frames;

    // The copter's x is fixed; the world scrolls past it
    let scroll = BASE_SCROLL_SPEED * state.difficulty * frames;
    state.camera_x += scroll;
    for ob in &mut state.obstacles {
        ob.x -= scroll;
    }

    // Score the first step a column's trailing edge clears the copter
    let mut scored = false;
    for ob in &mut state.obstacles {
        if !ob.passed && ob.x + OBSTACLE_WIDTH < COPTER_X {
            ob.passed = true;
            state.score += 1;
            scored = true;
        }
    }
    if scored {
        let at = state.copter.pos();
        state.particles.spawn(&mut state.rng, at, SCORE_BURST);
        if state.milestones.check(state.score) {
            let at = state.copter.pos() + Vec2::new(0.0, -30.0);
            state.particles.spawn(&mut state.rng, at, REWARD_BURST);
        }
        bump_difficulty(state);
    }

    // Recycle: discard fully off-screen columns, refill past the rightmost
    // so the window size is invariant
    state.obstacles.retain(|ob| ob.x > -OBSTACLE_WIDTH);
    while state.obstacles.len() < ON_SCREEN_OBSTACLES {
        let x = state
            .obstacles
            .last()
            .map_or(FIRST_OBSTACLE_X, |ob| ob.x + OBSTACLE_SPACING);
        state.spawn_obstacle(x);
    }

    state.particles.step(frames);
    state.milestones.step(frames);

    let rotor_speed = if input.thrust { 0.8 } else { 0.4 };
    state.rotor_angle += rotor_speed * frames;
    state.tail_rotor_angle += 1.2 * frames;

    if collided(state) {
        let at = state.copter.pos();
        state.particles.spawn(&mut state.rng, at, EXPLOSION_BURST);
        state.finish_run();
    }
}

/// Screen bounds or any column whose horizontal span overlaps the copter's
fn collided(state: &HeliState) -> bool {
    let c = &state.copter;
    if c.y - COPTER_RADIUS <= 0.0 || c.y + COPTER_RADIUS >= state.field_h {
        return true;
    }
    state.obstacles.iter().any(|ob| {
        let in_x = COPTER_X + COPTER_RADIUS > ob.x
            && COPTER_X - COPTER_RADIUS < ob.x + OBSTACLE_WIDTH;
        in_x && (c.y - COPTER_RADIUS < ob.top_height || c.y + COPTER_RADIUS > ob.bottom_y)
    })
}

/// Raise difficulty the first time the score reaches each new multiple of
/// [`SCORE_PER_DIFFICULTY`], capped
fn bump_difficulty(state: &mut HeliState) {
    if state.score > 0
        && state.score.is_multiple_of(SCORE_PER_DIFFICULTY)
        && state.score > state.last_difficulty_score
        && state.difficulty < MAX_DIFFICULTY
    {
        state.difficulty = (state.difficulty + DIFFICULTY_STEP).min(MAX_DIFFICULTY);
        state.last_difficulty_score = state.score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mode;
    use crate::storage::{MemoryScoreStore, ScoreStore};

    const NO_THRUST: TickInput = TickInput { thrust: false };
    const THRUST_ON: TickInput = TickInput { thrust: true };

    fn game() -> HeliState {
        let mut g = HeliState::new(Box::new(MemoryScoreStore::new()), 400.0, 200.0, 123);
        g.start();
        g
    }

    /// Replace the generated field with a single known column
    fn with_one_obstacle(g: &mut HeliState, ob: Obstacle) {
        g.obstacles.clear();
        g.obstacles.push(ob);
    }

    #[test]
    fn obstacle_pass_scores_exactly_once() {
        let mut g = game();
        with_one_obstacle(
            &mut g,
            Obstacle { x: 0.0, top_height: 40.0, bottom_y: 160.0, passed: false },
        );
        g.copter.y = 100.0;
        g.copter.vel = 0.0;

        tick(&mut g, &NO_THRUST, 1.0);
        assert_eq!(g.score, 1);
        assert!(g.obstacles[0].passed);
        assert_eq!(g.mode, Mode::Running);

        // Re-evaluating an already-passed column must never score again
        tick(&mut g, &NO_THRUST, 1.0);
        tick(&mut g, &NO_THRUST, 1.0);
        assert_eq!(g.score, 1);
    }

    #[test]
    fn thrust_is_an_acceleration_not_a_velocity_override() {
        let mut g = game();
        g.copter.vel = 5.0;
        tick(&mut g, &THRUST_ON, 1.0);
        // Falling momentum carries: 5.0 - 0.8, not an instant reversal
        assert!((g.copter.vel - 4.2).abs() < 1e-5);
    }

    #[test]
    fn velocity_clamps_in_both_directions() {
        let mut g = game();
        g.copter.vel = -MAX_VELOCITY + 0.1;
        tick(&mut g, &THRUST_ON, 1.0);
        assert_eq!(g.copter.vel, -MAX_VELOCITY);

        let mut g = game();
        g.copter.vel = MAX_VELOCITY - 0.1;
        tick(&mut g, &NO_THRUST, 1.0);
        assert_eq!(g.copter.vel, MAX_VELOCITY);
    }

    #[test]
    fn elapsed_time_scales_integration() {
        let mut slow = game();
        let mut fast = game();
        slow.copter.vel = 0.0;
        fast.copter.vel = 0.0;
        // Two 1-frame updates vs one 2-frame update move the world equally
        tick(&mut slow, &NO_THRUST, 1.0);
        tick(&mut slow, &NO_THRUST, 1.0);
        tick(&mut fast, &NO_THRUST, 2.0);
        assert!((slow.camera_x - fast.camera_x).abs() < 1e-4);
    }

    #[test]
    fn floor_collision_ends_the_run_and_persists_best() {
        let store = MemoryScoreStore::new();
        let mut g = HeliState::new(Box::new(store.clone()), 400.0, 200.0, 5);
        g.start();
        g.score = 3;
        g.copter.y = g.field_h - 10.0;
        g.copter.vel = 0.0;
        // No thrust: gravity drives y + radius past the floor this step
        tick(&mut g, &NO_THRUST, 1.0);
        assert_eq!(g.mode, Mode::Over);
        assert_eq!(store.get(), Some(3));
        assert_eq!(g.best_score, 3);
        // Explosion burst is visible
        assert!(!g.particles.is_empty());
    }

    #[test]
    fn ceiling_collision_ends_the_run() {
        let mut g = game();
        g.copter.y = COPTER_RADIUS + 0.5;
        g.copter.vel = -MAX_VELOCITY;
        tick(&mut g, &THRUST_ON, 1.0);
        assert_eq!(g.mode, Mode::Over);
    }

    #[test]
    fn lower_final_score_leaves_stored_best_alone() {
        let store = MemoryScoreStore::with_score(10);
        let mut g = HeliState::new(Box::new(store.clone()), 400.0, 200.0, 5);
        g.start();
        g.score = 4;
        g.copter.y = g.field_h - 5.0;
        tick(&mut g, &NO_THRUST, 1.0);
        assert_eq!(g.mode, Mode::Over);
        assert_eq!(store.get(), Some(10));
        assert_eq!(g.best_score, 10);
    }

    #[test]
    fn solid_region_collision_ends_the_run() {
        let mut g = game();
        // Column overlapping the copter's x, copter inside the top wall
        with_one_obstacle(
            &mut g,
            Obstacle { x: 30.0, top_height: 120.0, bottom_y: 320.0, passed: false },
        );
        g.copter.y = 100.0;
        g.copter.vel = 0.0;
        tick(&mut g, &NO_THRUST, 1.0);
        assert_eq!(g.mode, Mode::Over);
    }

    #[test]
    fn gap_flight_is_safe() {
        let mut g = game();
        with_one_obstacle(
            &mut g,
            Obstacle { x: 30.0, top_height: 40.0, bottom_y: 160.0, passed: false },
        );
        g.copter.y = 100.0;
        g.copter.vel = 0.0;
        tick(&mut g, &NO_THRUST, 1.0);
        assert_eq!(g.mode, Mode::Running);
    }

    #[test]
    fn obstacle_window_is_invariant_while_hovering() {
        let mut g = HeliState::new(Box::new(MemoryScoreStore::new()), 800.0, 400.0, 9);
        g.start();
        let mid = g.field_h / 2.0;
        let mut prev_score = 0;
        for _ in 0..2000 {
            // Bang-bang hover keeps the copter mid-field, inside every gap
            let input = TickInput { thrust: g.copter.y > mid };
            tick(&mut g, &input, 1.0);
            assert_eq!(g.mode, Mode::Running);
            assert_eq!(g.obstacles.len(), ON_SCREEN_OBSTACLES);
            assert!(g.score >= prev_score);
            prev_score = g.score;
        }
        assert!(g.score > 0);
    }

    #[test]
    fn difficulty_steps_at_score_multiples_once_each() {
        let mut g = game();
        g.score = 4;
        // A column whose trailing edge clears the copter on the next step
        with_one_obstacle(
            &mut g,
            Obstacle { x: -0.5, top_height: 40.0, bottom_y: 160.0, passed: false },
        );
        g.copter.y = 100.0;
        g.copter.vel = 0.0;
        tick(&mut g, &NO_THRUST, 1.0);
        assert_eq!(g.score, 5);
        assert!((g.difficulty - 1.1).abs() < 1e-5);
        // Further steps at the same score do not bump again
        tick(&mut g, &NO_THRUST, 1.0);
        assert!((g.difficulty - 1.1).abs() < 1e-5);
    }

    #[test]
    fn milestone_fires_at_threshold_score() {
        let mut g = game();
        g.score = 4;
        with_one_obstacle(
            &mut g,
            Obstacle { x: -0.5, top_height: 40.0, bottom_y: 160.0, passed: false },
        );
        g.copter.y = 100.0;
        g.copter.vel = 0.0;
        tick(&mut g, &NO_THRUST, 1.0);
        assert_eq!(g.score, 5);
        assert!(g.milestones.current().is_some());
        assert_eq!(g.milestones.shown(), &[5]);
    }

    #[test]
    fn rotor_spins_faster_under_thrust() {
        let mut coasting = game();
        let mut thrusting = game();
        tick(&mut coasting, &NO_THRUST, 1.0);
        tick(&mut thrusting, &THRUST_ON, 1.0);
        assert!(thrusting.rotor_angle > coasting.rotor_angle);
    }

    #[test]
    fn thrust_edge_emits_exhaust_once() {
        let mut g = game();
        tick(&mut g, &THRUST_ON, 1.0);
        let after_press = g.particles.len();
        assert!(after_press > 0);
        // Held thrust on the next step adds no new burst (decay only)
        tick(&mut g, &THRUST_ON, 1.0);
        assert!(g.particles.len() <= after_press);
    }

    #[test]
    fn update_is_a_no_op_outside_running() {
        let mut g = HeliState::new(Box::new(MemoryScoreStore::new()), 400.0, 200.0, 7);
        let y = g.copter.y;
        tick(&mut g, &THRUST_ON, 1.0);
        assert_eq!(g.mode, Mode::Idle);
        assert_eq!(g.copter.y, y);

        g.start();
        g.finish_run();
        let y = g.copter.y;
        tick(&mut g, &THRUST_ON, 1.0);
        assert_eq!(g.copter.y, y);
    }
}
