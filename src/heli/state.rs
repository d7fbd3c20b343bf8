//! Helicopter game state
//!
//! One `HeliState` is the authoritative record for a run: copter physics,
//! the rolling obstacle window, particles, difficulty, and the milestone
//! tracker. It is recreated by `start()` on every play command and mutated
//! only by the update step.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Mode;
use crate::fx::Particles;
use crate::milestones::{Milestone, MilestoneTracker};
use crate::storage::ScoreStore;

/// Downward acceleration per reference frame
pub const GRAVITY: f32 = 0.3;
/// Upward acceleration per reference frame while thrust is held
pub const THRUST: f32 = -0.8;
/// Velocity clamp, both directions
pub const MAX_VELOCITY: f32 = 8.0;
/// Column width in pixels
pub const OBSTACLE_WIDTH: f32 = 50.0;
/// Gap height at difficulty 1.0
pub const OBSTACLE_GAP: f32 = 200.0;
/// Gap never shrinks below this
pub const MIN_OBSTACLE_GAP: f32 = 120.0;
/// Gap top/bottom keep this distance from the field edges
pub const GAP_MARGIN: f32 = 40.0;
/// World scroll per reference frame at difficulty 1.0
pub const BASE_SCROLL_SPEED: f32 = 1.5;
/// Horizontal pitch between consecutive columns
pub const OBSTACLE_SPACING: f32 = 300.0;
/// Where the first column of a fresh run spawns
pub const FIRST_OBSTACLE_X: f32 = 400.0;
/// Columns kept alive at all times
pub const ON_SCREEN_OBSTACLES: usize = 5;
/// The copter's fixed screen x
pub const COPTER_X: f32 = 50.0;
pub const COPTER_RADIUS: f32 = 15.0;
/// Difficulty gained each time the score reaches a new multiple of
/// [`SCORE_PER_DIFFICULTY`]
pub const DIFFICULTY_STEP: f32 = 0.1;
pub const MAX_DIFFICULTY: f32 = 3.0;
pub const SCORE_PER_DIFFICULTY: u32 = 5;

/// Milestone messages, ascending by threshold
pub const HELI_MILESTONES: &[Milestone] = &[
    Milestone { score: 5, message: "Rotors warmed up. Keep climbing!" },
    Milestone { score: 10, message: "Ten gates down, steady hands" },
    Milestone { score: 15, message: "The gaps start tightening around here..." },
    Milestone { score: 20, message: "Twenty! You fly like you mean it" },
    Milestone { score: 25, message: "Quarter century of near misses" },
    Milestone { score: 30, message: "Air traffic control is impressed" },
    Milestone { score: 35, message: "Momentum is your friend, gravity is not" },
    Milestone { score: 40, message: "Forty gates and still in one piece" },
    Milestone { score: 45, message: "Smooth is fast, fast is smooth" },
    Milestone { score: 50, message: "Halfway to legend status" },
    Milestone { score: 60, message: "The canyon narrows for aces only" },
    Milestone { score: 70, message: "Seventy! Are you even blinking?" },
    Milestone { score: 80, message: "Certified canyon runner" },
    Milestone { score: 90, message: "One more push to the century" },
    Milestone { score: 100, message: "Legend! You've mastered digital flight" },
];

/// The player's helicopter (screen x is fixed; the world moves instead)
#[derive(Debug, Clone, Copy, Default)]
pub struct Copter {
    pub y: f32,
    pub vel: f32,
}

impl Copter {
    /// Center position in screen space
    pub fn pos(&self) -> Vec2 {
        Vec2::new(COPTER_X, self.y)
    }
}

/// A column obstacle: solid above `top_height` and below `bottom_y`,
/// open in between
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub x: f32,
    pub top_height: f32,
    pub bottom_y: f32,
    /// Set exactly once, on the step the trailing edge passes the copter
    pub passed: bool,
}

impl Obstacle {
    pub fn gap_height(&self) -> f32 {
        self.bottom_y - self.top_height
    }
}

/// Authoritative simulation state for one helicopter run
pub struct HeliState {
    pub mode: Mode,
    pub score: u32,
    pub best_score: u32,
    pub copter: Copter,
    pub obstacles: Vec<Obstacle>,
    pub particles: Particles,
    /// World scroll offset (drives the background grid)
    pub camera_x: f32,
    /// 1.0 at start, stepped up to [`MAX_DIFFICULTY`]
    pub difficulty: f32,
    /// Last score at which difficulty was raised (prevents re-triggering)
    pub(crate) last_difficulty_score: u32,
    pub milestones: MilestoneTracker,
    /// Rotor animation angles, advanced by the update step
    pub rotor_angle: f32,
    pub tail_rotor_angle: f32,
    /// Whether thrust was held last update (edge detection + exhaust sprite)
    pub thrusting: bool,
    pub field_w: f32,
    pub field_h: f32,
    pub(crate) rng: Pcg32,
    store: Box<dyn ScoreStore>,
}

impl HeliState {
    /// Create an idle game bound to its score store; call `start()` to play
    pub fn new(store: Box<dyn ScoreStore>, field_w: f32, field_h: f32, seed: u64) -> Self {
        Self {
            mode: Mode::Idle,
            score: 0,
            best_score: store.get().unwrap_or(0),
            copter: Copter { y: field_h / 2.0, vel: 0.0 },
            obstacles: Vec::new(),
            particles: Particles::new(),
            camera_x: 0.0,
            difficulty: 1.0,
            last_difficulty_score: 0,
            milestones: MilestoneTracker::new(HELI_MILESTONES),
            rotor_angle: 0.0,
            tail_rotor_angle: 0.0,
            thrusting: false,
            field_w,
            field_h,
            rng: Pcg32::seed_from_u64(seed),
            store,
        }
    }

    /// Begin a fresh run, discarding whatever the previous run left behind
    pub fn start(&mut self) {
        self.copter = Copter { y: self.field_h / 2.0, vel: 0.0 };
        self.obstacles.clear();
        self.particles.clear();
        self.camera_x = 0.0;
        self.score = 0;
        self.difficulty = 1.0;
        self.last_difficulty_score = 0;
        self.milestones = MilestoneTracker::new(HELI_MILESTONES);
        self.rotor_angle = 0.0;
        self.tail_rotor_angle = 0.0;
        self.thrusting = false;
        self.best_score = self.store.get().unwrap_or(0);

        for i in 0..ON_SCREEN_OBSTACLES {
            let x = FIRST_OBSTACLE_X + i as f32 * OBSTACLE_SPACING;
            self.spawn_obstacle(x);
        }

        self.mode = Mode::Running;
        log::info!("helicopter run started (best {})", self.best_score);
    }

    /// Gap height at the current difficulty, floored
    pub fn current_gap(&self) -> f32 {
        (OBSTACLE_GAP - (self.difficulty - 1.0) * 20.0).max(MIN_OBSTACLE_GAP)
    }

    /// Append a column at `x` with a randomly placed gap that stays fully
    /// on-screen
    pub fn spawn_obstacle(&mut self, x: f32) {
        let gap = self.current_gap();
        let span = (self.field_h - gap - 2.0 * GAP_MARGIN).max(0.0);
        let gap_top = GAP_MARGIN + self.rng.random::<f32>() * span;
        self.obstacles.push(Obstacle {
            x,
            top_height: gap_top,
            bottom_y: gap_top + gap,
            passed: false,
        });
    }

    /// Terminal transition: persist the best score at most once per run
    pub(crate) fn finish_run(&mut self) {
        self.mode = Mode::Over;
        self.best_score = crate::storage::record_best(self.store.as_ref(), self.score);
    }
}
