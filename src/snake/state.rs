//! Snake game state
//!
//! The board is a fixed square grid with toroidal edges. All spawn
//! placement goes through bounded rejection sampling with a deterministic
//! scan fallback, so generation terminates even on a nearly-full board.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Mode;
use crate::fx::Particles;
use crate::milestones::{Milestone, MilestoneTracker};
use crate::storage::ScoreStore;

/// Board edge length in cells
pub const GRID_SIZE: i32 = 20;
/// Cell edge length in pixels (render scale)
pub const CELL_SIZE: f64 = 20.0;
/// Move-tick duration at the start of a run
pub const BASE_TICK_MS: f64 = 150.0;
/// Move-tick duration never drops below this
pub const MIN_TICK_MS: f64 = 60.0;
/// Cadence gain each time the score reaches a multiple of
/// [`SCORE_PER_SPEEDUP`]
pub const TICK_STEP_MS: f64 = 5.0;
pub const SCORE_PER_SPEEDUP: u32 = 5;
/// Chance of a power-up appearing after eating, when none is on the board
pub const POWER_UP_CHANCE: f64 = 0.15;
/// Frames the combo counter survives without another bite
pub const COMBO_WINDOW_FRAMES: f32 = 180.0;
/// Random draws before spawn placement falls back to a scan
pub const SPAWN_ATTEMPTS: usize = 64;
/// Move-tick multiplier while the speed boost is active
pub const SPEED_BOOST_FACTOR: f64 = 0.75;

/// Milestone messages, ascending by threshold
pub const SNAKE_MILESTONES: &[Milestone] = &[
    Milestone { score: 5, message: "Nice! The grid is yours to wrap" },
    Milestone { score: 10, message: "Double digits, single snake" },
    Milestone { score: 15, message: "Watch that tail, it's getting long" },
    Milestone { score: 20, message: "Twenty! Power-ups are worth the detour" },
    Milestone { score: 25, message: "The walls were never really there" },
    Milestone { score: 30, message: "Thirty bites and counting" },
    Milestone { score: 40, message: "The board is starting to feel small..." },
    Milestone { score: 50, message: "Half a hundred! Serpentine royalty" },
    Milestone { score: 60, message: "Sixty! Planning routes three turns ahead" },
    Milestone { score: 75, message: "Precision coiling, no wasted moves" },
    Milestone { score: 90, message: "Almost there, do not box yourself in" },
    Milestone { score: 100, message: "LEGEND! You've conquered the snake" },
];

/// A grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Center of a cell in grid space (renderers scale by [`CELL_SIZE`])
pub fn cell_center(c: Cell) -> Vec2 {
    Vec2::new(c.x as f32 + 0.5, c.y as f32 + 0.5)
}

/// Direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// One step in `dir` with toroidal wrap on both axes
pub fn step_wrapped(from: Cell, dir: Dir, grid: i32) -> Cell {
    let (dx, dy) = dir.delta();
    Cell {
        x: (from.x + dx).rem_euclid(grid),
        y: (from.y + dy).rem_euclid(grid),
    }
}

/// Power-up flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Quickens the move tick while active
    SpeedBoost,
    /// Suppresses the self-collision check
    Invincible,
    /// Doubles the score gained per food
    Multiplier,
}

impl PowerUpKind {
    /// Effect duration in reference frames
    pub fn duration_frames(self) -> f32 {
        match self {
            PowerUpKind::SpeedBoost => 300.0,
            PowerUpKind::Invincible => 240.0,
            PowerUpKind::Multiplier => 360.0,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "#ff6b35",
            PowerUpKind::Invincible => "#ffd700",
            PowerUpKind::Multiplier => "#00ff88",
        }
    }

    const ALL: [PowerUpKind; 3] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::Invincible,
        PowerUpKind::Multiplier,
    ];
}

/// A power-up waiting on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUp {
    pub cell: Cell,
    pub kind: PowerUpKind,
}

/// The single currently-active effect, if any
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    /// Frames until expiry
    pub remaining: f32,
}

/// Bounded rejection sampling for spawn placement.
///
/// Draws up to [`SPAWN_ATTEMPTS`] random cells, then falls back to the
/// first free cell in row-major scan order. `None` means the board is
/// completely occupied.
pub fn sample_free_cell<F>(rng: &mut Pcg32, grid: i32, occupied: F) -> Option<Cell>
where
    F: Fn(Cell) -> bool,
{
    for _ in 0..SPAWN_ATTEMPTS {
        let cell = Cell::new(rng.random_range(0..grid), rng.random_range(0..grid));
        if !occupied(cell) {
            return Some(cell);
        }
    }
    for y in 0..grid {
        for x in 0..grid {
            let cell = Cell::new(x, y);
            if !occupied(cell) {
                return Some(cell);
            }
        }
    }
    None
}

/// Authoritative simulation state for one snake run
pub struct SnakeState {
    pub mode: Mode,
    pub score: u32,
    pub best_score: u32,
    /// Ordered body cells, head first
    pub body: VecDeque<Cell>,
    pub dir: Dir,
    /// Buffered direction, applied at the next move tick
    pub next_dir: Dir,
    pub food: Cell,
    pub power_up: Option<PowerUp>,
    pub active: Option<ActiveEffect>,
    /// Particles in grid space
    pub particles: Particles,
    pub combo: u32,
    pub combo_timer: f32,
    /// Current move-tick duration (before any speed boost)
    pub tick_ms: f64,
    /// Elapsed ms accumulated toward the next move tick
    pub move_accum: f64,
    pub milestones: MilestoneTracker,
    pub grid: i32,
    pub(crate) rng: Pcg32,
    store: Box<dyn ScoreStore>,
}

impl SnakeState {
    /// Create an idle game on the standard board; call `start()` to play
    pub fn new(store: Box<dyn ScoreStore>, seed: u64) -> Self {
        Self::with_grid(store, GRID_SIZE, seed)
    }

    /// Create an idle game on a custom board size (tests use tiny boards)
    pub fn with_grid(store: Box<dyn ScoreStore>, grid: i32, seed: u64) -> Self {
        let center = Cell::new(grid / 2, grid / 2);
        Self {
            mode: Mode::Idle,
            score: 0,
            best_score: store.get().unwrap_or(0),
            body: VecDeque::from([center]),
            dir: Dir::Right,
            next_dir: Dir::Right,
            food: Cell::new(0, 0),
            power_up: None,
            active: None,
            particles: Particles::new(),
            combo: 0,
            combo_timer: 0.0,
            tick_ms: BASE_TICK_MS,
            move_accum: 0.0,
            milestones: MilestoneTracker::new(SNAKE_MILESTONES),
            grid,
            rng: Pcg32::seed_from_u64(seed),
            store,
        }
    }

    /// Begin a fresh run
    pub fn start(&mut self) {
        let center = Cell::new(self.grid / 2, self.grid / 2);
        self.body = VecDeque::from([center]);
        self.dir = Dir::Right;
        self.next_dir = Dir::Right;
        self.power_up = None;
        self.active = None;
        self.particles.clear();
        self.score = 0;
        self.combo = 0;
        self.combo_timer = 0.0;
        self.tick_ms = BASE_TICK_MS;
        self.move_accum = 0.0;
        self.milestones = MilestoneTracker::new(SNAKE_MILESTONES);
        self.best_score = self.store.get().unwrap_or(0);
        self.spawn_food();
        self.mode = Mode::Running;
        log::info!("snake run started (best {})", self.best_score);
    }

    pub fn occupied_by_body(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Place food on a free cell; false when the board is full
    pub fn spawn_food(&mut self) -> bool {
        let body = &self.body;
        match sample_free_cell(&mut self.rng, self.grid, |c| body.contains(&c)) {
            Some(cell) => {
                self.food = cell;
                true
            }
            None => false,
        }
    }

    /// Place a random-kind power-up on a cell free of both body and food
    pub fn spawn_power_up(&mut self) {
        let body = &self.body;
        let food = self.food;
        let cell = sample_free_cell(&mut self.rng, self.grid, |c| {
            c == food || body.contains(&c)
        });
        if let Some(cell) = cell {
            let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
            self.power_up = Some(PowerUp { cell, kind });
        }
    }

    pub fn invincible(&self) -> bool {
        matches!(self.active, Some(a) if a.kind == PowerUpKind::Invincible)
    }

    pub fn multiplier_active(&self) -> bool {
        matches!(self.active, Some(a) if a.kind == PowerUpKind::Multiplier)
    }

    pub fn speed_boosted(&self) -> bool {
        matches!(self.active, Some(a) if a.kind == PowerUpKind::SpeedBoost)
    }

    /// Move-tick duration after any active speed boost, floored
    pub fn effective_tick_ms(&self) -> f64 {
        if self.speed_boosted() {
            (self.tick_ms * SPEED_BOOST_FACTOR).max(MIN_TICK_MS)
        } else {
            self.tick_ms
        }
    }

    /// 1-based level derived from how far the cadence has tightened
    pub fn difficulty_level(&self) -> u32 {
        ((BASE_TICK_MS - self.tick_ms) / TICK_STEP_MS) as u32 + 1
    }

    /// Terminal transition: persist the best score at most once per run
    pub(crate) fn finish_run(&mut self) {
        self.mode = Mode::Over;
        self.best_score = crate::storage::record_best(self.store.as_ref(), self.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryScoreStore;

    fn game() -> SnakeState {
        SnakeState::new(Box::new(MemoryScoreStore::new()), 11)
    }

    #[test]
    fn wrap_is_toroidal_on_both_axes() {
        let g = GRID_SIZE;
        assert_eq!(step_wrapped(Cell::new(g - 1, 5), Dir::Right, g), Cell::new(0, 5));
        assert_eq!(step_wrapped(Cell::new(0, 5), Dir::Left, g), Cell::new(g - 1, 5));
        assert_eq!(step_wrapped(Cell::new(5, g - 1), Dir::Down, g), Cell::new(5, 0));
        assert_eq!(step_wrapped(Cell::new(5, 0), Dir::Up, g), Cell::new(5, g - 1));
    }

    #[test]
    fn interior_step_does_not_wrap() {
        assert_eq!(
            step_wrapped(Cell::new(5, 5), Dir::Right, GRID_SIZE),
            Cell::new(6, 5)
        );
    }

    #[test]
    fn opposites_pair_up() {
        for dir in [Dir::Up, Dir::Down, Dir::Left, Dir::Right] {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn start_places_food_off_the_body() {
        let mut g = game();
        g.start();
        assert_eq!(g.mode, Mode::Running);
        assert_eq!(g.body.len(), 1);
        assert!(!g.occupied_by_body(g.food));
    }

    #[test]
    fn sampler_avoids_occupied_cells() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            let cell = sample_free_cell(&mut rng, 4, |c| c.x < 3).expect("column 3 is free");
            assert_eq!(cell.x, 3);
        }
    }

    #[test]
    fn sampler_falls_back_to_scan_on_a_nearly_full_board() {
        let mut rng = Pcg32::seed_from_u64(3);
        // Only one free cell; rejection alone would rarely find it in time
        let free = Cell::new(2, 2);
        let cell = sample_free_cell(&mut rng, 3, |c| c != free);
        assert_eq!(cell, Some(free));
    }

    #[test]
    fn sampler_reports_a_full_board() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(sample_free_cell(&mut rng, 3, |_| true), None);
    }

    #[test]
    fn power_up_spawns_clear_of_body_and_food() {
        let mut g = game();
        g.start();
        for _ in 0..50 {
            g.power_up = None;
            g.spawn_power_up();
            let p = g.power_up.expect("board has room");
            assert_ne!(p.cell, g.food);
            assert!(!g.occupied_by_body(p.cell));
        }
    }

    #[test]
    fn speed_boost_shortens_the_effective_tick() {
        let mut g = game();
        g.start();
        assert_eq!(g.effective_tick_ms(), BASE_TICK_MS);
        g.active = Some(ActiveEffect {
            kind: PowerUpKind::SpeedBoost,
            remaining: 100.0,
        });
        assert_eq!(g.effective_tick_ms(), BASE_TICK_MS * SPEED_BOOST_FACTOR);
        // Floor still applies
        g.tick_ms = MIN_TICK_MS;
        assert_eq!(g.effective_tick_ms(), MIN_TICK_MS);
    }

    #[test]
    fn difficulty_level_tracks_cadence() {
        let mut g = game();
        g.start();
        assert_eq!(g.difficulty_level(), 1);
        g.tick_ms = BASE_TICK_MS - 3.0 * TICK_STEP_MS;
        assert_eq!(g.difficulty_level(), 4);
    }
}
