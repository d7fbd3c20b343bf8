//! Cross-module invariant properties
//!
//! Randomized checks of the contracts the games are built on: toroidal
//! wrap, score and best-score monotonicity, bounded spawn sampling, and
//! pause transparency.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use canvas_arcade::Mode;
use canvas_arcade::heli::{self, HeliState};
use canvas_arcade::snake::state::{
    Cell, Dir, GRID_SIZE, sample_free_cell, step_wrapped,
};
use canvas_arcade::snake::{self, SnakeState};
use canvas_arcade::storage::{MemoryScoreStore, ScoreStore, record_best};

const DIRS: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

proptest! {
    #[test]
    fn wrapped_walk_never_leaves_the_board(
        start_x in 0..GRID_SIZE,
        start_y in 0..GRID_SIZE,
        walk in prop::collection::vec(0..4usize, 1..200),
    ) {
        let mut cell = Cell::new(start_x, start_y);
        for idx in walk {
            cell = step_wrapped(cell, DIRS[idx], GRID_SIZE);
            prop_assert!((0..GRID_SIZE).contains(&cell.x));
            prop_assert!((0..GRID_SIZE).contains(&cell.y));
        }
    }

    #[test]
    fn wrap_step_is_invertible(
        x in 0..GRID_SIZE,
        y in 0..GRID_SIZE,
        idx in 0..4usize,
    ) {
        let start = Cell::new(x, y);
        let there = step_wrapped(start, DIRS[idx], GRID_SIZE);
        let back = step_wrapped(there, DIRS[idx].opposite(), GRID_SIZE);
        prop_assert_eq!(back, start);
    }

    #[test]
    fn sampler_result_is_always_free(
        seed in any::<u64>(),
        occupied in prop::collection::hash_set((0..6i32, 0..6i32), 0..36),
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let occ = |c: Cell| occupied.contains(&(c.x, c.y));
        match sample_free_cell(&mut rng, 6, occ) {
            Some(cell) => prop_assert!(!occ(cell)),
            None => prop_assert_eq!(occupied.len(), 36),
        }
    }

    #[test]
    fn heli_score_monotone_and_window_invariant(
        seed in any::<u64>(),
        thrusts in prop::collection::vec(any::<bool>(), 1..300),
    ) {
        let mut g = HeliState::new(
            Box::new(MemoryScoreStore::new()), 800.0, 400.0, seed,
        );
        g.start();
        let mut prev = 0;
        for thrust in thrusts {
            heli::tick(&mut g, &heli::TickInput { thrust }, 1.0);
            prop_assert!(g.score >= prev);
            prev = g.score;
            if g.mode == Mode::Over {
                break;
            }
            prop_assert_eq!(g.obstacles.len(), 5);
        }
    }

    #[test]
    fn heli_terminal_state_is_sticky(
        seed in any::<u64>(),
        extra in 1..50usize,
    ) {
        let mut g = HeliState::new(
            Box::new(MemoryScoreStore::new()), 800.0, 400.0, seed,
        );
        g.start();
        // Free fall always terminates on the floor
        for _ in 0..10_000 {
            heli::tick(&mut g, &heli::TickInput { thrust: false }, 1.0);
            if g.mode == Mode::Over {
                break;
            }
        }
        prop_assert_eq!(g.mode, Mode::Over);
        let score = g.score;
        for _ in 0..extra {
            heli::tick(&mut g, &heli::TickInput { thrust: true }, 1.0);
            prop_assert_eq!(g.mode, Mode::Over);
            prop_assert_eq!(g.score, score);
        }
    }

    #[test]
    fn snake_score_monotone_and_body_accounted(
        seed in any::<u64>(),
        steps in prop::collection::vec((0..5usize, 10..200u64), 1..150),
    ) {
        let mut g = SnakeState::new(Box::new(MemoryScoreStore::new()), seed);
        g.start();
        let mut prev_score = 0;
        let mut was_over = false;
        for (turn_idx, dt) in steps {
            let input = snake::TickInput {
                turn: DIRS.get(turn_idx).copied(),
                pause: false,
            };
            snake::tick(&mut g, &input, dt as f64);
            prop_assert!(g.score >= prev_score);
            prev_score = g.score;
            // Terminal state never un-terminates
            if was_over {
                prop_assert_eq!(g.mode, Mode::Over);
            }
            was_over = g.mode == Mode::Over;
            // Each body cell past the first was paid for by scoring
            prop_assert!(!g.body.is_empty());
            prop_assert!(g.score as usize >= g.body.len() - 1);
        }
    }

    #[test]
    fn snake_double_pause_is_transparent(
        seed in any::<u64>(),
        prefix in prop::collection::vec((0..5usize, 10..200u64), 0..60),
    ) {
        let mut g = SnakeState::new(Box::new(MemoryScoreStore::new()), seed);
        g.start();
        for (turn_idx, dt) in prefix {
            let input = snake::TickInput {
                turn: DIRS.get(turn_idx).copied(),
                pause: false,
            };
            snake::tick(&mut g, &input, dt as f64);
        }

        let body = g.body.clone();
        let score = g.score;
        let accum = g.move_accum;
        let combo_timer = g.combo_timer;
        let food = g.food;

        let pause = snake::TickInput { turn: None, pause: true };
        snake::tick(&mut g, &pause, 150.0);
        snake::tick(&mut g, &pause, 150.0);

        prop_assert_eq!(g.body, body);
        prop_assert_eq!(g.score, score);
        prop_assert_eq!(g.move_accum, accum);
        prop_assert_eq!(g.combo_timer, combo_timer);
        prop_assert_eq!(g.food, food);
    }

    #[test]
    fn stored_best_never_decreases(
        finals in prop::collection::vec(0..500u32, 1..40),
    ) {
        let store = MemoryScoreStore::new();
        let mut prev_best = 0;
        for final_score in finals {
            let best = record_best(&store, final_score);
            prop_assert!(best >= prev_best);
            prop_assert_eq!(best, prev_best.max(final_score));
            prop_assert_eq!(store.get().unwrap_or(0), best);
            prev_best = best;
        }
    }
}
