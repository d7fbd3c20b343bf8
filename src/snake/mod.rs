//! Grid snake game
//!
//! The body advances one cell per move tick on a toroidal 20x20 grid;
//! food grows it, power-ups bend the rules for a few seconds, and the
//! move cadence quickens as the score climbs.

#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod state;
pub mod tick;

pub use state::{ActiveEffect, Cell, Dir, PowerUp, PowerUpKind, SnakeState};
pub use tick::{TickInput, tick};
