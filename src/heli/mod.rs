//! Side-scrolling helicopter game
//!
//! Hold to ascend, release to descend; the world scrolls left past a fixed
//! copter while column obstacles stream in with a progressively tighter gap.

#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod state;
pub mod tick;

pub use state::{Copter, HeliState, Obstacle};
pub use tick::{TickInput, tick};
