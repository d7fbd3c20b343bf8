//! Input normalization
//!
//! Pointer, touch, and keyboard events collapse into each game's tiny
//! command vocabulary: the helicopter only cares whether thrust is held,
//! the snake about direction intent and a pause toggle. Handlers write
//! staging values that the next update step consumes; nothing here touches
//! entity state.
//!
//! Browsers re-fire `keydown` while a key is held, so one-shot commands go
//! through [`KeyLatch`] to keep only the rising edge.

use std::collections::HashSet;

use crate::snake::state::Dir;

/// Tracks which key codes are currently held, exposing only edges
#[derive(Debug, Default)]
pub struct KeyLatch {
    held: HashSet<String>,
}

impl KeyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down; true only on the first event of a hold
    pub fn press(&mut self, code: &str) -> bool {
        self.held.insert(code.to_owned())
    }

    /// Record a key-up; true if the key was held
    pub fn release(&mut self, code: &str) -> bool {
        self.held.remove(code)
    }

    /// Drop all held keys (focus loss can eat key-up events)
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

/// Keys the helicopter listens for (thrust while held)
pub fn heli_thrust_key(code: &str) -> bool {
    matches!(code, "Space" | "ArrowUp")
}

/// Commands the snake accepts from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeKey {
    Turn(Dir),
    Pause,
}

/// Map a `KeyboardEvent.code` to a snake command
pub fn snake_key(code: &str) -> Option<SnakeKey> {
    match code {
        "Space" => Some(SnakeKey::Pause),
        "ArrowUp" | "KeyW" => Some(SnakeKey::Turn(Dir::Up)),
        "ArrowDown" | "KeyS" => Some(SnakeKey::Turn(Dir::Down)),
        "ArrowLeft" | "KeyA" => Some(SnakeKey::Turn(Dir::Left)),
        "ArrowRight" | "KeyD" => Some(SnakeKey::Turn(Dir::Right)),
        _ => None,
    }
}

/// Interpret a touch swipe as a direction, if it travelled far enough.
///
/// The dominant axis wins; anything under `threshold` pixels is a tap,
/// not a swipe.
pub fn swipe_direction(dx: f64, dy: f64, threshold: f64) -> Option<Dir> {
    if dx.abs() < threshold && dy.abs() < threshold {
        return None;
    }
    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 { Dir::Right } else { Dir::Left })
    } else {
        Some(if dy > 0.0 { Dir::Down } else { Dir::Up })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_reports_only_edges() {
        let mut latch = KeyLatch::new();
        assert!(latch.press("Space"));
        // OS key-repeat fires more key-downs; they are not edges
        assert!(!latch.press("Space"));
        assert!(!latch.press("Space"));
        assert!(latch.release("Space"));
        assert!(!latch.release("Space"));
        assert!(latch.press("Space"));
    }

    #[test]
    fn latch_tracks_keys_independently() {
        let mut latch = KeyLatch::new();
        assert!(latch.press("ArrowUp"));
        assert!(latch.press("Space"));
        assert!(latch.release("ArrowUp"));
        assert!(!latch.press("Space"));
    }

    #[test]
    fn heli_keys() {
        assert!(heli_thrust_key("Space"));
        assert!(heli_thrust_key("ArrowUp"));
        assert!(!heli_thrust_key("ArrowDown"));
        assert!(!heli_thrust_key("KeyQ"));
    }

    #[test]
    fn snake_keys_cover_arrows_and_wasd() {
        assert_eq!(snake_key("ArrowUp"), Some(SnakeKey::Turn(Dir::Up)));
        assert_eq!(snake_key("KeyW"), Some(SnakeKey::Turn(Dir::Up)));
        assert_eq!(snake_key("KeyA"), Some(SnakeKey::Turn(Dir::Left)));
        assert_eq!(snake_key("ArrowRight"), Some(SnakeKey::Turn(Dir::Right)));
        assert_eq!(snake_key("Space"), Some(SnakeKey::Pause));
        assert_eq!(snake_key("Escape"), None);
    }

    #[test]
    fn swipe_picks_dominant_axis() {
        assert_eq!(swipe_direction(80.0, 10.0, 30.0), Some(Dir::Right));
        assert_eq!(swipe_direction(-80.0, 10.0, 30.0), Some(Dir::Left));
        assert_eq!(swipe_direction(10.0, 55.0, 30.0), Some(Dir::Down));
        assert_eq!(swipe_direction(10.0, -55.0, 30.0), Some(Dir::Up));
    }

    #[test]
    fn short_swipe_is_a_tap() {
        assert_eq!(swipe_direction(12.0, -8.0, 30.0), None);
    }
}
