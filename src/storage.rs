//! Best-score persistence
//!
//! Each game keeps exactly one durable scalar: its best score, stored as a
//! decimal string under a per-game key. The store is injected into the game
//! at construction so the simulation never reaches for ambient globals,
//! and tests swap in the in-memory variant.
//!
//! A missing, unparsable, or unavailable value reads as "no best score
//! yet"; storage failure is never allowed to block gameplay.

use std::cell::Cell;
use std::rc::Rc;

/// LocalStorage key for the helicopter game's best score
pub const HELI_SCORE_KEY: &str = "helicopterHighScore";
/// LocalStorage key for the snake game's best score
pub const SNAKE_SCORE_KEY: &str = "snakeHighScore";

/// Durable best-score scalar
pub trait ScoreStore {
    /// Read the stored best score; `None` when absent or unreadable
    fn get(&self) -> Option<u32>;
    /// Overwrite the stored best score
    fn set(&self, score: u32);
}

/// In-memory store with shared interior (clones observe the same value)
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore(Rc<Cell<Option<u32>>>);

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u32) -> Self {
        let store = Self::new();
        store.set(score);
        store
    }
}

impl ScoreStore for MemoryScoreStore {
    fn get(&self) -> Option<u32> {
        self.0.get()
    }

    fn set(&self, score: u32) {
        self.0.set(Some(score));
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalScoreStore {
    key: &'static str,
}

#[cfg(target_arch = "wasm32")]
impl LocalScoreStore {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalScoreStore {
    fn get(&self) -> Option<u32> {
        let storage = Self::storage()?;
        let raw = storage.get_item(self.key).ok()??;
        raw.trim().parse().ok()
    }

    fn set(&self, score: u32) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(self.key, &score.to_string()).is_err() {
                    log::warn!("best score write failed ({})", self.key);
                }
            }
            None => log::warn!("LocalStorage unavailable, best score not saved"),
        }
    }
}

/// Persist `score` if it beats the stored best; returns the new best.
///
/// This is the only write path, so the stored value can never decrease.
pub fn record_best(store: &dyn ScoreStore, score: u32) -> u32 {
    let best = store.get().unwrap_or(0);
    if score > best {
        store.set(score);
        log::info!("new best score: {}", score);
        score
    } else {
        best
    }
}
