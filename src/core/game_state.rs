//=========================================================================
// Shared Game State
//=========================================================================
//
// Mutual-exclusion guard around the game state object.
//
// The lock is owned here and never handed out. Callers get guarded
// entry points only:
//
//   GameState<G>
//     ├─ guarded(|g: &mut G| ...)   exclusive, used by the main loop tick
//     └─ inspect(|g: &G| ...)       exclusive, read-only view
//
// The main loop holds the guard for the whole tick body (state update,
// scene update, swap or render). It never holds it across the pacing
// sleep.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use crate::error::Result;

//=== Simulation Trait ====================================================

/// Per-tick game state integration.
///
/// Implemented by the game's state object. Called once per executed tick,
/// before the active scene is updated.
pub trait Simulation: Send {
    /// Advances the state by `elapsed_ms` milliseconds.
    fn update(&mut self, elapsed_ms: u32) -> Result<()>;
}

//=== GameState ===========================================================

/// Cloneable handle to lock-protected game state.
///
/// Every clone refers to the same state, so background threads can mutate
/// it safely alongside the main loop.
///
/// ```rust
/// # use cadence_engine::core::game_state::{GameState, Simulation};
/// # use cadence_engine::Result;
/// struct World { elapsed: u64 }
///
/// impl Simulation for World {
///     fn update(&mut self, elapsed_ms: u32) -> Result<()> {
///         self.elapsed += u64::from(elapsed_ms);
///         Ok(())
///     }
/// }
///
/// let state = GameState::new(World { elapsed: 0 });
/// let loader = state.clone();
///
/// loader.guarded(|world| world.update(40)).unwrap();
/// assert_eq!(state.inspect(|world| world.elapsed), 40);
/// ```
pub struct GameState<G> {
    inner: Arc<Mutex<G>>,
}

impl<G> GameState<G> {
    /// Wraps `state` in a new guard.
    pub fn new(state: G) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Runs `f` with exclusive access to the state.
    ///
    /// All per-tick mutation goes through here. `f` must not call back
    /// into the same `GameState`.
    pub fn guarded<R>(&self, f: impl FnOnce(&mut G) -> R) -> R {
        let mut state = self.inner.lock();
        f(&mut state)
    }

    /// Runs `f` with a shared view of the state while holding the guard.
    pub fn inspect<R>(&self, f: impl FnOnce(&G) -> R) -> R {
        let state = self.inner.lock();
        f(&state)
    }

    /// Returns true if some thread currently holds the guard.
    pub fn is_held(&self) -> bool {
        self.inner.is_locked()
    }
}

impl<G> Clone for GameState<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G> fmt::Debug for GameState<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("held", &self.is_held())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
