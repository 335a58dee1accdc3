//=========================================================================
// Scene Machine
//=========================================================================
//
// Two-slot scene lifecycle: the active scene plus an optional pending
// one.
//
//   Empty ──activate()──► Active ──stage()──► Transitioning
//                           ▲                     │
//                           └────swap_pending()───┘
//
// The pending slot is only written (stage) and consumed (swap_pending)
// inside the main loop's guarded section. Staging over an existing
// pending scene disposes the superseded one immediately.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Scene, SceneContext, SceneKey};
use crate::error::{EngineError, Result};

//=== ScenePhase ==========================================================

/// Observable state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    /// No scene has been activated yet.
    Empty,

    /// One active scene, nothing pending.
    Active,

    /// A pending scene waits for the next swap point.
    Transitioning,
}

//=== LoadedScene =========================================================

struct LoadedScene<S: SceneKey> {
    key: S,
    scene: Box<dyn Scene<S>>,
}

impl<S: SceneKey> LoadedScene<S> {
    fn dispose(mut self) {
        debug!("Disposing scene {:?}", self.key);
        self.scene.dispose();
    }
}

//=== SceneMachine ========================================================

/// Owns the active scene and at most one pending scene.
///
/// Dropping the machine disposes both.
pub struct SceneMachine<S: SceneKey> {
    active: Option<LoadedScene<S>>,
    pending: Option<LoadedScene<S>>,
}

impl<S: SceneKey> SceneMachine<S> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty machine.
    pub fn new() -> Self {
        Self {
            active: None,
            pending: None,
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Current phase.
    pub fn phase(&self) -> ScenePhase {
        match (&self.active, &self.pending) {
            (_, Some(_)) => ScenePhase::Transitioning,
            (Some(_), None) => ScenePhase::Active,
            (None, None) => ScenePhase::Empty,
        }
    }

    /// Key of the active scene.
    pub fn active_key(&self) -> Option<S> {
        self.active.as_ref().map(|loaded| loaded.key)
    }

    /// Key of the pending scene.
    pub fn pending_key(&self) -> Option<S> {
        self.pending.as_ref().map(|loaded| loaded.key)
    }

    //--- Lifecycle --------------------------------------------------------

    /// Makes `scene` active right away, disposing the previous active scene.
    ///
    /// Used for the initial scene; later changes go through [`stage`](Self::stage).
    pub fn activate(&mut self, key: S, scene: Box<dyn Scene<S>>) {
        debug!("Activating scene {:?}", key);
        if let Some(previous) = self.active.replace(LoadedScene { key, scene }) {
            previous.dispose();
        }
    }

    /// Stores `scene` as pending. The active scene keeps running until
    /// the next [`swap_pending`](Self::swap_pending).
    pub fn stage(&mut self, key: S, scene: Box<dyn Scene<S>>) {
        debug!("Staging scene {:?}", key);
        if let Some(superseded) = self.pending.replace(LoadedScene { key, scene }) {
            warn!(
                "Pending scene {:?} superseded by {:?} before activation",
                superseded.key, key
            );
            superseded.dispose();
        }
    }

    /// Updates the active scene.
    pub fn update_active(&mut self, ctx: &SceneContext<'_, S>, elapsed_ms: u32) -> Result<()> {
        let active = self.active.as_mut().ok_or(EngineError::NoActiveScene)?;
        active.scene.update(ctx, elapsed_ms)
    }

    /// Promotes the pending scene, if any, disposing the old active one.
    ///
    /// Returns the key of the newly active scene.
    pub fn swap_pending(&mut self) -> Option<S> {
        let next = self.pending.take()?;
        let key = next.key;

        if let Some(previous) = self.active.replace(next) {
            debug!("Swapping scene {:?} -> {:?}", previous.key, key);
            previous.dispose();
        }

        Some(key)
    }

    /// Renders the active scene.
    pub fn render_active(&mut self) -> Result<()> {
        let active = self.active.as_mut().ok_or(EngineError::NoActiveScene)?;
        active.scene.render()
    }

    /// Disposes the active and pending scenes, leaving the machine empty.
    pub fn dispose_all(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.dispose();
        }
        if let Some(active) = self.active.take() {
            active.dispose();
        }
    }
}

impl<S: SceneKey> Default for SceneMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SceneKey> Drop for SceneMachine<S> {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
