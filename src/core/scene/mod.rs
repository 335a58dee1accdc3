//=========================================================================
// Scene System
//=========================================================================
//
// Manages the active game screen and deferred transitions between
// screens.
//
// Architecture:
//   SceneMachine
//     ├─ active:  Option<(S, Box<dyn Scene<S>>)>
//     └─ pending: Option<(S, Box<dyn Scene<S>>)>
//
//   SceneDirector ──crossbeam──► TransitionInbox (drained inside the tick)
//
// Flow:
//   update_active() → inbox drain → stage() → swap_pending() | render_active()
//
//=========================================================================

//=== Module Declarations =================================================

mod context;
mod director;
mod scene_machine;

//=== Public API ==========================================================

pub use context::SceneContext;
pub use director::SceneDirector;
pub use scene_machine::{SceneMachine, ScenePhase};

pub(crate) use director::{transition_channel, TransitionInbox};

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Internal Dependencies ===============================================

use crate::error::Result;

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Typically implemented by a game-specific enum (main menu, character
/// select, gameplay...). The factory builds a fresh scene from a key.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Scene Trait =========================================================

/// One game screen.
///
/// The engine owns the active scene exclusively. It receives `update`
/// every executed tick and `render` on every tick that does not swap
/// scenes. `dispose` runs exactly once when the scene leaves the engine.
///
/// ```rust
/// # use cadence_engine::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum GameScene { MainMenu, Game }
/// # impl SceneKey for GameScene {}
/// struct MainMenu;
///
/// impl Scene<GameScene> for MainMenu {
///     fn update(&mut self, ctx: &SceneContext<'_, GameScene>, _elapsed_ms: u32) -> Result<()> {
///         ctx.request_scene(GameScene::Game)
///     }
///
///     fn render(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait Scene<S: SceneKey>: Send {
    /// Advances the scene by `elapsed_ms` milliseconds.
    fn update(&mut self, ctx: &SceneContext<'_, S>, elapsed_ms: u32) -> Result<()>;

    /// Draws the scene onto the cleared back buffer.
    fn render(&mut self) -> Result<()>;

    /// Releases scene resources. Default does nothing.
    fn dispose(&mut self) {}
}

//=== Scene Factory =======================================================

/// Builds scenes on demand from a key.
///
/// Implemented for any `FnMut(S) -> Result<Box<dyn Scene<S>>> + Send`,
/// so a closure is usually enough. May perform I/O.
pub trait SceneFactory<S: SceneKey>: Send {
    /// Constructs a new scene instance for `key`.
    fn create(&mut self, key: S) -> Result<Box<dyn Scene<S>>>;
}

impl<S, F> SceneFactory<S> for F
where
    S: SceneKey,
    F: FnMut(S) -> Result<Box<dyn Scene<S>>> + Send,
{
    fn create(&mut self, key: S) -> Result<Box<dyn Scene<S>>> {
        self(key)
    }
}
