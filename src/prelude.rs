//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use cadence_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::{Engine, EngineBuilder, EngineConfig, EngineError, Result, TickOutcome};

// Platform
pub use crate::core::platform_bridge::{Point, RenderWindow};

// Scene system
pub use crate::core::scene::{Scene, SceneContext, SceneDirector, SceneFactory, SceneKey};

// State and caching
pub use crate::core::cache::{Cache, CachePolicy, CachePriority};
pub use crate::core::game_state::{GameState, Simulation};

// Resources
pub use crate::core::resources::{Palette, PaletteProvider, ResourceManager, ResourceProvider};
