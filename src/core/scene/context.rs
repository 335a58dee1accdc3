//=========================================================================
// Scene Context
//=========================================================================
//
// Shared data handed to the active scene during its update.
//
// Contains:
// - resources: palette and sound tables loaded at startup (read-only)
// - cache: the engine's memoization cache for lazily derived assets
// - director: scene transition requests
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{SceneDirector, SceneKey};
use crate::core::cache::Cache;
use crate::core::resources::ResourceTables;
use crate::error::Result;

//=== SceneContext ========================================================

/// Read-only view of engine services available to a scene update.
pub struct SceneContext<'a, S: SceneKey> {
    resources: &'a ResourceTables,
    cache: &'a Cache,
    director: &'a SceneDirector<S>,
}

impl<'a, S: SceneKey> SceneContext<'a, S> {
    pub(crate) fn new(
        resources: &'a ResourceTables,
        cache: &'a Cache,
        director: &'a SceneDirector<S>,
    ) -> Self {
        Self {
            resources,
            cache,
            director,
        }
    }

    /// Requests a transition to `key` at the next swap point.
    pub fn request_scene(&self, key: S) -> Result<()> {
        self.director.request(key)
    }

    /// Palette and sound tables.
    pub fn resources(&self) -> &'a ResourceTables {
        self.resources
    }

    /// Engine memoization cache.
    pub fn cache(&self) -> &'a Cache {
        self.cache
    }

    /// Director handle, for scenes that hand it to their own workers.
    pub fn director(&self) -> &'a SceneDirector<S> {
        self.director
    }
}
