//=========================================================================
// Engine Errors
//=========================================================================
//
// Single error type shared by the main loop and its collaborators.
//
// The loop is fail-fast: any error raised inside a tick (state update,
// scene update, swap, render) propagates out of `Engine::run` unchanged.
// Clock anomalies and stalls are flow control, not errors, and never
// appear here.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== EngineError =========================================================

/// Errors produced by the engine core and its collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The render surface failed (clear, draw, sync, sprite load, pump).
    ///
    /// Returned by `RenderWindow` backends; the engine passes it through.
    #[error("render surface error: {0}")]
    Render(String),

    /// The scene factory could not build the requested scene.
    ///
    /// The engine wraps any other factory error in this variant.
    #[error("failed to construct scene {scene}: {reason}")]
    SceneConstruction {
        /// Debug name of the requested scene key.
        scene: String,
        /// Factory-supplied failure description.
        reason: String,
    },

    /// An active scene failed during update or render.
    #[error("scene failure: {0}")]
    Scene(String),

    /// A resource could not be read or decoded by a collaborator.
    #[error("resource {path} unavailable: {reason}")]
    Resource {
        /// Archive path of the resource.
        path: String,
        /// Collaborator-supplied failure description.
        reason: String,
    },

    /// A sound descriptor row could not be parsed.
    #[error("malformed sound descriptor on line {line}: {reason}")]
    MalformedSoundRow {
        /// 1-based line number inside the descriptor file.
        line: usize,
        /// What was wrong with the row.
        reason: String,
    },

    /// A tick ran before any scene was activated.
    #[error("no scene is active")]
    NoActiveScene,

    /// A scene request could not be queued.
    #[error("scene transition rejected: {0}")]
    TransitionRejected(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

//=========================================================================
// Unit Tests
//=========================================================================
