//=========================================================================
// Scene Director
//=========================================================================
//
// Cross-thread scene requests.
//
// Architecture:
//   SceneDirector (any thread, cloneable) → bounded channel →
//   TransitionInbox::drain() (main loop, inside the guarded section)
//
// Requests only carry a key. Showing the loading indicator, building
// the scene and staging it as pending all happen on the loop thread, so
// the pending slot is never written concurrently with being read.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::SceneKey;
use crate::error::{EngineError, Result};

//=== Construction ========================================================

/// Creates a linked director / inbox pair holding at most `capacity`
/// unprocessed requests.
pub(crate) fn transition_channel<S: SceneKey>(
    capacity: usize,
) -> (SceneDirector<S>, TransitionInbox<S>) {
    let (sender, receiver) = bounded(capacity);
    (
        SceneDirector { sender },
        TransitionInbox {
            receiver,
            max_per_tick: capacity,
        },
    )
}

//=== SceneDirector =======================================================

/// Handle for requesting a scene change.
///
/// Scenes reach it through [`SceneContext`](super::SceneContext); other
/// threads get a clone from [`Engine::director`](crate::Engine::director).
/// The request is honored at the next tick's swap point.
#[derive(Debug, Clone)]
pub struct SceneDirector<S: SceneKey> {
    sender: Sender<S>,
}

impl<S: SceneKey> SceneDirector<S> {
    /// Queues a transition to `key`.
    ///
    /// Fails with [`EngineError::TransitionRejected`] if the queue is full
    /// or the engine is gone.
    pub fn request(&self, key: S) -> Result<()> {
        match self.sender.try_send(key) {
            Ok(()) => {
                debug!("Scene {:?} requested", key);
                Ok(())
            }
            Err(TrySendError::Full(key)) => {
                warn!("Transition queue full, dropping request for {:?}", key);
                Err(EngineError::TransitionRejected(format!(
                    "queue full, dropped {:?}",
                    key
                )))
            }
            Err(TrySendError::Disconnected(key)) => Err(EngineError::TransitionRejected(
                format!("engine stopped, dropped {:?}", key),
            )),
        }
    }
}

//=== TransitionInbox =====================================================

/// Loop-side end of the request channel.
pub(crate) struct TransitionInbox<S: SceneKey> {
    receiver: Receiver<S>,
    max_per_tick: usize,
}

impl<S: SceneKey> TransitionInbox<S> {
    /// Takes the pending requests in FIFO order (bounded per tick).
    pub(crate) fn drain(&mut self) -> Vec<S> {
        self.receiver.try_iter().take(self.max_per_tick).collect()
    }

    /// Number of requests waiting.
    pub(crate) fn len(&self) -> usize {
        self.receiver.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
