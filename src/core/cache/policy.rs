//=========================================================================
// Cache Policy
//=========================================================================
//
// Caller-supplied expiration and priority configuration for a single
// cache entry. The default policy never expires and is removable under
// memory pressure (`Cache::trim`).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

//=== CachePriority =======================================================

/// Whether an entry survives a memory-pressure trim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePriority {
    /// Dropped by [`Cache::trim`](super::Cache::trim).
    #[default]
    Default,

    /// Kept by [`Cache::trim`](super::Cache::trim). Still honors expiration.
    NotRemovable,
}

//=== CachePolicy =========================================================

/// Eviction policy attached to a cache entry.
///
/// ```rust
/// # use cadence_engine::core::cache::{CachePolicy, CachePriority};
/// # use std::time::Duration;
/// let policy = CachePolicy::default()
///     .with_sliding_expiration(Duration::from_secs(30))
///     .with_priority(CachePriority::NotRemovable);
/// assert_eq!(policy.priority, CachePriority::NotRemovable);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CachePolicy {
    /// Entry expires at this instant regardless of use.
    pub absolute_expiration: Option<Instant>,

    /// Entry expires once it has gone unused for this long.
    pub sliding_expiration: Option<Duration>,

    /// Memory-pressure priority.
    pub priority: CachePriority,
}

impl CachePolicy {
    /// Expire at a fixed instant.
    pub fn with_absolute_expiration(mut self, at: Instant) -> Self {
        self.absolute_expiration = Some(at);
        self
    }

    /// Expire after a period without access.
    pub fn with_sliding_expiration(mut self, idle: Duration) -> Self {
        self.sliding_expiration = Some(idle);
        self
    }

    /// Sets the trim priority.
    pub fn with_priority(mut self, priority: CachePriority) -> Self {
        self.priority = priority;
        self
    }

    /// Returns true if an entry last touched at `last_access` is expired at `now`.
    pub(crate) fn is_expired(&self, last_access: Instant, now: Instant) -> bool {
        if self.absolute_expiration.is_some_and(|at| now >= at) {
            return true;
        }
        self.sliding_expiration
            .is_some_and(|idle| now.saturating_duration_since(last_access) >= idle)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
