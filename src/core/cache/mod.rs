//=========================================================================
// Memoization Cache
//=========================================================================
//
// Thread-safe key → lazily-computed value store.
//
// Architecture:
//   Cache
//     └─ entries: RwLock<HashMap<String, Arc<Entry>>>
//                                         └─ cell: Arc<Mutex<Cell>>
//                                                   Vacant | Ready | Abandoned
//
// Flow (add_or_get_existing):
//   install-if-absent under the map lock (winner locks its fresh cell
//   before publishing it) → release map lock → realize the cell
//
// Losers of the install race block on the winner's cell, never on the
// map, so unrelated keys are realized in parallel. A failed realization
// marks the cell abandoned and unpublishes it before the cell is
// released; anyone still waiting on it retries against a clean entry.
//
// Values are type-erased (`Arc<dyn Any + Send + Sync>`), so one cache
// instance can hold palettes, sprites, sound tables side by side. A
// lookup with the wrong value type is a miss, not an error.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, warn};
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex, RwLock};

//=== Module Declarations =================================================

mod policy;

//=== Public API ==========================================================

pub use policy::{CachePolicy, CachePriority};

//=== Entry ===============================================================

type Value = Arc<dyn Any + Send + Sync>;
type CellGuard = ArcMutexGuard<RawMutex, Cell>;

enum Cell {
    /// Installed but not yet realized.
    Vacant,

    /// Realized value. Never replaced while the entry is published.
    Ready(Value),

    /// Realization failed; the entry has been unpublished.
    Abandoned,
}

struct EntryMeta {
    policy: CachePolicy,
    last_access: Instant,
}

struct Entry {
    cell: Arc<Mutex<Cell>>,
    meta: Mutex<EntryMeta>,
}

impl Entry {
    fn new(cell: Cell, policy: CachePolicy, now: Instant) -> Arc<Self> {
        Arc::new(Self {
            cell: Arc::new(Mutex::new(cell)),
            meta: Mutex::new(EntryMeta {
                policy,
                last_access: now,
            }),
        })
    }

    fn is_expired(&self, now: Instant) -> bool {
        let meta = self.meta.lock();
        meta.policy.is_expired(meta.last_access, now)
    }

    fn touch(&self, now: Instant) {
        self.meta.lock().last_access = now;
    }

    fn set_policy(&self, policy: CachePolicy) {
        self.meta.lock().policy = policy;
    }

    fn priority(&self) -> CachePriority {
        self.meta.lock().policy.priority
    }
}

//=== Cache ===============================================================

/// Thread-safe memoization cache.
///
/// Each key is computed at most once for the lifetime of its entry, even
/// when many threads ask for it at the same time. Create one per process
/// (or per subsystem) and share it by reference or `Arc`; callers never
/// lock it externally.
///
/// # Examples
///
/// ```rust
/// # use cadence_engine::core::cache::Cache;
/// let cache = Cache::new("assets");
///
/// let first = cache
///     .add_or_get_existing("answer", || Ok::<_, String>(42u32), None)
///     .unwrap();
/// let second = cache
///     .add_or_get_existing("answer", || Ok::<_, String>(7u32), None)
///     .unwrap();
///
/// assert_eq!(*first, 42);
/// assert_eq!(*second, 42);
/// ```
pub struct Cache {
    name: String,
    entries: RwLock<HashMap<String, Arc<Entry>>>,
}

impl Cache {
    //--- Construction -----------------------------------------------------

    /// Creates an empty cache. The name only appears in log output.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cache name.
    pub fn name(&self) -> &str {
        &self.name
    }

    //--- Memoization ------------------------------------------------------

    /// Returns the value stored under `key`, computing it with `factory`
    /// if no entry exists yet.
    ///
    /// Concurrent first requesters race to install an entry; only the
    /// winner's factory runs and every caller receives the winner's value.
    /// If the factory fails, the entry is removed and the error is returned
    /// unchanged, so a later call gets a clean attempt.
    ///
    /// If the existing value has a different type than `T`, the factory
    /// result is returned without being cached.
    ///
    /// The factory must not request the same key from this cache.
    pub fn add_or_get_existing<T, E, F>(
        &self,
        key: &str,
        factory: F,
        policy: Option<CachePolicy>,
    ) -> Result<Arc<T>, E>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Result<T, E>,
    {
        let (entry, mut cell) = self.claim(key, policy.unwrap_or_default());

        let ready = match &*cell {
            Cell::Ready(value) => Some(Arc::clone(value)),
            Cell::Vacant | Cell::Abandoned => None,
        };

        if let Some(value) = ready {
            drop(cell);
            entry.touch(Instant::now());

            return match value.downcast::<T>() {
                Ok(value) => Ok(value),
                Err(_) => {
                    warn!(
                        "Cache '{}': entry '{}' holds a different type, computing uncached",
                        self.name, key
                    );
                    factory().map(Arc::new)
                }
            };
        }

        // Vacant: this caller owns realization while holding the cell.
        match factory() {
            Ok(value) => {
                let value = Arc::new(value);
                let erased: Value = value.clone();
                *cell = Cell::Ready(erased);
                Ok(value)
            }
            Err(err) => {
                *cell = Cell::Abandoned;
                self.unpublish(key, &entry);
                warn!("Cache '{}': realization of '{}' failed, entry removed", self.name, key);
                Err(err)
            }
        }
    }

    /// Returns true if a live entry exists for `key`. Never realizes it.
    ///
    /// An expired entry found here is removed.
    pub fn exists(&self, key: &str) -> bool {
        self.live_entry(key, Instant::now()).is_some()
    }

    /// Returns the realized value for `key` if present and of type `T`.
    ///
    /// Blocks while another caller is realizing the entry.
    pub fn get_existing<T>(&self, key: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let now = Instant::now();
        let entry = self.live_entry(key, now)?;

        let value = match &*entry.cell.lock() {
            Cell::Ready(value) => Arc::clone(value),
            Cell::Vacant | Cell::Abandoned => return None,
        };
        entry.touch(now);

        value.downcast::<T>().ok()
    }

    /// Stores a pre-computed value.
    ///
    /// Returns `true` if the value was installed. If a live entry already
    /// exists, only its policy is replaced and `false` is returned.
    pub fn add<T>(&self, key: &str, value: T, policy: Option<CachePolicy>) -> bool
    where
        T: Any + Send + Sync,
    {
        let policy = policy.unwrap_or_default();
        let now = Instant::now();
        let mut entries = self.entries.write();

        if let Some(entry) = entries.get(key).filter(|e| !e.is_expired(now)) {
            entry.set_policy(policy);
            return false;
        }

        entries.insert(key.to_owned(), Entry::new(Cell::Ready(Arc::new(value)), policy, now));
        debug!("Cache '{}': added '{}'", self.name, key);
        true
    }

    //--- Eviction ---------------------------------------------------------

    /// Removes the entry for `key`. Returns true if one was present.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let removed = self.retain(|entry| !entry.is_expired(now));
        if removed > 0 {
            debug!("Cache '{}': purged {} expired entries", self.name, removed);
        }
        removed
    }

    /// Drops every entry not marked [`CachePriority::NotRemovable`].
    ///
    /// Models a memory-pressure sweep. Returns how many were removed.
    pub fn trim(&self) -> usize {
        let removed = self.retain(|entry| entry.priority() == CachePriority::NotRemovable);
        debug!("Cache '{}': trimmed {} entries", self.name, removed);
        removed
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of stored entries, including ones not yet realized.
    ///
    /// Expired entries count until they are accessed or purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    //--- Internal Helpers -------------------------------------------------

    fn claim(&self, key: &str, policy: CachePolicy) -> (Arc<Entry>, CellGuard) {
        loop {
            let (entry, cell) = self.install_or_get(key, policy);

            // The previous owner failed and unpublished it; install afresh.
            if matches!(*cell, Cell::Abandoned) {
                continue;
            }

            return (entry, cell);
        }
    }

    fn install_or_get(&self, key: &str, policy: CachePolicy) -> (Arc<Entry>, CellGuard) {
        let now = Instant::now();

        if let Some(entry) = self.live_entry(key, now) {
            let cell = entry.cell.lock_arc();
            return (entry, cell);
        }

        let mut entries = self.entries.write();

        // Re-check: another thread may have installed between the locks.
        if let Some(entry) = entries.get(key).filter(|e| !e.is_expired(now)).cloned() {
            drop(entries);
            let cell = entry.cell.lock_arc();
            return (entry, cell);
        }

        if entries.remove(key).is_some() {
            debug!("Cache '{}': entry '{}' expired", self.name, key);
        }

        let entry = Entry::new(Cell::Vacant, policy, now);
        // Fresh cell, uncontended: lock before anyone else can see it.
        let cell = entry.cell.lock_arc();
        entries.insert(key.to_owned(), Arc::clone(&entry));
        debug!("Cache '{}': installed '{}'", self.name, key);

        (entry, cell)
    }

    fn live_entry(&self, key: &str, now: Instant) -> Option<Arc<Entry>> {
        let entry = self.entries.read().get(key).cloned()?;

        if entry.is_expired(now) {
            self.unpublish(key, &entry);
            debug!("Cache '{}': entry '{}' expired", self.name, key);
            return None;
        }

        Some(entry)
    }

    fn unpublish(&self, key: &str, entry: &Arc<Entry>) {
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|current| Arc::ptr_eq(current, entry)) {
            entries.remove(key);
        }
    }

    fn retain(&self, mut keep: impl FnMut(&Entry) -> bool) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| keep(entry));
        before - entries.len()
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("name", &self.name)
            .field("len", &self.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
