//=========================================================================
// Resource Tables
//=========================================================================
//
// Startup bulk-load of palettes and sound descriptors.
//
// Architecture:
//   ResourceProvider (archive listing + text files)
//   ResourceManager  (palette decoding)
//        │
//        ▼  load_palettes() / load_sound_table()      once, at startup
//   ResourceTables { palettes, sounds }                read-only afterwards
//
// Palette decoding goes through the memoization cache, so loading the
// same archive path twice (a reload, a second engine sharing the cache)
// never decodes it again.
//
//=========================================================================

//=== Module Declarations =================================================

mod sound_entry;

//=== Public API ==========================================================

pub use sound_entry::SoundEntry;

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::cache::Cache;
use crate::error::Result;

//=== Collaborator Traits =================================================

/// Archive access used during startup.
pub trait ResourceProvider: Send {
    /// Every file path in every mounted archive.
    fn files(&self) -> Vec<String>;

    /// Lines of a text file.
    fn text_file(&self, path: &str) -> Result<Vec<String>>;
}

/// Asset decoding used during startup.
pub trait ResourceManager: Send {
    /// Decodes the palette stored at `path`.
    fn palette(&self, path: &str) -> Result<Palette>;
}

/// Lookup of loaded palettes by name.
pub trait PaletteProvider {
    /// Returns the palette called `name`, if loaded.
    fn palette(&self, name: &str) -> Option<&Palette>;
}

//=== Palette =============================================================

/// Decoded 256-color palette.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    /// RGB triples in palette index order.
    pub colors: Vec<[u8; 3]>,
}

impl Palette {
    /// Wraps decoded colors.
    pub fn new(colors: Vec<[u8; 3]>) -> Self {
        Self { colors }
    }
}

//=== ResourceTables ======================================================

/// Palette and sound tables populated once at startup.
#[derive(Debug, Default)]
pub struct ResourceTables {
    palettes: HashMap<String, Arc<Palette>>,
    sounds: HashMap<String, SoundEntry>,
}

impl ResourceTables {
    //--- Loading ----------------------------------------------------------

    /// Loads every palette file under `prefix` ending in `extension`.
    ///
    /// A palette is named after its parent directory
    /// (`data\global\palette\act1\pal.dat` → `act1`). Returns the number
    /// of palettes loaded.
    pub fn load_palettes(
        &mut self,
        provider: &dyn ResourceProvider,
        manager: &dyn ResourceManager,
        cache: &Cache,
        prefix: &str,
        extension: &str,
    ) -> Result<usize> {
        info!("Loading palettes");

        let mut loaded = 0;
        for path in provider.files() {
            if !path.starts_with(prefix) || !path.ends_with(extension) {
                continue;
            }

            let Some(name) = palette_name(&path) else {
                warn!("Palette path {} has no parent directory, skipping", path);
                continue;
            };

            let palette = cache.add_or_get_existing(
                &format!("palette:{}", path),
                || manager.palette(&path),
                None,
            )?;

            debug!("Loaded palette {} from {}", name, path);
            self.palettes.insert(name.to_owned(), palette);
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Loads the tab-separated sound descriptor table at `path`.
    ///
    /// The first row is a header; blank rows are ignored. A later row with
    /// the same handle replaces an earlier one. Returns the number of rows
    /// parsed.
    pub fn load_sound_table(&mut self, provider: &dyn ResourceProvider, path: &str) -> Result<usize> {
        info!("Loading sound configuration data");

        let rows = provider.text_file(path)?;
        let mut parsed = 0;

        for (idx, row) in rows.iter().enumerate().skip(1) {
            if row.trim().is_empty() {
                continue;
            }

            let entry = SoundEntry::from_row(row, idx + 1)?;
            self.sounds.insert(entry.handle.clone(), entry);
            parsed += 1;
        }

        debug!("Parsed {} sound descriptors from {}", parsed, path);
        Ok(parsed)
    }

    //--- Queries ----------------------------------------------------------

    /// Sound descriptor for `handle`.
    pub fn sound(&self, handle: &str) -> Option<&SoundEntry> {
        self.sounds.get(handle)
    }

    /// Shared handle to a palette, for consumers that outlive the tables.
    pub fn palette_arc(&self, name: &str) -> Option<Arc<Palette>> {
        self.palettes.get(name).cloned()
    }

    /// Number of loaded palettes.
    pub fn palette_count(&self) -> usize {
        self.palettes.len()
    }

    /// Number of loaded sound descriptors.
    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }
}

impl PaletteProvider for ResourceTables {
    fn palette(&self, name: &str) -> Option<&Palette> {
        self.palettes.get(name).map(Arc::as_ref)
    }
}

//=== Helpers =============================================================

fn palette_name(path: &str) -> Option<&str> {
    let mut segments = path.rsplit('\\');
    segments.next()?;
    segments.next().filter(|name| !name.is_empty())
}

//=========================================================================
// Unit Tests
//=========================================================================
