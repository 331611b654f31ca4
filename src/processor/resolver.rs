//! Id → catalog entry lookup used while resolving a grid.
//!
//! The index is built lazily on first use and only rebuilt when asked to.
//! Editing the catalog through [`TileResolver::catalog_mut`] does not
//! invalidate anything; call [`TileResolver::rebuild`] afterwards.
//!
//! Single-owner, single-thread: the lazy cell is not `Sync`.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, warn};

use crate::error::MissingTile;
use crate::model::{Catalog, TileEntry, TileId, VisualHandle};
use crate::processor::selector::{self, RandomSource};

#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    /// Substituted for ids the catalog does not know.
    pub default_handle: Option<VisualHandle>,
}

/// Something skipped while building the index. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogDiagnostic {
    /// Empty slot in the catalog.
    NullEntry { index: usize },
    /// No variant with a resolved handle and positive weight.
    InvalidEntry { index: usize, id: TileId },
    /// Id already taken by an earlier entry; the earlier one is kept.
    DuplicateId {
        index: usize,
        id: TileId,
        first_index: usize,
    },
}

#[derive(Debug)]
struct CacheIndex {
    by_id: HashMap<TileId, usize>,
    diagnostics: Vec<CatalogDiagnostic>,
}

#[derive(Debug)]
pub struct TileResolver {
    catalog: Catalog,
    config: ResolverConfig,
    cache: OnceCell<CacheIndex>,
}

impl TileResolver {
    pub fn new(catalog: Catalog, config: ResolverConfig) -> Self {
        Self {
            catalog,
            config,
            cache: OnceCell::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn is_built(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Build the index if it isn't already, returning its diagnostics.
    pub fn build_cache(&self) -> &[CatalogDiagnostic] {
        &self.index().diagnostics
    }

    /// Drop the current index and build a fresh one from the catalog.
    pub fn rebuild(&mut self) -> &[CatalogDiagnostic] {
        self.cache.take();
        self.build_cache()
    }

    pub fn has_entry(&self, id: TileId) -> bool {
        self.index().by_id.contains_key(&id)
    }

    pub fn entry(&self, id: TileId) -> Option<&TileEntry> {
        let index = *self.index().by_id.get(&id)?;
        self.catalog.entries.get(index)?.as_ref()
    }

    /// Pick a visual for `id`, or the configured default when the id is
    /// unknown. With no default the miss is reported, not raised.
    pub fn resolve(
        &self,
        id: TileId,
        rng: &mut dyn RandomSource,
    ) -> Result<VisualHandle, MissingTile> {
        match self.entry(id) {
            Some(entry) => selector::pick(entry, rng)
                .or(self.config.default_handle.as_ref())
                .cloned()
                .ok_or(MissingTile(id)),
            None => self.config.default_handle.clone().ok_or(MissingTile(id)),
        }
    }

    fn index(&self) -> &CacheIndex {
        self.cache.get_or_init(|| build_index(&self.catalog))
    }
}

fn build_index(catalog: &Catalog) -> CacheIndex {
    let mut by_id = HashMap::new();
    let mut diagnostics = Vec::new();

    for (index, slot) in catalog.entries.iter().enumerate() {
        let Some(entry) = slot else {
            warn!(index, "catalog slot is empty");
            diagnostics.push(CatalogDiagnostic::NullEntry { index });
            continue;
        };
        if !entry.is_valid() {
            warn!(index, tile = %entry.id, name = entry.name.as_str(), "tile has no usable variant");
            diagnostics.push(CatalogDiagnostic::InvalidEntry {
                index,
                id: entry.id,
            });
            continue;
        }
        match by_id.entry(entry.id) {
            Entry::Occupied(first) => {
                let first_index = *first.get();
                warn!(index, first_index, tile = %entry.id, "duplicate tile id, keeping first");
                diagnostics.push(CatalogDiagnostic::DuplicateId {
                    index,
                    id: entry.id,
                    first_index,
                });
            }
            Entry::Vacant(vacant) => {
                vacant.insert(index);
            }
        }
    }

    debug!(
        tiles = by_id.len(),
        skipped = diagnostics.len(),
        "built tile cache"
    );
    CacheIndex { by_id, diagnostics }
}
