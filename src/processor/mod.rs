//! The functional core: turning cell ids into visuals.
//!
//! `run` walks a decoded grid and asks the resolver for every cell. A
//! missing tile never stops the pass; the cell is left empty and counted.
pub mod adjacency;
pub mod resolver;
pub mod rules;
pub mod selector;

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::model::{GeneratedGrid, TileId, VisualHandle};
use resolver::TileResolver;
use selector::RandomSource;

/// Per-cell visuals, same shape as the input grid. `None` marks a cell
/// the resolver had nothing for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedGrid {
    pub layers: Vec<Vec<Vec<Option<VisualHandle>>>>,
    /// Ids that produced an empty cell, each listed once.
    pub missing: BTreeSet<TileId>,
}

impl ResolvedGrid {
    pub fn empty_cells(&self) -> usize {
        self.layers
            .iter()
            .flatten()
            .flatten()
            .filter(|cell| cell.is_none())
            .count()
    }
}

/// Resolve every cell of `grid`, layer by layer, row by row.
pub fn run(grid: &GeneratedGrid, resolver: &TileResolver, rng: &mut dyn RandomSource) -> ResolvedGrid {
    let mut missing = BTreeSet::new();

    let layers = grid
        .layers()
        .iter()
        .map(|layer| {
            layer
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|&id| match resolver.resolve(id, rng) {
                            Ok(handle) => Some(handle),
                            Err(e) => {
                                if missing.insert(id) {
                                    debug!("{e}");
                                }
                                None
                            }
                        })
                        .collect()
                })
                .collect()
        })
        .collect();

    let resolved = ResolvedGrid { layers, missing };
    if resolved.missing.is_empty() {
        info!(cells = grid.cell_count(), "grid resolved");
    } else {
        warn!(
            cells = grid.cell_count(),
            empty = resolved.empty_cells(),
            unknown_ids = ?resolved.missing,
            "grid resolved with missing tiles"
        );
    }
    resolved
}
