//! Error types for the decode / load / resolve stages.
//!
//! Decode failures are terminal for one attempt. [`MissingTile`] is the
//! per-cell, recoverable one: callers substitute and keep going.

use crate::model::TileId;

/// Why a response body could not be turned into a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The configured key marker does not occur in the body.
    #[error("field `{0}` not found in response body")]
    FieldNotFound(String),

    /// Outer array delimiters missing or out of order.
    #[error("malformed grid shape: {0}")]
    MalformedShape(&'static str),

    /// A row's length differs from the first row of its layer.
    #[error("layer {layer} row {row} has {found} cells, expected {expected}")]
    RaggedLayer {
        layer: usize,
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Problems turning an interchange document into a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid catalog document: {0}")]
    Json(#[from] serde_json::Error),
}

/// No entry for this id and no default handle configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no tile registered for id {0}")]
pub struct MissingTile(pub TileId);
