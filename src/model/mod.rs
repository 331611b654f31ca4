//! In-memory data model shared by the parser, processor and writers.
//!
//! Everything here is plain data; the behaviour lives in `processor`.
pub mod grid;
pub mod request;
pub mod tile;

pub use grid::{GeneratedGrid, GridLayer};
pub use request::GenerateRequest;
pub use tile::{
    Catalog, Direction, RuleSet, RuleToken, TileEntry, TileId, VisualHandle, WeightedVariant,
};
