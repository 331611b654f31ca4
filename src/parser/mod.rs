//! Text in, model out: the generator's response body and the catalog
//! interchange document.
pub mod catalog;
pub mod grid;

pub use catalog::{AssetStore, DirectoryAssets, attach_assets, load_from_json};
pub use grid::{DecoderConfig, GridStore, decode, decode_with};
