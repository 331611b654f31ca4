use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::parser::grid::DEFAULT_FIELD;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a saved generator response and pick a visual for every cell
    Resolve {
        #[command(flatten)]
        catalog: CatalogArgs,
        /// Raw response body from the generator
        response: PathBuf,
        /// Output directory
        output: PathBuf,
        /// Key holding the layers → rows → cells array
        #[arg(long, default_value = DEFAULT_FIELD)]
        field: String,
        /// Seed for variant selection; omit for a fresh draw every run
        #[arg(long)]
        seed: Option<u64>,
        /// Handle substituted for ids the catalog doesn't know
        #[arg(long)]
        default_handle: Option<String>,
    },
    /// Check a catalog: unusable entries, duplicate ids, one-sided adjacency rules
    Validate {
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Print the JSON body for a generate call
    Request {
        #[arg(long, default_value_t = 20)]
        height: u32,
        #[arg(long, default_value_t = 20)]
        width: u32,
        #[arg(long, default_value_t = 1)]
        levels: u32,
    },
    /// Load a catalog and write it back out in normalised form
    Export {
        #[command(flatten)]
        catalog: CatalogArgs,
        /// Destination .json file
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Tile catalog .json document
    pub catalog: PathBuf,
    /// Directory `images_folder` is relative to (defaults to the catalog's directory)
    #[arg(long)]
    pub assets: Option<PathBuf>,
}
