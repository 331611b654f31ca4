pub mod cli;
pub mod error;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use std::path::Path;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{info, warn};

use cli::{CatalogArgs, Command};
use model::{Catalog, GenerateRequest, VisualHandle};
use parser::{DecoderConfig, DirectoryAssets};
use processor::adjacency;
use processor::resolver::{ResolverConfig, TileResolver};
use processor::selector::{self, RandomSource};

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    match args.command {
        Command::Resolve {
            catalog,
            response,
            output,
            field,
            seed,
            default_handle,
        } => {
            // 1. ── Load ───────────────────────────────────────────────────────
            let catalog = load_catalog(&catalog)?;
            let body = std::fs::read_to_string(&response)
                .with_context(|| format!("Reading {}", response.display()))?;
            let grid = parser::decode_with(&body, &DecoderConfig { field })
                .with_context(|| format!("Decoding {}", response.display()))?;
            info!(layers = grid.layers().len(), cells = grid.cell_count(), "grid decoded");

            // 2. ── Resolve ────────────────────────────────────────────────────
            let config = ResolverConfig {
                default_handle: default_handle.map(VisualHandle::new),
            };
            let resolver = TileResolver::new(catalog, config);
            let skipped = resolver.build_cache().len();
            if skipped > 0 {
                warn!(skipped, "catalog entries left out of the tile cache");
            }
            let mut rng: Box<dyn RandomSource> = match seed {
                Some(seed) => Box::new(selector::seeded(seed)),
                None => Box::new(selector::thread()),
            };
            let resolved = processor::run(&grid, &resolver, rng.as_mut());

            // 3. ── Write outputs ──────────────────────────────────────────────
            std::fs::create_dir_all(&output)
                .with_context(|| format!("Creating {}", output.display()))?;
            let path = writer::json::emit(&resolved, &output).with_context(|| "Writing resolved grid")?;
            println!("{} ({} empty cells)", path.display(), resolved.empty_cells());
        }

        Command::Validate { catalog } => {
            let catalog = load_catalog(&catalog)?;
            let report = adjacency::validate(&catalog);
            let resolver = TileResolver::new(catalog, ResolverConfig::default());

            for diagnostic in resolver.build_cache() {
                println!("cache: {diagnostic:?}");
            }
            for (tile, direction, unmatched) in &report.unmatched {
                println!("rule: tile {tile} {direction}: {unmatched:?}");
            }
            for violation in &report.violations {
                println!("adjacency: {violation}");
            }
            if !report.is_success() {
                bail!("{} adjacency violations", report.violations.len());
            }
            println!("Validation Result: success");
        }

        Command::Request {
            height,
            width,
            levels,
        } => {
            let request = GenerateRequest::new(height, width, levels)?;
            println!("{}", request.to_json()?);
        }

        Command::Export { catalog, output } => {
            let catalog = load_catalog(&catalog)?;
            writer::json::emit_catalog(&catalog, &output)
                .with_context(|| format!("Writing {}", output.display()))?;
        }
    }

    Ok(())
}

/// Read a catalog document and resolve its images on disk.
fn load_catalog(args: &CatalogArgs) -> anyhow::Result<Catalog> {
    let json = std::fs::read_to_string(&args.catalog)
        .with_context(|| format!("Reading {}", args.catalog.display()))?;
    let mut catalog = parser::load_from_json(&json).with_context(|| "Parsing catalog JSON")?;

    let base = match &args.assets {
        Some(dir) => dir.clone(),
        None => args
            .catalog
            .parent()
            .map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf),
    };
    let missing = parser::attach_assets(&mut catalog, &DirectoryAssets { base });
    if !missing.is_empty() {
        warn!(count = missing.len(), "variant images could not be resolved");
    }
    info!(tiles = catalog.entries.len(), "catalog loaded");

    Ok(catalog)
}
