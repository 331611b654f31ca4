//! Tile catalog ⇄ interchange document.
//!
//! The document is what the authoring tool exports:
//!
//! ```json
//! { "images_folder": "tiles/",
//!   "patterns": [ { "id": 1, "name": "grass", "tags": ["ground"],
//!                   "is_walkable": 1, "weight": 1.0,
//!                   "rules": { "up": ["ground", "3"], "down": [], "left": [], "right": [] },
//!                   "patterns": [ { "image_path": "grass_0.png", "weight": 2.0 } ] } ] }
//! ```
//!
//! Visual handles are not part of the document. After loading, run
//! [`attach_assets`] to resolve each variant's path against an asset store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::model::{Catalog, RuleSet, RuleToken, TileEntry, TileId, VisualHandle, WeightedVariant};
use crate::processor::rules;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub images_folder: String,
    pub patterns: Vec<Option<PatternRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// 0 or 1; anything non-zero reads as walkable.
    #[serde(default)]
    pub is_walkable: u64,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub rules: RulesRecord,
    #[serde(default)]
    pub patterns: Vec<ImageRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RulesRecord {
    #[serde(default)]
    pub up: Vec<RuleValue>,
    #[serde(default)]
    pub down: Vec<RuleValue>,
    #[serde(default)]
    pub left: Vec<RuleValue>,
    #[serde(default)]
    pub right: Vec<RuleValue>,
}

/// Rule entries are written as strings, but older exports used bare
/// numbers for ids; both are accepted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Number(u32),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub image_path: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

pub fn to_document(catalog: &Catalog) -> CatalogDocument {
    CatalogDocument {
        images_folder: catalog.images_root.clone(),
        patterns: catalog
            .entries
            .iter()
            .map(|slot| slot.as_ref().map(to_record))
            .collect(),
    }
}

fn to_record(entry: &TileEntry) -> PatternRecord {
    let encode = |tokens: &[RuleToken]| -> Vec<RuleValue> {
        rules::encode(tokens).into_iter().map(RuleValue::Text).collect()
    };
    PatternRecord {
        id: entry.id.0,
        name: entry.name.clone(),
        tags: entry.tags.iter().cloned().collect(),
        is_walkable: u64::from(entry.walkable),
        weight: entry.weight,
        rules: RulesRecord {
            up: encode(&entry.rules.up),
            down: encode(&entry.rules.down),
            left: encode(&entry.rules.left),
            right: encode(&entry.rules.right),
        },
        patterns: entry
            .variants
            .iter()
            .map(|v| ImageRecord {
                image_path: v.source_path.clone(),
                weight: v.weight,
            })
            .collect(),
    }
}

pub fn from_document(doc: CatalogDocument) -> Catalog {
    Catalog {
        images_root: doc.images_folder,
        entries: doc
            .patterns
            .into_iter()
            .map(|slot| slot.map(from_record))
            .collect(),
    }
}

fn from_record(record: PatternRecord) -> TileEntry {
    let decode = |values: Vec<RuleValue>| -> Vec<RuleToken> {
        values
            .into_iter()
            .map(|v| match v {
                RuleValue::Number(id) => RuleToken::Identifier(TileId(id)),
                RuleValue::Text(raw) => rules::decode_token(&raw),
            })
            .collect()
    };
    TileEntry {
        id: TileId(record.id),
        name: record.name,
        tags: record.tags.into_iter().collect(),
        walkable: record.is_walkable != 0,
        weight: record.weight,
        rules: RuleSet {
            up: decode(record.rules.up),
            down: decode(record.rules.down),
            left: decode(record.rules.left),
            right: decode(record.rules.right),
        },
        variants: record
            .patterns
            .into_iter()
            .map(|p| WeightedVariant::new(p.image_path, p.weight))
            .collect(),
    }
}

pub fn load_from_json(json: &str) -> Result<Catalog, CatalogError> {
    let doc: CatalogDocument = serde_json::from_str(json)?;
    debug!(patterns = doc.patterns.len(), "catalog document parsed");
    Ok(from_document(doc))
}

pub fn to_json(catalog: &Catalog) -> Result<String, CatalogError> {
    Ok(serde_json::to_string_pretty(&to_document(catalog))?)
}

// ─────────────────────────────────────────────────────
// Asset resolution
// ─────────────────────────────────────────────────────

/// Turns a variant's source path into a loadable handle.
pub trait AssetStore {
    fn lookup(&self, images_root: &str, source_path: &str) -> Option<VisualHandle>;
}

impl<F> AssetStore for F
where
    F: Fn(&str, &str) -> Option<VisualHandle>,
{
    fn lookup(&self, images_root: &str, source_path: &str) -> Option<VisualHandle> {
        self(images_root, source_path)
    }
}

/// Resolves images that exist on disk under `base`/`images_root`.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    pub base: PathBuf,
}

impl AssetStore for DirectoryAssets {
    fn lookup(&self, images_root: &str, source_path: &str) -> Option<VisualHandle> {
        let path = self.base.join(images_root).join(source_path);
        path.is_file()
            .then(|| VisualHandle::new(path.to_string_lossy().into_owned()))
    }
}

/// Fill in every variant's handle. Returns the source paths that could
/// not be resolved; their handles stay `None`.
pub fn attach_assets(catalog: &mut Catalog, store: &dyn AssetStore) -> Vec<String> {
    let mut missing = Vec::new();
    let root = catalog.images_root.clone();

    for entry in catalog.entries.iter_mut().flatten() {
        for variant in &mut entry.variants {
            variant.handle = store.lookup(&root, &variant.source_path);
            if variant.handle.is_none() {
                warn!(tile = %entry.id, path = variant.source_path.as_str(), "image not found");
                missing.push(variant.source_path.clone());
            }
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;

    const DOC: &str = r#"{
        "images_folder": "tiles/",
        "patterns": [
            {
                "id": 1, "name": "grass", "tags": ["ground", "soft"],
                "is_walkable": 1, "weight": 0.5,
                "rules": { "up": ["ground", 2], "down": ["7"], "left": [], "right": ["*"] },
                "patterns": [
                    { "image_path": "grass_0.png", "weight": 2.0 },
                    { "image_path": "grass_1.png", "weight": 1.0 }
                ]
            },
            null,
            { "id": 2, "name": "rock", "patterns": [ { "image_path": "rock.png" } ] }
        ]
    }"#;

    #[test]
    fn test_load_document() {
        let catalog = load_from_json(DOC).expect("loads");
        assert_eq!(catalog.images_root, "tiles/");
        assert_eq!(catalog.entries.len(), 3);
        assert!(catalog.entries[1].is_none());

        let grass = catalog.entries[0].as_ref().expect("grass");
        assert!(grass.walkable);
        assert!(grass.tags.contains("soft"));
        assert_eq!(
            grass.rules.get(Direction::Up),
            &[RuleToken::Tag("ground".into()), RuleToken::Identifier(TileId(2))]
        );
        assert_eq!(grass.rules.down, vec![RuleToken::Identifier(TileId(7))]);
        assert_eq!(grass.variants[0].source_path, "grass_0.png");
        assert!(grass.variants.iter().all(|v| v.handle.is_none()));

        let rock = catalog.entries[2].as_ref().expect("rock");
        assert!(!rock.walkable);
        assert_eq!(rock.variants[0].weight, 1.0);
    }

    #[test]
    fn test_document_round_trip_keeps_content() {
        let catalog = load_from_json(DOC).expect("loads");
        let json = to_json(&catalog).expect("serialises");
        let reloaded = load_from_json(&json).expect("reloads");
        assert_eq!(reloaded, catalog);
    }

    #[test]
    fn test_walkable_written_as_integer() {
        let mut entry = TileEntry::new(TileId(4), "path");
        entry.walkable = true;
        let catalog: Catalog = [entry].into_iter().collect();
        let value = serde_json::to_value(to_document(&catalog)).expect("value");
        assert_eq!(value["patterns"][0]["is_walkable"], serde_json::json!(1));
    }

    #[test]
    fn test_rules_written_as_strings() {
        let entry = TileEntry::new(TileId(4), "path").with_rule(Direction::Left, RuleToken::Identifier(TileId(9)));
        let catalog: Catalog = [entry].into_iter().collect();
        let value = serde_json::to_value(to_document(&catalog)).expect("value");
        assert_eq!(value["patterns"][0]["rules"]["left"], serde_json::json!(["9"]));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(load_from_json("{"), Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_attach_assets_reports_missing() {
        let mut catalog = load_from_json(DOC).expect("loads");
        let store = |root: &str, path: &str| {
            (path != "grass_1.png").then(|| VisualHandle::new(format!("{root}{path}")))
        };
        let missing = attach_assets(&mut catalog, &store);

        assert_eq!(missing, vec!["grass_1.png".to_string()]);
        let grass = catalog.entries[0].as_ref().expect("grass");
        assert_eq!(grass.variants[0].handle, Some(VisualHandle::new("tiles/grass_0.png")));
        assert!(grass.is_valid());
    }

    #[test]
    fn test_directory_assets_resolve_existing_files() {
        let base = std::env::temp_dir().join(format!("tilegrid-assets-{}", std::process::id()));
        let images = base.join("tiles");
        std::fs::create_dir_all(&images).unwrap();
        std::fs::write(images.join("grass_0.png"), b"png").unwrap();

        let store = DirectoryAssets { base: base.clone() };
        let found = store.lookup("tiles/", "grass_0.png");
        let missing = store.lookup("tiles/", "grass_1.png");
        std::fs::remove_dir_all(&base).unwrap();

        let expected = images.join("grass_0.png");
        assert_eq!(found, Some(VisualHandle::new(expected.to_string_lossy().into_owned())));
        assert_eq!(missing, None);
    }
}
