use std::collections::BTreeSet;
use std::fmt;

/// Integer cell identifier; keys a grid cell into the tile catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to a loaded visual asset.
///
/// The string is whatever key the asset store hands back (for the
/// on-disk store: the full path of the image).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct VisualHandle(pub String);

impl VisualHandle {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One possible look of a tile, picked by weighted draw.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedVariant {
    /// `None` until resolved against an asset store.
    pub handle: Option<VisualHandle>,
    /// Image path relative to the catalog's images root.
    pub source_path: String,
    pub weight: f64,
}

impl WeightedVariant {
    pub fn new(source_path: impl Into<String>, weight: f64) -> Self {
        Self {
            handle: None,
            source_path: source_path.into(),
            weight,
        }
    }

    pub fn with_handle(mut self, handle: VisualHandle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Counts towards selection: resolved and strictly positive weight.
    pub fn is_eligible(&self) -> bool {
        self.handle.is_some() && self.weight > 0.0
    }
}

/// An adjacency-rule reference: a symbolic tag or a concrete tile id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleToken {
    Tag(String),
    Identifier(TileId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Allowed neighbours per direction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleSet {
    pub up: Vec<RuleToken>,
    pub down: Vec<RuleToken>,
    pub left: Vec<RuleToken>,
    pub right: Vec<RuleToken>,
}

impl RuleSet {
    pub fn get(&self, direction: Direction) -> &[RuleToken] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, direction: Direction) -> &mut Vec<RuleToken> {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

/// Full definition of one cell identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct TileEntry {
    pub id: TileId,
    pub name: String,
    pub tags: BTreeSet<String>,
    pub walkable: bool,
    /// Carried for downstream consumers; selection ignores it.
    pub weight: f64,
    pub rules: RuleSet,
    pub variants: Vec<WeightedVariant>,
}

impl TileEntry {
    pub fn new(id: TileId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tags: BTreeSet::new(),
            walkable: false,
            weight: 1.0,
            rules: RuleSet::default(),
            variants: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_variant(mut self, variant: WeightedVariant) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn with_rule(mut self, direction: Direction, token: RuleToken) -> Self {
        self.rules.get_mut(direction).push(token);
        self
    }

    /// At least one variant with a resolved handle and positive weight.
    pub fn is_valid(&self) -> bool {
        self.variants.iter().any(WeightedVariant::is_eligible)
    }
}

/// Ordered tile definitions plus the directory their images live under.
///
/// Slots may be empty (`null` records in the interchange document); ids
/// need not be unique here, the resolver sorts that out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    pub images_root: String,
    pub entries: Vec<Option<TileEntry>>,
}

impl Catalog {
    pub fn new(images_root: impl Into<String>) -> Self {
        Self {
            images_root: images_root.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: TileEntry) {
        self.entries.push(Some(entry));
    }

    /// Present entries in catalog order, skipping empty slots.
    pub fn iter(&self) -> impl Iterator<Item = &TileEntry> {
        self.entries.iter().flatten()
    }
}

impl FromIterator<TileEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = TileEntry>>(iter: I) -> Self {
        Self {
            images_root: String::new(),
            entries: iter.into_iter().map(Some).collect(),
        }
    }
}
