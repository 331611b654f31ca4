use crate::model::TileId;

/// One 2-D slice of a generated grid: rows of cell identifiers.
///
/// Always rectangular; the decoder refuses ragged input instead of
/// building one of these.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridLayer {
    pub rows: Vec<Vec<TileId>>,
}

impl GridLayer {
    pub fn new(rows: Vec<Vec<TileId>>) -> Self {
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<TileId> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }
}

/// Every layer emitted by the generator for one request, layer 0 first.
///
/// Produced once per successful decode and never edited in place; a newer
/// decode replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeneratedGrid {
    layers: Vec<GridLayer>,
}

impl GeneratedGrid {
    pub fn new(layers: Vec<GridLayer>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[GridLayer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&GridLayer> {
        self.layers.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of cells across all layers.
    pub fn cell_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.rows.iter().map(Vec::len).sum::<usize>())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<TileId> {
        raw.iter().copied().map(TileId).collect()
    }

    #[test]
    fn test_layer_dimensions() {
        let layer = GridLayer::new(vec![ids(&[1, 2, 3]), ids(&[4, 5, 6])]);
        assert_eq!(layer.height(), 2);
        assert_eq!(layer.width(), 3);
        assert_eq!(layer.get(1, 2), Some(TileId(6)));
        assert_eq!(layer.get(2, 0), None);
    }

    #[test]
    fn test_cell_count_spans_layers() {
        let grid = GeneratedGrid::new(vec![
            GridLayer::new(vec![ids(&[1, 2]), ids(&[3, 4])]),
            GridLayer::new(vec![ids(&[9])]),
        ]);
        assert_eq!(grid.cell_count(), 5);
        assert_eq!(grid.layer(1).map(GridLayer::width), Some(1));
        assert!(grid.layer(2).is_none());
        assert!(!grid.is_empty());
        assert!(GeneratedGrid::default().is_empty());
    }
}
