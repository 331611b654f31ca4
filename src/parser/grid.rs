//! Decoder for the generator's response body.
//!
//! The body carries one field whose value is a three-level nested array
//! (layers → rows → cells). We do not run a structured parser over it;
//! a single left-to-right scan with a bracket-depth counter is enough for
//! that one shape, and it stays tolerant of stray whitespace and trailing
//! separators inside rows.
//!
//! Boundaries are found the cheap way: the first occurrence of the key,
//! the first `[` after it, and the *last* `]` of the whole document. A body
//! with a second array after the grid will therefore mis-decode.

use std::mem;

use tracing::{debug, warn};

use crate::error::DecodeError;
use crate::model::{GeneratedGrid, GridLayer, TileId};

pub const DEFAULT_FIELD: &str = "grid";

#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Name of the key holding the nested array, without quotes.
    pub field: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            field: DEFAULT_FIELD.to_string(),
        }
    }
}

/// Decode with the default `"grid"` field.
pub fn decode(body: &str) -> Result<GeneratedGrid, DecodeError> {
    decode_with(body, &DecoderConfig::default())
}

pub fn decode_with(body: &str, config: &DecoderConfig) -> Result<GeneratedGrid, DecodeError> {
    let marker = format!("\"{}\"", config.field);
    let key_at = body
        .find(&marker)
        .ok_or_else(|| DecodeError::FieldNotFound(config.field.clone()))?;

    let start = body[key_at..]
        .find('[')
        .map(|i| key_at + i)
        .ok_or(DecodeError::MalformedShape("no `[` after field"))?;
    let end = body
        .rfind(']')
        .ok_or(DecodeError::MalformedShape("no closing `]`"))?;
    if end <= start {
        return Err(DecodeError::MalformedShape("closing `]` before opening `[`"));
    }

    // both delimiters are single-byte, so these are char boundaries
    let inner = &body[start + 1..end];

    let mut layers = Vec::<GridLayer>::new();
    let mut rows = Vec::<Vec<TileId>>::new();
    let mut row_buf = String::new();
    let mut depth = 0usize;

    for ch in inner.chars() {
        match ch {
            '[' => {
                depth += 1;
                if depth == 2 {
                    row_buf.clear();
                }
            }
            ']' => {
                match depth {
                    2 if !row_buf.is_empty() => {
                        rows.push(parse_row(&row_buf));
                        row_buf.clear();
                    }
                    1 if !rows.is_empty() => {
                        let layer = finish_layer(layers.len(), mem::take(&mut rows))?;
                        layers.push(layer);
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            _ if depth == 2 => row_buf.push(ch),
            _ => {}
        }
    }

    if depth != 0 {
        warn!(depth, "grid array ended with unbalanced brackets");
    }
    debug!(layers = layers.len(), "decoded grid response");

    Ok(GeneratedGrid::new(layers))
}

/// Split on `,`, trim, keep whatever parses. Empty and non-numeric
/// pieces are dropped silently.
fn parse_row(buf: &str) -> Vec<TileId> {
    buf.split(',')
        .filter_map(|piece| piece.trim().parse::<u32>().ok())
        .map(TileId)
        .collect()
}

fn finish_layer(index: usize, rows: Vec<Vec<TileId>>) -> Result<GridLayer, DecodeError> {
    let expected = rows.first().map_or(0, Vec::len);
    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
        return Err(DecodeError::RaggedLayer {
            layer: index,
            row,
            expected,
            found: r.len(),
        });
    }
    Ok(GridLayer::new(rows))
}

/// Render a grid in the shape the generator emits, wrapped in an object
/// under `field`.
pub fn encode(grid: &GeneratedGrid, field: &str) -> String {
    let layers: Vec<String> = grid
        .layers()
        .iter()
        .map(|layer| {
            let rows: Vec<String> = layer
                .rows
                .iter()
                .map(|row| {
                    let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
                    format!("[{}]", cells.join(","))
                })
                .collect();
            format!("[{}]", rows.join(","))
        })
        .collect();
    format!("{{\"{field}\":[{}]}}", layers.join(","))
}

/// Holds the most recently decoded grid.
///
/// Responses may land in any order; whichever decodes successfully last
/// wins. A failed decode leaves the stored grid untouched.
#[derive(Debug, Default)]
pub struct GridStore {
    config: DecoderConfig,
    current: Option<GeneratedGrid>,
}

impl GridStore {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    pub fn accept(&mut self, body: &str) -> Result<&GeneratedGrid, DecodeError> {
        let grid = decode_with(body, &self.config)?;
        Ok(&*self.current.insert(grid))
    }

    pub fn current(&self) -> Option<&GeneratedGrid> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layer(rows: &[&[u32]]) -> GridLayer {
        GridLayer::new(
            rows.iter()
                .map(|r| r.iter().copied().map(TileId).collect())
                .collect(),
        )
    }

    #[test]
    fn test_single_layer() {
        let grid = decode(r#"{"grid":[[[1,2],[3,4]]]}"#).expect("decodes");
        assert_eq!(grid.layers(), &[layer(&[&[1, 2], &[3, 4]])]);
    }

    #[test]
    fn test_trailing_comma_and_spaces_tolerated() {
        let grid = decode(r#"{"grid":[[[1, 2 , ],[3,4]]]}"#).expect("decodes");
        assert_eq!(grid.layers(), &[layer(&[&[1, 2], &[3, 4]])]);
    }

    #[test]
    fn test_multiple_layers_keep_order() {
        let body = "{ \"grid\" : [\n  [[0, 1],\n   [2, 3]],\n  [[7, 7],\n   [7, 8]]\n] }";
        let grid = decode(body).expect("decodes");
        assert_eq!(grid.layers().len(), 2);
        assert_eq!(grid.layers()[1], layer(&[&[7, 7], &[7, 8]]));
    }

    #[test]
    fn test_missing_field() {
        let err = decode(r#"{"tiles":[[[1]]]}"#).unwrap_err();
        assert_eq!(err, DecodeError::FieldNotFound("grid".into()));
    }

    #[test]
    fn test_field_without_array() {
        let err = decode(r#"{"grid": null}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedShape(_)), "got {err:?}");
    }

    #[test]
    fn test_closing_bracket_before_field() {
        let err = decode(r#"{"a":[1], "grid": ["#).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedShape(_)), "got {err:?}");
    }

    #[test]
    fn test_ragged_layer_rejected() {
        let err = decode(r#"{"grid":[[[1,2],[3]]]}"#).unwrap_err();
        assert_eq!(
            err,
            DecodeError::RaggedLayer {
                layer: 0,
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_whitespace_row_is_ragged() {
        let err = decode(r#"{"grid":[[[1,2],[ ]]]}"#).unwrap_err();
        assert_eq!(
            err,
            DecodeError::RaggedLayer {
                layer: 0,
                row: 1,
                expected: 2,
                found: 0
            }
        );
    }

    #[test]
    fn test_empty_brackets_row_skipped() {
        let grid = decode(r#"{"grid":[[[1,2],[],[3,4]]]}"#).expect("decodes");
        assert_eq!(grid.layers(), &[layer(&[&[1, 2], &[3, 4]])]);
    }

    #[test]
    fn test_non_numeric_cells_dropped() {
        let grid = decode(r#"{"grid":[[[1,x,2],[3,-4,4]]]}"#).expect("decodes");
        assert_eq!(grid.layers(), &[layer(&[&[1, 2], &[3, 4]])]);
    }

    #[test]
    fn test_empty_outer_array_is_empty_grid() {
        let grid = decode(r#"{"grid":[]}"#).expect("decodes");
        assert!(grid.is_empty());
    }

    #[test]
    fn test_custom_field_name() {
        let config = DecoderConfig {
            field: "map".into(),
        };
        let grid = decode_with(r#"{"status":"ok","map":[[[5]]]}"#, &config).expect("decodes");
        assert_eq!(grid.layers(), &[layer(&[&[5]])]);
    }

    #[test]
    fn test_trailing_array_after_grid_misdecodes() {
        // the last `]` belongs to "x", so "meta" is scanned as a second layer
        let grid = decode(r#"{"grid":[[[1]]],"meta":[[2]],"x":[0]}"#).expect("decodes");
        assert_eq!(grid.layers(), &[layer(&[&[1]]), layer(&[&[2]])]);
    }

    #[test]
    fn test_store_keeps_previous_on_failure() {
        let mut store = GridStore::default();
        store.accept(r#"{"grid":[[[1]]]}"#).expect("first");
        assert!(store.accept("garbage").is_err());
        assert_eq!(store.current().map(|g| g.layers().len()), Some(1));

        store.accept(r#"{"grid":[[[2]],[[3]]]}"#).expect("second");
        assert_eq!(store.current().map(|g| g.layers().len()), Some(2));
    }

    fn grid_strategy() -> impl Strategy<Value = GeneratedGrid> {
        (1usize..4, 1usize..6, 1usize..6).prop_flat_map(|(l, h, w)| {
            prop::collection::vec(
                prop::collection::vec(prop::collection::vec(any::<u32>(), w), h),
                l,
            )
            .prop_map(|layers| {
                GeneratedGrid::new(
                    layers
                        .into_iter()
                        .map(|rows| {
                            GridLayer::new(
                                rows.into_iter()
                                    .map(|r| r.into_iter().map(TileId).collect())
                                    .collect(),
                            )
                        })
                        .collect(),
                )
            })
        })
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(grid in grid_strategy()) {
            let body = encode(&grid, DEFAULT_FIELD);
            prop_assert_eq!(decode(&body).expect("decodes"), grid);
        }
    }
}
