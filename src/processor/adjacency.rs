//! Symmetry check over the catalog's adjacency rules.
//!
//! If A allows B above it, B has to allow A below it. Every pair that
//! breaks this is reported; the catalog is still usable either way.

use std::collections::HashMap;
use std::fmt;

use tracing::{info, warn};

use crate::model::{Catalog, Direction, TileId};
use crate::processor::rules::{self, UnmatchedRule};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AdjacencyViolation {
    pub tile: TileId,
    pub neighbour: TileId,
    pub direction: Direction,
}

impl fmt::Display for AdjacencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tile {} allows {} {} but not the reverse",
            self.tile, self.neighbour, self.direction
        )
    }
}

#[derive(Debug, Default)]
pub struct AdjacencyReport {
    pub violations: Vec<AdjacencyViolation>,
    /// Rule tokens that matched no tile, per owning tile.
    pub unmatched: Vec<(TileId, Direction, UnmatchedRule)>,
}

impl AdjacencyReport {
    pub fn is_success(&self) -> bool {
        self.violations.is_empty()
    }
}

pub fn validate(catalog: &Catalog) -> AdjacencyReport {
    let mut report = AdjacencyReport::default();

    // expand every (tile, direction) once; first occurrence of an id wins
    let mut allowed = HashMap::new();
    for entry in catalog.iter() {
        for direction in Direction::ALL {
            if allowed.contains_key(&(entry.id, direction)) {
                continue;
            }
            let (ids, unmatched) = rules::expand(entry.rules.get(direction), catalog);
            report
                .unmatched
                .extend(unmatched.into_iter().map(|u| (entry.id, direction, u)));
            allowed.insert((entry.id, direction), ids);
        }
    }

    let mut keys: Vec<_> = allowed.keys().copied().collect();
    keys.sort();
    for (tile, direction) in keys {
        let Some(neighbours) = allowed.get(&(tile, direction)) else {
            continue;
        };
        for &neighbour in neighbours {
            let reciprocated = allowed
                .get(&(neighbour, direction.opposite()))
                .is_some_and(|back| back.contains(&tile));
            if !reciprocated {
                report.violations.push(AdjacencyViolation {
                    tile,
                    neighbour,
                    direction,
                });
            }
        }
    }

    if report.is_success() {
        info!("adjacency rules are symmetric");
    } else {
        warn!(
            violations = report.violations.len(),
            "adjacency rules are not symmetric"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RuleToken, TileEntry};

    fn id(n: u32) -> RuleToken {
        RuleToken::Identifier(TileId(n))
    }

    #[test]
    fn test_symmetric_rules_pass() {
        let catalog: Catalog = [
            TileEntry::new(TileId(1), "grass").with_rule(Direction::Up, id(2)),
            TileEntry::new(TileId(2), "tree").with_rule(Direction::Down, id(1)),
        ]
        .into_iter()
        .collect();

        let report = validate(&catalog);
        assert!(report.is_success(), "{:?}", report.violations);
    }

    #[test]
    fn test_one_sided_rule_reported() {
        let catalog: Catalog = [
            TileEntry::new(TileId(1), "grass").with_rule(Direction::Left, id(2)),
            TileEntry::new(TileId(2), "water"),
        ]
        .into_iter()
        .collect();

        let report = validate(&catalog);
        assert_eq!(
            report.violations,
            vec![AdjacencyViolation {
                tile: TileId(1),
                neighbour: TileId(2),
                direction: Direction::Left
            }]
        );
        assert_eq!(
            report.violations[0].to_string(),
            "tile 1 allows 2 left but not the reverse"
        );
    }

    #[test]
    fn test_tag_rules_are_expanded() {
        let catalog: Catalog = [
            TileEntry::new(TileId(1), "grass")
                .with_tag("ground")
                .with_rule(Direction::Right, RuleToken::Tag("ground".into()))
                .with_rule(Direction::Left, RuleToken::Tag("ground".into())),
            TileEntry::new(TileId(2), "dirt")
                .with_tag("ground")
                .with_rule(Direction::Left, RuleToken::Tag("ground".into()))
                .with_rule(Direction::Right, RuleToken::Tag("ground".into())),
        ]
        .into_iter()
        .collect();

        assert!(validate(&catalog).is_success());
    }

    #[test]
    fn test_unmatched_tokens_collected() {
        let catalog: Catalog = [TileEntry::new(TileId(1), "grass").with_rule(Direction::Up, id(9))]
            .into_iter()
            .collect();

        let report = validate(&catalog);
        assert_eq!(
            report.unmatched,
            vec![(TileId(1), Direction::Up, UnmatchedRule::UnknownId(TileId(9)))]
        );
        assert!(report.is_success());
    }
}
