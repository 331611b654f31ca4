//! Adjacency-rule tokens: string codec and expansion to tile ids.
//!
//! On the wire a rule entry is a bare string. Anything that parses as an
//! integer is an [`RuleToken::Identifier`], everything else a
//! [`RuleToken::Tag`]. A tag literally named `"12"` therefore comes back
//! as identifier 12; that is the interchange format's behaviour and we
//! keep it.

use std::collections::BTreeSet;

use tracing::warn;

use crate::model::{Catalog, RuleToken, TileId};

/// Tag that matches every entry in the catalog.
pub const WILDCARD_TAG: &str = "*";

pub fn encode_token(token: &RuleToken) -> String {
    match token {
        RuleToken::Tag(name) => name.clone(),
        RuleToken::Identifier(id) => id.to_string(),
    }
}

pub fn decode_token(raw: &str) -> RuleToken {
    match raw.parse::<u32>() {
        Ok(id) => RuleToken::Identifier(TileId(id)),
        Err(_) => RuleToken::Tag(raw.to_string()),
    }
}

pub fn encode(tokens: &[RuleToken]) -> Vec<String> {
    tokens.iter().map(encode_token).collect()
}

pub fn decode<S: AsRef<str>>(raw: &[S]) -> Vec<RuleToken> {
    raw.iter().map(|s| decode_token(s.as_ref())).collect()
}

/// A token that expanded to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnmatchedRule {
    UnknownId(TileId),
    EmptyTag(String),
}

/// Ids of every catalog entry the tokens refer to, plus the tokens that
/// matched nothing.
pub fn expand(tokens: &[RuleToken], catalog: &Catalog) -> (BTreeSet<TileId>, Vec<UnmatchedRule>) {
    let mut ids = BTreeSet::new();
    let mut unmatched = Vec::new();

    for token in tokens {
        match token {
            RuleToken::Identifier(id) => {
                if catalog.iter().any(|e| e.id == *id) {
                    ids.insert(*id);
                } else {
                    unmatched.push(UnmatchedRule::UnknownId(*id));
                }
            }
            RuleToken::Tag(tag) if tag == WILDCARD_TAG => {
                ids.extend(catalog.iter().map(|e| e.id));
            }
            RuleToken::Tag(tag) => {
                let mut matched = false;
                for entry in catalog.iter().filter(|e| e.tags.contains(tag)) {
                    ids.insert(entry.id);
                    matched = true;
                }
                if !matched {
                    warn!(tag = tag.as_str(), "zero tiles carry tag");
                    unmatched.push(UnmatchedRule::EmptyTag(tag.clone()));
                }
            }
        }
    }

    (ids, unmatched)
}
