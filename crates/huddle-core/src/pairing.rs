#![forbid(unsafe_code)]

//! Key-based pairing between two point lists.
//!
//! [`pair`] matches the points of an outgoing frame against a target frame by
//! key and reports, for each key in either list, which side(s) it appears on.
//!
//! # Ordering
//!
//! Output order is stable and independent of hashing: every key of `to` in
//! `to` order first, then the keys that only exist in `from`, in `from` order.
//! Renderers that draw in list order therefore keep target points on top of
//! departing ones.
//!
//! # Preconditions
//!
//! Keys are unique within each list. With duplicates the pairing of the
//! repeated key is unspecified (it is not detected).

use std::collections::{HashMap, HashSet};

use crate::scene::RenderedPoint;

/// Which sides of the pairing a key appears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairKind {
    /// Present in both lists.
    Matched,
    /// Present only in the target list.
    Entering,
    /// Present only in the outgoing list.
    Leaving,
}

/// One key and its point on each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair<'a> {
    pub key: &'a str,
    pub from: Option<&'a RenderedPoint>,
    pub to: Option<&'a RenderedPoint>,
}

impl Pair<'_> {
    /// Classify this pair.
    #[must_use]
    pub fn kind(&self) -> PairKind {
        match (self.from, self.to) {
            (Some(_), Some(_)) => PairKind::Matched,
            (None, Some(_)) => PairKind::Entering,
            // Pairs are only built with at least one side present.
            (_, None) => PairKind::Leaving,
        }
    }
}

/// Pair `from` and `to` by key.
#[must_use]
pub fn pair<'a>(from: &'a [RenderedPoint], to: &'a [RenderedPoint]) -> Vec<Pair<'a>> {
    let by_key: HashMap<&str, &RenderedPoint> = from.iter().map(|p| (&*p.key, p)).collect();
    let target_keys: HashSet<&str> = to.iter().map(|p| &*p.key).collect();

    let mut pairs = Vec::with_capacity(to.len() + from.len());
    pairs.extend(to.iter().map(|t| Pair {
        key: &t.key,
        from: by_key.get(&*t.key).copied(),
        to: Some(t),
    }));
    pairs.extend(
        from.iter()
            .filter(|f| !target_keys.contains(&*f.key))
            .map(|f| Pair {
                key: &f.key,
                from: Some(f),
                to: None,
            }),
    );
    pairs
}
