//! Top-N ranking over per-row scores
//!
//! Sorting is stable, so equal scores keep corpus row order.

use cinesim_core::ItemId;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// An item and its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    pub id: ItemId,
    pub score: f32,
}

/// Rank `scores` (indexed by row) descending and keep the first `top_n`,
/// skipping `exclude` if given.
pub fn top_n(scores: &[f32], top_n: usize, exclude: Option<ItemId>) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = scores
        .iter()
        .enumerate()
        .filter(|&(id, _)| Some(id) != exclude)
        .map(|(id, &score)| Ranked { id, score })
        .collect();

    ranked.sort_by_key(|r| Reverse(OrderedFloat(r.score)));
    ranked.truncate(top_n);
    ranked
}

/// Turn a caller-supplied count into a usable limit.
/// Negative requests yield zero results; large ones are capped at `available`.
#[inline]
pub fn clamp_top_n(requested: i64, available: usize) -> usize {
    usize::try_from(requested).unwrap_or(0).min(available)
}
