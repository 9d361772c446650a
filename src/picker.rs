//! Distinct-hue picking for new ranges.
//!
//! A new range gets the base hue that is farthest from the hues already in
//! use by ranges overlapping the same month. Existing hues are first snapped
//! to the base palette so near-identical hues occupy a single slot, then the
//! remaining slots are scored against the raw hues.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing::debug;

use crate::calendar::{month_window, overlaps_window};
use crate::color::{
    BASE_HUES, PICK_LIGHTNESS, PICK_SATURATION, circular_distance, hsl_to_hex, hue_from_color,
    nearest_base_hue_index,
};
use crate::types::Range;

/// Source of the random palette index used when a month has no ranges yet.
pub trait IndexSource {
    /// Return an index in `0..len`. `len` is never zero.
    fn next_index(&mut self, len: usize) -> usize;
}

/// Draws from the thread-local RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl IndexSource for ThreadRandom {
    fn next_index(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Reproducible draws from a seeded generator.
#[derive(Debug)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom(StdRng::seed_from_u64(seed))
    }
}

impl IndexSource for SeededRandom {
    fn next_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Always returns the same index (clamped to the last valid one).
#[derive(Clone, Copy, Debug)]
pub struct FixedIndex(pub usize);

impl IndexSource for FixedIndex {
    fn next_index(&mut self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

/// Pick a `#rrggbb` color for a new range in `month` (0-based) of `year`,
/// distinct from the colors of `ranges` that overlap that month.
///
/// Never fails: unparseable colors count as hue 0, and a month that cannot be
/// represented is treated as having no overlapping ranges.
pub fn pick_distinct_hue<S>(ranges: &[Range], year: i32, month: i32, source: &mut S) -> String
where
    S: IndexSource + ?Sized,
{
    let overlapping_hues: Vec<u16> = match month_window(year, month) {
        Some((start, end)) => ranges
            .iter()
            .filter(|range| overlaps_window(range, start, end))
            .map(|range| hue_from_color(&range.color))
            .collect(),
        None => Vec::new(),
    };

    let hue = choose_hue(&overlapping_hues, source);
    debug!(
        year,
        month,
        overlapping = overlapping_hues.len(),
        hue,
        "picked hue for new range"
    );
    hsl_to_hex(f64::from(hue), PICK_SATURATION, PICK_LIGHTNESS)
}

/// Choose a base hue given the hues of the overlapping ranges.
pub fn choose_hue<S>(overlapping_hues: &[u16], source: &mut S) -> u16
where
    S: IndexSource + ?Sized,
{
    if overlapping_hues.is_empty() {
        let index = source.next_index(BASE_HUES.len()).min(BASE_HUES.len() - 1);
        return BASE_HUES[index];
    }

    let used: HashSet<usize> = overlapping_hues
        .iter()
        .map(|&hue| nearest_base_hue_index(hue))
        .collect();
    let candidates: Vec<u16> = BASE_HUES
        .iter()
        .enumerate()
        .filter(|(index, _)| !used.contains(index))
        .map(|(_, &hue)| hue)
        .collect();
    // Every slot is taken: reuse is allowed.
    let to_score: &[u16] = if candidates.is_empty() {
        &BASE_HUES
    } else {
        &candidates
    };

    let mut best_hue = to_score[0];
    let mut best_distance: Option<u16> = None;
    for &candidate in to_score {
        let min_distance = overlapping_hues
            .iter()
            .map(|&hue| circular_distance(candidate, hue))
            .min()
            .unwrap_or(180);
        // Strict comparison keeps the first candidate on ties.
        if best_distance.is_none_or(|best| min_distance > best) {
            best_distance = Some(min_distance);
            best_hue = candidate;
        }
    }
    best_hue
}
