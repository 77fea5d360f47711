use std::collections::HashMap;
use crate::core::types::MUT_SEPARATOR;
use crate::query::types::QueryLineage;
use crate::search::results::{Index, MutationSearch};

/// Disclosure control: drops every cell below `min`, then any date left
/// without cells. Idempotent.
pub fn suppress(index: &mut Index, min: u64) {
    suppress_where(index, min, |_| true)
}

/// Like `suppress`, but only mutation-qualified categories ("B.1+S:X") are
/// thresholded; plain lineages are kept whatever their count.
pub fn suppress_mutation_keys(index: &mut Index, min: u64) {
    suppress_where(index, min, |key| key.contains(MUT_SEPARATOR))
}

/// Suppresses the whole index only when one of the query lineages carries
/// mutations.
pub fn suppress_if_mutation_query(index: &mut Index, min: u64, lineages: &[QueryLineage]) {
    if lineages.iter().any(|l| !l.mutations.is_empty()) {
        suppress(index, min);
    }
}

fn suppress_where<F: Fn(&str) -> bool>(index: &mut Index, min: u64, applies: F) {
    index.retain(|_, cells| {
        cells.retain(|key, count| !applies(key) || *count >= min);
        !cells.is_empty()
    });
}

/// Drops mutation entries below `min` before ranking. Returns how many went.
pub fn suppress_mutation_counts(entries: &mut HashMap<String, MutationSearch>, min: u64) -> usize {
    let before = entries.len();
    entries.retain(|_, m| m.count >= min);
    before - entries.len()
}
