use std::cmp::Ordering;
use crate::query::types::QueryLineage;

/// Most specific rollup first: mutation-qualified lineages, then deeper
/// clades, then more required mutations.
pub fn compare_specificity(a: &QueryLineage, b: &QueryLineage) -> Ordering {
    let a_muts = a.mutations.len();
    let b_muts = b.mutations.len();

    match (a_muts > 0, b_muts > 0) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => b.depth().cmp(&a.depth()).then(b_muts.cmp(&a_muts)),
    }
}

pub fn sort_lineages_for_query(lineages: &mut [QueryLineage]) {
    lineages.sort_by(compare_specificity);
}
