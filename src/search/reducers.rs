//! Per-record folds. Each one only adds counts, so the result does not
//! depend on the order records are visited in.

use std::collections::{BTreeSet, HashMap};
use crate::core::database::RecordSource;
use crate::core::types::{Record, Scan};
use crate::query::matcher::{match_lineages, match_metadata, position_lineage};
use crate::query::types::{Query, SearchOpts};
use crate::search::results::{add_count, merge_index, Index, Info, LineageCounts, MutationSearch};
use crate::search::suppress::suppress;

/// Time series: `index[date][lineage key] += count`
pub fn frequency(index: &mut Index, query: &Query, record: &Record) {
    if !match_metadata(record, query) {
        return;
    }
    if let Some(key) = match_lineages(record, &query.lineages) {
        add_count(index, record.date(), key, record.count);
    }
}

/// Map breakdown: `index[date][area] += count`. A record matching any
/// excluded lineage is dropped even if it also matches a target.
pub fn spatiotemporal(index: &mut Index, query: &Query, record: &Record) {
    if match_lineages(record, &query.excluding).is_some() {
        return;
    }
    if match_lineages(record, &query.lineages).is_some() {
        add_count(index, record.date(), record.area(), record.count);
    }
}

/// Totals per full clade code, ignoring the query's rollups.
pub fn lineages(counts: &mut LineageCounts, query: &Query, record: &Record) {
    if !match_metadata(record, query) {
        return;
    }
    match counts.get_mut(record.pango_clade()) {
        Some(c) => *c += record.count,
        None => {
            counts.insert(record.pango_clade().to_string(), record.count);
        }
    }
}

/// Mutation prevalence within the searched lineage `opts.lineage`.
pub fn mutations(
    entries: &mut HashMap<String, MutationSearch>,
    total: &mut MutationSearch,
    opts: &SearchOpts,
    query: &Query,
    record: &Record,
) {
    if !match_metadata(record, query) {
        return;
    }
    match match_lineages(record, &query.lineages) {
        Some(key) if key == opts.lineage => {}
        _ => return,
    }

    let date = record.date();
    total.add(record.count, date, &opts.growth);

    for m in &record.mutations {
        if let Some(gene) = &query.prefix {
            if *gene != m.prefix {
                continue;
            }
        }
        if let Some(filter) = &query.suffix_filter {
            if !m.suffix.contains(filter.as_str()) {
                continue;
            }
        }
        match entries.get_mut(&m.key) {
            Some(entry) => entry.add(record.count, date, &opts.growth),
            None => {
                let mut entry = MutationSearch::new(&m.key);
                entry.add(record.count, date, &opts.growth);
                entries.insert(m.key.clone(), entry);
            }
        }
    }
}

/// Spatiotemporal totals across all query lineages.
///
/// Each lineage gets its own `date -> area` index. Mutation-qualified ones
/// are suppressed on their own counts before everything is summed, so a
/// small mutation group cannot hide inside a larger combined cell.
pub fn totals<S: RecordSource + ?Sized>(source: &S, query: &Query, mut_suppression_min: u64) -> Index {
    let mut per_lineage: Vec<Index> = vec![Index::new(); query.lineages.len()];

    source.scan(Scan::All, |r| {
        if let Some(i) = position_lineage(r, &query.lineages) {
            add_count(&mut per_lineage[i], r.date(), r.area(), r.count);
        }
    });

    if mut_suppression_min > 0 {
        for (lineage, index) in query.lineages.iter().zip(per_lineage.iter_mut()) {
            if !lineage.mutations.is_empty() {
                suppress(index, mut_suppression_min);
            }
        }
    }

    let mut combined = Index::new();
    for index in per_lineage {
        merge_index(&mut combined, index);
    }
    combined
}

/// Every distinct date and area, sorted.
pub fn info<S: RecordSource + ?Sized>(source: &S) -> Info {
    let mut dates = BTreeSet::new();
    let mut areas = BTreeSet::new();

    source.scan(Scan::All, |r| {
        if !dates.contains(r.date()) {
            dates.insert(r.date().to_string());
        }
        if !areas.contains(r.area()) {
            areas.insert(r.area().to_string());
        }
    });

    Info {
        dates: dates.into_iter().collect(),
        areas: areas.into_iter().collect(),
    }
}
