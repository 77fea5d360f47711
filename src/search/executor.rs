use std::time::Instant;
use rayon::prelude::*;
use crate::core::database::RecordSource;
use crate::core::types::Scan;
use crate::parallel::merger::{merge_partials, ShardPartial};
use crate::query::types::{Query, SearchOpts};
use crate::search::reducers;
use crate::search::results::{rank, Index, Info, LineageCounts, MutationSearch, SearchResult};
use crate::search::suppress::suppress_mutation_counts;

/// Frequency time series over the whole store
pub fn frequency<S: RecordSource + ?Sized>(source: &S, query: &Query) -> Index {
    let start = Instant::now();
    let mut index = Index::new();
    source.scan(Scan::All, |r| reducers::frequency(&mut index, query, r));
    tracing::debug!(took_ms = start.elapsed().as_millis() as u64, "frequency aggregation");
    index
}

pub fn spatiotemporal<S: RecordSource + ?Sized>(source: &S, query: &Query) -> Index {
    let start = Instant::now();
    let mut index = Index::new();
    source.scan(Scan::All, |r| reducers::spatiotemporal(&mut index, query, r));
    tracing::debug!(took_ms = start.elapsed().as_millis() as u64, "spatiotemporal aggregation");
    index
}

pub fn totals<S: RecordSource + ?Sized>(source: &S, query: &Query, mut_suppression_min: u64) -> Index {
    let start = Instant::now();
    let index = reducers::totals(source, query, mut_suppression_min);
    tracing::debug!(took_ms = start.elapsed().as_millis() as u64, "totals aggregation");
    index
}

pub fn lineages<S: RecordSource + ?Sized>(source: &S, query: &Query) -> LineageCounts {
    let start = Instant::now();
    let mut counts = LineageCounts::new();
    source.scan(Scan::All, |r| reducers::lineages(&mut counts, query, r));
    tracing::debug!(took_ms = start.elapsed().as_millis() as u64, "lineages aggregation");
    counts
}

pub fn info<S: RecordSource + ?Sized>(source: &S) -> Info {
    reducers::info(source)
}

/// Ranked, paged mutation prevalence within `opts.lineage`.
///
/// With `opts.parallelism > 1` the store is split into that many contiguous
/// shards, each folded on its own rayon worker into a private accumulator;
/// partials are summed after all shards finish. The result is identical to
/// the sequential fold.
pub fn search_mutations<S: RecordSource + ?Sized>(source: &S, query: &Query, opts: &SearchOpts) -> SearchResult {
    let start = Instant::now();
    let ShardPartial { mut entries, total } = if opts.parallelism > 1 {
        let count = opts.parallelism;
        let partials: Vec<ShardPartial> = (0..count)
            .into_par_iter()
            .map(|index| {
                let mut partial = ShardPartial::default();
                source.scan(Scan::Shard { index, count }, |r| {
                    reducers::mutations(&mut partial.entries, &mut partial.total, opts, query, r)
                });
                partial
            })
            .collect();

        let summing = Instant::now();
        let merged = merge_partials(partials);
        tracing::debug!(shards = count, took_ms = summing.elapsed().as_millis() as u64, "summing");
        merged
    } else {
        let mut partial = ShardPartial::default();
        source.scan(Scan::All, |r| {
            reducers::mutations(&mut partial.entries, &mut partial.total, opts, query, r)
        });
        partial
    };
    tracing::debug!(
        mutations = entries.len(),
        took_ms = start.elapsed().as_millis() as u64,
        "mutation aggregation"
    );

    let sorting = Instant::now();
    let suppressed = suppress_mutation_counts(&mut entries, opts.suppression_min);

    let mut ranked: Vec<MutationSearch> = entries
        .into_values()
        .map(|mut m| {
            m.compute_growth(&total);
            m
        })
        .collect();
    rank(&mut ranked, opts.sort_property, opts.sort_direction);

    let total_rows = ranked.len();
    let mut page: Vec<Option<MutationSearch>> = ranked
        .into_iter()
        .skip(opts.skip)
        .take(opts.limit)
        .map(Some)
        .collect();
    page.resize(opts.limit, None);

    tracing::debug!(suppressed, took_ms = sorting.elapsed().as_millis() as u64, "sorting");

    SearchResult {
        total_rows,
        total_records: total.count,
        page,
    }
}
