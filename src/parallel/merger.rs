use std::collections::HashMap;
use crate::search::results::MutationSearch;

/// Private accumulator of one search shard
#[derive(Debug, Default)]
pub struct ShardPartial {
    pub entries: HashMap<String, MutationSearch>,
    pub total: MutationSearch,
}

/// Sums shard partials into one. Runs single-threaded after every shard has
/// finished; integer sums make the result independent of shard order.
pub fn merge_partials(partials: Vec<ShardPartial>) -> ShardPartial {
    let mut merged = ShardPartial::default();

    for partial in partials {
        for (key, entry) in partial.entries {
            match merged.entries.get_mut(&key) {
                Some(existing) => existing.merge(&entry),
                None => {
                    merged.entries.insert(key, entry);
                }
            }
        }
        merged.total.merge(&partial.total);
    }

    merged
}
