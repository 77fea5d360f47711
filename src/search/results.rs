use std::cmp::Ordering;
use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use crate::query::types::{GrowthWindow, SortDirection, SortProperty};

/// date -> category (area or lineage key) -> summed count
pub type Index = BTreeMap<String, BTreeMap<String, u64>>;

/// Full clade -> summed count
pub type LineageCounts = BTreeMap<String, u64>;

pub(crate) fn add_count(index: &mut Index, date: &str, key: &str, count: u64) {
    match index.get_mut(date) {
        Some(cells) => match cells.get_mut(key) {
            Some(c) => *c += count,
            None => {
                cells.insert(key.to_string(), count);
            }
        },
        None => {
            let mut cells = BTreeMap::new();
            cells.insert(key.to_string(), count);
            index.insert(date.to_string(), cells);
        }
    }
}

/// Adds every cell of `other` into `index`
pub(crate) fn merge_index(index: &mut Index, other: Index) {
    for (date, cells) in other {
        match index.get_mut(&date) {
            Some(existing) => {
                for (key, count) in cells {
                    *existing.entry(key).or_insert(0) += count;
                }
            }
            None => {
                index.insert(date, cells);
            }
        }
    }
}

/// Distinct filter values available in the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub dates: Vec<String>,
    pub areas: Vec<String>,
}

/// Prevalence of one mutation, or the total of the searched lineage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationSearch {
    pub key: String,
    pub count: u64,
    pub growth: f32,
    #[serde(skip)]
    pub growth_start: u64,
    #[serde(skip)]
    pub growth_end: u64,
}

impl MutationSearch {
    pub fn new(key: &str) -> Self {
        MutationSearch {
            key: key.to_string(),
            ..Self::default()
        }
    }

    /// A record dated on both window ends counts towards the start only.
    pub fn add(&mut self, count: u64, date: &str, window: &GrowthWindow) {
        self.count += count;
        if window.start.as_deref() == Some(date) {
            self.growth_start += count;
        } else if window.end.as_deref() == Some(date) {
            self.growth_end += count;
        }
    }

    pub fn merge(&mut self, other: &MutationSearch) {
        self.count += other.count;
        self.growth_start += other.growth_start;
        self.growth_end += other.growth_end;
    }

    /// Change in share of the lineage between window start and end.
    /// Left at zero unless both window totals are positive.
    pub fn compute_growth(&mut self, total: &MutationSearch) {
        if total.growth_start > 0 && total.growth_end > 0 {
            let start = self.growth_start as f32 / total.growth_start as f32;
            let end = self.growth_end as f32 / total.growth_end as f32;
            self.growth = end - start;
        }
    }
}

impl SortProperty {
    fn compare(self, a: &MutationSearch, b: &MutationSearch) -> Ordering {
        match self {
            SortProperty::Count => a.count.cmp(&b.count),
            SortProperty::Name => a.key.cmp(&b.key),
            SortProperty::Change => a.growth.total_cmp(&b.growth),
        }
    }
}

/// Orders by `property`, equal values by key. `Desc` reverses the whole
/// ordering, tie-break included.
pub fn rank(entries: &mut [MutationSearch], property: SortProperty, direction: SortDirection) {
    entries.sort_by(|a, b| {
        let ord = property.compare(a, b).then_with(|| a.key.cmp(&b.key));
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub total_rows: usize,
    pub total_records: u64,
    pub page: Vec<Option<MutationSearch>>,
}
