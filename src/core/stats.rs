use std::collections::HashSet;
use serde::Serialize;
use crate::core::types::Record;

/// Summary of a loaded dataset, logged once at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatabaseStats {
    pub records: usize,
    pub total_count: u64,

    // Distinct interned values per column
    pub dates: usize,
    pub areas: usize,
    pub clades: usize,
    pub mutations: usize,
    pub genes: usize,

    pub load_ms: u64,
}

impl DatabaseStats {
    pub fn from_records(records: &[Record], mutations: usize, genes: usize, load_ms: u64) -> Self {
        let mut dates = HashSet::new();
        let mut areas = HashSet::new();
        let mut clades = HashSet::new();
        let mut total_count = 0;

        for r in records {
            dates.insert(r.date.id);
            areas.insert(r.area.id);
            clades.insert(r.pango_clade.id);
            total_count += r.count;
        }

        DatabaseStats {
            records: records.len(),
            total_count,
            dates: dates.len(),
            areas: areas.len(),
            clades: clades.len(),
            mutations,
            genes,
            load_ms,
        }
    }
}
