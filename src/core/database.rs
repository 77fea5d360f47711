use std::collections::BTreeSet;
use std::ops::Range;
use std::time::Instant;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::interner::Interner;
use crate::core::stats::DatabaseStats;
use crate::core::types::{Record, Scan};

/// Anything the reducers can fold over.
///
/// `Scan::All` visits every record, `Scan::Shard` visits one contiguous slice
/// of the store. Records are always visited in store order.
pub trait RecordSource: Sync {
    fn scan<F: FnMut(&Record)>(&self, scan: Scan, f: F);

    fn record_count(&self) -> usize;
}

/// Bounds of shard `index` out of `count` over `len` records.
///
/// Consecutive shards share their boundaries so together they cover `0..len`
/// exactly once. Shards may be empty when `count > len`.
pub fn shard_range(len: usize, index: usize, count: usize) -> Range<usize> {
    if count == 0 || index >= count {
        return 0..0;
    }
    let start = index * len / count;
    let end = (index + 1) * len / count;
    start..end
}

impl RecordSource for [Record] {
    fn scan<F: FnMut(&Record)>(&self, scan: Scan, f: F) {
        let slice = match scan {
            Scan::All => self,
            Scan::Shard { index, count } => &self[shard_range(self.len(), index, count)],
        };
        slice.iter().for_each(f);
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

impl RecordSource for Vec<Record> {
    fn scan<F: FnMut(&Record)>(&self, scan: Scan, f: F) {
        self.as_slice().scan(scan, f)
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

/// Frozen, read-only record store shared by all queries.
#[derive(Debug)]
pub struct Database {
    records: Vec<Record>,
    genes: BTreeSet<String>,
    stats: DatabaseStats,
    last_modified: Option<i64>,
}

impl Database {
    pub fn builder(mutation_separator: &str) -> DatabaseBuilder {
        DatabaseBuilder::new(mutation_separator)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Genes seen in any mutation during load
    pub fn genes(&self) -> &BTreeSet<String> {
        &self.genes
    }

    pub fn has_gene(&self, gene: &str) -> bool {
        self.genes.contains(gene)
    }

    pub fn stats(&self) -> &DatabaseStats {
        &self.stats
    }

    /// Modification time of the source file in unix millis, if known
    pub fn last_modified(&self) -> Option<i64> {
        self.last_modified
    }

    /// Checks a shard count once at setup, so searches never see a bad one.
    pub fn validate_parallelism(&self, parallelism: usize) -> Result<usize> {
        if parallelism == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "parallelism must be at least 1",
            ));
        }
        Ok(parallelism)
    }
}

impl RecordSource for Database {
    fn scan<F: FnMut(&Record)>(&self, scan: Scan, f: F) {
        self.records.as_slice().scan(scan, f)
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Append-only build phase of a `Database`.
pub struct DatabaseBuilder {
    interner: Interner,
    records: Vec<Record>,
    mutation_separator: String,
    last_modified: Option<i64>,
    started: Instant,
}

impl DatabaseBuilder {
    pub fn new(mutation_separator: &str) -> Self {
        DatabaseBuilder {
            interner: Interner::new(),
            records: Vec::new(),
            mutation_separator: mutation_separator.to_string(),
            last_modified: None,
            started: Instant::now(),
        }
    }

    pub fn last_modified(mut self, millis: i64) -> Self {
        self.last_modified = Some(millis);
        self
    }

    /// Mutations must be well formed `gene<separator>description` strings.
    pub fn add_record<S: AsRef<str>>(
        &mut self,
        area: &str,
        date: &str,
        pango_clade: &str,
        mutations: &[S],
        count: u64,
    ) -> Result<()> {
        if count == 0 {
            return Err(Error::invalid_input(format!(
                "record {} {} {} has zero count",
                date, area, pango_clade
            )));
        }

        let record = Record {
            area: self.interner.intern_value(area),
            date: self.interner.intern_value(date),
            pango_clade: self.interner.intern_value(pango_clade),
            mutations: self.interner.intern_mutations(mutations, &self.mutation_separator),
            count,
        };
        self.records.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Freezes the store. Lookup tables are dropped here.
    pub fn finish(self) -> Database {
        let mutations = self.interner.mutation_count();
        let genes = self.interner.into_genes();
        let load_ms = self.started.elapsed().as_millis() as u64;
        let stats = DatabaseStats::from_records(&self.records, mutations, genes.len(), load_ms);

        tracing::info!(
            records = stats.records,
            total_count = stats.total_count,
            dates = stats.dates,
            areas = stats.areas,
            clades = stats.clades,
            mutations = stats.mutations,
            genes = stats.genes,
            load_ms,
            "database loaded"
        );

        Database {
            records: self.records,
            genes,
            stats,
            last_modified: self.last_modified,
        }
    }
}
