use std::fmt;
use std::sync::Arc;
use serde::{Serialize, Deserialize};

/// Separator between hierarchy levels of a pango clade, e.g. "B.1.617.2."
pub const PANGO_SEPARATOR: char = '.';

/// Joins a lineage key to its required mutations, e.g. "B.1+S:E484K"
pub const MUT_SEPARATOR: char = '+';

/// Interned string shared by every record that carries it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Value {
    pub id: usize,
    pub value: Arc<str>,
}

impl Value {
    pub fn new(id: usize, value: &str) -> Self {
        Value { id, value: Arc::from(value) }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A gene-qualified mutation such as "S:E484K".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mutation {
    pub key: String,
    pub prefix: String,
    pub suffix: String,
}

impl Mutation {
    /// Splits `raw` at the first `separator`. Returns None when the separator
    /// is missing or either side is empty.
    pub fn parse(raw: &str, separator: &str) -> Option<Self> {
        let (prefix, suffix) = raw.split_once(separator)?;
        if prefix.is_empty() || suffix.is_empty() {
            return None;
        }
        Some(Mutation {
            key: raw.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Same gene and description, regardless of how the key was spelled.
    pub fn same_as(&self, other: &Mutation) -> bool {
        self.prefix == other.prefix && self.suffix == other.suffix
    }
}

/// Aggregate count of sequences sharing (date, clade, area, mutation set).
#[derive(Debug, Clone)]
pub struct Record {
    pub date: Arc<Value>,
    pub pango_clade: Arc<Value>,
    pub area: Arc<Value>,
    pub mutations: Vec<Arc<Mutation>>,
    pub count: u64,
}

impl Record {
    pub fn date(&self) -> &str {
        self.date.as_str()
    }

    pub fn pango_clade(&self) -> &str {
        self.pango_clade.as_str()
    }

    pub fn area(&self) -> &str {
        self.area.as_str()
    }

    pub fn has_mutation(&self, mutation: &Mutation) -> bool {
        self.mutations.iter().any(|m| m.same_as(mutation))
    }
}

/// Which records a scan visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    All,
    Shard { index: usize, count: usize },
}
