use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use crate::core::types::{Mutation, Value};

/// Load-time deduplication of dates, areas, clades and mutations.
///
/// Lives only as long as the `DatabaseBuilder`; the lookup tables are dropped
/// once the store is frozen, the gene set is handed over to the `Database`.
#[derive(Debug, Default)]
pub struct Interner {
    values: HashMap<String, Arc<Value>>,
    mutations: HashMap<String, Arc<Mutation>>,
    genes: BTreeSet<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern_value(&mut self, s: &str) -> Arc<Value> {
        if let Some(value) = self.values.get(s) {
            return value.clone();
        }
        let value = Arc::new(Value::new(self.values.len(), s));
        self.values.insert(s.to_string(), value.clone());
        value
    }

    /// Interns each raw mutation string. Input must already be well formed
    /// (`gene<separator>description`); the loader checks that.
    pub fn intern_mutations<S: AsRef<str>>(&mut self, raw: &[S], separator: &str) -> Vec<Arc<Mutation>> {
        raw.iter()
            .map(|m| self.intern_mutation(m.as_ref(), separator))
            .collect()
    }

    fn intern_mutation(&mut self, raw: &str, separator: &str) -> Arc<Mutation> {
        if let Some(m) = self.mutations.get(raw) {
            return m.clone();
        }

        let (prefix, suffix) = raw.split_once(separator).unwrap_or((raw, ""));
        if !self.genes.contains(prefix) {
            self.genes.insert(prefix.to_string());
        }

        let mutation = Arc::new(Mutation {
            key: raw.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        });
        self.mutations.insert(raw.to_string(), mutation.clone());
        mutation
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.len()
    }

    pub fn genes(&self) -> &BTreeSet<String> {
        &self.genes
    }

    /// Consumes the interner, keeping only the discovered gene set.
    pub fn into_genes(self) -> BTreeSet<String> {
        self.genes
    }
}
