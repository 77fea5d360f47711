use std::sync::Arc;
use std::time::Instant;
use serde_json::json;
use crate::api::cache::{CacheKey, CacheStats, ResponseCache};
use crate::core::config::Config;
use crate::core::database::Database;
use crate::core::error::{Error, ErrorKind, Result};
use crate::query::parser::{Params, QueryParser};
use crate::search::executor;
use crate::search::suppress::{suppress_if_mutation_query, suppress_mutation_keys};

/// Every request the service answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Info,
    Frequency,
    SpatiotemporalTotal,
    SpatiotemporalLineage,
    Lineages,
    Mutations,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Info,
        Operation::Frequency,
        Operation::SpatiotemporalTotal,
        Operation::SpatiotemporalLineage,
        Operation::Lineages,
        Operation::Mutations,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Operation::Info => "/info",
            Operation::Frequency => "/frequency",
            Operation::SpatiotemporalTotal => "/spatiotemporal/total",
            Operation::SpatiotemporalLineage => "/spatiotemporal/lineage",
            Operation::Lineages => "/lineages",
            Operation::Mutations => "/mutations",
        }
    }

    /// Resolves `{prefix}{path}`; anything else is `None`.
    pub fn from_path(prefix: &str, path: &str) -> Option<Self> {
        let rest = path.strip_prefix(prefix)?;
        Self::ALL.into_iter().find(|op| op.path() == rest)
    }
}

/// Answers requests against one frozen store.
pub struct Api {
    db: Arc<Database>,
    config: Config,
    cache: ResponseCache,
}

impl Api {
    pub fn new(db: Arc<Database>, config: Config) -> Result<Self> {
        db.validate_parallelism(config.parallelism)?;
        let cache = ResponseCache::new(config.cache_size);
        Ok(Api { db, config, cache })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn handle(&self, path: &str, params: &Params) -> Result<serde_json::Value> {
        let op = Operation::from_path(&self.config.path_prefix, path)
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("no such endpoint: {}", path)))?;

        let key = CacheKey::new(op, params);
        if let Some(response) = self.cache.get(&key) {
            return Ok(response);
        }

        let start = Instant::now();
        let response = self.execute(op, params)?;
        tracing::debug!(?op, took_ms = start.elapsed().as_millis() as u64, "request handled");

        self.cache.put(key, response.clone());
        Ok(response)
    }

    /// Runs `op` without consulting the cache.
    pub fn execute(&self, op: Operation, params: &Params) -> Result<serde_json::Value> {
        let db = self.db.as_ref();
        let parser = QueryParser::new(db.genes(), &self.config);
        let mut_min = self.config.mut_suppression_min;

        let response = match op {
            Operation::Info => {
                // Filters do not narrow the info response but must still be valid
                parser.parse_query(params)?;
                let info = executor::info(db);
                json!({
                    "dates": info.dates,
                    "areas": info.areas,
                    "genes": db.genes(),
                    "lastModified": db.last_modified(),
                    "maxLineages": self.config.max_lineages,
                })
            }
            Operation::Frequency => {
                let query = parser.parse_query(params)?;
                let mut index = executor::frequency(db, &query);
                suppress_mutation_keys(&mut index, mut_min);
                serde_json::to_value(index)?
            }
            Operation::SpatiotemporalTotal => {
                let query = parser.parse_query(params)?;
                serde_json::to_value(executor::totals(db, &query, mut_min))?
            }
            Operation::SpatiotemporalLineage => {
                let query = parser.parse_query(params)?;
                let mut index = executor::spatiotemporal(db, &query);
                suppress_if_mutation_query(&mut index, mut_min, &query.lineages);
                serde_json::to_value(index)?
            }
            Operation::Lineages => {
                let query = parser.parse_query(params)?;
                serde_json::to_value(executor::lineages(db, &query))?
            }
            Operation::Mutations => {
                let query = parser.parse_query(params)?;
                let opts = parser.parse_search_opts(params, &self.config);
                serde_json::to_value(executor::search_mutations(db, &query, &opts))?
            }
        };
        Ok(response)
    }
}
