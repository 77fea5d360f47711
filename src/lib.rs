pub mod core;
pub mod query;
pub mod search;
pub mod parallel;
pub mod api;

pub use crate::api::handler::{Api, Operation};
pub use crate::core::config::Config;
pub use crate::core::database::Database;
pub use crate::core::error::{Error, ErrorKind, Result};

/*
┌──────────────────────────────────── COVINDEX LAYOUT ────────────────────────────────────┐
│                                                                                          │
│  CSV ──► core::loader ──► DatabaseBuilder ──(Interner)──► Database (frozen Vec<Record>)  │
│                                                                                          │
│  request (path, params)                                                                  │
│     │                                                                                    │
│     ▼                                                                                    │
│  api::handler::Api ── Operation::from_path ── ResponseCache (lru) ── hit ──► JSON        │
│     │ miss                                                                               │
│     ▼                                                                                    │
│  query::parser ──► Query / SearchOpts (lineages sorted most specific first)              │
│     │                                                                                    │
│     ▼                                                                                    │
│  search::executor                                                                        │
│     ├─ frequency / spatiotemporal / lineages ── one fold over Scan::All                  │
│     ├─ totals ── per-lineage Index, suppressed, then merged                              │
│     └─ search_mutations                                                                  │
│          ├─ parallelism 1: one fold                                                      │
│          └─ parallelism N: rayon, Scan::Shard{i, N} ──► ShardPartial ──► merge_partials  │
│               then suppress ──► growth ──► rank ──► fixed-size page                      │
│                                                                                          │
│  search::suppress applies disclosure thresholds after aggregation                        │
└──────────────────────────────────────────────────────────────────────────────────────────┘
*/
