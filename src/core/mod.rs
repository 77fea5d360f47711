pub mod types;
pub mod interner;
pub mod database;
pub mod loader;
pub mod config;
pub mod error;
pub mod stats;
