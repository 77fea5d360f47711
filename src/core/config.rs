use std::path::{Path, PathBuf};
use serde::Deserialize;
use crate::core::error::Result;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_path: PathBuf,
    pub path_prefix: String,

    // Request limits
    pub max_lineages: usize,
    pub max_search_results: usize,
    pub max_page_size: usize,

    // Disclosure control, 0 disables
    pub suppression_min: u64,
    pub mut_suppression_min: u64,

    pub parallelism: usize,
    pub cache_size: usize,

    // Input format
    pub mutation_separator: String,
    pub mutation_list_separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from("aggregated.csv"),
            path_prefix: "/api".to_string(),
            max_lineages: 16,
            max_search_results: 32,
            max_page_size: 1000,
            suppression_min: 0,
            mut_suppression_min: 0,
            parallelism: num_cpus::get(),
            cache_size: 1000,
            mutation_separator: ":".to_string(),
            mutation_list_separator: "|".to_string(),
        }
    }
}

impl Config {
    /// Reads a JSON config; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"max_lineages": 4, "suppression_min": 5}"#).unwrap();

        let config = Config::from_json_file(&path).unwrap();
        assert_eq!(config.max_lineages, 4);
        assert_eq!(config.suppression_min, 5);
        assert_eq!(config.path_prefix, "/api");
        assert_eq!(config.mutation_separator, ":");
        assert!(config.parallelism >= 1);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = Config::from_json_file(&path).unwrap_err();
        assert_eq!(err.kind, crate::core::error::ErrorKind::Parse);
    }
}
