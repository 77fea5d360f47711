pub mod types;
pub mod matcher;
pub mod sort;
pub mod parser;
