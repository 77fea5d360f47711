pub mod results;
pub mod reducers;
pub mod suppress;
pub mod executor;
