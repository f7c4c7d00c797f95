//! CLI command implementations.

mod query;

pub use query::{build_engine, run_query};
