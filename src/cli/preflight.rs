//! Pre-flight checks before any network call.
//!
//! Validates that credentials and the index are available so the query
//! fails fast with a readable message.

use crate::config::Settings;
use crate::error::{Result, ScriptQaError};
use std::path::Path;

/// Run all pre-flight checks for a query.
pub fn check(settings: &Settings) -> Result<()> {
    check_api_key(std::env::var("OPENAI_API_KEY").ok().as_deref())?;
    check_index(&settings.index_path())?;
    Ok(())
}

/// Check that an OpenAI API key is configured.
fn check_api_key(key: Option<&str>) -> Result<()> {
    match key {
        Some(key) if !key.trim().is_empty() => Ok(()),
        Some(_) => Err(ScriptQaError::Config(
            "OPENAI_API_KEY is empty. Set it in .env or with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        None => Err(ScriptQaError::Config(
            "OPENAI_API_KEY not set. Set it in .env or with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check that the vector index file exists.
fn check_index(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ScriptQaError::VectorStore(format!(
            "Vector index not found at {}. Build the index first or set vector_store.path.",
            path.display()
        )))
    }
}
