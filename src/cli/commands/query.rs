//! Query command implementation.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::{PromptTemplate, Settings};
use crate::embedding::OpenAIEmbedder;
use crate::generation::OpenAIChatModel;
use crate::rag::RagEngine;
use crate::vector_store::SqliteVectorStore;
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;

/// Wire the production embedder, index and chat model into an engine.
pub fn build_engine(settings: &Settings) -> Result<RagEngine> {
    let index_path = settings.index_path();
    let vector_store = Arc::new(
        SqliteVectorStore::open_read_only(&index_path, settings.vector_store.relevance)
            .with_context(|| format!("Failed to open vector index {}", index_path.display()))?,
    );

    let embedder = Arc::new(OpenAIEmbedder::from_settings(&settings.embedding, settings.api_base())?);
    let chat_model = Arc::new(OpenAIChatModel::from_settings(&settings.rag, settings.api_base())?);
    let prompt = PromptTemplate::load(settings.prompts.custom_dir.as_deref())?;

    Ok(RagEngine::new(vector_store, embedder, chat_model)
        .with_settings(&settings.rag)
        .with_prompt(prompt))
}

/// Run the query command.
pub async fn run_query(query_text: &str, settings: &Settings) -> Result<()> {
    if let Err(e) = preflight::check(settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let engine = build_engine(settings)?;

    let spinner = Output::spinner("Searching the script...");
    let outcome = engine.ask(query_text).await;
    spinner.finish_and_clear();

    let outcome = outcome.context("Query failed")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    outcome.write_to(&mut out)?;
    out.flush()?;

    Ok(())
}
