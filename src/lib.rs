//! scriptqa - question answering over a movie script
//!
//! A small CLI that answers questions about a movie script using a vector
//! index built ahead of time.
//!
//! # Overview
//!
//! For each question scriptqa:
//! - embeds the question with an embedding model
//! - retrieves the closest passages from the index
//! - stops with "Unable to find matching results." if the best passage is not relevant enough
//! - fills a prompt with the passages and the question and asks a chat model
//! - prints the prompt, the answer and the source of each passage
//!
//! # Architecture
//!
//! - `config` - Settings and the prompt template
//! - `embedding` - Embedding generation
//! - `vector_store` - Read-only vector index abstraction
//! - `generation` - Chat-completion models
//! - `rag` - The question answering flow
//! - `cli` - Command-line surface
//!
//! # Example
//!
//! ```rust,no_run
//! use scriptqa::cli::commands::build_engine;
//! use scriptqa::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let engine = build_engine(&settings)?;
//!
//!     let outcome = engine.ask("What does the protagonist want?").await?;
//!     outcome.write_to(&mut std::io::stdout())?;
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod openai;
pub mod rag;
pub mod vector_store;

pub use error::{Result, ScriptQaError};
