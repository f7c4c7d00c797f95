//! SQLite-backed vector index reader.
//!
//! Passages live in a single `passages` table with embeddings stored as
//! little-endian f32 blobs and metadata as a JSON object. Similarity is
//! computed in Rust over every row.

use super::{rank, Passage, SearchResult, VectorStore};
use crate::config::RelevanceFunction;
use crate::error::{Result, ScriptQaError};
use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
    relevance: RelevanceFunction,
}

impl SqliteVectorStore {
    /// Open an existing index without write access.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open_read_only(path: &Path, relevance: RelevanceFunction) -> Result<Self> {
        if !path.exists() {
            return Err(ScriptQaError::VectorStore(format!(
                "Vector index not found at {}",
                path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let has_table: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'passages'",
            [],
            |row| row.get(0),
        )?;
        if has_table == 0 {
            return Err(ScriptQaError::VectorStore(format!(
                "{} has no passages table",
                path.display()
            )));
        }

        info!("Opened vector index at {:?} ({} relevance)", path, relevance);

        Ok(Self {
            conn: Mutex::new(conn),
            relevance,
        })
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    /// Parse the metadata column. Anything that is not a JSON object is
    /// treated as empty metadata.
    fn parse_metadata(id: &str, raw: Option<String>) -> Map<String, Value> {
        let Some(raw) = raw else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                debug!("Metadata for passage {} is not an object, ignoring", id);
                Map::new()
            }
            Err(e) => {
                debug!("Malformed metadata for passage {}: {}", id, e);
                Map::new()
            }
        }
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, query_embedding))]
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let conn = self.conn.lock().map_err(|e| {
            ScriptQaError::VectorStore(format!("Failed to acquire lock: {}", e))
        })?;

        let mut stmt = conn.prepare("SELECT id, content, metadata, embedding FROM passages")?;

        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let metadata: Option<String> = row.get(2)?;
            let embedding_bytes: Vec<u8> = row.get(3)?;

            Ok(Passage {
                metadata: Self::parse_metadata(&id, metadata),
                id,
                content: row.get(1)?,
                embedding: Self::bytes_to_embedding(&embedding_bytes),
            })
        })?;

        let passages = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        let results = rank(self.relevance, query_embedding, passages, limit)?;

        debug!("Found {} matching passages", results.len());
        Ok(results)
    }
}
