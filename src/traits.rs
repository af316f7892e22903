//! Seams between the sync pipeline and its two collaborators.
//!
//! ```text
//! ┌─────────────┐  fetch(n)  ┌─────────────────┐  import   ┌─────────────┐
//! │  RowSource  │ ─────────▶ │ sync_collection │ ────────▶ │ SearchIndex │
//! │ PgRowCursor │            │   to_document   │           │  Typesense  │
//! └─────────────┘            └─────────────────┘           └─────────────┘
//! ```
//!
//! Jobs receive both collaborators as parameters, so tests can drive the
//! full extract/transform/load loop against in-memory fakes.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::typesense::ImportResult;

/// A paginated stream of fixed-shape rows.
///
/// # Example
///
/// ```rust
/// use anyhow::Result;
/// use async_trait::async_trait;
/// use typesense_sync::traits::RowSource;
///
/// struct VecSource(Vec<u32>);
///
/// #[async_trait]
/// impl RowSource<u32> for VecSource {
///     async fn fetch(&mut self, n: usize) -> Result<Vec<u32>> {
///         let n = n.min(self.0.len());
///         Ok(self.0.drain(..n).collect())
///     }
///
///     async fn close(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait RowSource<R: Send>: Send {
    /// Fetch up to `n` further rows. An empty vector means the stream is exhausted.
    async fn fetch(&mut self, n: usize) -> Result<Vec<R>>;

    /// Release the underlying resources. Called exactly once at job end,
    /// whether the job succeeded or not.
    async fn close(&mut self) -> Result<()>;
}

/// The subset of the search service used by the pipeline.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Names of the collections that currently exist.
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Create a collection from a full schema definition.
    async fn create_collection(&self, schema: &Value) -> Result<()>;

    /// Upsert (create-or-replace) a batch of documents.
    ///
    /// Returns one result per document, in submission order. A failed
    /// document does not fail the call; only transport-level problems do.
    async fn import_documents(
        &self,
        collection: &str,
        documents: &[Value],
    ) -> Result<Vec<ImportResult>>;
}
