//! Retrieval Augmented Generation (RAG) pipeline.
//!
//! Two pipelines share the same vector index:
//!
//! 1. **Ingestion** (offline, one-shot) - documents are loaded, chunked with
//!    overlap, embedded in batch, and written to the index in one pass. See
//!    [`ingest::IngestPipeline`].
//! 2. **Serving** (per turn) - the query is embedded and the top-k most
//!    similar chunks are returned in the index's similarity order. See
//!    [`retriever::Retriever`].
//!
//! Both are linear sequences of pure transformations with explicit
//! input/output types, so each stage is independently testable.

pub mod chunker;
pub mod embeddings;
pub mod ingest;
pub mod retriever;

pub use chunker::TextChunker;
pub use embeddings::Embedder;
pub use ingest::IngestPipeline;
pub use retriever::Retriever;
