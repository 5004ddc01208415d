//! Character-based text chunking with overlap.

use crate::types::{AppError, Result};
use text_splitter::{Characters, ChunkConfig, TextSplitter};

/// Splits text into bounded, overlapping chunks.
///
/// Chunk boundaries prefer semantic breaks (paragraphs, sentences) within
/// the character limit; the overlap preserves context that straddles a
/// boundary. Deterministic for a fixed input.
pub struct TextChunker {
    splitter: TextSplitter<Characters>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a chunker with the given maximum chunk size and overlap, both
    /// in characters.
    ///
    /// # Errors
    ///
    /// Returns an error if `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        let config = ChunkConfig::new(chunk_size)
            .with_overlap(chunk_overlap)
            .map_err(|e| AppError::Config(format!("Invalid chunking config: {}", e)))?;

        Ok(Self {
            splitter: TextSplitter::new(config),
            chunk_size,
            chunk_overlap,
        })
    }

    /// Split `text` into chunks. Whitespace-only input yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.splitter
            .chunks(text)
            .filter(|c| !c.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Maximum chunk size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap between neighboring chunks in characters.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }
}
