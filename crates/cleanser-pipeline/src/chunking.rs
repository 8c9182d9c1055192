//! Fixed-size batching of contact records

use crate::error::PipelineError;
use cleanser_domain::ContactRecord;

/// A contiguous batch of records submitted to the model together
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chunk<'a> {
    /// Zero-based position of this chunk in the run
    pub index: usize,

    /// The records, borrowed from the loaded input
    pub records: &'a [ContactRecord],
}

impl Chunk<'_> {
    /// Number of records in the chunk
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the chunk holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Partitions records into chunks of at most `chunk_size`
pub struct RecordChunker {
    chunk_size: usize,
}

impl RecordChunker {
    /// Create a new chunker
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Result<Self, PipelineError> {
        if chunk_size == 0 {
            return Err(PipelineError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        Ok(Self { chunk_size })
    }

    /// Configured chunk size
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks `len` records produce
    pub fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }

    /// Split `records` into ordered, non-overlapping chunks
    ///
    /// Every chunk has `chunk_size` records except possibly the last.
    pub fn chunk<'a>(&self, records: &'a [ContactRecord]) -> Vec<Chunk<'a>> {
        records
            .chunks(self.chunk_size)
            .enumerate()
            .map(|(index, records)| Chunk { index, records })
            .collect()
    }
}
