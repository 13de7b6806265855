//! Ordered chunk registry keeping the corpus and the vector index in
//! lockstep.

use docqa_core::error::{Error, Result};
use docqa_core::types::{Chunk, ChunkId};

/// Chunks ordered by id plus a dense position table mapping vector-index
/// rows back to chunk ids. `next_id` is monotonic and only resets with
/// `clear`, so ids are never reused within one corpus lifetime.
#[derive(Default)]
pub struct CorpusStore {
    chunks: Vec<Chunk>,
    positions: Vec<ChunkId>,
    next_id: ChunkId,
}

impl CorpusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pending chunk for `file`, assigning the next id.
    pub fn append(&mut self, file: &str, text: &str) -> Chunk {
        let chunk = Chunk {
            id: self.next_id,
            file: file.to_string(),
            text: text.to_string(),
            vector_position: None,
        };
        self.next_id += 1;
        self.chunks.push(chunk.clone());
        chunk
    }

    pub fn get(&self, id: ChunkId) -> Result<&Chunk> {
        self.offset_of(id).map(|i| &self.chunks[i])
    }

    /// Resolve a vector-index row back to its chunk.
    pub fn chunk_at(&self, position: usize) -> Result<&Chunk> {
        let id = self
            .positions
            .get(position)
            .copied()
            .ok_or_else(|| Error::Internal(format!("no chunk at index row {position}")))?;
        self.get(id)
    }

    /// Record that `id`'s vector landed at `position`. Rows must be claimed
    /// densely, and a chunk's position is set once per build.
    pub fn mark_indexed(&mut self, id: ChunkId, position: usize) -> Result<()> {
        if position != self.positions.len() {
            return Err(Error::Internal(format!(
                "non-dense position {position}, expected {}",
                self.positions.len()
            )));
        }
        let offset = self.offset_of(id)?;
        if let Some(existing) = self.chunks[offset].vector_position {
            return Err(Error::Internal(format!("chunk {id} already at row {existing}")));
        }
        self.chunks[offset].vector_position = Some(position);
        self.positions.push(id);
        Ok(())
    }

    /// Chunks created by upload that have not been embedded yet, in id
    /// order.
    pub fn all_pending(&self) -> Vec<&Chunk> {
        self.chunks.iter().filter(|c| c.vector_position.is_none()).collect()
    }

    /// Every chunk, in id order.
    pub fn all(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn indexed_len(&self) -> usize {
        self.positions.len()
    }

    /// Return every chunk to pending ahead of a full rebuild.
    pub fn clear_positions(&mut self) {
        self.positions.clear();
        for c in &mut self.chunks {
            c.vector_position = None;
        }
    }

    /// Drop all chunks and restart the id sequence.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.positions.clear();
        self.next_id = 0;
    }

    fn offset_of(&self, id: ChunkId) -> Result<usize> {
        // Ids are assigned in insertion order, so the chunk list stays
        // sorted by id.
        self.chunks
            .binary_search_by_key(&id, |c| c.id)
            .map_err(|_| Error::ChunkNotFound(id))
    }
}
