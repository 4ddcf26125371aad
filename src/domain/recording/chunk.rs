//! Encoded media chunks

/// A unit of encoded media delivered by the encoder
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chunk {
    data: Vec<u8>,
}

impl Chunk {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<u8>> for Chunk {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for Chunk {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

/// Append-only, delivery-ordered sequence of non-empty chunks.
///
/// Concatenating the chunks in order reconstructs the media timeline.
#[derive(Debug, Clone, Default)]
pub struct ChunkSequence {
    chunks: Vec<Chunk>,
}

impl ChunkSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk. Zero-length chunks are dropped.
    ///
    /// Returns whether the chunk was kept.
    pub fn push(&mut self, chunk: Chunk) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.chunks.push(chunk);
        true
    }

    /// Number of stored chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total byte count across all chunks
    pub fn total_bytes(&self) -> usize {
        self.chunks.iter().map(Chunk::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// Consume the sequence, concatenating chunks in delivery order
    pub fn concat(self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.total_bytes());
        for chunk in self.chunks {
            bytes.extend_from_slice(chunk.data());
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chunks_are_dropped() {
        let mut seq = ChunkSequence::new();
        assert!(!seq.push(Chunk::default()));
        assert!(seq.push(Chunk::from(&[1u8][..])));
        assert!(!seq.push(Chunk::new(Vec::new())));
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn concat_preserves_delivery_order() {
        let mut seq = ChunkSequence::new();
        seq.push(Chunk::from(vec![1, 2]));
        seq.push(Chunk::default());
        seq.push(Chunk::from(vec![3]));
        seq.push(Chunk::from(vec![4, 5, 6]));

        assert_eq!(seq.total_bytes(), 6);
        assert_eq!(seq.concat(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn new_sequence_is_empty() {
        let seq = ChunkSequence::new();
        assert!(seq.is_empty());
        assert_eq!(seq.total_bytes(), 0);
        assert!(seq.concat().is_empty());
    }
}
