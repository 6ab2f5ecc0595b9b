use crate::sha1::BLOCK_LENGTH_BYTES;

/// An owned buffer for a single input block that is still being assembled. It holds up to
/// [`BLOCK_LENGTH_BYTES`] bytes together with an explicit fill count, so partial input never
/// requires reallocation or manual index bookkeeping at the call sites.
#[derive(Debug, Clone)]
pub(crate) struct BlockBuffer {
    bytes: [u8; BLOCK_LENGTH_BYTES],
    filled: usize,
}

impl BlockBuffer {
    pub(crate) const fn new() -> Self {
        BlockBuffer { bytes: [0; BLOCK_LENGTH_BYTES], filled: 0 }
    }

    /// Number of bytes currently buffered.
    pub(crate) fn len(&self) -> usize {
        self.filled
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub(crate) fn is_full(&self) -> bool {
        self.filled == BLOCK_LENGTH_BYTES
    }

    /// Append bytes from ``input`` until the buffer is full or the input is exhausted. Returns
    /// how many bytes were consumed.
    pub(crate) fn fill(&mut self, input: &[u8]) -> usize {
        let consumed = usize::min(BLOCK_LENGTH_BYTES - self.filled, input.len());
        self.bytes[self.filled..self.filled + consumed].copy_from_slice(&input[..consumed]);
        self.filled += consumed;
        consumed
    }

    /// Append zero bytes until ``target`` bytes are filled. Stale bytes from an earlier block
    /// are overwritten, not merely skipped. Does nothing if the buffer already holds at least
    /// ``target`` bytes.
    pub(crate) fn zero_to(&mut self, target: usize) {
        assert!(target <= BLOCK_LENGTH_BYTES);

        while self.filled < target {
            self.bytes[self.filled] = 0;
            self.filled += 1;
        }
    }

    /// View the completed block. Panics if the buffer is not full.
    pub(crate) fn block(&self) -> &[u8; BLOCK_LENGTH_BYTES] {
        assert!(self.is_full());
        &self.bytes
    }

    /// Reset the fill count so the buffer can assemble the next block.
    pub(crate) fn clear(&mut self) {
        self.filled = 0;
    }
}
