//! A software implementation of the SHA1 hash algorithm with a streaming API. Input data can be
//! digested in chunks of arbitrary size without holding the whole message in memory; the state
//! can then be finished into the raw 20-byte digest or its hexadecimal rendering.

use thiserror::Error;

pub mod sha1;

mod block_buffer;

/// Alphabet used to render raw digests as hexadecimal text.
const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Copies the ``source`` array to the ``dest`` array with respect to alignment and endianness.
/// ``source`` must be at least four times bigger than ``dest``. Data from ``source`` will be
/// treated as big endian integers.
pub(crate) fn align_to_u32a_be(dest: &mut [u32], source: &[u8]) {
    assert!(source.len() >= dest.len() * 4);

    for (word, bytes) in dest.iter_mut().zip(source.chunks_exact(4)) {
        *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
}

/// Errors reported by the streaming hash API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HashError {
    /// The hash state has already been finished and may not digest further data.
    #[error("hash state has already been finished")]
    InvalidState,
}

/// Output of a `HashFunction`.
pub trait HashValue {
    /// Obtain the hash as a raw byte array.
    fn raw(&self) -> Vec<u8>;

    /// Render the hash as lowercase hexadecimal text, two digits per byte, high nibble first.
    fn hex(&self) -> String {
        let raw = self.raw();
        let mut text = String::with_capacity(raw.len() * 2);
        for byte in raw {
            text.push(HEX_DIGITS[(byte >> 4) as usize] as char);
            text.push(HEX_DIGITS[(byte & 0xF) as usize] as char);
        }
        text
    }
}

/// An implementation of a hashing algorithm. It defines two implementation dependent types,
/// one of which is the output hash type.
pub trait HashFunction {
    /// Contains the current unfinished hash value. It is constructed using `init_hash` and then
    /// used as the target vector where all input data is compressed into.
    type HashState;

    /// Final hash value that is obtained through completion of the hashing function. It may be
    /// the same type as `Self::HashState` though it is treated as a separate type to ensure
    /// correct usage.
    type HashData: HashValue;

    /// Obtain an initial hash state (usually the IV) with an empty block buffer and a zeroed
    /// message length counter.
    fn init_hash() -> Self::HashState;

    /// Update the hash state with more input data. Input that does not fill a whole block is
    /// buffered within the state until more data arrives. Fails with `HashError::InvalidState`
    /// if the state was already finished.
    fn update_hash(hash: &mut Self::HashState, input: &[u8]) -> Result<(), HashError>;

    /// Finish the hash by padding the buffered input and digesting the final block(s). The
    /// resulting hash is returned. Afterwards the state may not be used for further hashing;
    /// another call of this function or of `update_hash` fails with `HashError::InvalidState`.
    fn finish_hash(hash: &mut Self::HashState) -> Result<Self::HashData, HashError>;

    /// Convenience method to initialize a hash state, completely compress the given `input`
    /// into it and finish it. The final hash is returned.
    fn digest_message(input: &[u8]) -> Self::HashData;
}
