#![allow(clippy::unreadable_literal)]

use std::convert::TryInto;

use crate::block_buffer::BlockBuffer;
use crate::{align_to_u32a_be, HashError, HashFunction, HashValue};

/// Length of a single input block consumed by one compression invocation.
pub const BLOCK_LENGTH_BYTES: usize = 64;

/// Length of the final digest in bytes.
pub const OUTPUT_LENGTH_BYTES: usize = 20;

/// The initial state for any SHA1 hash. From here, all blocks are applied.
pub const INITIAL: SHA1Hash = SHA1Hash {
    a: 0x67452301,
    b: 0xEFCDAB89,
    c: 0x98BADCFE,
    d: 0x10325476,
    e: 0xC3D2E1F0,
};

/// A SHA1 hash value. It consists mainly out of 5 double-words named `a`, `b`, `c`, `d` and `e`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SHA1Hash {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
    pub e: u32,
}

/// An unfinished SHA1 hash. It holds the current hash value, the total message length in bits
/// and the input bytes that do not yet form a complete block. Once `finish_hash` has been
/// called, any further use of the state fails with [`HashError::InvalidState`].
#[derive(Debug, Clone)]
pub struct SHA1HashState {
    hash: SHA1Hash,
    message_bits: u64,
    buffer: BlockBuffer,
    finished: bool,
}

/// Compress one full input block into the hash value. The block is expanded into the 80-word
/// message schedule, mixed through the four round ranges and finally added back onto the state.
/// All double-word arithmetic wraps around, as the algorithm demands.
fn round_function(hash: &mut SHA1Hash, block: &[u8; BLOCK_LENGTH_BYTES]) {
    let mut extended_block = [0_u32; 80];
    align_to_u32a_be(&mut extended_block[0..16], block);

    for i in 16..80 {
        extended_block[i] = u32::rotate_left(
            extended_block[i - 3]
                ^ extended_block[i - 8]
                ^ extended_block[i - 14]
                ^ extended_block[i - 16],
            1,
        )
    }

    let mut round_state = *hash;

    for (i, data_word) in extended_block.iter().enumerate() {
        let (scrambled_data, magic_constant) = match i {
            0..=19 => (
                (round_state.b & round_state.c) | ((!round_state.b) & round_state.d),
                0x5A827999,
            ),
            20..=39 => (round_state.b ^ round_state.c ^ round_state.d, 0x6ED9EBA1),
            40..=59 => (
                (round_state.b & round_state.c)
                    | (round_state.b & round_state.d)
                    | (round_state.c & round_state.d),
                0x8F1BBCDC,
            ),
            60..=79 => (round_state.b ^ round_state.c ^ round_state.d, 0xCA62C1D6),
            _ => unreachable!(),
        };

        let temp = u32::rotate_left(round_state.a, 5)
            .wrapping_add(scrambled_data)
            .wrapping_add(round_state.e)
            .wrapping_add(magic_constant)
            .wrapping_add(*data_word);
        round_state.e = round_state.d;
        round_state.d = round_state.c;
        round_state.c = u32::rotate_left(round_state.b, 30);
        round_state.b = round_state.a;
        round_state.a = temp;
    }

    hash.a = hash.a.wrapping_add(round_state.a);
    hash.b = hash.b.wrapping_add(round_state.b);
    hash.c = hash.c.wrapping_add(round_state.c);
    hash.d = hash.d.wrapping_add(round_state.d);
    hash.e = hash.e.wrapping_add(round_state.e);
}

impl SHA1HashState {
    /// Consume input data of arbitrary length. Any leftover partial block from earlier calls is
    /// completed first, then full blocks are digested directly from the input and the remainder
    /// is buffered again.
    fn absorb(&mut self, input: &[u8]) {
        // the counter tracks consumed input, independent of how many blocks get compressed;
        // the message length is defined modulo 2^64 bits
        self.message_bits = self.message_bits.wrapping_add((input.len() as u64) << 3);

        let mut remaining = input;

        if !self.buffer.is_empty() {
            let consumed = self.buffer.fill(remaining);
            remaining = &remaining[consumed..];

            if !self.buffer.is_full() {
                return;
            }

            round_function(&mut self.hash, self.buffer.block());
            self.buffer.clear();
        }

        let mut blocks = remaining.chunks_exact(BLOCK_LENGTH_BYTES);
        for block in &mut blocks {
            round_function(&mut self.hash, block.try_into().unwrap());
        }

        self.buffer.fill(blocks.remainder());
    }

    /// Apply the padding scheme and digest the final block(s): a single 1-bit
    /// terminator, zero padding up to the length suffix and the total message length in bits as
    /// a big endian double-quadword in the last eight bytes.
    fn pad_and_finish(&mut self) -> SHA1Hash {
        // capture the length before the terminator inflates the buffer
        let message_bits = self.message_bits;

        self.buffer.fill(&[0x80]);

        // if the length suffix does not fit behind the terminator, it moves to an extra block
        if self.buffer.len() > BLOCK_LENGTH_BYTES - 8 {
            self.buffer.zero_to(BLOCK_LENGTH_BYTES);
            round_function(&mut self.hash, self.buffer.block());
            self.buffer.clear();
        }

        self.buffer.zero_to(BLOCK_LENGTH_BYTES - 8);
        self.buffer.fill(&message_bits.to_be_bytes());
        round_function(&mut self.hash, self.buffer.block());
        self.buffer.clear();

        self.hash
    }
}

impl Default for SHA1HashState {
    fn default() -> Self {
        SHA1Hash::init_hash()
    }
}

impl HashFunction for SHA1Hash {
    type HashState = SHA1HashState;
    type HashData = SHA1Hash;

    fn init_hash() -> Self::HashState {
        SHA1HashState {
            hash: INITIAL,
            message_bits: 0,
            buffer: BlockBuffer::new(),
            finished: false,
        }
    }

    fn update_hash(hash: &mut Self::HashState, input: &[u8]) -> Result<(), HashError> {
        if hash.finished {
            return Err(HashError::InvalidState);
        }

        hash.absorb(input);
        Ok(())
    }

    fn finish_hash(hash: &mut Self::HashState) -> Result<Self::HashData, HashError> {
        if hash.finished {
            return Err(HashError::InvalidState);
        }

        hash.finished = true;
        Ok(hash.pad_and_finish())
    }

    fn digest_message(input: &[u8]) -> Self::HashData {
        // a freshly initialized state cannot be in a finished state, so no fallible calls
        let mut hash_state = Self::init_hash();
        hash_state.absorb(input);
        hash_state.pad_and_finish()
    }
}

impl HashValue for SHA1Hash {
    /// Generates the raw digest by serializing the five state words as big endian bytes.
    fn raw(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(OUTPUT_LENGTH_BYTES);
        for word in &[self.a, self.b, self.c, self.d, self.e] {
            bytes.extend_from_slice(&word.to_be_bytes());
        }
        bytes
    }
}

/// Convenience function digesting a complete message at once and rendering the hash as
/// lowercase hexadecimal text.
pub fn digest_hex(input: &[u8]) -> String {
    SHA1Hash::digest_message(input).hex()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use sha1::Digest;

    use super::*;
    use crate::tests::{EMPTY_MESSAGE, LONG_TEXT, SOME_TEXT, STREAM_TEXT};

    #[test]
    fn test_sha1() {
        assert_eq!(
            digest_hex(EMPTY_MESSAGE.as_bytes()),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );

        assert_eq!(digest_hex(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");

        assert_eq!(
            digest_hex(b"The quick brown fox jumps over the lazy dog"),
            "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12"
        );

        assert_eq!(
            digest_hex(SOME_TEXT.as_bytes()),
            "931bec5eec465b2e742deafbdcae2681820a4ac9"
        );

        assert_eq!(
            digest_hex(LONG_TEXT.as_bytes()),
            "ae410e98987c6543498833540e93dd7129fc8e0b"
        );
    }

    #[test]
    fn test_sha1_stream() {
        let mut hash_state = SHA1Hash::init_hash();
        SHA1Hash::update_hash(&mut hash_state, STREAM_TEXT[0].as_bytes()).unwrap();
        SHA1Hash::update_hash(&mut hash_state, STREAM_TEXT[1].as_bytes()).unwrap();
        SHA1Hash::update_hash(&mut hash_state, STREAM_TEXT[2].as_bytes()).unwrap();

        let hash = SHA1Hash::finish_hash(&mut hash_state).unwrap();
        assert_eq!(hash.hex(), "c11280314809ce63f5d17a92b9a858317141f747");
    }

    /// Each of these message lengths exercises a distinct padding branch: room for the length
    /// suffix in the same block, the terminator exactly displacing the suffix, and partial
    /// blocks right around the block boundary.
    #[test]
    fn test_padding_boundaries() {
        let expected = [
            (55, "c1c8bbdc22796e28c0e15163d20899b65621d65a"),
            (56, "c2db330f6083854c99d4b5bfb6e8f29f201be699"),
            (57, "f08f24908d682555111be7ff6f004e78283d989a"),
            (63, "03f09f5b158a7a8cdad920bddc29b81c18a551f5"),
            (64, "0098ba824b5c16427bd7a1122a5a442a25ec644d"),
            (65, "11655326c708d70319be2610e8a57d9a5b959d3b"),
        ];

        for &(length, digest) in &expected {
            assert_eq!(digest_hex(&vec![b'a'; length]), digest, "length {}", length);
        }
    }

    #[test]
    fn test_chunked_updates_match_one_shot() {
        let message = vec![b'a'; 129];
        let expected = digest_hex(&message);

        for &chunk_length in &[1usize, 2, 3, 55, 56, 57, 63, 64, 65] {
            let mut hash_state = SHA1Hash::init_hash();
            for chunk in message.chunks(chunk_length) {
                SHA1Hash::update_hash(&mut hash_state, chunk).unwrap();
            }

            let hash = SHA1Hash::finish_hash(&mut hash_state).unwrap();
            assert_eq!(hash.hex(), expected, "chunk length {}", chunk_length);
        }
    }

    #[test]
    fn test_empty_update_is_noop() {
        let mut hash_state = SHA1HashState::default();
        SHA1Hash::update_hash(&mut hash_state, b"").unwrap();
        SHA1Hash::update_hash(&mut hash_state, b"ab").unwrap();
        SHA1Hash::update_hash(&mut hash_state, b"").unwrap();
        SHA1Hash::update_hash(&mut hash_state, b"c").unwrap();

        let hash = SHA1Hash::finish_hash(&mut hash_state).unwrap();
        assert_eq!(hash, SHA1Hash::digest_message(b"abc"));
    }

    #[test]
    fn test_update_after_finish_fails() {
        let mut hash_state = SHA1Hash::init_hash();
        SHA1Hash::update_hash(&mut hash_state, b"abc").unwrap();
        SHA1Hash::finish_hash(&mut hash_state).unwrap();

        assert_eq!(
            SHA1Hash::update_hash(&mut hash_state, b"more"),
            Err(HashError::InvalidState)
        );
    }

    #[test]
    fn test_finish_twice_fails() {
        let mut hash_state = SHA1Hash::init_hash();
        SHA1Hash::finish_hash(&mut hash_state).unwrap();

        assert_eq!(SHA1Hash::finish_hash(&mut hash_state), Err(HashError::InvalidState));
    }

    #[test]
    fn test_digest_is_deterministic() {
        let first = SHA1Hash::digest_message(SOME_TEXT.as_bytes());
        let second = SHA1Hash::digest_message(SOME_TEXT.as_bytes());

        assert_eq!(first, second);
        assert_eq!(first.raw(), second.raw());
        assert_eq!(first.hex(), second.hex());
    }

    /// Digest four megabytes of cyclic data in read-buffer sized chunks and compare against
    /// both a precomputed digest and the RustCrypto reference implementation.
    #[test]
    fn test_large_input_against_reference() {
        let mut data = Vec::with_capacity(4 << 20);
        while data.len() < 4 << 20 {
            data.push((data.len() % 251) as u8);
        }

        let mut hash_state = SHA1Hash::init_hash();
        for chunk in data.chunks(8192) {
            SHA1Hash::update_hash(&mut hash_state, chunk).unwrap();
        }
        let hash = SHA1Hash::finish_hash(&mut hash_state).unwrap();

        assert_eq!(hash.hex(), "077c791119e055e7a0ae5e507089a3f9114836f5");
        assert_eq!(hash.hex(), hex::encode(sha1::Sha1::digest(&data)));
    }

    proptest! {
        #[test]
        fn chunking_is_invariant(
            data in proptest::collection::vec(any::<u8>(), 0..512),
            cuts in proptest::collection::vec(any::<prop::sample::Index>(), 0..8),
        ) {
            let mut positions: Vec<usize> =
                cuts.iter().map(|cut| cut.index(data.len() + 1)).collect();
            positions.sort_unstable();

            let mut hash_state = SHA1Hash::init_hash();
            let mut start = 0;
            for &position in &positions {
                SHA1Hash::update_hash(&mut hash_state, &data[start..position]).unwrap();
                start = position;
            }
            SHA1Hash::update_hash(&mut hash_state, &data[start..]).unwrap();

            let streamed = SHA1Hash::finish_hash(&mut hash_state).unwrap();
            prop_assert_eq!(streamed, SHA1Hash::digest_message(&data));
        }

        #[test]
        fn matches_reference_implementation(
            data in proptest::collection::vec(any::<u8>(), 0..2048),
        ) {
            prop_assert_eq!(digest_hex(&data), hex::encode(sha1::Sha1::digest(&data)));
        }
    }
}
