//! Huffman coding with a self-describing stream prefix.
//!
//! David Huffman (1952) showed that the optimal prefix code for a known
//! symbol distribution falls out of repeatedly merging the two least
//! frequent subtrees. This module implements the classic byte-symbol
//! variant: frequencies are counted over the input, the tree is built in a
//! fixed pool of index-linked nodes, and every leaf's code is serialized
//! ahead of the payload so the stream decodes without side information.
//!
//! The reference decoder keeps no tree at all, just the 256 leaf codes,
//! and matches the accumulating input code against that table one bit at a
//! time. Slow but simple; the wire format does not change if a faster
//! prefix-table decoder replaces it.

use std::collections::BinaryHeap;

use log::debug;

use crate::bitstream::{BitReader, BitWriter, Code};
use crate::error::{Error, Result};

/// Number of distinct byte symbols, and the size of the decode table.
pub const MAX_SYMBOLS: usize = 256;

/// Leaf slots plus 512 inner-node slots.
const MAX_NODES: usize = MAX_SYMBOLS + 512;

// ========================================================
// Node pool
// ========================================================

/// A tree node in the fixed pool.
///
/// Leaves for symbol `s` live at pool slot `s`; inner nodes are allocated
/// from the slots above [`MAX_SYMBOLS`]. Child links are pool indices. A
/// node with no frequency is an unused slot, and a node with no children
/// is a leaf.
#[derive(Clone, Copy, Debug, Default)]
struct Node {
    frequency: Option<u32>,
    left: Option<usize>,
    right: Option<usize>,
    code: Code,
}

impl Node {
    fn is_used(&self) -> bool {
        self.frequency.is_some()
    }

    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Min-heap entry for the tree merge loop.
///
/// `BinaryHeap` is a max-heap, so the ordering is reversed. Frequency ties
/// go to the lower pool index; callers must not rely on any particular
/// code assignment, only on the prefix property.
#[derive(PartialEq, Eq)]
struct HeapEntry {
    frequency: u32,
    index: usize,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Minimum bits needed to represent `num`, i.e. its rounded-up log2.
fn bits_for_integer(mut num: usize) -> usize {
    let mut bits = 0;
    while num > 0 {
        num >>= 1;
        bits += 1;
    }
    bits
}

// ========================================================
// Encoder
// ========================================================

/// One-shot Huffman encoder.
///
/// Construction runs the whole encoding pass: frequency count, tree
/// build, optional tree serialization, and the payload. Fetch the result
/// through [`bit_writer`](Self::bit_writer) or release the buffer via
/// [`bit_writer_mut`](Self::bit_writer_mut).
pub struct Encoder {
    stream: BitWriter,
    nodes: Box<[Node]>,
    root: usize,
    tree_prefix_bits: usize,
}

impl Encoder {
    /// Encodes `data`, optionally prepending the serialized code table so
    /// the stream is self-describing.
    ///
    /// # Errors
    /// [`Error::EmptyInput`] for an empty buffer, [`Error::CodeOverflow`]
    /// or [`Error::BadCodeLength`] for trees deeper than 64 levels, and
    /// [`Error::NodePoolExhausted`] if the inner-node pool runs dry.
    pub fn new(data: &[u8], prepend_tree: bool) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut encoder = Self {
            stream: BitWriter::new(),
            nodes: vec![Node::default(); MAX_NODES].into_boxed_slice(),
            root: 0,
            tree_prefix_bits: 0,
        };

        encoder.count_frequencies(data);
        encoder.build_tree()?;
        if prepend_tree {
            encoder.write_tree()?;
        }
        encoder.write_data(data);
        Ok(encoder)
    }

    /// The output stream, tree prefix included when requested.
    pub fn bit_writer(&self) -> &BitWriter {
        &self.stream
    }

    /// Mutable access to the output stream, for releasing the buffer.
    pub fn bit_writer_mut(&mut self) -> &mut BitWriter {
        &mut self.stream
    }

    /// Length in bits of the serialized tree prefix, byte-aligned.
    /// Zero when the tree was not prepended.
    pub fn tree_prefix_bits(&self) -> usize {
        self.tree_prefix_bits
    }

    /// Depth-first search for the leaf carrying `code`, returning its
    /// symbol. Useful for inspecting the assignment in tests.
    pub fn find_leaf_for_code(&self, code: Code) -> Option<u8> {
        self.recursive_find_leaf(self.root, code)
    }

    fn count_frequencies(&mut self, data: &[u8]) {
        for &byte in data {
            // The byte value doubles as the pool index of its leaf.
            let node = &mut self.nodes[byte as usize];
            node.frequency = Some(node.frequency.map_or(1, |f| f + 1));
        }
    }

    fn build_tree(&mut self) -> Result<()> {
        let mut queue = BinaryHeap::new();
        for s in 0..MAX_SYMBOLS {
            if let Some(frequency) = self.nodes[s].frequency {
                queue.push(HeapEntry {
                    frequency,
                    index: s,
                });
            }
        }
        let leaf_count = queue.len();

        // Merge the two lowest-frequency subtrees until one root remains.
        while queue.len() > 1 {
            let a = queue.pop().unwrap();
            let b = queue.pop().unwrap();
            let frequency = a.frequency + b.frequency;
            let index = self.add_inner_node(frequency, a.index, b.index)?;
            queue.push(HeapEntry { frequency, index });
        }

        self.root = queue.pop().ok_or(Error::EmptyInput)?.index;
        self.assign_codes(self.root, Code::new(), 0)?;
        debug!(
            "huffman: {leaf_count} distinct symbols, root at slot {}",
            self.root
        );
        Ok(())
    }

    /// Claims the first unused slot in the inner-node range.
    fn add_inner_node(&mut self, frequency: u32, left: usize, right: usize) -> Result<usize> {
        for n in MAX_SYMBOLS..MAX_NODES {
            if !self.nodes[n].is_used() {
                self.nodes[n] = Node {
                    frequency: Some(frequency),
                    left: Some(left),
                    right: Some(right),
                    code: Code::new(),
                };
                return Ok(n);
            }
        }
        Err(Error::NodePoolExhausted)
    }

    /// Assigns codes by inheriting the parent code and appending this
    /// node's branch bit. The root appends bit 0 to the empty code, so a
    /// single-symbol input still gets a 1-bit code.
    fn assign_codes(&mut self, index: usize, parent_code: Code, bit: u8) -> Result<()> {
        let mut code = parent_code;
        code.append_bit(bit)?;
        self.nodes[index].code = code;

        if let Some(left) = self.nodes[index].left {
            self.assign_codes(left, code, 0)?;
        }
        if let Some(right) = self.nodes[index].right {
            self.assign_codes(right, code, 1)?;
        }
        Ok(())
    }

    /// Serializes the code table:
    ///
    /// ```text
    /// u16  numberOfCodes      always 256
    /// u16  codeLengthWidth    bits per code-length field
    /// 256 * { uN codeLen, uL codeBits }   N fixed, L = codeLen
    /// zero padding to the next byte boundary
    /// ```
    ///
    /// Symbols absent from the input write a zero-length field and no
    /// code bits.
    fn write_tree(&mut self) -> Result<()> {
        let mut max_code_len = 0;
        for node in &self.nodes[..MAX_SYMBOLS] {
            if node.is_used() {
                max_code_len = max_code_len.max(node.code.len());
            }
        }
        if max_code_len == 0 || max_code_len > Code::MAX_BITS {
            return Err(Error::BadCodeLength(max_code_len));
        }

        let code_length_width = bits_for_integer(max_code_len);
        self.stream.append_bits_u64(MAX_SYMBOLS as u64, 16);
        self.stream.append_bits_u64(code_length_width as u64, 16);
        self.tree_prefix_bits = 32;

        for s in 0..MAX_SYMBOLS {
            // Unused symbols contribute a zero-length field and no bits.
            let code = self.nodes[s].code;
            self.stream
                .append_bits_u64(code.len() as u64, code_length_width);
            self.stream.append_bits_u64(code.as_u64(), code.len());
            self.tree_prefix_bits += code_length_width + code.len();
        }

        while self.tree_prefix_bits % 8 != 0 {
            self.stream.append_bit(0);
            self.tree_prefix_bits += 1;
        }
        debug!(
            "huffman: tree prefix {} bits, max code length {max_code_len}",
            self.tree_prefix_bits
        );
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) {
        for &byte in data {
            // Leaf slot == byte value, so no lookup structure is needed.
            self.stream.append_code(self.nodes[byte as usize].code);
        }
    }

    fn recursive_find_leaf(&self, index: usize, code: Code) -> Option<u8> {
        let node = &self.nodes[index];
        if let Some(left) = node.left {
            if let Some(found) = self.recursive_find_leaf(left, code) {
                return Some(found);
            }
        }
        if let Some(right) = node.right {
            if let Some(found) = self.recursive_find_leaf(right, code) {
                return Some(found);
            }
        }
        if node.is_leaf() && node.code == code {
            // Leaves live in the first 256 slots, at their symbol value.
            return Some(index as u8);
        }
        None
    }

    #[cfg(test)]
    fn code_for_symbol(&self, symbol: u8) -> Code {
        self.nodes[symbol as usize].code
    }
}

// ========================================================
// Decoder
// ========================================================

/// One-shot Huffman decoder over a borrowed stream.
///
/// Construction parses the tree prefix into a 256-entry code table;
/// [`decode`](Self::decode) then replays the payload.
#[derive(Debug)]
pub struct Decoder<'a> {
    stream: BitReader<'a>,
    codes: [Code; MAX_SYMBOLS],
}

impl<'a> Decoder<'a> {
    /// A decoder over `data`, of which `bit_count` bits are valid.
    ///
    /// # Errors
    /// Fails like [`Decoder::from_writer`].
    pub fn new(data: &'a [u8], bit_count: usize) -> Result<Self> {
        Self::with_reader(BitReader::new(data, bit_count))
    }

    /// A decoder reading an encoder's output in place.
    ///
    /// # Errors
    /// [`Error::BadCodeCount`] if the header does not announce 256 codes,
    /// [`Error::BadCodeLength`] for out-of-range length fields, and
    /// [`Error::UnexpectedEof`] if the prefix is cut short.
    pub fn from_writer(writer: &'a BitWriter) -> Result<Self> {
        Self::with_reader(BitReader::from_writer(writer))
    }

    fn with_reader(stream: BitReader<'a>) -> Result<Self> {
        let mut decoder = Self {
            stream,
            codes: [Code::new(); MAX_SYMBOLS],
        };
        decoder.read_prefix()?;
        Ok(decoder)
    }

    fn read_prefix(&mut self) -> Result<()> {
        let number_of_codes = self.stream.read_bits_u64(16)?;
        let code_length_width = self.stream.read_bits_u64(16)? as usize;
        let mut prefix_bits = 32;

        if number_of_codes != MAX_SYMBOLS as u64 {
            return Err(Error::BadCodeCount(number_of_codes));
        }
        if code_length_width == 0 || code_length_width > Code::MAX_BITS {
            return Err(Error::BadCodeLength(code_length_width));
        }

        for code_slot in self.codes.iter_mut() {
            let code_len = self.stream.read_bits_u64(code_length_width)? as usize;
            prefix_bits += code_length_width;
            if code_len > Code::MAX_BITS {
                return Err(Error::BadCodeLength(code_len));
            }

            // Accumulate the code itself so (bits, length) are preserved.
            self.stream.clear_code();
            for _ in 0..code_len {
                if !self.stream.read_next_bit()? {
                    return Err(Error::UnexpectedEof);
                }
            }
            prefix_bits += code_len;
            *code_slot = self.stream.code();
        }

        // Skip the padding up to the byte boundary.
        self.stream.clear_code();
        while prefix_bits % 8 != 0 {
            if !self.stream.read_next_bit()? {
                return Err(Error::UnexpectedEof);
            }
            prefix_bits += 1;
        }
        self.stream.clear_code();
        Ok(())
    }

    /// Decodes the payload into `out`, returning the bytes produced.
    ///
    /// The loop runs until the stream ends; trailing padding bits that
    /// never complete a code are discarded silently.
    ///
    /// # Errors
    /// [`Error::OutputTooSmall`] once `out` is full with a decoded symbol
    /// pending (the partial output is left in place), and
    /// [`Error::CodeOverflow`] if 64 bits accumulate without a match,
    /// which means the stream is corrupt.
    pub fn decode(&mut self, out: &mut [u8]) -> Result<usize> {
        let mut decoded = 0;
        while self.stream.read_next_bit()? {
            let Some(symbol) = self.find_matching_code(self.stream.code()) else {
                continue;
            };
            if decoded == out.len() {
                return Err(Error::OutputTooSmall { decoded });
            }
            out[decoded] = symbol;
            decoded += 1;
            self.stream.clear_code();
        }
        Ok(decoded)
    }

    /// Linear scan of the code table for an exact (bits, length) match.
    /// Unused symbols hold empty codes, which can never match a non-empty
    /// accumulated code.
    fn find_matching_code(&self, code: Code) -> Option<u8> {
        self.codes
            .iter()
            .position(|&c| c == code)
            .map(|symbol| symbol as u8)
    }
}

// ========================================================
// Easy one-shot entry points
// ========================================================

/// Compresses `uncompressed` into a fresh self-describing buffer.
///
/// Returns the buffer and its exact size in bits; the byte size is the
/// buffer length. Ownership of the buffer moves to the caller.
///
/// # Errors
/// Fails like [`Encoder::new`]; notably [`Error::EmptyInput`] when handed
/// an empty slice.
pub fn easy_encode(uncompressed: &[u8]) -> Result<(Vec<u8>, usize)> {
    if uncompressed.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut encoder = Encoder::new(uncompressed, true)?;
    let bit_count = encoder.bit_writer().bit_count();
    Ok((encoder.bit_writer_mut().release(), bit_count))
}

/// Decompresses the output of [`easy_encode`] into `uncompressed`,
/// returning the bytes produced.
///
/// # Errors
/// [`Error::EmptyInput`] for empty buffers or a zero bit count, otherwise
/// fails like [`Decoder::new`] and [`Decoder::decode`].
pub fn easy_decode(
    compressed: &[u8],
    compressed_size_bits: usize,
    uncompressed: &mut [u8],
) -> Result<usize> {
    if compressed.is_empty() || compressed_size_bits == 0 || uncompressed.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut decoder = Decoder::new(compressed, compressed_size_bits)?;
    decoder.decode(uncompressed)
}

// ========================================================
// Tests
// ========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roundtrip(input: &[u8]) -> Vec<u8> {
        let (compressed, bits) = easy_encode(input).unwrap();
        let mut restored = vec![0u8; input.len()];
        let produced = easy_decode(&compressed, bits, &mut restored).unwrap();
        assert_eq!(produced, input.len());
        restored
    }

    #[test]
    fn test_huffman_roundtrip_text() {
        let data = b"Hello world!";
        assert_eq!(roundtrip(data), data);
    }

    #[test]
    fn test_huffman_roundtrip_skewed() {
        let mut data = vec![b'a'; 400];
        data.extend_from_slice(b"bbbbccd");
        assert_eq!(roundtrip(&data), data);
    }

    #[test]
    fn test_single_symbol_gets_one_bit_code() {
        let encoder = Encoder::new(&[0x42; 10], false).unwrap();
        let code = Code::from_parts(0, 1);
        assert_eq!(encoder.find_leaf_for_code(code), Some(0x42));
        // Payload only: ten 1-bit codes.
        assert_eq!(encoder.bit_writer().bit_count(), 10);
        assert_eq!(encoder.tree_prefix_bits(), 0);
    }

    #[test]
    fn test_tree_prefix_is_byte_aligned() {
        let encoder = Encoder::new(b"abracadabra", true).unwrap();
        assert!(encoder.tree_prefix_bits() > 0);
        assert_eq!(encoder.tree_prefix_bits() % 8, 0);
    }

    #[test]
    fn test_assigned_codes_form_prefix_code() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let encoder = Encoder::new(data, false).unwrap();

        let mut leaf_codes: Vec<Code> = data.iter().map(|&b| encoder.code_for_symbol(b)).collect();
        leaf_codes.sort_by_key(|c| (c.as_u64(), c.len()));
        leaf_codes.dedup();

        for code in &leaf_codes {
            assert!(!code.is_empty(), "used symbol must have a code");
        }

        // No code may be a proper prefix of another.
        for (i, a) in leaf_codes.iter().enumerate() {
            for (j, b) in leaf_codes.iter().enumerate() {
                if i == j || a.len() >= b.len() {
                    continue;
                }
                let is_prefix = (0..a.len()).all(|k| a.bit(k) == b.bit(k));
                assert!(
                    !is_prefix,
                    "{} is a prefix of {}",
                    a.to_bit_string(),
                    b.to_bit_string()
                );
            }
        }
    }

    #[test]
    fn test_find_leaf_matches_assignment() {
        let data = b"mississippi";
        let encoder = Encoder::new(data, false).unwrap();
        for &byte in data {
            let code = encoder.code_for_symbol(byte);
            assert_eq!(encoder.find_leaf_for_code(code), Some(byte));
        }
    }

    #[test]
    fn test_no_prefix_stream_decodes_against_live_tree() {
        // Callers that suppress the tree prefix can replay the stream
        // against the encoder's own tree.
        let data = b"suppressed prefix";
        let encoder = Encoder::new(data, false).unwrap();

        let mut reader = BitReader::from_writer(encoder.bit_writer());
        let mut restored = Vec::new();
        while reader.read_next_bit().unwrap() {
            if let Some(symbol) = encoder.find_leaf_for_code(reader.code()) {
                restored.push(symbol);
                reader.clear_code();
            }
        }
        assert_eq!(&restored, data);
    }

    #[test]
    fn test_decoder_from_writer() {
        let data = b"decoder borrows the writer's buffer";
        let encoder = Encoder::new(data, true).unwrap();
        let mut decoder = Decoder::from_writer(encoder.bit_writer()).unwrap();
        let mut restored = vec![0u8; data.len()];
        assert_eq!(decoder.decode(&mut restored), Ok(data.len()));
        assert_eq!(&restored, data);
    }

    #[test]
    fn test_decode_rejects_bad_code_count() {
        let mut writer = BitWriter::new();
        writer.append_bits_u64(255, 16); // must be 256
        writer.append_bits_u64(4, 16);
        let err = Decoder::from_writer(&writer).unwrap_err();
        assert_eq!(err, Error::BadCodeCount(255));
    }

    #[test]
    fn test_decode_rejects_truncated_prefix() {
        let mut writer = BitWriter::new();
        writer.append_bits_u64(256, 16);
        writer.append_bits_u64(4, 16);
        // Header promises 256 codes; none follow.
        let err = Decoder::from_writer(&writer).unwrap_err();
        assert_eq!(err, Error::UnexpectedEof);
    }

    #[test]
    fn test_decode_output_too_small_keeps_partial() {
        let data = b"partial output";
        let (compressed, bits) = easy_encode(data).unwrap();
        let mut small = vec![0u8; 4];
        let err = easy_decode(&compressed, bits, &mut small).unwrap_err();
        assert_eq!(err, Error::OutputTooSmall { decoded: 4 });
        assert_eq!(&small, &data[..4]);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert_eq!(easy_encode(&[]).unwrap_err(), Error::EmptyInput);
        let mut out = [0u8; 4];
        assert_eq!(
            easy_decode(&[], 0, &mut out).unwrap_err(),
            Error::EmptyInput
        );
    }

    proptest! {
        #[test]
        fn prop_huffman_roundtrip(input in prop::collection::vec(any::<u8>(), 1..1024)) {
            prop_assert_eq!(roundtrip(&input), input);
        }

        #[test]
        fn prop_huffman_roundtrip_small_alphabet(
            input in prop::collection::vec(prop::sample::select(vec![b'x', b'y', b'z']), 1..256),
        ) {
            prop_assert_eq!(roundtrip(&input), input);
        }
    }
}
