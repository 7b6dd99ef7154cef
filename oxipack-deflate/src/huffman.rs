//! Huffman coding over an arbitrary symbol alphabet.
//!
//! Codes are built from a [`FrequencyTable`] with a min-priority queue keyed
//! by `(frequency, node id)`. Leaves receive ids in order of first
//! appearance and merged nodes receive increasing ids after them, so the
//! resulting code depends only on the input, never on hashing order. The
//! first node taken from the queue becomes the `0` branch of the merge.
//!
//! # Code table format
//!
//! ```text
//! ┌───────────────┬──────────────────────────────────────────────┐
//! │ count (u32 BE)│ count × entry                                │
//! └───────────────┴──────────────────────────────────────────────┘
//! entry: symbol bytes │ code length (u8, 1-64) │ code bits, MSB-first,
//!        left-aligned in ceil(length / 8) bytes, zero padded
//! ```
//!
//! A Huffman container is the code table followed by the
//! [`BitPayload`] carrying the concatenated codes.

use oxipack_core::bitstream::{BitPayload, BitReader, BitWriter};
use oxipack_core::crc;
use oxipack_core::error::{CodecError, Result};
use oxipack_core::traits::{Codec, read_all};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::io::{Read, Write};

/// Longest code the table format can store.
pub const MAX_CODE_LENGTH: u8 = 64;

/// A value that can be Huffman coded and stored in a code table.
pub trait Symbol: Copy + Eq + Hash + fmt::Debug {
    /// Append the serialized symbol to `out`.
    fn write_to(&self, out: &mut Vec<u8>);

    /// Parse a symbol from the front of `input`, advancing it.
    fn read_from(input: &mut &[u8]) -> Result<Self>;
}

impl Symbol for u8 {
    fn write_to(&self, out: &mut Vec<u8>) {
        out.push(*self);
    }

    fn read_from(input: &mut &[u8]) -> Result<Self> {
        Ok(take_bytes(input, 1, "byte symbol")?[0])
    }
}

/// Split `n` bytes off the front of `input`.
pub(crate) fn take_bytes<'a>(input: &mut &'a [u8], n: usize, what: &str) -> Result<&'a [u8]> {
    if input.len() < n {
        return Err(CodecError::truncated(format!(
            "{} needs {} bytes, {} left",
            what,
            n,
            input.len()
        )));
    }
    let (head, tail) = input.split_at(n);
    *input = tail;
    Ok(head)
}

/// Occurrence counts per symbol, in order of first appearance.
#[derive(Debug, Clone)]
pub struct FrequencyTable<S: Symbol> {
    counts: Vec<(S, u64)>,
    index: HashMap<S, usize>,
}

impl<S: Symbol> FrequencyTable<S> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            counts: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Count every symbol of a sequence.
    pub fn from_symbols<I: IntoIterator<Item = S>>(symbols: I) -> Self {
        let mut table = Self::new();
        for symbol in symbols {
            table.add(symbol);
        }
        table
    }

    /// Add a symbol occurrence.
    pub fn add(&mut self, symbol: S) {
        self.add_count(symbol, 1);
    }

    /// Add multiple occurrences of a symbol.
    pub fn add_count(&mut self, symbol: S, count: u64) {
        match self.index.get(&symbol) {
            Some(&i) => self.counts[i].1 += count,
            None => {
                self.index.insert(symbol, self.counts.len());
                self.counts.push((symbol, count));
            }
        }
    }

    /// Occurrences of `symbol` (0 if never seen).
    pub fn count(&self, symbol: &S) -> u64 {
        self.index.get(symbol).map_or(0, |&i| self.counts[i].1)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no symbol has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total occurrences over all symbols.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&(_, c)| c).sum()
    }

    /// Iterate `(symbol, count)` in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (S, u64)> + '_ {
        self.counts.iter().copied()
    }
}

impl<S: Symbol> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// A prefix code word of 1 to 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u64,
    len: u8,
}

impl Code {
    /// Create a code from its low `len` bits.
    pub fn new(bits: u64, len: u8) -> Result<Self> {
        if len == 0 || len > MAX_CODE_LENGTH {
            return Err(CodecError::malformed_header(format!(
                "code length {} outside 1..={}",
                len, MAX_CODE_LENGTH
            )));
        }
        if len < 64 && bits >> len != 0 {
            return Err(CodecError::malformed_header(format!(
                "code bits {:#x} do not fit in {} bits",
                bits, len
            )));
        }
        Ok(Self { bits, len })
    }

    /// The code bits, right-aligned.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of bits in the code.
    pub fn length(&self) -> u8 {
        self.len
    }

    /// Bit `i` counting from the first transmitted bit.
    pub fn bit(&self, i: u8) -> bool {
        (self.bits >> (self.len - 1 - i)) & 1 == 1
    }

    /// Whether `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            f.write_str(if self.bit(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct DecodeNode {
    children: [Option<usize>; 2],
    entry: Option<usize>,
}

/// Binary trie used both to decode and to reject non-prefix-free tables.
#[derive(Debug, Clone)]
struct DecodeTree {
    nodes: Vec<DecodeNode>,
}

impl DecodeTree {
    fn new() -> Self {
        Self {
            nodes: vec![DecodeNode::default()],
        }
    }

    fn insert(&mut self, code: Code, entry: usize) -> Result<()> {
        let violation = || {
            CodecError::malformed_header(format!("code {} breaks the prefix property", code))
        };

        let mut node = 0;
        for i in 0..code.length() {
            if self.nodes[node].entry.is_some() {
                return Err(violation());
            }
            let bit = usize::from(code.bit(i));
            node = match self.nodes[node].children[bit] {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(DecodeNode::default());
                    self.nodes[node].children[bit] = Some(child);
                    child
                }
            };
        }

        let target = &mut self.nodes[node];
        if target.entry.is_some() || target.children.iter().any(Option::is_some) {
            return Err(violation());
        }
        target.entry = Some(entry);
        Ok(())
    }
}

enum BuildNode {
    Leaf(usize),
    Internal(usize, usize),
}

/// A prefix-free mapping from symbols to codes.
#[derive(Debug, Clone)]
pub struct CodeTable<S: Symbol> {
    entries: Vec<(S, Code)>,
    index: HashMap<S, usize>,
    tree: DecodeTree,
}

impl<S: Symbol> CodeTable<S> {
    /// A table with no symbols (only valid for an empty payload).
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            tree: DecodeTree::new(),
        }
    }

    /// Build the Huffman code for a frequency table.
    ///
    /// A single symbol gets the one-bit code `0`.
    pub fn build(freqs: &FrequencyTable<S>) -> Result<Self> {
        if freqs.is_empty() {
            return Err(CodecError::unsupported_alphabet(0));
        }

        let mut nodes: Vec<BuildNode> = (0..freqs.len()).map(BuildNode::Leaf).collect();
        let mut heap: BinaryHeap<Reverse<(u64, usize)>> = freqs
            .iter()
            .enumerate()
            .map(|(id, (_, count))| Reverse((count, id)))
            .collect();

        let root = loop {
            let Some(Reverse((freq_zero, zero))) = heap.pop() else {
                return Err(CodecError::unsupported_alphabet(0));
            };
            let Some(Reverse((freq_one, one))) = heap.pop() else {
                break zero;
            };
            let id = nodes.len();
            nodes.push(BuildNode::Internal(zero, one));
            heap.push(Reverse((freq_zero.saturating_add(freq_one), id)));
        };

        let mut codes = vec![None; freqs.len()];
        let mut stack = vec![(root, 0u64, 0u8)];
        while let Some((node, bits, len)) = stack.pop() {
            match nodes[node] {
                BuildNode::Leaf(i) => codes[i] = Some(Code::new(bits, len.max(1))?),
                BuildNode::Internal(zero, one) => {
                    if len == MAX_CODE_LENGTH {
                        return Err(CodecError::unsupported_alphabet(freqs.len()));
                    }
                    stack.push((one, (bits << 1) | 1, len + 1));
                    stack.push((zero, bits << 1, len + 1));
                }
            }
        }

        let entries = freqs
            .iter()
            .zip(codes)
            .map(|((symbol, _), code)| {
                code.map(|c| (symbol, c))
                    .ok_or_else(|| CodecError::unsupported_alphabet(freqs.len()))
            })
            .collect::<Result<Vec<_>>>()?;

        let table = Self::from_entries(entries)?;
        log::debug!(
            "huffman: built code for {} symbols, max length {}",
            table.len(),
            table.max_code_length()
        );
        Ok(table)
    }

    /// Create a table from explicit entries, rejecting duplicate symbols and
    /// codes that violate the prefix property.
    pub fn from_entries(entries: Vec<(S, Code)>) -> Result<Self> {
        let mut table = Self::empty();
        table.entries.reserve(entries.len());

        for (i, (symbol, code)) in entries.into_iter().enumerate() {
            if table.index.insert(symbol, i).is_some() {
                return Err(CodecError::malformed_header(format!(
                    "symbol {:?} appears twice",
                    symbol
                )));
            }
            table.tree.insert(code, i)?;
            table.entries.push((symbol, code));
        }

        Ok(table)
    }

    /// Code assigned to `symbol`.
    pub fn get(&self, symbol: &S) -> Option<Code> {
        self.index.get(symbol).map(|&i| self.entries[i].1)
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no symbols.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(symbol, code)` in table order.
    pub fn iter(&self) -> impl Iterator<Item = (S, Code)> + '_ {
        self.entries.iter().copied()
    }

    /// Length of the longest code (0 for an empty table).
    pub fn max_code_length(&self) -> u8 {
        self.entries
            .iter()
            .map(|(_, c)| c.length())
            .max()
            .unwrap_or(0)
    }

    /// Concatenate the codes of `symbols` into a bit payload.
    pub fn encode<I: IntoIterator<Item = S>>(&self, symbols: I) -> Result<BitPayload> {
        let mut writer = BitWriter::new();
        for symbol in symbols {
            let code = self.get(&symbol).ok_or_else(|| {
                CodecError::invalid_config(format!("symbol {:?} has no code", symbol))
            })?;
            writer.write_bits_u64(code.bits(), code.length())?;
        }
        Ok(writer.into_payload())
    }

    /// Decode symbols from `payload` on demand.
    pub fn decoder<'a>(&'a self, payload: &'a BitPayload) -> SymbolDecoder<'a, S> {
        SymbolDecoder {
            table: self,
            reader: payload.reader(),
            failed: false,
        }
    }

    /// Serialize the table.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.entries.len() as u32).to_be_bytes());
        for (symbol, code) in &self.entries {
            symbol.write_to(out);
            out.push(code.length());

            let width = code.length().div_ceil(8) as usize;
            let aligned = code.bits() << (width * 8 - code.length() as usize);
            out.extend_from_slice(&aligned.to_be_bytes()[8 - width..]);
        }
    }

    /// Parse a serialized table from the front of `input`, advancing it.
    pub fn parse(input: &mut &[u8]) -> Result<Self> {
        let count = take_bytes(input, 4, "code table entry count")?;
        let count = u32::from_be_bytes([count[0], count[1], count[2], count[3]]) as usize;

        let mut entries = Vec::with_capacity(count.min(input.len()));
        for _ in 0..count {
            let symbol = S::read_from(input)?;
            let len = take_bytes(input, 1, "code length")?[0];
            if len == 0 || len > MAX_CODE_LENGTH {
                return Err(CodecError::malformed_header(format!(
                    "code length {} for symbol {:?} outside 1..={}",
                    len, symbol, MAX_CODE_LENGTH
                )));
            }

            let width = len.div_ceil(8) as usize;
            let aligned = take_bytes(input, width, "code bits")?
                .iter()
                .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
            let pad = width * 8 - len as usize;
            if aligned & ((1u64 << pad) - 1) != 0 {
                return Err(CodecError::malformed_header(format!(
                    "code for symbol {:?} has non-zero padding",
                    symbol
                )));
            }

            entries.push((symbol, Code::new(aligned >> pad, len)?));
        }

        Self::from_entries(entries)
    }
}

/// Pull-based decoder yielding one symbol per complete code.
///
/// Yields `Err(UndecodableSymbol)` when the bits read so far can no longer
/// match any code, and `Err(TruncatedStream)` when the payload ends inside a
/// code. Decoding stops after the first error.
#[derive(Debug, Clone)]
pub struct SymbolDecoder<'a, S: Symbol> {
    table: &'a CodeTable<S>,
    reader: BitReader<'a>,
    failed: bool,
}

impl<S: Symbol> SymbolDecoder<'_, S> {
    /// Bits consumed so far.
    pub fn bit_position(&self) -> u64 {
        self.reader.bit_position()
    }
}

impl<S: Symbol> Iterator for SymbolDecoder<'_, S> {
    type Item = Result<S>;

    fn next(&mut self) -> Option<Result<S>> {
        if self.failed {
            return None;
        }

        let table = self.table;
        let nodes = &table.tree.nodes;
        let start = self.reader.bit_position();
        let mut node = 0;

        loop {
            let Some(bit) = self.reader.read_bit() else {
                if node == 0 {
                    return None;
                }
                self.failed = true;
                return Some(Err(CodecError::truncated(format!(
                    "payload ends inside the code starting at bit {}",
                    start
                ))));
            };

            match nodes[node].children[usize::from(bit)] {
                Some(child) => {
                    if let Some(entry) = nodes[child].entry {
                        return Some(Ok(table.entries[entry].0));
                    }
                    node = child;
                }
                None => {
                    self.failed = true;
                    return Some(Err(CodecError::undecodable(start)));
                }
            }
        }
    }
}

/// Build the Huffman code for a frequency table.
pub fn build_code<S: Symbol>(freqs: &FrequencyTable<S>) -> Result<CodeTable<S>> {
    CodeTable::build(freqs)
}

/// Encode a symbol sequence with `table`.
pub fn encode<S: Symbol>(symbols: &[S], table: &CodeTable<S>) -> Result<BitPayload> {
    table.encode(symbols.iter().copied())
}

/// Decode a payload with `table`.
pub fn decode<'a, S: Symbol>(
    payload: &'a BitPayload,
    table: &'a CodeTable<S>,
) -> SymbolDecoder<'a, S> {
    table.decoder(payload)
}

/// Shannon entropy of the distribution, in bits per symbol.
pub fn entropy<S: Symbol>(freqs: &FrequencyTable<S>) -> f64 {
    let total = freqs.total() as f64;
    if total == 0.0 {
        return 0.0;
    }

    freqs
        .iter()
        .filter(|&(_, count)| count > 0)
        .map(|(_, count)| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Expected code length under the distribution, in bits per symbol.
pub fn average_code_length<S: Symbol>(freqs: &FrequencyTable<S>, table: &CodeTable<S>) -> f64 {
    let total = freqs.total() as f64;
    if total == 0.0 {
        return 0.0;
    }

    freqs
        .iter()
        .map(|(symbol, count)| {
            let len = table.get(&symbol).map_or(0, |c| c.length());
            count as f64 * f64::from(len)
        })
        .sum::<f64>()
        / total
}

/// Serialize a code table followed by its payload.
pub fn write_container<S: Symbol>(
    table: &CodeTable<S>,
    payload: &BitPayload,
    out: &mut Vec<u8>,
) -> Result<()> {
    table.write_to(out);
    payload.write_to(out)
}

/// Parse a code table and the payload that fills the rest of `input`.
pub fn read_container<S: Symbol>(input: &[u8]) -> Result<(CodeTable<S>, BitPayload)> {
    let mut rest = input;
    let table = CodeTable::parse(&mut rest)?;
    let payload = BitPayload::parse(rest)?;
    Ok((table, payload))
}

/// Huffman-code a symbol sequence into a self-describing container.
///
/// An empty sequence produces an empty table and an empty payload.
pub fn encode_symbols<S: Symbol>(symbols: &[S]) -> Result<Vec<u8>> {
    let freqs = FrequencyTable::from_symbols(symbols.iter().copied());
    let table = if freqs.is_empty() {
        CodeTable::empty()
    } else {
        build_code(&freqs)?
    };
    let payload = encode(symbols, &table)?;

    let mut out = Vec::with_capacity(payload.serialized_len() + table.len() * 4 + 4);
    write_container(&table, &payload, &mut out)?;
    Ok(out)
}

/// Standalone Huffman codec over the bytes of the input.
///
/// The container is followed by the big-endian CRC-32 of the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCodec;

impl HuffmanCodec {
    /// Create a Huffman codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for HuffmanCodec {
    fn name(&self) -> &'static str {
        "huffman"
    }

    fn compress(&self, source: &mut dyn Read, sink: &mut dyn Write) -> Result<()> {
        let data = read_all(source)?;
        let mut out = encode_symbols(&data)?;
        crc::append_trailer(&mut out, &data);
        log::debug!("huffman: {} bytes -> {} bytes", data.len(), out.len());
        sink.write_all(&out)?;
        Ok(())
    }

    fn decompress(&self, source: &mut dyn Read, sink: &mut dyn Write) -> Result<()> {
        let data = read_all(source)?;
        let (body, expected) = crc::split_trailer(&data)?;
        let (table, payload) = read_container::<u8>(body)?;
        let output = table.decoder(&payload).collect::<Result<Vec<u8>>>()?;
        crc::verify(expected, &output)?;
        sink.write_all(&output)?;
        Ok(())
    }
}
