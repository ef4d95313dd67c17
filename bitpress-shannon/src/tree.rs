//! Parser tree for Shannon-Fano codes.
//!
//! The tree is a binary trie stored as an arena of nodes addressed by
//! index. Root-to-leaf paths spell the codes (`0` = left, `1` = right) and
//! leaves hold words. The same tree drives decoding and is serialized into
//! the file header in pre-order:
//!
//! ```text
//! internal node:  0 <left subtree> <right subtree>
//! leaf:           1 <word, word_bits wide>
//! ```
//!
//! A table with a single word has the one code `0`, so the root is an
//! internal node with only a left child. That tree is written as just its
//! leaf, and a header consisting of a lone leaf is read back into the same
//! shape, keeping every decode walk at least one bit long.

use crate::codes::CodeTable;
use bitpress_core::bitstream::{BitReader, BitWriter};
use bitpress_core::error::{BitpressError, Result};
use bitpress_core::pending::PendingBits;
use std::io::{Read, Write};

/// Index of a node in a [`ParserTree`].
pub type NodeId = usize;

const ROOT: NodeId = 0;

/// A node of the parser tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// Branch node with optional children.
    Internal {
        /// Child reached by a `0` bit.
        left: Option<NodeId>,
        /// Child reached by a `1` bit.
        right: Option<NodeId>,
    },
    /// Terminal node holding a word.
    Leaf(u64),
}

const EMPTY_INTERNAL: Node = Node::Internal {
    left: None,
    right: None,
};

/// Binary trie mapping codes to words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserTree {
    nodes: Vec<Node>,
    word_bits: u8,
}

/// Where a newly parsed node gets attached.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Root,
    Left(NodeId),
    Right(NodeId),
}

impl ParserTree {
    /// Build the tree for a code table.
    pub fn from_codes(codes: &CodeTable, word_bits: u8) -> Result<Self> {
        let mut tree = Self {
            nodes: vec![EMPTY_INTERNAL],
            word_bits,
        };

        for entry in codes.iter() {
            let mut current = ROOT;
            for &bit in entry.code.bits() {
                current = tree.child_or_insert(current, bit)?;
            }
            tree.nodes[current] = Node::Leaf(entry.word);
        }

        Ok(tree)
    }

    fn child_or_insert(&mut self, node: NodeId, bit: u8) -> Result<NodeId> {
        let next = self.nodes.len();
        let Node::Internal { left, right } = &mut self.nodes[node] else {
            return Err(BitpressError::malformed(0, "code passes through a leaf"));
        };
        let child = match bit {
            0 => left,
            1 => right,
            other => {
                return Err(BitpressError::malformed(
                    0,
                    format!("bit value {other} is not 0 or 1"),
                ));
            }
        };

        match *child {
            Some(id) => Ok(id),
            None => {
                *child = Some(next);
                self.nodes.push(EMPTY_INTERNAL);
                Ok(next)
            }
        }
    }

    /// Parse a pre-order serialized tree.
    pub fn read_from<R: Read>(reader: &mut BitReader<R>, word_bits: u8) -> Result<Self> {
        let mut nodes = Vec::new();
        let mut stack = vec![Slot::Root];

        while let Some(slot) = stack.pop() {
            let position = reader.bit_position();
            let node = match reader.read_bit()? {
                Some(0) => EMPTY_INTERNAL,
                Some(1) => Node::Leaf(reader.read_value(word_bits)?),
                Some(bit) => {
                    return Err(BitpressError::malformed(
                        position,
                        format!("bit value {bit} is not 0 or 1"),
                    ));
                }
                None => return Err(BitpressError::unexpected_eof(position)),
            };

            let id = nodes.len();
            nodes.push(node);
            match slot {
                Slot::Root => {}
                Slot::Left(parent) | Slot::Right(parent) => {
                    if let Node::Internal { left, right } = &mut nodes[parent] {
                        if matches!(slot, Slot::Left(_)) {
                            *left = Some(id);
                        } else {
                            *right = Some(id);
                        }
                    }
                }
            }

            if node == EMPTY_INTERNAL {
                stack.push(Slot::Right(id));
                stack.push(Slot::Left(id));
            }
        }

        if let Some(&Node::Leaf(word)) = nodes.first() {
            nodes[ROOT] = Node::Internal {
                left: Some(1),
                right: None,
            };
            nodes.push(Node::Leaf(word));
        }

        Ok(Self { nodes, word_bits })
    }

    /// Serialize the tree in pre-order.
    pub fn write_to<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        let start = match self.nodes[ROOT] {
            Node::Internal {
                left: Some(child),
                right: None,
            } if matches!(self.nodes[child], Node::Leaf(_)) => child,
            _ => ROOT,
        };

        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf(word) => {
                    writer.write_bit(1)?;
                    writer.write_value(word, self.word_bits)?;
                }
                Node::Internal {
                    left: Some(left),
                    right: Some(right),
                } => {
                    writer.write_bit(0)?;
                    stack.push(right);
                    stack.push(left);
                }
                Node::Internal { .. } => {
                    return Err(BitpressError::malformed(
                        0,
                        format!("internal node {id} is missing a child"),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Walk the tree along the front of `bits`.
    ///
    /// Returns the word and the number of bits its code used, or `None` if
    /// `bits` ends before a leaf is reached. Nothing is consumed.
    pub fn resolve(&self, bits: &PendingBits) -> Result<Option<(u64, usize)>> {
        let mut current = ROOT;
        let mut depth = 0;

        loop {
            let (left, right) = match self.nodes[current] {
                Node::Leaf(word) => return Ok(Some((word, depth))),
                Node::Internal { left, right } => (left, right),
            };

            let Some(bit) = bits.peek(depth) else {
                return Ok(None);
            };
            let child = match bit {
                0 => left,
                1 => right,
                other => {
                    return Err(BitpressError::malformed(
                        0,
                        format!("bit value {other} is not 0 or 1"),
                    ));
                }
            };

            current = child.ok_or_else(|| {
                BitpressError::malformed(0, format!("no code continues with bit {bit}"))
            })?;
            depth += 1;
        }
    }

    /// Width of the words stored in leaves.
    pub fn word_bits(&self) -> u8 {
        self.word_bits
    }

    /// Number of leaves (distinct words).
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf(_)))
            .count()
    }

    /// `(word, code length)` for every leaf, in pre-order.
    pub fn code_lengths(&self) -> Vec<(u64, usize)> {
        let mut lengths = Vec::new();
        let mut stack = vec![(ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf(word) => lengths.push((word, depth)),
                Node::Internal { left, right } => {
                    if let Some(right) = right {
                        stack.push((right, depth + 1));
                    }
                    if let Some(left) = left {
                        stack.push((left, depth + 1));
                    }
                }
            }
        }
        lengths
    }

    /// Size of the serialized tree in bits.
    pub fn header_bits(&self) -> u64 {
        let leaves = self.leaf_count() as u64;
        let internal = if leaves == 1 { 0 } else { leaves - 1 };
        internal + leaves * (1 + u64::from(self.word_bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use std::io::Cursor;

    fn bits(text: &str) -> Vec<u8> {
        text.bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .map(|b| b - b'0')
            .collect()
    }

    fn serialize(tree: &ParserTree) -> Vec<u8> {
        let mut output = Vec::new();
        let mut writer = BitWriter::new(&mut output);
        tree.write_to(&mut writer).unwrap();
        let written = writer.bits_written() as usize;
        writer.fill_remainder().unwrap();
        writer.flush().unwrap();
        drop(writer);

        let mut reader = BitReader::new(Cursor::new(output));
        let mut out = vec![0u8; written];
        reader.read_exact(&mut out).unwrap();
        out
    }

    fn parse(header: &[u8], word_bits: u8) -> ParserTree {
        let mut output = Vec::new();
        let mut writer = BitWriter::new(&mut output);
        writer.write(header).unwrap();
        writer.fill_remainder().unwrap();
        writer.flush().unwrap();
        drop(writer);

        let mut reader = BitReader::new(Cursor::new(output));
        ParserTree::read_from(&mut reader, word_bits).unwrap()
    }

    fn three_word_tree() -> ParserTree {
        let mut frequencies = FrequencyTable::new();
        frequencies.add_count(0x62, 5);
        frequencies.add_count(0x61, 11);
        frequencies.add_count(0x63, 2);
        ParserTree::from_codes(&CodeTable::build(&frequencies), 8).unwrap()
    }

    #[test]
    fn test_header_for_three_words() {
        let tree = three_word_tree();
        assert_eq!(
            serialize(&tree),
            bits("0 1 01100001 0 1 01100010 1 01100011")
        );
        assert_eq!(tree.header_bits(), 29);
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_parse_rebuilds_same_tree() {
        let tree = three_word_tree();
        let parsed = parse(&serialize(&tree), 8);
        assert_eq!(parsed, tree);
        assert_eq!(parsed.code_lengths(), vec![(0x61, 1), (0x62, 2), (0x63, 2)]);
    }

    #[test]
    fn test_parse_two_bit_words() {
        let header = bits("0 0 1 01 1 00 1 10");
        let tree = parse(&header, 2);
        assert_eq!(tree.code_lengths(), vec![(0b01, 2), (0b00, 2), (0b10, 1)]);
        assert_eq!(serialize(&tree), header);
    }

    #[test]
    fn test_single_word_tree() {
        let frequencies = FrequencyTable::from_words([0x61; 10]);
        let tree = ParserTree::from_codes(&CodeTable::build(&frequencies), 8).unwrap();

        // Serialized as the bare leaf.
        let header = serialize(&tree);
        assert_eq!(header, bits("1 01100001"));
        assert_eq!(tree.header_bits(), 9);

        // Parsed back with the synthetic root.
        let parsed = parse(&header, 8);
        assert_eq!(parsed, tree);

        let mut pending = PendingBits::new();
        pending.extend_from_slice(&[0, 0]);
        assert_eq!(parsed.resolve(&pending).unwrap(), Some((0x61, 1)));

        pending.clear();
        pending.extend_from_slice(&[1]);
        assert!(parsed.resolve(&pending).is_err());
    }

    #[test]
    fn test_resolve_needs_whole_code() {
        let tree = three_word_tree();
        let mut pending = PendingBits::new();
        pending.extend_from_slice(&[1]);
        assert_eq!(tree.resolve(&pending).unwrap(), None);
        pending.extend_from_slice(&[1]);
        assert_eq!(tree.resolve(&pending).unwrap(), Some((0x63, 2)));
        pending.clear();
        pending.extend_from_slice(&[2]);
        assert!(tree.resolve(&pending).is_err());
    }

    #[test]
    fn test_truncated_header() {
        let mut output = Vec::new();
        let mut writer = BitWriter::new(&mut output);
        writer.write(&bits("0 1 0110")).unwrap();
        writer.fill_remainder().unwrap();
        writer.flush().unwrap();
        drop(writer);

        let mut reader = BitReader::new(Cursor::new(output));
        reader.ignore_last_bits_at_eof(2).unwrap();
        assert!(matches!(
            ParserTree::read_from(&mut reader, 8),
            Err(BitpressError::UnexpectedEof { .. })
        ));
    }
}
