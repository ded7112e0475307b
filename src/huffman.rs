use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use log::{debug, trace, warn};

use crate::error::{HuffmanError, Result};

pub type Symbol = u8;
pub type FreqTable = BTreeMap<Symbol, u64>;
pub type CodeTable = BTreeMap<Symbol, String>;
pub type ReverseCodeTable = HashMap<String, Symbol>;

/// Index of a node inside a [`HuffmanTree`] arena.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Node {
    Leaf {
        symbol: Symbol,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl Node {
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }
}

/// Prefix-code tree stored as a flat arena. Children always have lower ids
/// than their parent; the root is the last node pushed.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn weight(&self) -> u64 {
        self.nodes[self.root].freq()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }
}

/// Heap entry. Ordered by weight, then by insertion sequence, both reversed so
/// `BinaryHeap` pops the lightest and, among equals, the oldest entry first.
#[derive(Eq, PartialEq)]
struct HeapNode {
    freq: u64,
    seq: u64,
    id: NodeId,
}

impl Ord for HeapNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .freq
            .cmp(&self.freq)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for HeapNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn count_frequencies(data: &[u8]) -> FreqTable {
    let mut counts = [0u64; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }

    let freq: FreqTable = counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(byte, &count)| (byte as Symbol, count))
        .collect();

    debug!(
        "Counted {} bytes, {} unique symbols",
        data.len(),
        freq.len()
    );
    freq
}

/// Shannon entropy of the distribution in bits per symbol.
pub fn entropy_from_freq(freq: &FreqTable) -> f64 {
    let total: u64 = freq.values().sum();
    if total == 0 {
        return 0.0;
    }
    let total_f = total as f64;

    freq.values()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total_f;
            -p * p.log2()
        })
        .sum()
}

/// Frequency-weighted mean code length in bits per symbol.
pub fn average_code_length(freq: &FreqTable, table: &CodeTable) -> f64 {
    let total: u64 = freq.values().sum();
    if total == 0 {
        return 0.0;
    }

    let bits: u64 = freq
        .iter()
        .filter_map(|(symbol, &count)| table.get(symbol).map(|code| count * code.len() as u64))
        .sum();
    bits as f64 / total as f64
}

pub fn build_huffman_tree(frequencies: &FreqTable) -> Result<HuffmanTree> {
    let mut nodes = Vec::with_capacity(frequencies.len() * 2);
    let mut heap = BinaryHeap::with_capacity(frequencies.len());
    let mut seq = 0u64;

    for (&symbol, &freq) in frequencies.iter().filter(|&(_, &f)| f > 0) {
        nodes.push(Node::Leaf { symbol, freq });
        heap.push(HeapNode {
            freq,
            seq,
            id: nodes.len() - 1,
        });
        seq += 1;
    }

    if heap.is_empty() {
        return Err(HuffmanError::EmptyInput);
    }
    debug!("Building Huffman tree from {} leaves", heap.len());

    while heap.len() > 1 {
        let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
            break;
        };
        let freq = left.freq + right.freq;
        nodes.push(Node::Internal {
            freq,
            left: left.id,
            right: right.id,
        });
        heap.push(HeapNode {
            freq,
            seq,
            id: nodes.len() - 1,
        });
        seq += 1;
    }

    let root = match heap.pop() {
        Some(node) => node.id,
        None => return Err(HuffmanError::EmptyInput),
    };
    debug!(
        "Tree construction complete: {} nodes, root weight {}",
        nodes.len(),
        nodes[root].freq()
    );

    Ok(HuffmanTree { nodes, root })
}

pub fn build_code_table(tree: &HuffmanTree) -> CodeTable {
    let mut table = CodeTable::new();

    if let Node::Leaf { symbol, .. } = tree.node(tree.root()) {
        warn!(
            "Single-symbol alphabet, assigning one-bit code to {:#04x}",
            symbol
        );
        table.insert(*symbol, "0".to_string());
        return table;
    }

    let mut prefix = String::new();
    assign_codes(tree, tree.root(), &mut prefix, &mut table);
    table
}

fn assign_codes(tree: &HuffmanTree, id: NodeId, prefix: &mut String, table: &mut CodeTable) {
    match *tree.node(id) {
        Node::Leaf { symbol, .. } => {
            trace!(
                "Assigning code to byte {:#04x} ('{}') : '{}'",
                symbol,
                symbol.escape_ascii(),
                prefix
            );
            table.insert(symbol, prefix.clone());
        }
        Node::Internal { left, right, .. } => {
            prefix.push('0');
            assign_codes(tree, left, prefix, table);
            prefix.pop();

            prefix.push('1');
            assign_codes(tree, right, prefix, table);
            prefix.pop();
        }
    }
}

pub fn reverse_table(table: &CodeTable) -> ReverseCodeTable {
    table
        .iter()
        .map(|(&symbol, code)| (code.clone(), symbol))
        .collect()
}

/// Checks that no code is a prefix of another. Empty codes are rejected.
pub fn is_prefix_free<'a, I>(codes: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sorted: Vec<&str> = codes.into_iter().collect();
    if sorted.iter().any(|c| c.is_empty()) {
        return false;
    }
    sorted.sort_unstable();

    // After sorting, any code that prefixes another also prefixes its successor.
    sorted.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes_for(data: &[u8]) -> (FreqTable, CodeTable) {
        let freq = count_frequencies(data);
        let tree = build_huffman_tree(&freq).unwrap();
        let table = build_code_table(&tree);
        (freq, table)
    }

    #[test]
    fn test_count_frequencies() {
        let freq = count_frequencies(b"aaabbbbcc");
        assert_eq!(freq.len(), 3);
        assert_eq!(freq[&b'a'], 3);
        assert_eq!(freq[&b'b'], 4);
        assert_eq!(freq[&b'c'], 2);
        assert!(count_frequencies(&[]).is_empty());
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let err = build_huffman_tree(&FreqTable::new()).unwrap_err();
        assert!(matches!(err, HuffmanError::EmptyInput));

        let mut zeros = FreqTable::new();
        zeros.insert(b'x', 0);
        assert!(matches!(
            build_huffman_tree(&zeros),
            Err(HuffmanError::EmptyInput)
        ));
    }

    #[test]
    fn test_children_precede_parent() {
        let freq = count_frequencies(b"mississippi river");
        let tree = build_huffman_tree(&freq).unwrap();
        assert_eq!(tree.root(), 2 * freq.len() - 2);

        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            if let Node::Internal { freq, left, right } = *tree.node(id) {
                assert!(left < id && right < id);
                assert_eq!(freq, tree.node(left).freq() + tree.node(right).freq());
                stack.extend([left, right]);
            }
        }
    }

    #[test]
    fn test_three_symbol_example() {
        let freq = count_frequencies(b"aaabbbbcc");
        let tree = build_huffman_tree(&freq).unwrap();
        assert_eq!(tree.weight(), 9);
        assert_eq!(tree.leaf_count(), 3);

        let table = build_code_table(&tree);
        assert_eq!(table[&b'b'].len(), 1);
        assert_eq!(table[&b'a'].len(), 2);
        assert_eq!(table[&b'c'].len(), 2);

        // c(2) and a(3) merge first with c on the left, then b(4) joins.
        assert_eq!(table[&b'b'], "0");
        assert_eq!(table[&b'c'], "10");
        assert_eq!(table[&b'a'], "11");
    }

    #[test]
    fn test_equal_weights_pop_in_insertion_order() {
        let mut freq = FreqTable::new();
        for symbol in [b'w', b'x', b'y', b'z'] {
            freq.insert(symbol, 1);
        }
        let table = build_code_table(&build_huffman_tree(&freq).unwrap());
        assert_eq!(table[&b'w'], "00");
        assert_eq!(table[&b'x'], "01");
        assert_eq!(table[&b'y'], "10");
        assert_eq!(table[&b'z'], "11");
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let (_, table) = codes_for(&[b'A'; 1000]);
        assert_eq!(table.len(), 1);
        assert_eq!(table[&b'A'], "0");
    }

    #[test]
    fn test_full_alphabet_uniform() {
        let data: Vec<u8> = (0..=255u8).collect();
        let (_, table) = codes_for(&data);
        assert_eq!(table.len(), 256);
        assert!(table.values().all(|c| c.len() == 8));
        assert!(is_prefix_free(table.values().map(String::as_str)));
    }

    #[test]
    fn test_skewed_distribution_is_prefix_free_and_kraft() {
        let mut data = Vec::new();
        let mut count = 1usize;
        for symbol in 0..20u8 {
            data.extend(std::iter::repeat_n(symbol, count));
            count = count * 3 / 2 + 1;
        }
        let (freq, table) = codes_for(&data);
        assert!(is_prefix_free(table.values().map(String::as_str)));

        let kraft: f64 = table.values().map(|c| 0.5f64.powi(c.len() as i32)).sum();
        assert!((kraft - 1.0).abs() < 1e-9);

        let avg = average_code_length(&freq, &table);
        assert!(avg >= entropy_from_freq(&freq) - 1e-9);
        assert!(avg < entropy_from_freq(&freq) + 1.0);
    }

    #[test]
    fn test_is_prefix_free() {
        assert!(is_prefix_free(["0", "10", "11"]));
        assert!(!is_prefix_free(["0", "01", "11"]));
        assert!(!is_prefix_free(["10", "1"]));
        assert!(!is_prefix_free(["", "1"]));
        assert!(!is_prefix_free(["01", "01"]));
    }

    #[test]
    fn test_entropy() {
        let mut freq = FreqTable::new();
        freq.insert(0, 5);
        freq.insert(1, 5);
        assert!((entropy_from_freq(&freq) - 1.0).abs() < 1e-12);
        assert_eq!(entropy_from_freq(&FreqTable::new()), 0.0);
    }
}
