//! Bounded CIDR aggregation.
//!
//! Every input prefix goes into a [`PrefixTrie`]; the leaves are tracked in a
//! [`LeafRegistry`]. While there are more leaves than allowed, the most
//! specific leaf is folded into its parent. Each fold only ever widens a
//! block, so the result always covers the input.

use ipnet::Ipv4Net;
use tracing::{debug, trace};

use crate::error::Result;
use crate::prefix::Prefix;
use crate::registry::LeafRegistry;
use crate::trie::{InsertOutcome, PrefixTrie};
use crate::validation::validate_max_blocks;

/// Counters describing one aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    /// Prefixes handed in, duplicates included.
    pub input_count: usize,
    /// Leaves left after dropping duplicates and nested prefixes.
    pub distinct_count: usize,
    pub output_count: usize,
    pub collapses: usize,
    pub input_addresses: u64,
    pub output_addresses: u64,
}

impl AggregationStats {
    /// Addresses allowed by the output that no input asked for.
    pub fn overreach(&self) -> u64 {
        self.output_addresses.saturating_sub(self.input_addresses)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Output blocks in ascending (length, value) order.
    pub blocks: Vec<Prefix>,
    pub stats: AggregationStats,
}

impl Aggregation {
    pub fn to_strings(&self) -> Vec<String> {
        self.blocks.iter().map(Prefix::to_string).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceState {
    Reducing,
    Done,
}

/// Trie plus leaf registry for one run.
#[derive(Debug, Default)]
pub struct Reducer {
    trie: PrefixTrie,
    registry: LeafRegistry,
    collapses: usize,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_prefixes(prefixes: &[Prefix]) -> Self {
        let mut reducer = Self::new();
        for prefix in prefixes {
            reducer.insert(*prefix);
        }
        reducer
    }

    pub fn insert(&mut self, prefix: Prefix) {
        match self.trie.insert(prefix) {
            InsertOutcome::Inserted { node, superseded } => {
                for nested in &superseded {
                    trace!("{} superseded by {}", nested, prefix);
                    self.registry.remove(nested);
                }
                self.registry.insert(prefix, node);
            }
            InsertOutcome::Duplicate(_) => trace!("Duplicate prefix {}", prefix),
            InsertOutcome::Covered { by } => trace!("{} already covered by {}", prefix, by),
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.registry.len()
    }

    pub fn collapses(&self) -> usize {
        self.collapses
    }

    /// Fold the most specific leaf into its parent, unless already within
    /// `max_blocks`.
    pub fn step(&mut self, max_blocks: usize) -> ReduceState {
        if self.registry.len() <= max_blocks {
            return ReduceState::Done;
        }
        let Some((leaf, node)) = self.registry.pop_max() else {
            return ReduceState::Done;
        };
        let Some(parent) = self.trie.detach(node) else {
            // Only the root has no parent, and a root leaf is the sole leaf.
            self.registry.insert(leaf, node);
            return ReduceState::Done;
        };

        if !self.trie.is_terminal(parent) {
            self.trie.set_terminal(parent);
            self.registry.insert(self.trie.prefix(parent), parent);
        }

        // Anything left below the parent is now inside it.
        for swept in self.trie.prune_children(parent) {
            self.registry.remove(&swept);
        }

        self.collapses += 1;
        let folded = self.trie.prefix(parent);
        trace!(
            "Collapsed {} [{}] into {} [{}] ({} leaves left)",
            leaf,
            leaf.to_bit_string(),
            folded,
            folded.to_bit_string(),
            self.registry.len()
        );
        ReduceState::Reducing
    }

    pub fn reduce(&mut self, max_blocks: usize) {
        while self.step(max_blocks) == ReduceState::Reducing {}
    }

    pub fn leaves(&self) -> Vec<Prefix> {
        self.registry.prefixes()
    }
}

/// Parse every CIDR string, failing on the first malformed one.
pub fn parse_all<S: AsRef<str>>(cidrs: &[S]) -> Result<Vec<Prefix>> {
    cidrs.iter().map(|s| Prefix::parse(s.as_ref())).collect()
}

/// Reduce `prefixes` to at most `max_blocks` covering blocks.
///
/// Blocks are only merged when there are more than `max_blocks` of them.
pub fn aggregate_prefixes(prefixes: &[Prefix], max_blocks: usize) -> Result<Aggregation> {
    validate_max_blocks(max_blocks)?;

    let mut reducer = Reducer::from_prefixes(prefixes);
    let distinct = reducer.leaves();
    debug!(
        "Built trie with {} nodes for {} leaves",
        reducer.trie.node_count(),
        distinct.len()
    );

    reducer.reduce(max_blocks);
    let blocks = reducer.leaves();

    let stats = AggregationStats {
        input_count: prefixes.len(),
        distinct_count: distinct.len(),
        output_count: blocks.len(),
        collapses: reducer.collapses(),
        input_addresses: count_addresses(&distinct),
        output_addresses: count_addresses(&blocks),
    };
    debug!(
        "Aggregated {} prefixes ({} distinct) into {} blocks after {} collapses",
        stats.input_count, stats.distinct_count, stats.output_count, stats.collapses
    );

    Ok(Aggregation { blocks, stats })
}

/// Reduce CIDR strings to at most `max_blocks` covering CIDR strings.
///
/// Any malformed entry or a zero target fails the whole call.
///
/// # Examples
/// ```
/// use cidrcap::aggregator::aggregate;
/// let out = aggregate(&["10.0.0.0/24", "10.0.1.0/24"], 1).unwrap();
/// assert_eq!(out, vec!["10.0.0.0/23"]);
/// ```
pub fn aggregate<S: AsRef<str>>(cidrs: &[S], max_blocks: usize) -> Result<Vec<String>> {
    validate_max_blocks(max_blocks)?;
    let prefixes = parse_all(cidrs)?;
    Ok(aggregate_prefixes(&prefixes, max_blocks)?.to_strings())
}

/// Total addresses in a list of disjoint blocks.
///
/// `/0` counts as 2^32; overlapping blocks are counted twice.
pub fn count_addresses(prefixes: &[Prefix]) -> u64 {
    prefixes
        .iter()
        .map(Prefix::size)
        .fold(0u64, |acc, n| acc.saturating_add(n))
}

/// True when every prefix of `inputs` lies inside some block of `cover`.
///
/// Containment is checked through [`Ipv4Net`], not the mask arithmetic the
/// reducer itself uses.
pub fn is_cover(cover: &[Prefix], inputs: &[Prefix]) -> bool {
    let cover: Vec<Ipv4Net> = cover.iter().copied().map(Ipv4Net::from).collect();
    inputs
        .iter()
        .copied()
        .map(Ipv4Net::from)
        .all(|input| cover.iter().any(|block| block.contains(&input)))
}
