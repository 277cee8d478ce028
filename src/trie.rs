//! Arena-backed binary trie over IPv4 prefixes.
//!
//! Nodes live in a `Vec` and refer to each other by [`NodeId`]. Each node
//! caches its own [`Prefix`], so rebuilding the root-to-node bit string is
//! free. Slots released by pruning go on a free list and are reused.

use crate::prefix::Prefix;

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct Node {
    prefix: Prefix,
    parent: Option<NodeId>,
    children: [Option<NodeId>; 2],
    terminal: bool,
}

impl Node {
    fn new(prefix: Prefix, parent: Option<NodeId>) -> Self {
        Self {
            prefix,
            parent,
            children: [None, None],
            terminal: false,
        }
    }
}

/// Result of inserting a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// New leaf; `superseded` lists former leaves nested under it, now pruned.
    Inserted {
        node: NodeId,
        superseded: Vec<Prefix>,
    },
    /// The same prefix is already a leaf.
    Duplicate(NodeId),
    /// A broader leaf already covers the prefix.
    Covered { by: Prefix },
}

#[derive(Debug, Clone)]
pub struct PrefixTrie {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    live: usize,
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(Prefix::ROOT, None)],
            free: Vec::new(),
            live: 1,
        }
    }

    /// Number of reachable nodes, root included.
    pub fn node_count(&self) -> usize {
        self.live
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    fn alloc(&mut self, prefix: Prefix, parent: NodeId) -> NodeId {
        self.live += 1;
        let node = Node::new(prefix, Some(parent));
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(node);
                id
            }
        }
    }

    pub fn prefix(&self, id: NodeId) -> Prefix {
        self.node(id).prefix
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.node(id).terminal
    }

    /// Mark a node as an output block.
    pub fn set_terminal(&mut self, id: NodeId) {
        self.node_mut(id).terminal = true;
    }

    /// Node holding exactly `prefix`, if the path exists.
    #[cfg(test)]
    pub fn find(&self, prefix: &Prefix) -> Option<NodeId> {
        let mut current = Self::ROOT;
        for i in 0..prefix.len() {
            current = self.node(current).children[prefix.bit(i)]?;
        }
        Some(current)
    }

    /// Insert a prefix, keeping the leaf set free of nested blocks.
    pub fn insert(&mut self, prefix: Prefix) -> InsertOutcome {
        let mut current = Self::ROOT;
        for i in 0..prefix.len() {
            if self.node(current).terminal {
                return InsertOutcome::Covered {
                    by: self.node(current).prefix,
                };
            }
            let bit = prefix.bit(i);
            let existing = self.node(current).children[bit];
            current = match existing {
                Some(child) => child,
                None => {
                    let child_prefix = self.node(current).prefix.child(bit);
                    let child = self.alloc(child_prefix, current);
                    self.node_mut(current).children[bit] = Some(child);
                    child
                }
            };
        }

        if self.node(current).terminal {
            return InsertOutcome::Duplicate(current);
        }

        self.set_terminal(current);
        let superseded = self.prune_children(current);
        InsertOutcome::Inserted {
            node: current,
            superseded,
        }
    }

    /// Drop both subtrees below `id` and return the leaves they held.
    pub fn prune_children(&mut self, id: NodeId) -> Vec<Prefix> {
        let mut leaves = Vec::new();
        let children = std::mem::take(&mut self.node_mut(id).children);
        let mut stack: Vec<NodeId> = children.into_iter().flatten().collect();
        while let Some(next) = stack.pop() {
            let node = self.node_mut(next);
            if node.terminal {
                leaves.push(node.prefix);
            }
            stack.extend(std::mem::take(&mut node.children).into_iter().flatten());
            node.terminal = false;
            node.parent = None;
            self.free.push(next);
            self.live -= 1;
        }
        leaves.sort();
        leaves
    }

    /// Unlink a childless, non-root node from its parent and release it.
    /// Returns the parent.
    pub fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id).parent?;
        debug_assert!(self.node(id).children.iter().all(Option::is_none));

        let slot = self
            .node(parent)
            .children
            .iter()
            .position(|c| *c == Some(id))?;
        self.node_mut(parent).children[slot] = None;

        let node = self.node_mut(id);
        node.terminal = false;
        node.parent = None;
        self.free.push(id);
        self.live -= 1;
        Some(parent)
    }

    /// Leaves in ascending (length, value) order.
    pub fn leaves(&self) -> Vec<Prefix> {
        let mut out = Vec::new();
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.terminal {
                out.push(node.prefix);
            }
            stack.extend(node.children.iter().flatten());
        }
        out.sort();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Prefix {
        s.parse().unwrap()
    }

    #[test]
    fn test_insert_creates_path() {
        let mut trie = PrefixTrie::new();
        let InsertOutcome::Inserted { node, superseded } = trie.insert(p("10.0.0.0/8")) else {
            panic!("expected insert");
        };
        assert!(superseded.is_empty());
        assert_eq!(trie.prefix(node), p("10.0.0.0/8"));
        assert!(trie.is_terminal(node));
        assert_eq!(trie.node_count(), 9);
        assert_eq!(trie.find(&p("10.0.0.0/8")), Some(node));
        assert_eq!(trie.find(&p("10.0.0.0/9")), None);
    }

    #[test]
    fn test_shared_path_is_reused() {
        let mut trie = PrefixTrie::new();
        trie.insert(p("10.0.0.0/24"));
        let before = trie.node_count();
        trie.insert(p("10.0.1.0/24"));
        // Only the diverging bit at depth 24 is new.
        assert_eq!(trie.node_count(), before + 1);
    }

    #[test]
    fn test_duplicate_insert() {
        let mut trie = PrefixTrie::new();
        trie.insert(p("10.0.0.0/24"));
        assert!(matches!(
            trie.insert(p("10.0.0.0/24")),
            InsertOutcome::Duplicate(_)
        ));
        assert_eq!(trie.leaves(), vec![p("10.0.0.0/24")]);
    }

    #[test]
    fn test_insert_under_existing_leaf_is_covered() {
        let mut trie = PrefixTrie::new();
        trie.insert(p("52.94.133.128/25"));
        let outcome = trie.insert(p("52.94.133.136/30"));
        assert_eq!(
            outcome,
            InsertOutcome::Covered {
                by: p("52.94.133.128/25")
            }
        );
        assert_eq!(trie.leaves(), vec![p("52.94.133.128/25")]);
    }

    #[test]
    fn test_insert_above_existing_leaves_supersedes() {
        let mut trie = PrefixTrie::new();
        trie.insert(p("54.240.196.160/28"));
        trie.insert(p("54.240.196.176/28"));
        let InsertOutcome::Inserted { superseded, .. } = trie.insert(p("54.240.196.160/27")) else {
            panic!("expected insert");
        };
        assert_eq!(
            superseded,
            vec![p("54.240.196.160/28"), p("54.240.196.176/28")]
        );
        assert_eq!(trie.leaves(), vec![p("54.240.196.160/27")]);
    }

    #[test]
    fn test_detach_and_slot_reuse() {
        let mut trie = PrefixTrie::new();
        let InsertOutcome::Inserted { node, .. } = trie.insert(p("128.0.0.0/1")) else {
            panic!("expected insert");
        };
        assert_eq!(trie.detach(node), Some(PrefixTrie::ROOT));
        assert_eq!(trie.node_count(), 1);
        assert!(trie.leaves().is_empty());

        let InsertOutcome::Inserted { node: again, .. } = trie.insert(p("0.0.0.0/1")) else {
            panic!("expected insert");
        };
        assert_eq!(again, node);
        assert_eq!(trie.parent(again), Some(PrefixTrie::ROOT));
    }

    #[test]
    fn test_root_cannot_be_detached() {
        let mut trie = PrefixTrie::new();
        assert_eq!(trie.detach(PrefixTrie::ROOT), None);
    }

    #[test]
    fn test_leaves_sorted() {
        let mut trie = PrefixTrie::new();
        for s in ["192.168.0.0/24", "10.0.0.0/24", "172.16.0.0/12"] {
            trie.insert(p(s));
        }
        assert_eq!(
            trie.leaves(),
            vec![p("172.16.0.0/12"), p("10.0.0.0/24"), p("192.168.0.0/24")]
        );
    }
}
