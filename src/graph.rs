use crate::error::CycleError;
use crate::sort::Sorter;
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;

/// Directed graph stored as node -> successors, where an edge `u -> v` reads "u depends on v".
///
/// Keys and successor lists both keep insertion order, which is what makes sorting reproducible.
/// A node referenced only as a successor is a leaf and is not stored as a key.
#[derive(Debug, Clone)]
pub struct Graph<T> {
    keys: Vec<T>,
    successors: Vec<Vec<T>>,
    index: FxHashMap<T, usize>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            successors: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

/// Shorthand for [`Graph::from_pairs`].
pub fn graph_of<T, I, S>(pairs: I) -> Graph<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = (T, S)>,
    S: IntoIterator<Item = T>,
{
    Graph::from_pairs(pairs)
}

impl<T: Eq + Hash + Clone> Graph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(node, successors)` pairs.
    ///
    /// A repeated key keeps the position of its first occurrence and the successors of its last one.
    /// Successors are de-duplicated, keeping the first occurrence.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, S)>,
        S: IntoIterator<Item = T>,
    {
        let mut builder = GraphBuilder::new();
        for (node, edges) in pairs {
            let (idx, _) = builder.entry(node);
            builder.seen[idx].clear();
            builder.graph.successors[idx].clear();
            builder.extend(idx, edges);
        }
        builder.build()
    }

    /// Keys in insertion order. These are the roots the sort starts from.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.keys.iter()
    }

    /// Direct successors of `node`. Empty for leaves and for nodes not in the graph.
    pub fn successors(&self, node: &T) -> &[T] {
        match self.index.get(node) {
            Some(&idx) => &self.successors[idx],
            None => &[],
        }
    }

    pub fn contains_node(&self, node: &T) -> bool {
        self.index.contains_key(node)
    }

    /// Number of keys. Leaves that only appear as successors are not counted.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Every edge `(u, v)`, by key order then successor order.
    pub fn edges(&self) -> impl Iterator<Item = (&T, &T)> + '_ {
        self.keys
            .iter()
            .zip(&self.successors)
            .flat_map(|(u, succ)| succ.iter().map(move |v| (u, v)))
    }

    /// Every key and every successor, each once, in first-seen order.
    pub fn all_nodes(&self) -> Vec<&T> {
        let mut seen = FxHashSet::with_capacity_and_hasher(self.keys.len(), Default::default());
        let mut nodes = Vec::with_capacity(self.keys.len());
        for (u, succ) in self.keys.iter().zip(&self.successors) {
            for n in std::iter::once(u).chain(succ) {
                if seen.insert(n) {
                    nodes.push(n);
                }
            }
        }
        nodes
    }

    /// Sort with the default [`Sorter`].
    pub fn sort(&self) -> Result<Vec<T>, CycleError<T>> {
        Sorter::new().sort(self)
    }
}

impl<T, S> FromIterator<(T, S)> for Graph<T>
where
    T: Eq + Hash + Clone,
    S: IntoIterator<Item = T>,
{
    fn from_iter<I: IntoIterator<Item = (T, S)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<T: Eq + Hash> PartialEq for Graph<T> {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.successors == other.successors
    }
}

impl<T: Eq + Hash> Eq for Graph<T> {}

/// Incremental construction of a [`Graph`]. Edges added to an existing key are merged into it.
#[derive(Debug, Clone)]
pub struct GraphBuilder<T> {
    graph: Graph<T>,
    seen: Vec<FxHashSet<T>>,
}

impl<T> Default for GraphBuilder<T> {
    fn default() -> Self {
        Self {
            graph: Graph::default(),
            seen: Vec::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> GraphBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `node` with no edges. Returns `true` if it was not already a key.
    pub fn add(&mut self, node: T) -> bool {
        self.entry(node).1
    }

    /// Adds `node` with an edge to `edge`. Returns `true` if `node` was not already a key.
    pub fn add_edge(&mut self, node: T, edge: T) -> bool {
        self.add_edges(node, std::iter::once(edge))
    }

    /// Adds `node` with edges to each of `edges`. Returns `true` if `node` was not already a key.
    pub fn add_edges(&mut self, node: T, edges: impl IntoIterator<Item = T>) -> bool {
        let (idx, inserted) = self.entry(node);
        self.extend(idx, edges);
        inserted
    }

    pub fn build(self) -> Graph<T> {
        self.graph
    }

    fn entry(&mut self, node: T) -> (usize, bool) {
        if let Some(&idx) = self.graph.index.get(&node) {
            return (idx, false);
        }
        let idx = self.graph.keys.len();
        self.graph.index.insert(node.clone(), idx);
        self.graph.keys.push(node);
        self.graph.successors.push(Vec::new());
        self.seen.push(FxHashSet::default());
        (idx, true)
    }

    fn extend(&mut self, idx: usize, edges: impl IntoIterator<Item = T>) {
        let seen = &mut self.seen[idx];
        let successors = &mut self.graph.successors[idx];
        for edge in edges {
            if seen.insert(edge.clone()) {
                successors.push(edge);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_keep_insertion_order() {
        let graph = graph_of([("c", vec!["b"]), ("a", vec![]), ("b", vec!["a"])]);
        assert_eq!(graph.nodes().copied().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_duplicate_key_last_writer_wins() {
        let graph = graph_of([("a", vec!["b"]), ("c", vec![]), ("a", vec!["c", "d"])]);
        assert_eq!(graph.nodes().copied().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(graph.successors(&"a"), &["c", "d"]);
    }

    #[test]
    fn test_successors_deduplicated() {
        let graph = graph_of([("a", vec!["b", "c", "b"])]);
        assert_eq!(graph.successors(&"a"), &["b", "c"]);
    }

    #[test]
    fn test_leaves_are_not_keys() {
        let graph = graph_of([("a", vec!["b"])]);
        assert!(graph.contains_node(&"a"));
        assert!(!graph.contains_node(&"b"));
        assert!(graph.successors(&"b").is_empty());
        assert!(graph.successors(&"zzz").is_empty());
        assert_eq!(graph.all_nodes(), vec![&"a", &"b"]);
    }

    #[test]
    fn test_edges() {
        let graph = graph_of([("a", vec!["b"]), ("c", vec!["a", "b"])]);
        let edges: Vec<_> = graph.edges().map(|(u, v)| (*u, *v)).collect();
        assert_eq!(edges, vec![("a", "b"), ("c", "a"), ("c", "b")]);
    }

    #[test]
    fn test_empty() {
        let graph: Graph<u32> = Graph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.edges().count(), 0);
        assert!(graph.all_nodes().is_empty());
    }

    #[test]
    fn test_builder_merges_edges() {
        let mut builder = GraphBuilder::new();
        assert!(builder.add("a"));
        assert!(!builder.add("a"));
        assert!(!builder.add_edge("a", "b"));
        assert!(builder.add_edges("c", ["a", "b"]));
        assert!(!builder.add_edges("a", ["b", "d"]));
        let graph = builder.build();

        assert_eq!(graph.successors(&"a"), &["b", "d"]);
        assert_eq!(graph.successors(&"c"), &["a", "b"]);
        assert_eq!(graph, graph_of([("a", vec!["b", "d"]), ("c", vec!["a", "b"])]));
    }

    #[test]
    fn test_collect() {
        let graph: Graph<u8> = vec![(1, vec![2]), (2, vec![])].into_iter().collect();
        assert_eq!(graph.successors(&1), &[2]);
    }
}
