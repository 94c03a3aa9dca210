use crate::error::CycleError;
use crate::graph::Graph;
use log::{debug, trace};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::hash::Hash;

/// How the depth-first search walks the graph. Both strategies produce the same order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Native recursion, the call stack grows with the longest dependency chain.
    Recursive,
    /// Frames live on the heap, so deep chains cannot overflow the call stack.
    #[default]
    ExplicitStack,
}

/// Sort configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sorter {
    traversal: Traversal,
}

impl Sorter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// Dependencies first: for every edge `u -> v`, `v` comes before `u` in the output.
    pub fn sort<T: Eq + Hash + Clone>(&self, graph: &Graph<T>) -> Result<Vec<T>, CycleError<T>> {
        self.sort_by(graph.nodes().cloned(), |n: &T| graph.successors(n).iter().cloned())
    }

    /// Same as [`Sorter::sort`], over any graph given as ordered roots and a successor function.
    pub fn sort_by<N, R, FN, IN>(&self, roots: R, successors: FN) -> Result<Vec<N>, CycleError<N>>
    where
        N: Eq + Hash + Clone,
        R: IntoIterator<Item = N>,
        FN: FnMut(&N) -> IN,
        IN: IntoIterator<Item = N>,
    {
        match self.traversal {
            Traversal::Recursive => topological_sort(roots, successors),
            Traversal::ExplicitStack => topological_sort_iterative(roots, successors),
        }
    }
}

/// Sort `graph` with the default [`Sorter`].
pub fn sort<T: Eq + Hash + Clone>(graph: &Graph<T>) -> Result<Vec<T>, CycleError<T>> {
    Sorter::new().sort(graph)
}

/// Sort `items` in place so that every item comes after the items `edges` returns for it.
///
/// `edges` receives the item and the whole list. On a cycle `items` is left untouched.
pub fn sort_by_edges<T, F, I>(items: &mut Vec<T>, mut edges: F) -> Result<(), CycleError<T>>
where
    T: Eq + Hash + Clone,
    F: FnMut(&T, &[T]) -> I,
    I: IntoIterator<Item = T>,
{
    let all: &[T] = items;
    let sorted = topological_sort_iterative(all.iter().cloned(), |n: &T| edges(n, all))?;
    *items = sorted;
    Ok(())
}

/// Traversal state of a single sort call.
struct Session<N> {
    /// Roots not yet picked, in order. Finished ones are skipped lazily.
    unvisited: VecDeque<N>,
    in_progress: FxHashSet<N>,
    /// `in_progress` in the order the nodes were entered.
    path: Vec<N>,
    finished: FxHashSet<N>,
    sorted: Vec<N>,
    roots_visited: usize,
}

impl<N: Eq + Hash + Clone> Session<N> {
    fn new(roots: impl IntoIterator<Item = N>) -> Self {
        let unvisited: VecDeque<N> = roots.into_iter().collect();
        Self {
            finished: FxHashSet::with_capacity_and_hasher(unvisited.len(), Default::default()),
            sorted: Vec::with_capacity(unvisited.len()),
            in_progress: FxHashSet::default(),
            path: Vec::new(),
            unvisited,
            roots_visited: 0,
        }
    }

    fn next_root(&mut self) -> Option<N> {
        while let Some(node) = self.unvisited.pop_front() {
            if !self.finished.contains(&node) {
                trace!("visiting root #{}", self.roots_visited);
                self.roots_visited += 1;
                return Some(node);
            }
        }
        None
    }

    /// Marks `node` as in progress. `Ok(false)` means it was already finished.
    fn enter(&mut self, node: &N) -> Result<bool, CycleError<N>> {
        if self.finished.contains(node) {
            return Ok(false);
        }
        if self.in_progress.contains(node) {
            return Err(self.cycle_error(node));
        }
        self.in_progress.insert(node.clone());
        self.path.push(node.clone());
        Ok(true)
    }

    /// Finishes the node on top of the path.
    fn finish(&mut self) {
        if let Some(node) = self.path.pop() {
            self.in_progress.remove(&node);
            self.finished.insert(node.clone());
            self.sorted.push(node);
        }
    }

    fn cycle_error(&self, node: &N) -> CycleError<N> {
        let start = self.path.iter().position(|n| n == node).unwrap_or(0);
        let mut cycle = self.path[start..].to_vec();
        cycle.push(node.clone());
        debug!(
            "cycle of length {} detected after {} finished nodes, aborting sort",
            cycle.len() - 1,
            self.sorted.len()
        );
        CycleError::new(node.clone(), cycle)
    }

    fn into_sorted(self) -> Vec<N> {
        debug!(
            "sorted {} nodes from {} roots",
            self.sorted.len(),
            self.roots_visited
        );
        self.sorted
    }
}

/// Recursive depth-first sort over `roots`, visited in order.
///
/// Successors of a node are visited before the node is emitted. Fails on the first node that is
/// reached again while still on the active path.
pub fn topological_sort<N, R, FN, IN>(roots: R, mut successors: FN) -> Result<Vec<N>, CycleError<N>>
where
    N: Eq + Hash + Clone,
    R: IntoIterator<Item = N>,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = N>,
{
    let mut session = Session::new(roots);
    debug!("recursive topological sort over {} roots", session.unvisited.len());
    while let Some(root) = session.next_root() {
        visit(&root, &mut successors, &mut session)?;
    }
    Ok(session.into_sorted())
}

fn visit<N, FN, IN>(node: &N, successors: &mut FN, session: &mut Session<N>) -> Result<(), CycleError<N>>
where
    N: Eq + Hash + Clone,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = N>,
{
    if !session.enter(node)? {
        return Ok(());
    }
    for n in successors(node) {
        visit(&n, successors, session)?;
    }
    session.finish();
    Ok(())
}

/// [`topological_sort`] with an explicit stack of successor iterators instead of recursion.
pub fn topological_sort_iterative<N, R, FN, IN>(roots: R, mut successors: FN) -> Result<Vec<N>, CycleError<N>>
where
    N: Eq + Hash + Clone,
    R: IntoIterator<Item = N>,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = N>,
{
    let mut session = Session::new(roots);
    debug!("explicit-stack topological sort over {} roots", session.unvisited.len());
    // frames[i] iterates the successors of session.path[i]
    let mut frames: Vec<IN::IntoIter> = Vec::new();
    while let Some(root) = session.next_root() {
        if session.enter(&root)? {
            frames.push(successors(&root).into_iter());
        }
        while let Some(frame) = frames.last_mut() {
            match frame.next() {
                Some(next) => {
                    if session.enter(&next)? {
                        frames.push(successors(&next).into_iter());
                    }
                }
                None => {
                    frames.pop();
                    session.finish();
                }
            }
        }
    }
    Ok(session.into_sorted())
}
