//! Generic uniform-cost searches over any hashable node type. [astar] is a variant of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html)
//! whose frontier breaks ties in estimated cost by insertion order, so repeated runs on the same
//! input expand nodes in the same order. [bfs] finalizes nodes when they are dequeued.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::Zero;

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Marks the root of the parent chain.
const NO_PARENT: usize = usize::MAX;

struct FrontierEntry<C> {
    estimated_cost: C,
    cost: C,
    index: usize,
    sequence: u64,
}

impl<C: PartialEq> Eq for FrontierEntry<C> {}

impl<C: PartialEq> PartialEq for FrontierEntry<C> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.sequence == other.sequence
    }
}

impl<C: Ord> PartialOrd for FrontierEntry<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for FrontierEntry<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the greatest entry, so both keys are reversed: smallest estimated cost
        // first, then earliest insertion.
        other
            .estimated_cost
            .cmp(&self.estimated_cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Priority queue ordered by estimated cost, then by insertion order. Entries with equal
/// estimated cost are popped first-in first-out.
pub struct Frontier<C> {
    heap: BinaryHeap<FrontierEntry<C>>,
    pushed: u64,
}

impl<C: Ord + Copy> Frontier<C> {
    pub fn new() -> Frontier<C> {
        Frontier {
            heap: BinaryHeap::new(),
            pushed: 0,
        }
    }

    /// Queues the node stored at `index` with its confirmed `cost` and `estimated_cost`.
    pub fn push(&mut self, estimated_cost: C, cost: C, index: usize) {
        self.heap.push(FrontierEntry {
            estimated_cost,
            cost,
            index,
            sequence: self.pushed,
        });
        self.pushed += 1;
    }

    /// Removes the entry with the smallest estimated cost, returning its cost and node index.
    pub fn pop(&mut self) -> Option<(C, usize)> {
        self.heap.pop().map(|e| (e.cost, e.index))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<C: Ord + Copy> Default for Frontier<C> {
    fn default() -> Self {
        Frontier::new()
    }
}

/// Follows the parent chain from the node at `index` back to the root and returns it
/// root-first.
fn reverse_path<N, V, F>(parents: &FxIndexMap<N, V>, parent: F, index: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
    F: Fn(&V) -> usize,
{
    let mut path: Vec<N> = std::iter::successors(Some(index), |&i| {
        parents.get_index(i).map(|(_, value)| parent(value))
    })
    .map_while(|i| parents.get_index(i).map(|(node, _)| node.clone()))
    .collect();
    path.reverse();
    path
}

/// Best-first search from `start` ordered by `cost + heuristic`. A node's cost is only updated,
/// and the node queued again, when a strictly smaller cost is found. Returns the path including
/// both endpoints and its cost once a node satisfying `success` is popped.
///
/// The result is optimal when the heuristic is consistent.
pub fn astar<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> Option<(Vec<N>, C)>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut to_see = Frontier::new();
    let mut parents: FxIndexMap<N, (usize, C)> = FxIndexMap::default();
    parents.insert(start.clone(), (NO_PARENT, Zero::zero()));
    to_see.push(heuristic(start), Zero::zero(), 0);
    while let Some((cost, index)) = to_see.pop() {
        let successors = {
            let Some((node, &(_, c))) = parents.get_index(index) else {
                continue;
            };
            // A node may sit in the frontier several times if a cheaper way to it was found
            // after it was queued. Only the entry carrying the best cost is expanded.
            if cost > c {
                continue;
            }
            if success(node) {
                let path = reverse_path(&parents, |&(p, _)| p, index);
                return Some((path, cost));
            }
            successors(node)
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let h;
            let n;
            match parents.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert((index, new_cost));
                }
                Occupied(mut e) => {
                    if e.get().1 > new_cost {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert((index, new_cost));
                    } else {
                        continue;
                    }
                }
            }
            to_see.push(new_cost + h, new_cost, n);
        }
    }
    None
}

/// Breadth-first search from `start` with a first-in first-out frontier. Each node is finalized,
/// with its parent fixed, the first time it is dequeued; later copies of it are discarded.
/// Returns the path including both endpoints once a node satisfying `success` is dequeued.
pub fn bfs<N, FN, IN, FS>(start: &N, mut successors: FN, mut success: FS) -> Option<Vec<N>>
where
    N: Eq + Hash + Clone,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = N>,
    FS: FnMut(&N) -> bool,
{
    let mut to_see: VecDeque<(N, usize)> = VecDeque::new();
    to_see.push_back((start.clone(), NO_PARENT));
    let mut parents: FxIndexMap<N, usize> = FxIndexMap::default();
    while let Some((node, parent)) = to_see.pop_front() {
        if parents.contains_key(&node) {
            continue;
        }
        let reached = success(&node);
        let expanded = if reached {
            None
        } else {
            Some(successors(&node))
        };
        let (index, _) = parents.insert_full(node, parent);
        match expanded {
            None => return Some(reverse_path(&parents, |&p| p, index)),
            Some(expanded) => {
                for successor in expanded {
                    if !parents.contains_key(&successor) {
                        to_see.push_back((successor, index));
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A line graph 0 - 1 - 2 - ... - 9 with an expensive shortcut from 0 to 9.
    fn line_successors(n: &i32) -> Vec<(i32, u32)> {
        let mut succ = vec![];
        if *n > 0 {
            succ.push((n - 1, 1));
        }
        if *n < 9 {
            succ.push((n + 1, 1));
        }
        if *n == 0 {
            succ.push((9, 20));
        }
        succ
    }

    #[test]
    fn frontier_is_fifo_on_ties() {
        let mut frontier = Frontier::new();
        frontier.push(3, 0, 10);
        frontier.push(2, 0, 11);
        frontier.push(3, 1, 12);
        frontier.push(2, 1, 13);
        assert_eq!(frontier.len(), 4);
        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop().map(|(_, i)| i)).collect();
        assert_eq!(order, vec![11, 13, 10, 12]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn astar_prefers_cheaper_route() {
        let (path, cost) = astar(&0, line_successors, |n| (9 - n) as u32, |n| *n == 9).unwrap();
        assert_eq!(cost, 9);
        assert_eq!(path, (0..=9).collect::<Vec<_>>());
    }

    #[test]
    fn astar_start_is_goal() {
        let (path, cost) = astar(&4, line_successors, |_| 0u32, |n| *n == 4).unwrap();
        assert_eq!(path, vec![4]);
        assert_eq!(cost, 0);
    }

    #[test]
    fn bfs_counts_edges_not_costs() {
        let path = bfs(
            &0,
            |n| line_successors(n).into_iter().map(|(s, _)| s),
            |n| *n == 9,
        )
        .unwrap();
        assert_eq!(path, vec![0, 9]);
    }

    #[test]
    fn searches_report_missing_goal() {
        assert!(astar(&0, line_successors, |_| 0u32, |n| *n == 42).is_none());
        assert!(bfs(
            &0,
            |n| line_successors(n).into_iter().map(|(s, _)| s),
            |n| *n == 42
        )
        .is_none());
    }
}
