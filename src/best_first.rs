//! The frontier shared by every solver: a best-first queue in the style of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html)
//! that is driven one pop at a time instead of running to completion, so the caller decides what
//! happens between expansions.
use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::Zero;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

/// Marks the start node in the parent table.
const NO_PARENT: usize = usize::MAX;

struct FrontierEntry<K> {
    key: K,
    seq: usize,
    index: usize,
}

impl<K: PartialEq> Eq for FrontierEntry<K> {}

impl<K: PartialEq> PartialEq for FrontierEntry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.key.eq(&other.key) && self.seq == other.seq
    }
}

impl<K: Ord> PartialOrd for FrontierEntry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for FrontierEntry<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for the max-heap: smallest key first, then the earliest discovery among
        // equal keys.
        match other.key.cmp(&self.key) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            s => s,
        }
    }
}

/// Result of offering a successor to the frontier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relaxation {
    /// The successor was not reached more cheaply than before.
    Unchanged,
    /// The successor was reached more cheaply and entered the frontier.
    Queued,
    /// The successor was reached more cheaply while already pending. Its parent and cost are
    /// updated but it keeps the frontier key it was queued with.
    Improved,
}

/// Frontier and parent table of a best-first search from a single start node.
///
/// Nodes are ordered by `(key, sequence)` where the sequence number is handed out when a node enters
/// the frontier, so ties are popped first-discovered first. A node is pending at most once: when a
/// pending node is reached more cheaply only its parent and cost change, its queue entry stays.
pub struct BestFirst<N, C> {
    to_see: BinaryHeap<FrontierEntry<C>>,
    parents: FxIndexMap<N, (usize, C)>,
    pending: FxHashSet<usize>,
    discovered: usize,
}

impl<N, C> BestFirst<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
{
    pub fn new(start: N) -> BestFirst<N, C> {
        let mut parents = FxIndexMap::default();
        parents.insert(start, (NO_PARENT, Zero::zero()));
        let mut pending = FxHashSet::default();
        pending.insert(0);
        let mut to_see = BinaryHeap::new();
        to_see.push(FrontierEntry {
            key: Zero::zero(),
            seq: 0,
            index: 0,
        });
        BestFirst {
            to_see,
            parents,
            pending,
            discovered: 0,
        }
    }

    /// Removes the pending node with the smallest key and returns its index and value.
    pub fn pop(&mut self) -> Option<(usize, N)> {
        let FrontierEntry { index, .. } = self.to_see.pop()?;
        self.pending.remove(&index);
        self.parents.get_index(index).map(|(node, _)| (index, node.clone()))
    }

    /// Offers `successor`, reached from the node at index `from` over an edge costing
    /// `move_cost`. `heuristic` is added to the new cost to form the frontier key.
    pub fn relax(&mut self, from: usize, successor: N, move_cost: C, heuristic: C) -> Relaxation {
        let new_cost = self.cost(from) + move_cost;
        let n = match self.parents.entry(successor) {
            Vacant(e) => {
                let n = e.index();
                e.insert((from, new_cost));
                n
            }
            Occupied(mut e) => {
                if e.get().1 > new_cost {
                    e.insert((from, new_cost));
                    e.index()
                } else {
                    return Relaxation::Unchanged;
                }
            }
        };
        if !self.pending.insert(n) {
            return Relaxation::Improved;
        }
        self.discovered += 1;
        self.to_see.push(FrontierEntry {
            key: new_cost + heuristic,
            seq: self.discovered,
            index: n,
        });
        Relaxation::Queued
    }

    /// Accumulated cost of the node at `index`.
    pub fn cost(&self, index: usize) -> C {
        self.parents
            .get_index(index)
            .map_or_else(Zero::zero, |(_, &(_, c))| c)
    }

    /// Best known cost of reaching `node`, if it has been reached at all.
    pub fn distance(&self, node: &N) -> Option<C> {
        self.parents.get(node).map(|&(_, c)| c)
    }

    pub fn predecessor(&self, node: &N) -> Option<&N> {
        let &(parent, _) = self.parents.get(node)?;
        self.parents.get_index(parent).map(|(p, _)| p)
    }

    pub fn is_pending(&self, node: &N) -> bool {
        self.parents
            .get_index_of(node)
            .is_some_and(|ix| self.pending.contains(&ix))
    }

    /// Number of times a node entered the frontier, the start node excluded.
    pub fn discovered(&self) -> usize {
        self.discovered
    }

    /// Follows the parent links from the node at `index` back to the start and returns the
    /// nodes in start-to-`index` order, both ends included.
    pub fn path_to(&self, index: usize) -> Vec<N> {
        let mut path = std::iter::successors(self.parents.get_index(index), |&(_, &(parent, _))| {
            self.parents.get_index(parent)
        })
        .map(|(node, _)| node.clone())
        .collect::<Vec<N>>();
        path.reverse();
        path
    }
}
