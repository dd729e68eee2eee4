//! Single-source shortest paths over an unweighted node/neighbor graph.
//!
//! The graph is a throwaway projection: each [`DijkstraNode`] carries only
//! its identifier and the identifiers of its neighbors. Every edge costs one
//! hop.
//!
//! Results are deterministic. Nodes at equal distance are settled in the
//! order they were first reached, and a node's predecessor is only replaced
//! by a strictly shorter path, so among equal-cost paths the one through the
//! earliest-listed neighbor wins.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

/// A node of the shortest-path working graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DijkstraNode<Id> {
    pub id: Id,
    /// Neighbors in discovery order
    pub neighbors: Vec<Id>,
}

impl<Id> DijkstraNode<Id> {
    pub fn new(id: Id, neighbors: Vec<Id>) -> Self {
        Self { id, neighbors }
    }
}

/// Maps every node to the neighbor on its shortest path toward the source.
///
/// The source and unreachable nodes map to `None`.
pub type BestPaths<Id> = BTreeMap<Id, Option<Id>>;

/// Computes, for every node in `nodes`, its predecessor on a shortest path
/// from `source`.
///
/// Neighbors that are not themselves in `nodes` are ignored, as are
/// self-edges. If `source` is not in `nodes` every entry is `None`. When an
/// identifier appears twice in `nodes`, the first occurrence is used.
pub fn find_shortest_paths<Id>(source: Id, nodes: &[DijkstraNode<Id>]) -> BestPaths<Id>
where
    Id: Copy + Ord,
{
    let mut index: BTreeMap<Id, usize> = BTreeMap::new();
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.id).or_insert(i);
    }

    let mut paths: BestPaths<Id> = index.keys().map(|id| (*id, None)).collect();
    let Some(&src) = index.get(&source) else {
        return paths;
    };

    let mut distance: Vec<Option<u32>> = vec![None; nodes.len()];
    let mut settled = vec![false; nodes.len()];
    // (distance, sequence in which the node was reached, node index)
    let mut heap = BinaryHeap::new();
    let mut sequence: u64 = 0;

    distance[src] = Some(0);
    heap.push(Reverse((0u32, sequence, src)));

    while let Some(Reverse((dist, _, u))) = heap.pop() {
        if settled[u] {
            continue;
        }
        settled[u] = true;

        let from = nodes[u].id;
        for neighbor in &nodes[u].neighbors {
            let Some(&v) = index.get(neighbor) else {
                continue;
            };
            if v == u || settled[v] {
                continue;
            }
            let candidate = dist + 1;
            if distance[v].map_or(true, |current| candidate < current) {
                distance[v] = Some(candidate);
                paths.insert(nodes[v].id, Some(from));
                sequence += 1;
                heap.push(Reverse((candidate, sequence, v)));
            }
        }
    }

    paths
}
