//! Graph traversal: shortest path, all paths, and radius search.
//!
//! Adjacency is direction-agnostic — a node's neighbors are found via
//! either endpoint of a relationship — optionally restricted to an allowed
//! set of relationship types. All traversals are bounded by explicit
//! depth/result parameters; boundary exhaustion is a normal empty result,
//! never an error.

use super::snapshot::GraphSnapshot;
use crate::model::RelationType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Result of a shortest-path search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSearch {
    /// Node ids from source to target
    pub path: Vec<String>,
    /// Node ids in the order the search first reached them
    pub visited: Vec<String>,
    /// Relationship ids traversed along the path
    pub relationships: Vec<String>,
    /// Hop count of the path
    pub depth: usize,
    /// Sum of traversed relationship weights. Informational only — hop
    /// count, not weight, chooses the path.
    pub score: f64,
}

/// One path from an all-paths enumeration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphPath {
    /// Node ids from source to target
    pub nodes: Vec<String>,
    /// Relationship ids along the path
    pub relationships: Vec<String>,
    /// Sum of relationship weights
    pub score: f64,
}

fn allowed_set(types: Option<&[RelationType]>) -> Option<HashSet<RelationType>> {
    types.map(|list| list.iter().copied().collect())
}

/// Breadth-first shortest path between two nodes.
///
/// The first time the target is reached wins; equal-hop ties break by
/// expansion order. Unknown endpoints or no path within `max_depth` yield
/// `None`.
pub(crate) fn shortest_path(
    snapshot: &GraphSnapshot,
    from: &str,
    to: &str,
    max_depth: usize,
    types: Option<&[RelationType]>,
) -> Option<PathSearch> {
    let start = snapshot.index_of(from)?;
    let target = snapshot.index_of(to)?;
    let allowed = allowed_set(types);

    if start == target {
        return Some(PathSearch {
            path: vec![from.to_string()],
            visited: vec![from.to_string()],
            relationships: Vec::new(),
            depth: 0,
            score: 0.0,
        });
    }

    let mut visited_order = vec![start];
    let mut seen: HashSet<usize> = [start].into_iter().collect();
    // node -> (previous node, relationship taken)
    let mut parent: HashMap<usize, (usize, usize)> = HashMap::new();
    let mut queue = VecDeque::new();
    queue.push_back((start, 0usize));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for (neighbor, rel_idx) in snapshot.neighbors(current, allowed.as_ref()) {
            if !seen.insert(neighbor) {
                continue;
            }
            visited_order.push(neighbor);
            parent.insert(neighbor, (current, rel_idx));
            if neighbor == target {
                return Some(reconstruct(snapshot, start, target, &parent, visited_order));
            }
            queue.push_back((neighbor, depth + 1));
        }
    }

    None
}

fn reconstruct(
    snapshot: &GraphSnapshot,
    start: usize,
    target: usize,
    parent: &HashMap<usize, (usize, usize)>,
    visited_order: Vec<usize>,
) -> PathSearch {
    let mut nodes = vec![target];
    let mut rels = Vec::new();
    let mut current = target;
    while current != start {
        let (prev, rel_idx) = parent[&current];
        rels.push(rel_idx);
        nodes.push(prev);
        current = prev;
    }
    nodes.reverse();
    rels.reverse();

    let score = rels
        .iter()
        .map(|&idx| snapshot.relationship_at(idx).weight)
        .sum();

    PathSearch {
        depth: rels.len(),
        path: nodes
            .into_iter()
            .map(|idx| snapshot.node_at(idx).id.clone())
            .collect(),
        visited: visited_order
            .into_iter()
            .map(|idx| snapshot.node_at(idx).id.clone())
            .collect(),
        relationships: rels
            .into_iter()
            .map(|idx| snapshot.relationship_at(idx).id.clone())
            .collect(),
        score,
    }
}

/// Depth-first enumeration of every simple path between two nodes.
///
/// Cost is exponential in the branching factor: `max_depth` (hops) and
/// `max_results` are the only safeguards, there are no hidden heuristics.
/// Results sort descending by weight-sum score.
pub(crate) fn all_paths(
    snapshot: &GraphSnapshot,
    from: &str,
    to: &str,
    max_depth: usize,
    max_results: usize,
    types: Option<&[RelationType]>,
) -> Vec<GraphPath> {
    let (Some(start), Some(target)) = (snapshot.index_of(from), snapshot.index_of(to)) else {
        return Vec::new();
    };
    let allowed = allowed_set(types);

    let mut paths = Vec::new();
    let mut node_trail = vec![start];
    let mut rel_trail = Vec::new();
    let mut on_path: HashSet<usize> = [start].into_iter().collect();

    collect_paths(
        snapshot,
        start,
        target,
        max_depth,
        max_results,
        allowed.as_ref(),
        &mut node_trail,
        &mut rel_trail,
        &mut on_path,
        &mut paths,
    );

    paths.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    paths
}

#[allow(clippy::too_many_arguments)]
fn collect_paths(
    snapshot: &GraphSnapshot,
    current: usize,
    target: usize,
    max_depth: usize,
    max_results: usize,
    allowed: Option<&HashSet<RelationType>>,
    node_trail: &mut Vec<usize>,
    rel_trail: &mut Vec<usize>,
    on_path: &mut HashSet<usize>,
    paths: &mut Vec<GraphPath>,
) {
    if paths.len() >= max_results {
        return;
    }
    if current == target {
        paths.push(GraphPath {
            nodes: node_trail
                .iter()
                .map(|&idx| snapshot.node_at(idx).id.clone())
                .collect(),
            relationships: rel_trail
                .iter()
                .map(|&idx| snapshot.relationship_at(idx).id.clone())
                .collect(),
            score: rel_trail
                .iter()
                .map(|&idx| snapshot.relationship_at(idx).weight)
                .sum(),
        });
        return;
    }
    if rel_trail.len() >= max_depth {
        return;
    }

    for (neighbor, rel_idx) in snapshot.neighbors(current, allowed) {
        if on_path.contains(&neighbor) {
            continue;
        }
        on_path.insert(neighbor);
        node_trail.push(neighbor);
        rel_trail.push(rel_idx);

        collect_paths(
            snapshot, neighbor, target, max_depth, max_results, allowed, node_trail, rel_trail,
            on_path, paths,
        );

        rel_trail.pop();
        node_trail.pop();
        on_path.remove(&neighbor);
    }
}

/// Single-source BFS distance map: hop distance for every node reachable
/// within `radius`, the source included at distance zero.
pub(crate) fn radius_search(
    snapshot: &GraphSnapshot,
    from: &str,
    radius: usize,
    types: Option<&[RelationType]>,
) -> BTreeMap<String, usize> {
    let Some(start) = snapshot.index_of(from) else {
        return BTreeMap::new();
    };
    let allowed = allowed_set(types);

    let mut distances: HashMap<usize, usize> = HashMap::new();
    distances.insert(start, 0);
    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let depth = distances[&current];
        if depth >= radius {
            continue;
        }
        for (neighbor, _) in snapshot.neighbors(current, allowed.as_ref()) {
            let next = depth + 1;
            match distances.get(&neighbor) {
                // BFS discovers nodes in distance order; relax only if a
                // shorter path shows up
                Some(&known) if known <= next => {}
                _ => {
                    distances.insert(neighbor, next);
                    queue.push_back(neighbor);
                }
            }
        }
    }

    distances
        .into_iter()
        .map(|(idx, d)| (snapshot.node_at(idx).id.clone(), d))
        .collect()
}
