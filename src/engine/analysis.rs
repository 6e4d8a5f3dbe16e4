//! Structural analysis: degree centrality, strongly connected components,
//! cycles, and clustering.

use super::snapshot::GraphSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Structural properties of one graph snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuralReport {
    /// Relationship count (in + out) per node id
    pub degree_centrality: BTreeMap<String, usize>,
    /// Degree -> number of nodes with that degree
    pub degree_distribution: BTreeMap<usize, usize>,
    /// Mean local clustering coefficient over all nodes
    pub average_clustering: f64,
    /// Strongly connected components with more than one node
    pub strongly_connected_components: Vec<Vec<String>>,
    /// Circular dependency groups — the SCC view filtered to actual cycles
    pub cycles: Vec<Vec<String>>,
}

/// Compute the full structural report for a snapshot.
pub(crate) fn analyze(snapshot: &GraphSnapshot) -> StructuralReport {
    let mut report = StructuralReport::default();

    for idx in 0..snapshot.node_count() {
        let degree = snapshot.degree(idx);
        report
            .degree_centrality
            .insert(snapshot.node_at(idx).id.clone(), degree);
        *report.degree_distribution.entry(degree).or_default() += 1;
    }

    report.average_clustering = average_clustering(snapshot);

    let sccs = strongly_connected_components(snapshot);
    report.cycles = sccs.clone();
    report.strongly_connected_components = sccs;

    report
}

/// Mean local clustering coefficient over the undirected simple graph.
///
/// For each node with k >= 2 distinct neighbors, the coefficient is the
/// fraction of neighbor pairs that are themselves connected; nodes with
/// fewer neighbors contribute zero.
fn average_clustering(snapshot: &GraphSnapshot) -> f64 {
    let n = snapshot.node_count();
    if n == 0 {
        return 0.0;
    }

    // Undirected simple adjacency: parallel edges collapse to one link
    let mut adjacency: Vec<HashSet<usize>> = vec![HashSet::new(); n];
    for idx in 0..n {
        for (neighbor, _) in snapshot.neighbors(idx, None) {
            if neighbor != idx {
                adjacency[idx].insert(neighbor);
            }
        }
    }

    let mut total = 0.0;
    for neighbors in &adjacency {
        let k = neighbors.len();
        if k < 2 {
            continue;
        }
        let list: Vec<usize> = neighbors.iter().copied().collect();
        let mut links = 0usize;
        for (i, &a) in list.iter().enumerate() {
            for &b in &list[i + 1..] {
                if adjacency[a].contains(&b) {
                    links += 1;
                }
            }
        }
        total += 2.0 * links as f64 / (k * (k - 1)) as f64;
    }

    total / n as f64
}

/// Tarjan's algorithm over the directed relationship graph.
///
/// Only components with more than one node are returned — those are the
/// circular dependencies worth reporting.
fn strongly_connected_components(snapshot: &GraphSnapshot) -> Vec<Vec<String>> {
    let mut state = TarjanState {
        index: 0,
        indices: HashMap::new(),
        lowlinks: HashMap::new(),
        stack: Vec::new(),
        on_stack: HashSet::new(),
        sccs: Vec::new(),
    };

    // Visit every node to cover disconnected components
    for idx in 0..snapshot.node_count() {
        if !state.indices.contains_key(&idx) {
            strongconnect(snapshot, idx, &mut state);
        }
    }

    state
        .sccs
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| {
            scc.into_iter()
                .map(|idx| snapshot.node_at(idx).id.clone())
                .collect()
        })
        .collect()
}

struct TarjanState {
    index: usize,
    indices: HashMap<usize, usize>,
    lowlinks: HashMap<usize, usize>,
    stack: Vec<usize>,
    on_stack: HashSet<usize>,
    sccs: Vec<Vec<usize>>,
}

fn strongconnect(snapshot: &GraphSnapshot, v: usize, state: &mut TarjanState) {
    state.indices.insert(v, state.index);
    state.lowlinks.insert(v, state.index);
    state.index += 1;
    state.stack.push(v);
    state.on_stack.insert(v);

    for w in snapshot.successors(v) {
        if !state.indices.contains_key(&w) {
            strongconnect(snapshot, w, state);
            let w_lowlink = state.lowlinks[&w];
            let v_lowlink = state.lowlinks[&v];
            state.lowlinks.insert(v, v_lowlink.min(w_lowlink));
        } else if state.on_stack.contains(&w) {
            let w_index = state.indices[&w];
            let v_lowlink = state.lowlinks[&v];
            state.lowlinks.insert(v, v_lowlink.min(w_index));
        }
    }

    // v roots an SCC: pop the stack down to it
    if state.lowlinks[&v] == state.indices[&v] {
        let mut scc = Vec::new();
        while let Some(w) = state.stack.pop() {
            state.on_stack.remove(&w);
            scc.push(w);
            if w == v {
                break;
            }
        }
        state.sccs.push(scc);
    }
}
