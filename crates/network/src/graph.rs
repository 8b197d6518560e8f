use std::collections::{HashMap, HashSet};

use extract::{Participant, Relation};

/// Undirected simple-graph view over participants and relations.
///
/// Parallel relations between the same pair (different types, or both
/// directions) collapse into one edge; self-loops are ignored.
#[derive(Debug, Clone, Default)]
pub struct ActorGraph {
    pub nodes: Vec<String>,
    pub node_to_idx: HashMap<String, usize>,
    pub edges: Vec<(usize, usize)>, // (low_idx, high_idx)
    adjacency: Vec<Vec<usize>>,
    edge_set: HashSet<(usize, usize)>,
}

impl ActorGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already validated input: every relation endpoint is
    /// expected among the participants, unknown endpoints are skipped.
    pub fn from_parts(participants: &[Participant], relations: &[Relation]) -> Self {
        let mut graph = Self::new();

        for participant in participants {
            graph.add_node(participant.id.clone());
        }

        for relation in relations {
            let (Some(&source), Some(&target)) = (
                graph.node_to_idx.get(&relation.from_id),
                graph.node_to_idx.get(&relation.to_id),
            ) else {
                continue;
            };
            graph.add_edge(source, target);
        }

        graph
    }

    pub fn add_node(&mut self, node_id: String) -> usize {
        if let Some(&idx) = self.node_to_idx.get(&node_id) {
            return idx;
        }

        let idx = self.nodes.len();
        self.nodes.push(node_id.clone());
        self.node_to_idx.insert(node_id, idx);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Returns false for self-loops and pairs that are already connected.
    pub fn add_edge(&mut self, source: usize, target: usize) -> bool {
        if source == target {
            return false;
        }

        let key = (source.min(target), source.max(target));
        if !self.edge_set.insert(key) {
            return false;
        }

        self.edges.push(key);
        self.adjacency[source].push(target);
        self.adjacency[target].push(source);
        true
    }

    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.adjacency[idx]
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edge_set.contains(&(a.min(b), a.max(b)))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
