use serde::Serialize;

use crate::centrality::density;
use crate::graph::ActorGraph;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Community {
    pub id: usize,
    pub members: Vec<String>,
    pub size: usize,
    /// Internal edges over the maximum possible for this size.
    pub density: f64,
}

/// Connected components of the undirected view.
pub struct ComponentDetector<'a> {
    graph: &'a ActorGraph,
}

impl<'a> ComponentDetector<'a> {
    pub fn new(graph: &'a ActorGraph) -> Self {
        Self { graph }
    }

    /// Communities numbered by their lowest node index; members are listed
    /// in node order. Uses an explicit stack, so large components cannot
    /// overflow the call stack.
    pub fn detect_communities(&self) -> Vec<Community> {
        let n = self.graph.node_count();
        let mut visited = vec![false; n];
        let mut communities = Vec::new();

        for start in 0..n {
            if visited[start] {
                continue;
            }

            let mut component = Vec::new();
            let mut stack = vec![start];
            visited[start] = true;

            while let Some(node) = stack.pop() {
                component.push(node);
                for &neighbor in self.graph.neighbors(node) {
                    if !visited[neighbor] {
                        visited[neighbor] = true;
                        stack.push(neighbor);
                    }
                }
            }

            component.sort_unstable();

            // every edge touching a member stays inside its component
            let degree_sum: usize = component.iter().map(|&idx| self.graph.neighbors(idx).len()).sum();
            let internal_edges = degree_sum / 2;

            communities.push(Community {
                id: communities.len(),
                members: component.iter().map(|&idx| self.graph.nodes[idx].clone()).collect(),
                size: component.len(),
                density: density(component.len(), internal_edges),
            });
        }

        tracing::debug!(nodes = n, communities = communities.len(), "Detected communities");
        communities
    }
}
