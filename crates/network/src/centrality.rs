use crate::graph::ActorGraph;

/// Edge density of an undirected simple graph: `edges / (n(n-1)/2)`, zero
/// below two nodes.
pub fn density(nodes: usize, edges: usize) -> f64 {
    if nodes < 2 {
        return 0.0;
    }
    let max_edges = (nodes * (nodes - 1)) as f64 / 2.0;
    edges as f64 / max_edges
}

/// Number of distinct neighbours per node.
pub fn degree_centrality(graph: &ActorGraph) -> Vec<usize> {
    (0..graph.node_count())
        .map(|idx| graph.neighbors(idx).len())
        .collect()
}

/// Unnormalized shortest-path betweenness.
///
/// For every unordered pair of nodes, each interior node of each shortest
/// path between them gains 1. Pairs with several equal-length paths are not
/// averaged: a node on two of them counts twice. The per-pair count for a
/// node `v` is `sigma(s, v) * sigma(v, t)` whenever `v` lies on a shortest
/// `s`-`t` path, which is the same total as enumerating the paths.
pub fn betweenness_centrality(graph: &ActorGraph) -> Vec<f64> {
    let n = graph.node_count();
    let mut scores = vec![0.0; n];
    if n < 3 {
        return scores;
    }

    let paths: Vec<ShortestPaths> = (0..n).map(|source| shortest_paths(graph, source)).collect();

    for s in 0..n {
        for t in (s + 1)..n {
            let Some(distance) = paths[s].distance[t] else {
                continue;
            };
            if distance < 2 {
                continue;
            }

            for v in 0..n {
                if v == s || v == t {
                    continue;
                }
                if let (Some(to_v), Some(from_v)) = (paths[s].distance[v], paths[t].distance[v]) {
                    if to_v + from_v == distance {
                        scores[v] += paths[s].count[v] * paths[t].count[v];
                    }
                }
            }
        }
    }

    scores
}

/// BFS distances and shortest-path counts from one source.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    pub distance: Vec<Option<usize>>,
    pub count: Vec<f64>,
}

/// Level-synchronized BFS: the whole frontier at depth `d` is expanded before
/// depth `d + 1`, so every path count is final when its level is reached.
pub fn shortest_paths(graph: &ActorGraph, source: usize) -> ShortestPaths {
    let n = graph.node_count();
    let mut distance = vec![None; n];
    let mut count = vec![0.0; n];

    distance[source] = Some(0);
    count[source] = 1.0;

    let mut frontier = vec![source];
    let mut level = 0;

    while !frontier.is_empty() {
        let mut next = Vec::new();

        for &node in &frontier {
            for &neighbor in graph.neighbors(node) {
                if distance[neighbor].is_none() {
                    distance[neighbor] = Some(level + 1);
                    next.push(neighbor);
                }
                if distance[neighbor] == Some(level + 1) {
                    count[neighbor] += count[node];
                }
            }
        }

        frontier = next;
        level += 1;
    }

    ShortestPaths { distance, count }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(usize, usize)]) -> ActorGraph {
        let mut graph = ActorGraph::new();
        for i in 0..n {
            graph.add_node(format!("N{}", i));
        }
        for &(a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    #[test]
    fn test_density_bounds() {
        assert_eq!(density(0, 0), 0.0);
        assert_eq!(density(1, 0), 0.0);
        assert_eq!(density(2, 1), 1.0);
        assert_eq!(density(5, 10), 1.0);
        assert_eq!(density(4, 3), 0.5);
    }

    #[test]
    fn test_path_graph_betweenness() {
        // A - B - C - D
        let g = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        let scores = betweenness_centrality(&g);

        assert_eq!(scores[0], 0.0);
        assert_eq!(scores[3], 0.0);
        assert_eq!(scores[1], scores[2]);
        assert_eq!(scores[1], 2.0);
    }

    #[test]
    fn test_cycle_counts_every_shortest_path() {
        // A - B - C - D - A: A and C are joined by two shortest paths, one
        // through B and one through D; each interior node gets a full point.
        let g = graph(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let scores = betweenness_centrality(&g);

        assert_eq!(scores, vec![1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_star_center_takes_all_paths() {
        let g = graph(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
        let scores = betweenness_centrality(&g);

        // C(4, 2) leaf pairs all route through the hub
        assert_eq!(scores[0], 6.0);
        assert!(scores[1..].iter().all(|&s| s == 0.0));
        assert_eq!(degree_centrality(&g), vec![4, 1, 1, 1, 1]);
    }

    #[test]
    fn test_disconnected_pairs_are_skipped() {
        let g = graph(5, &[(0, 1), (1, 2), (3, 4)]);
        let scores = betweenness_centrality(&g);
        assert_eq!(scores, vec![0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_shortest_path_counts() {
        // diamond: 0 -> {1, 2} -> 3
        let g = graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let paths = shortest_paths(&g, 0);

        assert_eq!(paths.distance, vec![Some(0), Some(1), Some(1), Some(2)]);
        assert_eq!(paths.count[3], 2.0);
    }
}
