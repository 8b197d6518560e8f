pub mod cache;
pub mod centrality;
pub mod classify;
pub mod components;
pub mod graph;
pub mod validate;

pub use cache::{AnalysisCache, CacheStats, content_key};
pub use centrality::{betweenness_centrality, degree_centrality, density};
pub use classify::NetworkType;
pub use components::{Community, ComponentDetector};
pub use graph::ActorGraph;
pub use validate::{ValidatedInput, ValidationDiagnostics, validate, validate_values};

use serde::Serialize;
use std::sync::Arc;

use extract::{AnalysisResult, Importance, Participant, Relation};

const DEFAULT_CACHE_ENTRIES: usize = 1024;
const DEGREE_WEIGHT: f64 = 0.5;
const BETWEENNESS_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCentrality {
    pub id: String,
    pub name: String,
    pub degree: usize,
    pub betweenness: f64,
    /// `0.5 * degree + 0.5 * betweenness`
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetrics {
    pub total_nodes: usize,
    /// Distinct undirected node pairs.
    pub total_edges: usize,
    /// Typed relations, before collapsing parallel edges.
    pub connections: usize,
    pub density: f64,
    pub network_type: NetworkType,
    pub high_importance_count: usize,
    /// One entry per participant, in participant order.
    pub centrality: Vec<NodeCentrality>,
    pub central_node: Option<NodeCentrality>,
    pub periphery: Vec<String>,
    /// All nodes, highest score first.
    pub key_players: Vec<NodeCentrality>,
    pub communities: Vec<Community>,
}

/// Validated input together with its metrics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAnalysis {
    pub participants: Vec<Participant>,
    pub relations: Vec<Relation>,
    pub metrics: Arc<NetworkMetrics>,
    pub diagnostics: ValidationDiagnostics,
    /// Metrics came from the cache.
    pub cached: bool,
}

pub struct NetworkAnalyzer {
    cache: Option<AnalysisCache>,
}

impl NetworkAnalyzer {
    pub fn new() -> Self {
        Self::with_cache(AnalysisCache::new(DEFAULT_CACHE_ENTRIES))
    }

    pub fn with_cache(cache: AnalysisCache) -> Self {
        Self { cache: Some(cache) }
    }

    pub fn without_cache() -> Self {
        Self { cache: None }
    }

    pub fn cache(&self) -> Option<&AnalysisCache> {
        self.cache.as_ref()
    }

    pub fn analyze_result(&self, result: &AnalysisResult) -> NetworkAnalysis {
        self.analyze(result.participants().to_vec(), result.relations().to_vec())
    }

    /// Analyze loosely shaped JSON entries; malformed ones are dropped and
    /// counted.
    pub fn analyze_values(&self, participants: &[serde_json::Value], relations: &[serde_json::Value]) -> NetworkAnalysis {
        self.finish(validate_values(participants, relations))
    }

    pub fn analyze(&self, participants: Vec<Participant>, relations: Vec<Relation>) -> NetworkAnalysis {
        self.finish(validate(participants, relations))
    }

    fn finish(&self, input: ValidatedInput) -> NetworkAnalysis {
        let ValidatedInput {
            participants,
            relations,
            diagnostics,
        } = input;

        let Some(cache) = &self.cache else {
            let metrics = Arc::new(compute_metrics(&participants, &relations));
            return NetworkAnalysis {
                participants,
                relations,
                metrics,
                diagnostics,
                cached: false,
            };
        };

        let key = content_key(&participants, &relations);
        let (metrics, cached) = match cache.get(&key) {
            Some(metrics) => (metrics, true),
            None => {
                let metrics = Arc::new(compute_metrics(&participants, &relations));
                cache.insert(key, Arc::clone(&metrics));
                (metrics, false)
            }
        };

        tracing::debug!(
            nodes = metrics.total_nodes,
            edges = metrics.total_edges,
            cached,
            "Network analysis complete"
        );

        NetworkAnalysis {
            participants,
            relations,
            metrics,
            diagnostics,
            cached,
        }
    }
}

impl Default for NetworkAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics over already validated participants and relations.
pub fn compute_metrics(participants: &[Participant], relations: &[Relation]) -> NetworkMetrics {
    let graph = ActorGraph::from_parts(participants, relations);
    let n = graph.node_count();

    let degrees = degree_centrality(&graph);
    let betweenness = betweenness_centrality(&graph);
    let graph_density = density(n, graph.edge_count());

    let high_importance_count = participants
        .iter()
        .filter(|p| p.importance == Importance::High)
        .count();

    let centrality: Vec<NodeCentrality> = participants
        .iter()
        .filter_map(|p| graph.node_to_idx.get(&p.id).map(|&idx| (p, idx)))
        .map(|(p, idx)| NodeCentrality {
            id: p.id.clone(),
            name: p.name.clone(),
            degree: degrees[idx],
            betweenness: betweenness[idx],
            score: DEGREE_WEIGHT * degrees[idx] as f64 + BETWEENNESS_WEIGHT * betweenness[idx],
        })
        .collect();

    // first maximum wins ties
    let central_node = centrality
        .iter()
        .filter(|c| c.degree > 0)
        .fold(None::<&NodeCentrality>, |best, c| match best {
            Some(b) if b.degree >= c.degree => Some(b),
            _ => Some(c),
        })
        .cloned();

    let periphery = centrality
        .iter()
        .filter(|c| central_node.as_ref().is_none_or(|central| central.id != c.id))
        .map(|c| c.id.clone())
        .collect();

    // every node, stable on ties
    let mut ranked = centrality.clone();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    let communities = ComponentDetector::new(&graph).detect_communities();

    NetworkMetrics {
        total_nodes: n,
        total_edges: graph.edge_count(),
        connections: relations.len(),
        density: graph_density,
        network_type: NetworkType::classify(n, high_importance_count, graph_density),
        high_importance_count,
        centrality,
        central_node,
        periphery,
        key_players: ranked,
        communities,
    }
}
