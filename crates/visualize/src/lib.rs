pub mod config;
pub mod layout;
pub mod model;

pub use config::{Layout, Palette, VisualConfig, relation_color};
pub use layout::Position;
pub use model::{
    DashStyle, Legend, LegendEntry, Metadata, RenderDescription, RenderEdge, RenderNode,
    RenderSummary, Style,
};

use extract::{Importance, ParticipantType, RelationType, Strength};
use network::NetworkAnalysis;

const TITLE: &str = "Actor network";

pub struct Visualizer {
    config: VisualConfig,
}

impl Visualizer {
    pub fn new(config: VisualConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &VisualConfig {
        &self.config
    }

    /// One node per participant and one edge per relation of the analysis,
    /// both in input order.
    pub fn render(&self, analysis: &NetworkAnalysis) -> RenderDescription {
        let config = &self.config;

        let importances: Vec<Importance> = analysis.participants.iter().map(|p| p.importance).collect();
        let positions = layout::compute(config.layout, &importances, config);

        let nodes: Vec<RenderNode> = analysis
            .participants
            .iter()
            .zip(positions)
            .map(|(participant, position)| RenderNode {
                id: participant.id.clone(),
                label: participant.name.clone(),
                participant_type: participant.participant_type,
                color: config.colors.color_for(participant.participant_type).to_string(),
                size: config.node_size * size_factor(participant.importance),
                position,
                is_importance_fixed: participant.importance == Importance::High,
            })
            .collect();

        let edges: Vec<RenderEdge> = analysis
            .relations
            .iter()
            .map(|relation| RenderEdge {
                from: relation.from_id.clone(),
                to: relation.to_id.clone(),
                relation_type: relation.relation_type,
                strength: relation.strength,
                color: relation_color(relation.relation_type).to_string(),
                width: edge_width(relation.strength),
                dash_style: if relation.strength == Strength::Weak {
                    DashStyle::Dashed
                } else {
                    DashStyle::Solid
                },
            })
            .collect();

        let summary = RenderSummary {
            node_count: nodes.len(),
            edge_count: edges.len(),
            community_count: analysis.metrics.communities.len(),
        };

        tracing::debug!(
            layout = %config.layout,
            nodes = summary.node_count,
            edges = summary.edge_count,
            "Rendered network"
        );

        RenderDescription {
            metadata: Metadata {
                title: TITLE.to_string(),
                layout: config.layout,
                network_type: analysis.metrics.network_type,
                width: config.width,
                height: config.height,
            },
            nodes,
            edges,
            legend: Legend {
                participant_types: ParticipantType::ALL
                    .iter()
                    .map(|t| LegendEntry {
                        key: *t,
                        color: config.colors.color_for(*t).to_string(),
                    })
                    .collect(),
                relation_types: relation_legend(),
            },
            style: Style {
                font_size: config.font_size,
                background: config.background.clone(),
                edge_colors: relation_legend(),
            },
            summary,
        }
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new(VisualConfig::default())
    }
}

fn relation_legend() -> Vec<LegendEntry<RelationType>> {
    RelationType::ALL
        .iter()
        .map(|t| LegendEntry {
            key: *t,
            color: relation_color(*t).to_string(),
        })
        .collect()
}

fn size_factor(importance: Importance) -> f64 {
    match importance {
        Importance::High => 1.5,
        Importance::Medium => 1.0,
        Importance::Low => 0.7,
    }
}

fn edge_width(strength: Strength) -> u32 {
    match strength {
        Strength::Strong => 4,
        Strength::Medium => 2,
        Strength::Weak => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::{Extractor, Participant, Relation};
    use network::NetworkAnalyzer;
    use proptest::prelude::*;

    fn analyze(text: &str) -> NetworkAnalysis {
        let result = Extractor::with_builtin_vocabulary().unwrap().extract(text);
        NetworkAnalyzer::without_cache().analyze_result(&result)
    }

    #[test]
    fn test_canonical_render() {
        let analysis = analyze("环保部门监管华为公司");
        let description = Visualizer::default().render(&analysis);

        assert_eq!(description.nodes.len(), 2);
        assert_eq!(description.edges.len(), 1);
        assert_eq!(description.metadata.layout, Layout::Radial);

        let node = &description.nodes[0];
        assert_eq!(node.color, "#4A90E2");
        assert_eq!(node.size, 30.0);
        assert!(node.is_importance_fixed);

        let edge = &description.edges[0];
        assert_eq!(edge.width, 4);
        assert_eq!(edge.dash_style, DashStyle::Solid);
        assert_eq!(description.summary.community_count, 1);
    }

    #[test]
    fn test_weak_edges_are_dashed() {
        let a = Participant::new("小米", ParticipantType::Organization, "", Importance::Low, 0, 0.5);
        let b = Participant::new("芯片", ParticipantType::Artifact, "", Importance::Medium, 3, 0.5);
        let relations = vec![Relation::new(&a.id, &b.id, RelationType::Dependency, Strength::Weak, "")];
        let analysis = NetworkAnalyzer::without_cache().analyze(vec![a, b], relations);

        let description = Visualizer::new(VisualConfig::default().with_layout(Layout::Hierarchical)).render(&analysis);

        assert_eq!(description.edges[0].dash_style, DashStyle::Dashed);
        assert_eq!(description.edges[0].width, 1);
        assert_eq!(description.nodes[0].size, 14.0);
        assert_eq!(description.nodes[1].color, "#50C878");
        assert!(!description.nodes[0].is_importance_fixed);
    }

    #[test]
    fn test_wire_form() {
        let analysis = analyze("环保部门监管华为公司");
        let value = serde_json::to_value(Visualizer::default().render(&analysis)).unwrap();

        assert_eq!(value["metadata"]["networkType"], "dense network");
        assert_eq!(value["metadata"]["layout"], "radial");
        assert_eq!(value["nodes"][0]["type"], "organization");
        assert_eq!(value["nodes"][0]["isImportanceFixed"], true);
        assert_eq!(value["edges"][0]["dashStyle"], "solid");
        assert_eq!(value["legend"]["participantTypes"][0]["key"], "organization");
        assert_eq!(value["style"]["fontSize"], 12.0);
        assert_eq!(value["summary"]["nodeCount"], 2);
    }

    #[test]
    fn test_empty_analysis() {
        let description = Visualizer::default().render(&analyze(""));
        assert!(description.nodes.is_empty());
        assert_eq!(description.metadata.network_type, network::NetworkType::Empty);
        assert_eq!(description.legend.relation_types.len(), 5);
    }

    proptest! {
        #[test]
        fn render_counts_match_validated_input(
            names in proptest::collection::vec("[甲乙丙丁戊己]{2}", 0..8),
            pairs in proptest::collection::vec((0usize..8, 0usize..8), 0..16),
            layout in prop::sample::select(vec![Layout::Circular, Layout::Hierarchical, Layout::Radial]),
        ) {
            let participants: Vec<Participant> = names
                .iter()
                .map(|n| Participant::new(n.as_str(), ParticipantType::Concept, "", Importance::Medium, 0, 0.5))
                .collect();
            let relations: Vec<Relation> = pairs
                .iter()
                .filter(|(a, b)| *a < participants.len() && *b < participants.len())
                .map(|(a, b)| Relation::new(&participants[*a].id, &participants[*b].id, RelationType::Influence, Strength::Medium, ""))
                .collect();

            let analysis = NetworkAnalyzer::without_cache().analyze(participants, relations);
            let description = Visualizer::new(VisualConfig::default().with_layout(layout)).render(&analysis);

            prop_assert_eq!(description.nodes.len(), analysis.participants.len());
            prop_assert_eq!(description.edges.len(), analysis.relations.len());
            for node in &description.nodes {
                prop_assert!(node.position.x >= 0.0 && node.position.x <= 800.0);
                prop_assert!(node.position.y >= 0.0 && node.position.y <= 600.0);
            }
        }
    }
}
