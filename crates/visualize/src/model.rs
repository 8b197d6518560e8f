use serde::Serialize;

use extract::{ParticipantType, RelationType, Strength};
use network::NetworkType;

use crate::config::Layout;
use crate::layout::Position;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub participant_type: ParticipantType,
    pub color: String,
    pub size: f64,
    pub position: Position,
    /// High-importance nodes stay pinned when the renderer runs its own layout.
    pub is_importance_fixed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    pub strength: Strength,
    pub color: String,
    pub width: u32,
    pub dash_style: DashStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry<T> {
    pub key: T,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub participant_types: Vec<LegendEntry<ParticipantType>>,
    pub relation_types: Vec<LegendEntry<RelationType>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    pub layout: Layout,
    pub network_type: NetworkType,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub font_size: f64,
    pub background: String,
    pub edge_colors: Vec<LegendEntry<RelationType>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub community_count: usize,
}

/// Declarative description handed to an external renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDescription {
    pub metadata: Metadata,
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub legend: Legend,
    pub style: Style,
    pub summary: RenderSummary,
}
