use serde::{Deserialize, Serialize};
use std::fmt;

use extract::{ParticipantType, RelationType};

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 600.0;
const DEFAULT_NODE_SIZE: f64 = 20.0;
const DEFAULT_FONT_SIZE: f64 = 12.0;
const DEFAULT_BACKGROUND: &str = "#FFFFFF";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Circular,
    Hierarchical,
    #[default]
    Radial,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Circular => "circular",
            Layout::Hierarchical => "hierarchical",
            Layout::Radial => "radial",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circular" => Ok(Layout::Circular),
            "hierarchical" => Ok(Layout::Hierarchical),
            "radial" => Ok(Layout::Radial),
            other => Err(format!("unknown layout '{}', expected circular, hierarchical or radial", other)),
        }
    }
}

/// Node colours per participant type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub organization: String,
    pub individual: String,
    pub artifact: String,
    pub concept: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            organization: "#4A90E2".to_string(),
            individual: "#E94B3C".to_string(),
            artifact: "#50C878".to_string(),
            concept: "#F5A623".to_string(),
        }
    }
}

impl Palette {
    pub fn color_for(&self, participant_type: ParticipantType) -> &str {
        match participant_type {
            ParticipantType::Organization => &self.organization,
            ParticipantType::Individual => &self.individual,
            ParticipantType::Artifact => &self.artifact,
            ParticipantType::Concept => &self.concept,
        }
    }
}

pub fn relation_color(relation_type: RelationType) -> &'static str {
    match relation_type {
        RelationType::Supervision => "#4A4A4A",
        RelationType::Cooperation => "#7ED321",
        RelationType::Competition => "#D0021B",
        RelationType::Influence => "#9013FE",
        RelationType::Dependency => "#8B572A",
    }
}

/// Render options. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualConfig {
    pub width: f64,
    pub height: f64,
    pub node_size: f64,
    pub font_size: f64,
    pub layout: Layout,
    pub background: String,
    pub colors: Palette,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            node_size: DEFAULT_NODE_SIZE,
            font_size: DEFAULT_FONT_SIZE,
            layout: Layout::default(),
            background: DEFAULT_BACKGROUND.to_string(),
            colors: Palette::default(),
        }
    }
}

impl VisualConfig {
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Replace non-finite or non-positive dimensions with the defaults.
    pub fn sanitized(mut self) -> Self {
        fn positive_or(value: f64, fallback: f64) -> f64 {
            if value.is_finite() && value > 0.0 { value } else { fallback }
        }

        self.width = positive_or(self.width, DEFAULT_WIDTH);
        self.height = positive_or(self.height, DEFAULT_HEIGHT);
        self.node_size = positive_or(self.node_size, DEFAULT_NODE_SIZE);
        self.font_size = positive_or(self.font_size, DEFAULT_FONT_SIZE);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: VisualConfig =
            serde_json::from_str(r##"{"layout": "circular", "nodeSize": 10, "colors": {"concept": "#000000"}}"##)
                .unwrap();

        assert_eq!(config.layout, Layout::Circular);
        assert_eq!(config.node_size, 10.0);
        assert_eq!(config.width, 800.0);
        assert_eq!(config.colors.concept, "#000000");
        assert_eq!(config.colors.organization, "#4A90E2");
    }

    #[test]
    fn test_unknown_layout_is_rejected() {
        assert!(serde_json::from_str::<VisualConfig>(r#"{"layout": "force"}"#).is_err());
        assert!("force".parse::<Layout>().is_err());
        assert_eq!(" Radial ".parse::<Layout>().unwrap(), Layout::Radial);
    }

    #[test]
    fn test_sanitized_restores_bad_dimensions() {
        let config = VisualConfig {
            width: -1.0,
            height: f64::NAN,
            node_size: 0.0,
            ..VisualConfig::default()
        }
        .sanitized();

        assert_eq!((config.width, config.height, config.node_size), (800.0, 600.0, 20.0));
    }
}
