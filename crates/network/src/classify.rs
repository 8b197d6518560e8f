use serde::{Deserialize, Serialize};
use std::fmt;

const DENSE_THRESHOLD: f64 = 0.5;
const MEDIUM_DENSITY_THRESHOLD: f64 = 0.2;
const MULTI_CENTER_MIN_HIGH: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkType {
    #[default]
    #[serde(rename = "empty network")]
    Empty,
    #[serde(rename = "single-node network")]
    SingleNode,
    #[serde(rename = "star network")]
    Star,
    #[serde(rename = "multi-center network")]
    MultiCenter,
    #[serde(rename = "dense network")]
    Dense,
    #[serde(rename = "medium-density network")]
    MediumDensity,
    #[serde(rename = "sparse network")]
    Sparse,
}

impl NetworkType {
    /// Node count first, then the number of high-importance nodes, then
    /// density.
    pub fn classify(node_count: usize, high_importance: usize, density: f64) -> Self {
        match node_count {
            0 => NetworkType::Empty,
            1 => NetworkType::SingleNode,
            _ if high_importance == 1 => NetworkType::Star,
            _ if high_importance >= MULTI_CENTER_MIN_HIGH => NetworkType::MultiCenter,
            _ if density > DENSE_THRESHOLD => NetworkType::Dense,
            _ if density > MEDIUM_DENSITY_THRESHOLD => NetworkType::MediumDensity,
            _ => NetworkType::Sparse,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Empty => "empty network",
            NetworkType::SingleNode => "single-node network",
            NetworkType::Star => "star network",
            NetworkType::MultiCenter => "multi-center network",
            NetworkType::Dense => "dense network",
            NetworkType::MediumDensity => "medium-density network",
            NetworkType::Sparse => "sparse network",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_order() {
        assert_eq!(NetworkType::classify(0, 0, 0.0), NetworkType::Empty);
        assert_eq!(NetworkType::classify(1, 1, 0.0), NetworkType::SingleNode);
        assert_eq!(NetworkType::classify(5, 1, 1.0), NetworkType::Star);
        assert_eq!(NetworkType::classify(6, 4, 0.1), NetworkType::MultiCenter);
        assert_eq!(NetworkType::classify(3, 3, 0.1), NetworkType::Sparse);
        assert_eq!(NetworkType::classify(2, 2, 1.0), NetworkType::Dense);
        assert_eq!(NetworkType::classify(4, 0, 0.5), NetworkType::MediumDensity);
        assert_eq!(NetworkType::classify(4, 0, 0.2), NetworkType::Sparse);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&NetworkType::MediumDensity).unwrap(), "\"medium-density network\"");
        assert_eq!(NetworkType::Empty.to_string(), "empty network");
    }
}
