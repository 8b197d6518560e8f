use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use extract::{AnalysisResult, Extractor, Vocabulary};
use network::{AnalysisCache, NetworkAnalysis, NetworkAnalyzer};
use visualize::{RenderDescription, VisualConfig, Visualizer};

use crate::config::AppConfig;
use crate::metrics::{Metrics, TimedOperation};

/// Everything `/analyze` returns apart from the request id.
#[derive(Debug, Clone, Serialize)]
pub struct TextAnalysis {
    pub result: AnalysisResult,
    pub network: NetworkAnalysis,
    pub visualization: RenderDescription,
}

/// Extract, analyze and render, with per-stage timings recorded.
pub struct Pipeline {
    extractor: Extractor,
    analyzer: NetworkAnalyzer,
    visual: VisualConfig,
    metrics: Arc<Metrics>,
}

impl Pipeline {
    pub fn new(config: &AppConfig, metrics: Arc<Metrics>) -> Result<Self> {
        let vocabulary = match &config.vocabulary_path {
            Some(path) => Vocabulary::from_path(path)
                .with_context(|| format!("Failed to load vocabulary from {:?}", path))?,
            None => Vocabulary::builtin().context("Embedded vocabulary is invalid")?,
        };
        let extractor = Extractor::new(&vocabulary).context("Failed to compile vocabulary patterns")?;

        let analyzer = if config.cache.enabled {
            NetworkAnalyzer::with_cache(AnalysisCache::new(config.cache.max_entries))
        } else {
            NetworkAnalyzer::without_cache()
        };

        Ok(Self {
            extractor,
            analyzer,
            visual: config.visual.clone(),
            metrics,
        })
    }

    pub fn analyzer(&self) -> &NetworkAnalyzer {
        &self.analyzer
    }

    pub fn analyze_text(&self, text: &str, visual: &VisualConfig) -> TextAnalysis {
        let timer = TimedOperation::start();
        let result = self.extractor.extract(text);
        self.metrics.record_extract(
            timer.elapsed(),
            result.summary().participant_count,
            result.summary().relation_count,
        );

        let timer = TimedOperation::start();
        let network = self.analyzer.analyze_result(&result);
        self.metrics.record_network(timer.elapsed());

        let visualization = self.render(&network, visual);

        TextAnalysis {
            result,
            network,
            visualization,
        }
    }

    pub fn analyze_network(&self, participants: &[Value], relations: &[Value]) -> NetworkAnalysis {
        let timer = TimedOperation::start();
        let network = self.analyzer.analyze_values(participants, relations);
        self.metrics.record_network(timer.elapsed());
        network
    }

    pub fn visualize(&self, participants: &[Value], relations: &[Value], visual: &VisualConfig) -> RenderDescription {
        let network = self.analyze_network(participants, relations);
        self.render(&network, visual)
    }

    fn render(&self, network: &NetworkAnalysis, visual: &VisualConfig) -> RenderDescription {
        let timer = TimedOperation::start();
        let description = Visualizer::new(visual.clone()).render(network);
        self.metrics.record_render(timer.elapsed());
        description
    }

    /// The configured visual defaults with a request's partial `config`
    /// object laid over them.
    pub fn visual_config(&self, overrides: Option<&Value>) -> Result<VisualConfig, serde_json::Error> {
        match overrides {
            None | Some(Value::Null) => Ok(self.visual.clone()),
            Some(overrides) => {
                let mut merged = serde_json::to_value(&self.visual)?;
                merge_json(&mut merged, overrides);
                serde_json::from_value(merged)
            }
        }
    }
}

/// Recursively overlay object keys; any other value replaces the target.
fn merge_json(target: &mut Value, overlay: &Value) {
    match (target, overlay) {
        (Value::Object(target), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match target.get_mut(key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, overlay) => *target = overlay.clone(),
    }
}
