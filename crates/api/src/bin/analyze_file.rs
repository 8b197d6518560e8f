use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use api::metrics::Metrics;
use api::{AppConfig, Pipeline, TextAnalysis, init_tracing};
use ingest::Document;
use visualize::Layout;

/// Analyze a policy text file and print the actor network as JSON
#[derive(Parser, Debug)]
#[command(name = "analyze_file")]
struct Args {
    /// A .txt/.md file, or a directory of them
    path: PathBuf,

    /// circular, hierarchical or radial; the configured layout when omitted
    #[arg(long)]
    layout: Option<Layout>,
}

#[derive(Serialize)]
struct FileAnalysis {
    source: String,
    #[serde(flatten)]
    analysis: TextAnalysis,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    let pipeline = Pipeline::new(&config, Metrics::new())?;
    let mut visual = config.visual.clone();
    if let Some(layout) = args.layout {
        visual = visual.with_layout(layout);
    }

    let documents = if args.path.is_dir() {
        ingest::ingest_directory(&args.path).await?
    } else {
        vec![ingest::ingest_file(&args.path).await?]
    };

    let pipeline = Arc::new(pipeline);
    let mut results = Vec::with_capacity(documents.len());
    for Document { source, text } in documents {
        let pipeline = Arc::clone(&pipeline);
        let visual = visual.clone();
        let analysis = tokio::task::spawn_blocking(move || pipeline.analyze_text(&text, &visual))
            .await
            .with_context(|| format!("Analysis task failed for {}", source))?;

        results.push(FileAnalysis { source, analysis });
    }

    let json = if results.len() == 1 {
        serde_json::to_string_pretty(&results[0])?
    } else {
        serde_json::to_string_pretty(&results)?
    };
    println!("{}", json);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_flag() {
        let args = Args::try_parse_from(["analyze_file", "policy.txt", "--layout", "hierarchical"]).unwrap();
        assert_eq!(args.path, PathBuf::from("policy.txt"));
        assert_eq!(args.layout, Some(Layout::Hierarchical));

        let args = Args::try_parse_from(["analyze_file", "policy.md"]).unwrap();
        assert!(args.layout.is_none());
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Args::try_parse_from(["analyze_file", "policy.txt", "--layout", "spiral"]).is_err());
        assert!(Args::try_parse_from(["analyze_file"]).is_err());
        assert!(Args::try_parse_from(["analyze_file", "a.txt", "b.txt"]).is_err());
    }
}
