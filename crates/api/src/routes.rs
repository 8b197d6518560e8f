use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use network::{CacheStats, NetworkAnalysis};
use visualize::RenderDescription;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::pipeline::{Pipeline, TextAnalysis};

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    metrics: Arc<Metrics>,
    limiter: Arc<Semaphore>,
    timeout: Duration,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let metrics = Metrics::new();
        let pipeline = Pipeline::new(config, Arc::clone(&metrics))?;

        Ok(Self {
            pipeline: Arc::new(pipeline),
            metrics,
            limiter: Arc::new(Semaphore::new(config.server.max_concurrent_analyses.max(1))),
            timeout: Duration::from_secs(config.server.request_timeout_secs),
        })
    }

    /// Run CPU-bound pipeline work off the async runtime, bounded by the
    /// concurrency limit and the request timeout.
    async fn run<T, F>(&self, job: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Pipeline) -> T + Send + 'static,
    {
        let permit = Arc::clone(&self.limiter)
            .acquire_owned()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        // the permit is released when the job finishes, not when the caller
        // gives up on it
        let pipeline = Arc::clone(&self.pipeline);
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job(&pipeline)
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(join_error)) => Err(ApiError::Internal(join_error.into())),
            Err(_) => Err(ApiError::Timeout(self.timeout.as_secs())),
        }
    }

    fn finish<T>(&self, result: Result<T, ApiError>) -> Result<Json<T>, ApiError> {
        self.metrics.record_request(result.is_ok());
        result.map(Json)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/analyze", post(analyze_text))
        .route("/network", post(analyze_network))
        .route("/visualize", post(visualize_network))
        .route("/stats", get(get_stats))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    request_id: Uuid,
    #[serde(flatten)]
    analysis: TextAnalysis,
}

async fn analyze_text(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let result: Result<AnalyzeResponse, ApiError> = async {
        let request_id = Uuid::new_v4();
        let text = extract::validate_text(body.get("text"))?.to_string();
        let visual = state
            .pipeline
            .visual_config(body.get("config"))
            .map_err(|e| ApiError::Validation(format!("invalid config: {}", e)))?;

        let analysis = state.run(move |pipeline| pipeline.analyze_text(&text, &visual)).await?;

        tracing::info!(
            request_id = %request_id,
            participants = analysis.result.summary().participant_count,
            relations = analysis.result.summary().relation_count,
            network_type = %analysis.network.metrics.network_type,
            cached = analysis.network.cached,
            "Analyzed text"
        );

        Ok(AnalyzeResponse { request_id, analysis })
    }
    .await;

    state.finish(result)
}

async fn analyze_network(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<NetworkAnalysis>, ApiError> {
    let result: Result<NetworkAnalysis, ApiError> = async {
        let participants = entries(&body, "participants")?;
        let relations = entries(&body, "relations")?;

        let network = state
            .run(move |pipeline| pipeline.analyze_network(&participants, &relations))
            .await?;

        tracing::info!(
            nodes = network.metrics.total_nodes,
            dropped_relations = network.diagnostics.dropped_relations(),
            "Analyzed network"
        );
        Ok(network)
    }
    .await;

    state.finish(result)
}

async fn visualize_network(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<RenderDescription>, ApiError> {
    let result: Result<RenderDescription, ApiError> = async {
        let participants = entries(&body, "participants")?;
        let relations = entries(&body, "relations")?;
        let visual = state
            .pipeline
            .visual_config(body.get("config"))
            .map_err(|e| ApiError::Validation(format!("invalid config: {}", e)))?;

        state
            .run(move |pipeline| pipeline.visualize(&participants, &relations, &visual))
            .await
    }
    .await;

    state.finish(result)
}

/// A missing or null field is an empty list; anything but an array is
/// rejected.
fn entries(body: &Value, field: &str) -> Result<Vec<Value>, ApiError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(_) => Err(ApiError::Validation(format!("{} must be an array", field))),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    metrics: MetricsSnapshot,
    cache: Option<CacheStats>,
}

async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        metrics: state.metrics.snapshot(),
        cache: state.pipeline.analyzer().cache().map(|cache| cache.stats()),
    })
}
