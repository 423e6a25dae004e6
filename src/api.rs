//! JSON API over the scoring pipeline.
//!
//! - `GET  /health`
//! - `POST /analyze`    `{"text": ...}` → cleaned text, weight, score, class
//! - `POST /batch`      `{"rows": [{"media_id", "comment"}], "k"?}` → comments, posts, ranking
//! - `POST /batch/csv`  CSV body (`media_id,comment`) → same as `/batch`
//! - `POST /evaluate`   `{"rows": [{"textID", "text", "sentiment"}]}` → evaluation report
//!
//! Batch work is CPU-bound and runs on the blocking pool.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::evaluate::{self, class_distribution, EvaluationReport, LabelledRow};
use crate::pipeline::{
    BatchOutcome, CommentRow, Pipeline, Post, Ranking, RawText, ScoredComment, SentimentClass,
};
use crate::recommend::{best_post, RecommendationBrief};
use crate::table;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/analyze", post(analyze))
        .route("/batch", post(batch))
        .route("/batch/csv", post(batch_csv))
        .route("/evaluate", post(evaluate_rows))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

type ApiError = (StatusCode, String);

fn internal(e: impl std::fmt::Display) -> ApiError {
    tracing::error!(target: "api", error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[derive(Deserialize)]
struct AnalyzeReq {
    #[serde(default)]
    text: RawText,
}

#[derive(Serialize)]
struct AnalyzeResp {
    cleaned: String,
    weight: usize,
    score: f64,
    class: SentimentClass,
}

async fn analyze(State(state): State<AppState>, Json(body): Json<AnalyzeReq>) -> Json<AnalyzeResp> {
    let scored = state.pipeline.score_comment(&CommentRow {
        media_id: "".into(),
        comment: body.text,
    });
    Json(AnalyzeResp {
        cleaned: scored.cleaned_comment,
        weight: scored.weight,
        score: scored.sentiment_score,
        class: scored.sentiment_class,
    })
}

#[derive(Deserialize)]
struct BatchReq {
    rows: Vec<CommentRow>,
    #[serde(default)]
    k: Option<usize>,
}

#[derive(Serialize)]
pub struct BatchResp {
    pub comments: Vec<ScoredComment>,
    pub posts: Vec<Post>,
    pub top: Vec<Post>,
    pub bottom: Vec<Post>,
    pub best: Option<Post>,
    pub distribution: BTreeMap<SentimentClass, f64>,
    pub recommendation: RecommendationBrief,
}

impl From<BatchOutcome> for BatchResp {
    fn from(out: BatchOutcome) -> Self {
        let BatchOutcome {
            comments,
            posts,
            ranking: Ranking { top, bottom },
        } = out;
        let recommendation = RecommendationBrief::from_posts(&posts);
        Self {
            distribution: class_distribution(&comments),
            best: best_post(&posts),
            comments,
            posts,
            top,
            bottom,
            recommendation,
        }
    }
}

async fn run_blocking(
    state: AppState,
    rows: Vec<CommentRow>,
    k: Option<usize>,
) -> Result<Json<BatchResp>, ApiError> {
    let pipeline = Arc::clone(&state.pipeline);
    let k = k.filter(|k| *k > 0).unwrap_or(pipeline.k());
    let out = tokio::task::spawn_blocking(move || pipeline.run_with_k(&rows, k))
        .await
        .map_err(internal)?;
    Ok(Json(out.into()))
}

async fn batch(
    State(state): State<AppState>,
    Json(body): Json<BatchReq>,
) -> Result<Json<BatchResp>, ApiError> {
    run_blocking(state, body.rows, body.k).await
}

async fn batch_csv(State(state): State<AppState>, body: String) -> Result<Json<BatchResp>, ApiError> {
    let rows = table::read_comment_rows(body.as_bytes())
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("{e:#}")))?;
    run_blocking(state, rows, None).await
}

#[derive(Deserialize)]
struct EvaluateReq {
    rows: Vec<LabelledRow>,
}

async fn evaluate_rows(
    State(state): State<AppState>,
    Json(body): Json<EvaluateReq>,
) -> Result<Json<EvaluationReport>, ApiError> {
    let pipeline = Arc::clone(&state.pipeline);
    tokio::task::spawn_blocking(move || evaluate::evaluate(&pipeline, &body.rows))
        .await
        .map_err(internal)?
        .map(Json)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}
