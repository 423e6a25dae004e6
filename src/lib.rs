// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod evaluate;
pub mod metrics;
pub mod pipeline;
pub mod recommend;
pub mod table;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::PipelineConfig;
pub use crate::pipeline::{
    preprocess_text, BatchOutcome, CommentRow, Pipeline, Post, PostId, Ranking, RawText,
    ScoredComment, SentimentClass,
};

/// Router with the pipeline built from `PipelineConfig::load_or_default()`.
/// Does not install a metrics recorder or a tracing subscriber.
pub fn app() -> axum::Router {
    let config = PipelineConfig::load_or_default();
    create_router(AppState::new(Pipeline::new(&config)))
}
