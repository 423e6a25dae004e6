// src/pipeline/mod.rs
//! Comment scoring pipeline.
//!
//! raw comment → normalize → negation scoping → lexical reduction → scorer
//! → (score, class) per comment → per-post weighted aggregate → top/bottom K.
//!
//! Pure batch transformation: no I/O, no state across runs. Diagnostics go out
//! as `tracing` events (target `pipeline`) and `metrics` counters; the caller
//! decides whether a subscriber/recorder is installed.

pub mod aggregate;
pub mod negation;
pub mod normalize;
pub mod rank;
pub mod reduce;
pub mod scorer;
pub mod types;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::time::Instant;

pub use aggregate::aggregate_posts;
pub use negation::scope_negations;
pub use normalize::{normalize_raw, normalize_text};
pub use rank::{select_top_bottom, sort_posts, DEFAULT_K};
pub use reduce::reduce_text;
pub use scorer::{SentimentScorer, Thresholds, STANDARD_THRESHOLDS, STRICT_THRESHOLDS};
pub use types::{CommentRow, Post, PostId, Ranking, RawText, ScoredComment, SentimentClass};

use crate::config::PipelineConfig;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("comments_scored_total", "Comments run through the pipeline.");
        describe_counter!(
            "comments_empty_total",
            "Comments whose cleaned text was empty (weight 0)."
        );
        describe_counter!(
            "comments_recovered_total",
            "Comments defaulted after a normalization or scoring failure."
        );
        describe_counter!("posts_aggregated_total", "Posts produced by aggregation.");
        describe_histogram!("batch_duration_ms", "Batch run time in milliseconds.");
    });
}

/// Short, non-reversible id for log lines. Raw comment text is never logged.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Text cleaning only: normalize → scope negations → reduce.
pub fn preprocess_text(text: &str) -> String {
    reduce_text(&scope_negations(&normalize_text(text)))
}

/// Everything one run produces.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub comments: Vec<ScoredComment>,
    pub posts: Vec<Post>,
    pub ranking: Ranking,
}

/// Configured pipeline; immutable and shareable across threads.
#[derive(Debug, Clone)]
pub struct Pipeline {
    scorer: SentimentScorer,
    k: usize,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            scorer: SentimentScorer::default(),
            k: DEFAULT_K,
        }
    }
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            scorer: SentimentScorer::new(config.thresholds()),
            k: config.rank_k(),
        }
    }

    pub fn with_scorer(scorer: SentimentScorer, k: usize) -> Self {
        Self { scorer, k: k.max(1) }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn scorer(&self) -> &SentimentScorer {
        &self.scorer
    }

    /// Clean and score a single comment. Infallible by construction.
    pub fn score_comment(&self, row: &CommentRow) -> ScoredComment {
        let normalized = normalize_raw(&row.comment);
        let cleaned = reduce_text(&scope_negations(&normalized));
        let weight = cleaned.split_whitespace().count();
        let (score, class) = self.scorer.score(&cleaned);

        if weight == 0 {
            counter!("comments_empty_total").increment(1);
        }

        ScoredComment {
            media_id: row.media_id.clone(),
            comment: row.comment.clone(),
            cleaned_comment: cleaned,
            weight,
            sentiment_score: score,
            sentiment_class: class,
        }
    }

    pub fn score_comments(&self, rows: &[CommentRow]) -> Vec<ScoredComment> {
        rows.iter().map(|r| self.score_comment(r)).collect()
    }

    /// Full run with the configured K.
    pub fn run(&self, rows: &[CommentRow]) -> BatchOutcome {
        self.run_with_k(rows, self.k)
    }

    /// Full run; every post present in `rows` appears in `posts`.
    pub fn run_with_k(&self, rows: &[CommentRow], k: usize) -> BatchOutcome {
        ensure_metrics_described();
        let started = Instant::now();

        let comments = self.score_comments(rows);
        // Aggregation starts only after every comment is scored.
        let posts = aggregate_posts(&comments);
        let ranking = select_top_bottom(&posts, k);

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        counter!("comments_scored_total").increment(comments.len() as u64);
        counter!("posts_aggregated_total").increment(posts.len() as u64);
        histogram!("batch_duration_ms").record(elapsed_ms);

        tracing::info!(
            target: "pipeline",
            comments = comments.len(),
            posts = posts.len(),
            k,
            elapsed_ms,
            "batch scored"
        );

        BatchOutcome {
            comments,
            posts,
            ranking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("hello");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_hash("hello"));
        assert_ne!(a, anon_hash("hello!"));
    }

    #[test]
    fn preprocess_combines_all_steps() {
        assert_eq!(preprocess_text("This is NOT good food!!! 🔥🔥"), "NOT good food fire fire");
    }

    #[test]
    fn score_comment_sets_weight_and_class() {
        let p = Pipeline::default();
        let c = p.score_comment(&CommentRow::new("42", "Loved these pictures, amazing work!"));
        assert_eq!(c.cleaned_comment, "loved picture amazing work");
        assert_eq!(c.weight, 4);
        assert_eq!(c.sentiment_class, SentimentClass::Positive);
        assert!(c.sentiment_score > 0.1 && c.sentiment_score <= 1.0);
    }

    #[test]
    fn missing_comment_is_weightless_and_neutral() {
        let p = Pipeline::default();
        let row = CommentRow {
            media_id: PostId::new("1"),
            comment: RawText::Missing,
        };
        let c = p.score_comment(&row);
        assert_eq!(c.cleaned_comment, "");
        assert_eq!(c.weight, 0);
        assert_eq!((c.sentiment_score, c.sentiment_class), (0.0, SentimentClass::Neutral));
    }

    #[test]
    fn run_keeps_every_post() {
        let p = Pipeline::default();
        let rows = vec![
            CommentRow::new("a", "great post"),
            CommentRow::new("b", ""),
            CommentRow::new("c", "terrible"),
        ];
        let out = p.run(&rows);
        assert_eq!(out.comments.len(), 3);
        assert_eq!(out.posts.len(), 3);
        assert_eq!(out.ranking.top[0].media_id.as_str(), "a");
        assert_eq!(out.ranking.bottom[0].media_id.as_str(), "c");
    }
}
