// src/pipeline/scorer.rs
//! VADER compound polarity plus threshold classification.
//!
//! The lexicon and heuristics (boosters, ALL-CAPS emphasis, negation window,
//! contrastive `but`, `!`/`?` emphasis) come from `vader_sentiment`. This module
//! validates the compound value, rounds it to 4 places and classifies it.
//! Scoring a single comment never fails outward: an internal error yields `(0.0, Neutral)`.

use anyhow::{ensure, Context, Result};
use metrics::counter;
use vader_sentiment::SentimentIntensityAnalyzer;

use super::types::SentimentClass;

/// Classification cut-offs: `score > positive` ⇒ positive, `score < negative` ⇒ negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub positive: f64,
    pub negative: f64,
}

/// ±0.1, the default for the main pipeline.
pub const STANDARD_THRESHOLDS: Thresholds = Thresholds {
    positive: 0.1,
    negative: -0.1,
};

/// ±0.3, the tighter neutral band.
pub const STRICT_THRESHOLDS: Thresholds = Thresholds {
    positive: 0.3,
    negative: -0.3,
};

impl Default for Thresholds {
    fn default() -> Self {
        STANDARD_THRESHOLDS
    }
}

impl Thresholds {
    pub fn classify(&self, score: f64) -> SentimentClass {
        if score > self.positive {
            SentimentClass::Positive
        } else if score < self.negative {
            SentimentClass::Negative
        } else {
            SentimentClass::Neutral
        }
    }
}

/// Raw VADER compound for `text`, if the analyzer reported one.
fn vader_compound(text: &str) -> Option<f64> {
    SentimentIntensityAnalyzer::new()
        .polarity_scores(text)
        .get("compound")
        .copied()
}

/// Rejects a missing or non-finite value, clamps to [-1, 1], rounds to 4 places.
fn checked_compound(raw: Option<f64>) -> Result<f64> {
    let compound = raw.context("analyzer returned no compound score")?;
    ensure!(compound.is_finite(), "non-finite compound score");
    Ok((compound.clamp(-1.0, 1.0) * 10_000.0).round() / 10_000.0)
}

/// True when `word` on its own carries polarity, i.e. it is a lexicon entry.
pub(crate) fn has_valence(word: &str) -> bool {
    vader_compound(word).is_some_and(|c| c != 0.0)
}

/// Shared, read-only scorer. The lexicon lives in static tables, so cloning is free.
#[derive(Debug, Clone, Default)]
pub struct SentimentScorer {
    thresholds: Thresholds,
}

impl SentimentScorer {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// `(polarity_score, sentiment_class)`; defaults to `(0.0, Neutral)` on failure.
    pub fn score(&self, text: &str) -> (f64, SentimentClass) {
        self.settle(text, self.compound(text))
    }

    /// Compound polarity in [-1, 1].
    pub fn compound(&self, text: &str) -> Result<f64> {
        if text.trim().is_empty() {
            return Ok(0.0);
        }
        checked_compound(vader_compound(text))
    }

    fn settle(&self, text: &str, compound: Result<f64>) -> (f64, SentimentClass) {
        match compound {
            Ok(score) => (score, self.thresholds.classify(score)),
            Err(e) => {
                tracing::warn!(
                    target: "pipeline",
                    id = %super::anon_hash(text),
                    error = %e,
                    "scoring failed; defaulting to neutral"
                );
                counter!("comments_recovered_total", "stage" => "score").increment(1);
                (0.0, SentimentClass::Neutral)
            }
        }
    }
}
