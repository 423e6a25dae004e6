//! # Evaluation
//! Compares predicted sentiment classes against hand-labelled rows.
//!
//! Labels are trimmed and lower-cased; rows whose label is missing, `unknown`,
//! or not one of positive/negative/neutral are left out of the metrics.
//! Precision, recall and F1 are support-weighted over the classes seen in
//! either the ground truth or the predictions.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pipeline::{Pipeline, PostId, RawText, ScoredComment, SentimentClass};

/// Misclassified rows kept in the report.
const MAX_MISCLASSIFIED: usize = 10;

/// One labelled row (`textID`, `text`, `sentiment`).
#[derive(Debug, Clone, Deserialize)]
pub struct LabelledRow {
    #[serde(rename = "textID")]
    pub text_id: PostId,
    #[serde(default)]
    pub text: RawText,
    #[serde(default, rename = "sentiment")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassReport {
    pub class: SentimentClass,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Misclassified {
    pub text_id: PostId,
    pub expected: SentimentClass,
    pub predicted: SentimentClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub total_rows: usize,
    pub evaluated_rows: usize,
    pub ground_truth_distribution: BTreeMap<SentimentClass, usize>,
    pub predicted_distribution: BTreeMap<SentimentClass, usize>,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub per_class: Vec<ClassReport>,
    pub misclassified: Vec<Misclassified>,
}

/// Score every row with `pipeline` and compare against its label.
pub fn evaluate(pipeline: &Pipeline, rows: &[LabelledRow]) -> Result<EvaluationReport> {
    let mut pairs = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(expected) = row.label.as_deref().and_then(SentimentClass::parse_label) else {
            continue;
        };
        let scored = pipeline.score_comment(&crate::pipeline::CommentRow {
            media_id: row.text_id.clone(),
            comment: row.text.clone(),
        });
        pairs.push((row.text_id.clone(), expected, scored.sentiment_class));
    }

    if pairs.is_empty() {
        bail!("no known sentiment labels found in the data");
    }

    let report = compare(rows.len(), &pairs);
    tracing::info!(
        target: "pipeline",
        evaluated = report.evaluated_rows,
        total = report.total_rows,
        accuracy = report.accuracy,
        f1 = report.f1,
        "evaluation finished"
    );
    Ok(report)
}

/// Metrics over `(id, expected, predicted)` triples.
pub fn compare(
    total_rows: usize,
    pairs: &[(PostId, SentimentClass, SentimentClass)],
) -> EvaluationReport {
    let n = pairs.len();
    let mut truth = BTreeMap::new();
    let mut predicted = BTreeMap::new();
    for (_, t, p) in pairs {
        *truth.entry(*t).or_insert(0usize) += 1;
        *predicted.entry(*p).or_insert(0usize) += 1;
    }

    let correct = pairs.iter().filter(|(_, t, p)| t == p).count();
    let accuracy = ratio(correct, n);

    let mut per_class = Vec::new();
    let (mut w_precision, mut w_recall, mut w_f1) = (0.0, 0.0, 0.0);
    for class in SentimentClass::ALL {
        let support = truth.get(&class).copied().unwrap_or(0);
        let predicted_n = predicted.get(&class).copied().unwrap_or(0);
        if support == 0 && predicted_n == 0 {
            continue;
        }
        let tp = pairs
            .iter()
            .filter(|(_, t, p)| *t == class && *p == class)
            .count();
        let precision = ratio(tp, predicted_n);
        let recall = ratio(tp, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        let w = support as f64 / n as f64;
        w_precision += w * precision;
        w_recall += w * recall;
        w_f1 += w * f1;

        per_class.push(ClassReport {
            class,
            precision,
            recall,
            f1,
            support,
        });
    }

    let misclassified = pairs
        .iter()
        .filter(|(_, t, p)| t != p)
        .take(MAX_MISCLASSIFIED)
        .map(|(id, t, p)| Misclassified {
            text_id: id.clone(),
            expected: *t,
            predicted: *p,
        })
        .collect();

    EvaluationReport {
        total_rows,
        evaluated_rows: n,
        ground_truth_distribution: truth,
        predicted_distribution: predicted,
        accuracy,
        precision: w_precision,
        recall: w_recall,
        f1: w_f1,
        per_class,
        misclassified,
    }
}

/// Share of each class among `comments`, in percent, rounded to 2 decimals.
pub fn class_distribution(comments: &[ScoredComment]) -> BTreeMap<SentimentClass, f64> {
    let mut counts: BTreeMap<SentimentClass, usize> = BTreeMap::new();
    for c in comments {
        *counts.entry(c.sentiment_class).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(class, k)| {
            let pct = ratio(k, comments.len()) * 100.0;
            (class, (pct * 100.0).round() / 100.0)
        })
        .collect()
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
