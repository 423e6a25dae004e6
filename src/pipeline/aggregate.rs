// src/pipeline/aggregate.rs
//! Length-weighted mean of comment scores per post.
//!
//! `aggregate = Σ(score_i × weight_i) / Σ weight_i`, or 0 when every comment
//! of the post is empty. Posts come out in first-seen order of their id.

use std::collections::HashMap;

use super::types::{Post, PostId, ScoredComment};

#[derive(Default)]
struct Acc {
    weighted_sum: f64,
    total_weight: usize,
    comment_count: usize,
}

pub fn aggregate_posts(comments: &[ScoredComment]) -> Vec<Post> {
    let mut order: Vec<&PostId> = Vec::new();
    let mut groups: HashMap<&PostId, Acc> = HashMap::new();

    for c in comments {
        let acc = groups.entry(&c.media_id).or_insert_with(|| {
            order.push(&c.media_id);
            Acc::default()
        });
        acc.weighted_sum += c.sentiment_score * c.weight as f64;
        acc.total_weight += c.weight;
        acc.comment_count += 1;
    }

    order
        .into_iter()
        .map(|id| {
            let acc = &groups[id];
            let aggregate_score = if acc.total_weight > 0 {
                acc.weighted_sum / acc.total_weight as f64
            } else {
                0.0
            };
            Post {
                media_id: id.clone(),
                aggregate_score,
                comment_count: acc.comment_count,
                total_weight: acc.total_weight,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{RawText, SentimentClass};

    fn scored(id: &str, score: f64, weight: usize) -> ScoredComment {
        ScoredComment {
            media_id: PostId::new(id),
            comment: RawText::Missing,
            cleaned_comment: vec!["w"; weight].join(" "),
            weight,
            sentiment_score: score,
            sentiment_class: SentimentClass::Neutral,
        }
    }

    #[test]
    fn weighted_mean_per_post() {
        let posts = aggregate_posts(&[scored("a", 0.8, 4), scored("a", -0.2, 1)]);
        assert_eq!(posts.len(), 1);
        assert!((posts[0].aggregate_score - 0.6).abs() < 1e-9);
        assert_eq!(posts[0].total_weight, 5);
        assert_eq!(posts[0].comment_count, 2);
    }

    #[test]
    fn zero_weight_post_is_kept_with_zero_score() {
        let posts = aggregate_posts(&[scored("empty", 0.0, 0), scored("empty", 0.0, 0)]);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].aggregate_score, 0.0);
    }

    #[test]
    fn first_seen_order_and_interleaving() {
        let posts = aggregate_posts(&[
            scored("b", 0.5, 2),
            scored("a", -0.5, 1),
            scored("b", 0.1, 2),
        ]);
        let ids: Vec<&str> = posts.iter().map(|p| p.media_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!((posts[0].aggregate_score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn empty_input() {
        assert!(aggregate_posts(&[]).is_empty());
    }
}
