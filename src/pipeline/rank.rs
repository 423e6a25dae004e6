// src/pipeline/rank.rs
//! Ordering posts by aggregate score and picking the top/bottom K.

use std::cmp::Ordering;

use super::types::{Post, Ranking};

pub const DEFAULT_K: usize = 3;

/// Score descending, then post id ascending for equal scores.
fn by_score_desc(a: &Post, b: &Post) -> Ordering {
    b.aggregate_score
        .total_cmp(&a.aggregate_score)
        .then_with(|| a.media_id.cmp(&b.media_id))
}

/// All posts, best first.
pub fn sort_posts(posts: &[Post]) -> Vec<Post> {
    let mut sorted = posts.to_vec();
    sorted.sort_by(by_score_desc);
    sorted
}

/// `top` = first K of the descending order; `bottom` = last K of it, lowest first.
/// With fewer than 2K posts the two lists overlap.
pub fn select_top_bottom(posts: &[Post], k: usize) -> Ranking {
    let sorted = sort_posts(posts);
    Ranking {
        top: sorted.iter().take(k).cloned().collect(),
        bottom: sorted.iter().rev().take(k).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::PostId;

    fn post(id: &str, score: f64) -> Post {
        Post {
            media_id: PostId::new(id),
            aggregate_score: score,
            comment_count: 1,
            total_weight: 1,
        }
    }

    fn scores(v: &[Post]) -> Vec<f64> {
        v.iter().map(|p| p.aggregate_score).collect()
    }

    #[test]
    fn five_posts_k3_overlap_in_the_middle() {
        let posts = vec![
            post("p3", 0.1),
            post("p1", 0.9),
            post("p5", -0.8),
            post("p2", 0.5),
            post("p4", -0.3),
        ];
        let r = select_top_bottom(&posts, DEFAULT_K);
        assert_eq!(scores(&r.top), vec![0.9, 0.5, 0.1]);
        assert_eq!(scores(&r.bottom), vec![-0.8, -0.3, 0.1]);
    }

    #[test]
    fn ties_break_on_post_id() {
        let posts = vec![post("c", 0.2), post("a", 0.2), post("b", 0.2)];
        let sorted = sort_posts(&posts);
        let ids: Vec<&str> = sorted.iter().map(|p| p.media_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let r = select_top_bottom(&posts, 1);
        assert_eq!(r.top[0].media_id.as_str(), "a");
        assert_eq!(r.bottom[0].media_id.as_str(), "c");
    }

    #[test]
    fn fewer_posts_than_k() {
        let posts = vec![post("only", 0.4)];
        let r = select_top_bottom(&posts, 3);
        assert_eq!(r.top.len(), 1);
        assert_eq!(r.bottom.len(), 1);
        assert!(select_top_bottom(&[], 3).top.is_empty());
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = vec![post("x", 0.3), post("y", -0.1), post("z", 0.7)];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(select_top_bottom(&a, 2), select_top_bottom(&b, 2));
    }
}
