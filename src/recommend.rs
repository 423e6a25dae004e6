//! Hand-off to the generative recommendation collaborator.
//!
//! The collaborator receives the thumbnails of the best posts plus a fixed
//! prompt. Nothing here talks to the network; it only decides *which* posts go
//! out and with what instruction.

use serde::Serialize;

use crate::pipeline::{sort_posts, Post, PostId};

/// The collaborator expects exactly this many top images.
pub const TOP_IMAGES: usize = 3;

pub const RECOMMENDATION_PROMPT: &str = "These are the top performing posts of my instagram, \
give me a plan for the next five days on what should I post based on what people will like \
if they have been liking these three posts the best. Keep it short but informative";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationBrief {
    /// Best first; at most `TOP_IMAGES`.
    pub media_ids: Vec<PostId>,
    pub prompt: &'static str,
    /// `false` when fewer than `TOP_IMAGES` posts were available.
    pub complete: bool,
}

impl RecommendationBrief {
    /// Best `TOP_IMAGES` posts by aggregate score, whatever K the ranking used.
    pub fn from_posts(posts: &[Post]) -> Self {
        let media_ids: Vec<PostId> = sort_posts(posts)
            .into_iter()
            .take(TOP_IMAGES)
            .map(|p| p.media_id)
            .collect();
        let complete = media_ids.len() == TOP_IMAGES;
        if !complete {
            tracing::debug!(
                target: "pipeline",
                available = media_ids.len(),
                "recommendation brief has fewer top posts than expected"
            );
        }
        Self {
            media_ids,
            prompt: RECOMMENDATION_PROMPT,
            complete,
        }
    }
}

/// Highest aggregate score; ties go to the smallest post id.
pub fn best_post(posts: &[Post]) -> Option<Post> {
    sort_posts(posts).into_iter().next()
}
