// tests/pipeline_properties.rs
//
// Behavioural properties of the full scoring pipeline, exercised through the
// public library surface only.

use comment_sentiment_ranker::pipeline::reduce::is_stop_word;
use comment_sentiment_ranker::pipeline::{
    aggregate_posts, normalize_text, reduce_text, scope_negations, select_top_bottom,
    SentimentScorer, STANDARD_THRESHOLDS,
};
use comment_sentiment_ranker::{
    preprocess_text, CommentRow, Pipeline, Post, PostId, RawText, ScoredComment, SentimentClass,
};

fn awkward_inputs() -> Vec<RawText> {
    vec![
        RawText::from("Loved these pictures, amazing work!!!"),
        RawText::from("I did NOT like this at all :( 2/10"),
        RawText::from("   "),
        RawText::from(""),
        RawText::from("#travel #sunset 🌅😍 best trip EVER"),
        RawText::from("you_are_awesome!!! never seen this"),
        RawText::from("ça va? très bien 👍"),
        RawText::from("12345 !!! ??? ..."),
        RawText::from("doesn't look good, but the colours are great"),
        RawText::Missing,
        RawText::from_bytes(&[0x67, 0x6f, 0xff, 0x6f, 0x64]),
        RawText::from_json(&serde_json::json!(42)),
        RawText::from_json(&serde_json::json!({"nested": true})),
    ]
}

fn score_all(p: &Pipeline) -> Vec<ScoredComment> {
    let rows: Vec<CommentRow> = awkward_inputs()
        .into_iter()
        .enumerate()
        .map(|(i, comment)| CommentRow {
            media_id: PostId::new(format!("post-{}", i % 4)),
            comment,
        })
        .collect();
    p.score_comments(&rows)
}

#[test]
fn cleaned_text_uses_only_letters_whitespace_and_hash() {
    for c in score_all(&Pipeline::default()) {
        // Uppercase only appears in the negation marker.
        let without_marker = c.cleaned_comment.replace("NOT ", "");
        assert!(
            without_marker
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_whitespace() || ch == '#'),
            "unexpected character in {:?}",
            c.cleaned_comment
        );
    }
}

#[test]
fn weight_is_word_count_of_cleaned_text() {
    for c in score_all(&Pipeline::default()) {
        assert_eq!(c.weight, c.cleaned_comment.split_whitespace().count());
    }
}

#[test]
fn scores_stay_within_unit_interval() {
    for c in score_all(&Pipeline::default()) {
        assert!(
            (-1.0..=1.0).contains(&c.sentiment_score),
            "{} out of range for {:?}",
            c.sentiment_score,
            c.cleaned_comment
        );
    }
}

#[test]
fn malformed_inputs_default_to_neutral_zero() {
    let p = Pipeline::default();
    for raw in [
        RawText::Missing,
        RawText::from_bytes(&[0xff, 0xfe]),
        RawText::from(""),
        RawText::from("!!! 123"),
    ] {
        let c = p.score_comment(&CommentRow {
            media_id: PostId::new("x"),
            comment: raw,
        });
        assert_eq!(c.weight, 0);
        assert_eq!(c.sentiment_score, 0.0);
        assert_eq!(c.sentiment_class, SentimentClass::Neutral);
    }
}

#[test]
fn class_is_a_function_of_score() {
    let t = STANDARD_THRESHOLDS;
    assert_eq!(t.classify(0.5), SentimentClass::Positive);
    assert_eq!(t.classify(-0.5), SentimentClass::Negative);
    assert_eq!(t.classify(0.0), SentimentClass::Neutral);

    for c in score_all(&Pipeline::default()) {
        assert_eq!(t.classify(c.sentiment_score), c.sentiment_class);
    }
}

#[test]
fn scoring_is_deterministic() {
    let p = Pipeline::default();
    assert_eq!(score_all(&p), score_all(&p));
}

#[test]
fn weighted_mean_of_two_comments() {
    let mk = |score: f64, weight: usize| ScoredComment {
        media_id: PostId::new("p"),
        comment: RawText::Missing,
        cleaned_comment: vec!["w"; weight].join(" "),
        weight,
        sentiment_score: score,
        sentiment_class: STANDARD_THRESHOLDS.classify(score),
    };
    let posts = aggregate_posts(&[mk(0.8, 4), mk(-0.2, 1)]);
    assert_eq!(posts.len(), 1);
    assert!((posts[0].aggregate_score - 0.6).abs() < 1e-12);
    assert_eq!(posts[0].total_weight, 5);
}

#[test]
fn post_with_only_empty_comments_scores_zero_and_is_ranked() {
    let p = Pipeline::default();
    let rows = vec![
        CommentRow::new("quiet", ""),
        CommentRow::new("quiet", RawText::Missing),
        CommentRow::new("loud", "great great great"),
    ];
    let out = p.run(&rows);
    let quiet = out
        .posts
        .iter()
        .find(|p| p.media_id.as_str() == "quiet")
        .expect("quiet post present");
    assert_eq!(quiet.aggregate_score, 0.0);
    assert_eq!(quiet.comment_count, 2);
    assert!(out.ranking.top.iter().any(|p| p.media_id.as_str() == "quiet"));
}

#[test]
fn five_posts_top_and_bottom_three() {
    let posts: Vec<Post> = [("a", 0.9), ("b", 0.5), ("c", 0.1), ("d", -0.3), ("e", -0.8)]
        .into_iter()
        .map(|(id, s)| Post {
            media_id: PostId::new(id),
            aggregate_score: s,
            comment_count: 1,
            total_weight: 1,
        })
        .collect();
    let r = select_top_bottom(&posts, 3);
    let scores = |v: &[Post]| v.iter().map(|p| p.aggregate_score).collect::<Vec<_>>();
    assert_eq!(scores(&r.top), vec![0.9, 0.5, 0.1]);
    assert_eq!(scores(&r.bottom), vec![-0.8, -0.3, 0.1]);
}

#[test]
fn cleaning_is_idempotent_on_clean_text() {
    for text in ["loved picture amazing work", "sunset #travel view", "NOT good food"] {
        assert_eq!(preprocess_text(text), preprocess_text(&preprocess_text(text)));
    }
    assert_eq!(preprocess_text("loved picture amazing work"), "loved picture amazing work");
}

#[test]
fn negation_tags_next_token_and_drops_cue() {
    let scoped = scope_negations(&normalize_text("not good food"));
    assert_eq!(scoped, "NOT good food");
    assert_eq!(reduce_text(&scoped), "NOT good food");
}

#[test]
fn negated_comment_scores_below_plain_one() {
    let scorer = SentimentScorer::default();
    let (plain, _) = scorer.score(&preprocess_text("good food"));
    let (negated, class) = scorer.score(&preprocess_text("not good food"));
    assert!(plain > 0.0);
    assert!(negated < 0.0);
    assert_eq!(class, SentimentClass::Negative);
}

#[test]
fn every_input_post_appears_once_in_first_seen_order() {
    let p = Pipeline::default();
    let rows = vec![
        CommentRow::new("z", "love it"),
        CommentRow::new("a", "hate it"),
        CommentRow::new("z", "nice"),
        CommentRow::new("m", RawText::Missing),
    ];
    let out = p.run(&rows);
    let ids: Vec<&str> = out.posts.iter().map(|p| p.media_id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a", "m"]);
    assert_eq!(out.comments.len(), 4);
}

const VOCABULARY: &str = include_str!("fixtures/comment_vocabulary.txt");

#[test]
fn sentiment_words_survive_cleaning() {
    let scorer = SentimentScorer::default();
    let mut checked = 0;
    for word in VOCABULARY.lines().map(str::trim) {
        if word.is_empty()
            || !word.bytes().all(|b| b.is_ascii_lowercase())
            || is_stop_word(word)
            || matches!(word, "no" | "not" | "never")
        {
            continue;
        }
        let (raw, _) = scorer.score(word);
        if raw == 0.0 {
            continue;
        }
        let cleaned = preprocess_text(word);
        assert_eq!(cleaned, word, "cleaning rewrote {word}");
        assert_eq!(scorer.score(&cleaned).0, raw, "{word}");
        checked += 1;
    }
    assert!(checked > 100, "only {checked} vocabulary words carry sentiment");
}

#[test]
fn congratulations_stay_positive() {
    let p = Pipeline::default();
    for text in ["Congrats!!", "kudos to the team", "haha love it"] {
        let c = p.score_comment(&CommentRow::new("1", text));
        assert_eq!(c.sentiment_class, SentimentClass::Positive, "{text} -> {}", c.cleaned_comment);
    }
}
