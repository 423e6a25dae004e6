// src/pipeline/normalize.rs
//! Text normalization for raw comments.
//!
//! Steps, in order:
//! 1) lowercase
//! 2) emoji glyphs → their textual name wrapped in single spaces (`😂` → ` face_with_tears_of_joy `)
//! 3) underscores → spaces
//! 4) drop everything that is not an ASCII letter, whitespace or `#`
//! 5) trim
//!
//! The glyph table covers the emoji common in comments, a few ZWJ sequences and
//! the five skin-tone modifiers. Modifiers are named separately, so `👍🏽` reads
//! `thumbs up  medium skin tone`. Glyphs outside the table fall to step 4.

use metrics::counter;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

use super::types::RawText;

static EMOJI_NAMES: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let raw = include_str!("../../resources/emoji_names.json");
    serde_json::from_str::<HashMap<String, String>>(raw).expect("valid emoji name table")
});

// Longest glyphs first so multi-codepoint sequences win over their prefixes.
static RE_EMOJI: Lazy<Regex> = Lazy::new(|| {
    let mut glyphs: Vec<&str> = EMOJI_NAMES.keys().map(String::as_str).collect();
    glyphs.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = glyphs
        .iter()
        .map(|g| regex::escape(g))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).expect("emoji regex")
});

/// Normalize one comment string. Never fails; worst case is an empty string.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();

    let demojized = RE_EMOJI.replace_all(&lowered, |caps: &Captures| {
        let name = EMOJI_NAMES
            .get(&caps[0])
            .map(|n| n.to_lowercase())
            .unwrap_or_default();
        format!(" {name} ")
    });

    let kept: String = demojized
        .chars()
        .map(|c| if c == '_' { ' ' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace() || *c == '#')
        .collect();

    kept.trim().to_string()
}

/// Normalize a coerced input value. Undecodable input is logged and yields `""`.
pub fn normalize_raw(raw: &RawText) -> String {
    match raw {
        RawText::Text(s) => normalize_text(s),
        RawText::Missing => String::new(),
        RawText::Undecodable(lossy) => {
            tracing::warn!(
                target: "pipeline",
                id = %super::anon_hash(lossy),
                "comment is not valid UTF-8; treating as empty"
            );
            counter!("comments_recovered_total", "stage" => "normalize").increment(1);
            String::new()
        }
    }
}
