// src/pipeline/negation.rs
//! Negation scoping.
//!
//! A cue (`not`, `no`, `never`, `n't`) is dropped and the single next token is
//! emitted as `NOT <token>`. The scope never extends past that one token, and a
//! trailing cue with nothing after it just disappears.
//!
//! The marker must stay uppercase: stop words are matched case-sensitively
//! against a lowercase list, so `NOT` survives reduction and reaches the scorer
//! in front of the tagged word.

/// Marker emitted in front of a negated token.
pub const NEGATION_MARKER: &str = "NOT";

const NEGATION_CUES: [&str; 4] = ["not", "no", "never", "n't"];

fn is_cue(tok: &str) -> bool {
    NEGATION_CUES.contains(&tok)
}

/// Tokens after scoping; a negated token comes out as one `"NOT word"` entry.
pub fn scoped_tokens(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut negate = false;

    for word in text.split_whitespace() {
        if negate {
            out.push(format!("{NEGATION_MARKER} {word}"));
            negate = false;
        } else if is_cue(word) {
            negate = true;
        } else {
            out.push(word.to_string());
        }
    }

    out
}

/// Scoped text, tokens joined by single spaces.
pub fn scope_negations(text: &str) -> String {
    scoped_tokens(text).join(" ")
}
