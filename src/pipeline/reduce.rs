// src/pipeline/reduce.rs
//! Lexical reduction: social-media tokenization, stop-word removal, lemmatization.
//!
//! The tokenizer keeps hashtags, mentions and elongated words (`sooo`) whole.
//! Stop words are the NLTK English list, matched case-sensitively.
//! Lemmatization treats every token as a noun, WordNet style: an irregular-form
//! table first, then plural suffix rules whose result must be a known word
//! (a dictionary noun or a sentiment lexicon entry). Unknown tokens, lexicon
//! entries, and tokens that are not plain lowercase words (hashtags, the
//! negation marker, contractions) come back unchanged.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use stop_words::{get, LANGUAGE};

use super::scorer::has_valence;

static STOP_WORDS: Lazy<HashSet<String>> =
    Lazy::new(|| get(LANGUAGE::English).iter().map(|w| w.to_string()).collect());

static LEMMA_EXCEPTIONS: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let raw = include_str!("../../resources/lemma_exceptions.json");
    serde_json::from_str::<HashMap<String, String>>(raw).expect("valid lemma exception table")
});

static NOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    include_str!("../../resources/nouns.txt")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
});

static RE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \#+\w+                       # hashtags
        | @\w+                       # mentions
        | [A-Za-z]+(?:'[A-Za-z]+)*   # words, contractions, elongations
        | \d+(?:[.,]\d+)*            # numbers
        | \S                         # anything else, one char at a time
        ",
    )
    .expect("tokenizer regex")
});

/// Noun plural rules `(suffix, replacement)`, as in WordNet's morphy.
const NOUN_SUFFIX_RULES: [(&str, &str); 9] = [
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

fn is_known_word(word: &str) -> bool {
    NOUNS.contains(word) || has_valence(word)
}

pub fn tokenize(text: &str) -> Vec<&str> {
    RE_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Dictionary base form of a noun token; the token itself when no known base form exists.
pub fn lemmatize(token: &str) -> String {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_lowercase()) {
        return token.to_string();
    }
    if has_valence(token) {
        return token.to_string();
    }
    if let Some(lemma) = LEMMA_EXCEPTIONS.get(token) {
        return lemma.clone();
    }
    if token.len() <= 3 || NOUNS.contains(token) {
        return token.to_string();
    }

    NOUN_SUFFIX_RULES
        .iter()
        .filter_map(|(suffix, replacement)| {
            let stem = token.strip_suffix(suffix)?;
            (!stem.is_empty()).then(|| format!("{stem}{replacement}"))
        })
        .filter(|candidate| is_known_word(candidate))
        .min_by_key(String::len)
        .unwrap_or_else(|| token.to_string())
}

/// Tokenize, drop stop words, lemmatize, rejoin with single spaces.
pub fn reduce_text(text: &str) -> String {
    tokenize(text)
        .into_iter()
        .filter(|tok| !is_stop_word(tok))
        .map(lemmatize)
        .collect::<Vec<_>>()
        .join(" ")
}
