// src/table.rs
//! Delimited-table adapter for the row formats exchanged with collaborators.
//!
//! - input:  `media_id,comment` (header row required)
//! - labelled input: `textID,text,sentiment`
//! - per-comment output: `media_id,comment,Cleaned_Comment,Sentiment_Score,Sentiment_Class`
//! - per-post output: `media_id,Aggregate_Score`
//!
//! Comment fields are read as raw bytes so one badly encoded row is coerced
//! (see `RawText`) instead of failing the whole file.

use anyhow::{anyhow, Context, Result};
use std::io::{Read, Write};

use crate::evaluate::LabelledRow;
use crate::pipeline::{CommentRow, Post, PostId, RawText, ScoredComment};

pub const COMMENT_TABLE_HEADER: [&str; 5] = [
    "media_id",
    "comment",
    "Cleaned_Comment",
    "Sentiment_Score",
    "Sentiment_Class",
];
pub const POST_TABLE_HEADER: [&str; 2] = ["media_id", "Aggregate_Score"];

fn column(headers: &csv::ByteRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| {
        std::str::from_utf8(h)
            .map(|s| s.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
            .unwrap_or(false)
    })
}

fn text_field(record: &csv::ByteRecord, idx: usize) -> RawText {
    match record.get(idx) {
        Some(bytes) => RawText::from_bytes(bytes),
        None => RawText::Missing,
    }
}

/// Read `media_id,comment` rows. Unknown headers fall back to the first two columns.
pub fn read_comment_rows<R: Read>(reader: R) -> Result<Vec<CommentRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.byte_headers().context("reading header row")?.clone();
    let id_col = column(&headers, "media_id").unwrap_or(0);
    let text_col = column(&headers, "comment").unwrap_or(1);

    let mut rows = Vec::new();
    for (i, rec) in rdr.byte_records().enumerate() {
        let rec = rec.with_context(|| format!("reading row {}", i + 1))?;
        let media_id = PostId::new(String::from_utf8_lossy(rec.get(id_col).unwrap_or_default()));
        rows.push(CommentRow {
            media_id,
            comment: text_field(&rec, text_col),
        });
    }
    Ok(rows)
}

/// Read `textID,text,sentiment` rows.
pub fn read_labelled_rows<R: Read>(reader: R) -> Result<Vec<LabelledRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.byte_headers().context("reading header row")?.clone();
    let id_col = column(&headers, "textID").ok_or_else(|| anyhow!("missing textID column"))?;
    let text_col = column(&headers, "text").ok_or_else(|| anyhow!("missing text column"))?;
    let label_col =
        column(&headers, "sentiment").ok_or_else(|| anyhow!("missing sentiment column"))?;

    let mut rows = Vec::new();
    for (i, rec) in rdr.byte_records().enumerate() {
        let rec = rec.with_context(|| format!("reading row {}", i + 1))?;
        let label = rec
            .get(label_col)
            .map(|b| String::from_utf8_lossy(b).trim().to_string())
            .filter(|s| !s.is_empty());
        rows.push(LabelledRow {
            text_id: PostId::new(String::from_utf8_lossy(rec.get(id_col).unwrap_or_default())),
            text: text_field(&rec, text_col),
            label,
        });
    }
    Ok(rows)
}

pub fn write_comment_table<W: Write>(comments: &[ScoredComment], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(COMMENT_TABLE_HEADER)?;
    for c in comments {
        let score = c.sentiment_score.to_string();
        wtr.write_record([
            c.media_id.as_str(),
            c.comment.display(),
            c.cleaned_comment.as_str(),
            score.as_str(),
            c.sentiment_class.as_str(),
        ])?;
    }
    wtr.flush().context("flushing comment table")?;
    Ok(())
}

pub fn write_post_table<W: Write>(posts: &[Post], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(POST_TABLE_HEADER)?;
    for p in posts {
        let score = p.aggregate_score.to_string();
        wtr.write_record([p.media_id.as_str(), score.as_str()])?;
    }
    wtr.flush().context("flushing post table")?;
    Ok(())
}
