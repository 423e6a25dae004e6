//! Offline batch run over a comments export.
//!
//! Usage: `score_csv <comments.csv> [--out-dir DIR] [--labels FILE]` (`--help` for details)
//!
//! Writes `processed_comments.csv` and `aggregate_scores.csv` into DIR
//! (default: current directory) and logs the top/bottom posts.
//! With `--labels`, also scores a `textID,text,sentiment` file and logs
//! the evaluation summary.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use comment_sentiment_ranker::{
    evaluate,
    recommend::RecommendationBrief,
    table, Pipeline, PipelineConfig,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "score_csv", about = "Score a media_id,comment export and rank its posts")]
struct Args {
    /// Comments export with a `media_id,comment` header.
    input: PathBuf,

    /// Directory for `processed_comments.csv` and `aggregate_scores.csv`.
    #[arg(long, env = "SCORE_CSV_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Optional `textID,text,sentiment` file to evaluate against.
    #[arg(long)]
    labels: Option<PathBuf>,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pipeline=info,config=info,score_csv=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();

    let args = Args::parse();
    let config = PipelineConfig::load_or_default();
    let pipeline = Pipeline::new(&config);

    let file = File::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let rows = table::read_comment_rows(BufReader::new(file))
        .with_context(|| format!("reading {}", args.input.display()))?;

    let out = pipeline.run(&rows);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let comments_path = args.out_dir.join("processed_comments.csv");
    let posts_path = args.out_dir.join("aggregate_scores.csv");
    table::write_comment_table(
        &out.comments,
        BufWriter::new(File::create(&comments_path).context("creating processed_comments.csv")?),
    )?;
    table::write_post_table(
        &out.posts,
        BufWriter::new(File::create(&posts_path).context("creating aggregate_scores.csv")?),
    )?;

    for (rank, p) in out.ranking.top.iter().enumerate() {
        tracing::info!(target: "score_csv", rank = rank + 1, media_id = %p.media_id, score = p.aggregate_score, "top");
    }
    for (rank, p) in out.ranking.bottom.iter().enumerate() {
        tracing::info!(target: "score_csv", rank = rank + 1, media_id = %p.media_id, score = p.aggregate_score, "bottom");
    }

    let brief = RecommendationBrief::from_posts(&out.posts);
    if !brief.complete {
        tracing::warn!(target: "score_csv", posts = brief.media_ids.len(), "fewer posts than the recommendation brief asks for");
    }

    let distribution = evaluate::class_distribution(&out.comments);
    tracing::info!(
        target: "score_csv",
        comments = out.comments.len(),
        posts = out.posts.len(),
        ?distribution,
        out_dir = %args.out_dir.display(),
        "tables written"
    );

    if let Some(path) = args.labels {
        let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let labelled = table::read_labelled_rows(BufReader::new(file))?;
        let report = evaluate::evaluate(&pipeline, &labelled)?;
        tracing::info!(
            target: "score_csv",
            evaluated = report.evaluated_rows,
            accuracy = report.accuracy,
            precision = report.precision,
            recall = report.recall,
            f1 = report.f1,
            "evaluation"
        );
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
