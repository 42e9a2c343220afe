//! Bracelet decoding CLI.
//!
//! Loads a track dataset, runs one query, and prints highlighted matches the
//! way the page renders them: matched letters in brackets, subtitle on its
//! own line, lyric snippets with ellipsis hints.
//!
//! Run with: cargo run --bin decode -- --dataset charm/testdata/tracks.json WANEGBT

use anyhow::{Context, Result};
use charm::{HighlightSegment, SearchIndex};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the tracks dataset (JSON)
    #[arg(short, long, default_value = "charm/testdata/tracks.json")]
    dataset: String,

    /// Letters to decode
    query: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let index = SearchIndex::load(&args.dataset)
        .with_context(|| format!("loading dataset from {}", args.dataset))?;
    let matches = index.search(&args.query);
    if matches.is_empty() {
        println!("no matches for {:?}", args.query);
        return Ok(());
    }

    for m in &matches {
        println!("{}  [{}]  relevance {:.4}", render(&m.title.large), m.album_id, m.relevance);
        if !m.title.small.is_empty() {
            println!("    {}", render(&m.title.small));
        }
        if let Some(snippet) = &m.lyrics {
            let lead = if snippet.window_at_start { "" } else { "\u{2026} " };
            let tail = if snippet.window_at_end { "" } else { " \u{2026}" };
            println!("    \u{266a} {}{}{}", lead, render(&snippet.windowed), tail);
        }
    }
    Ok(())
}

/// Matched runs render in brackets: "[L]ove [S]tory".
fn render(segments: &[HighlightSegment]) -> String {
    segments
        .iter()
        .map(|s| {
            if s.highlighted {
                format!("[{}]", s.text)
            } else {
                s.text.clone()
            }
        })
        .collect()
}
