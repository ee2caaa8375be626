//! Terminal output for search results and artifact status
//!
//! Highlight markers in result fragments are turned into terminal colours;
//! `--json` prints the results exactly as a UI host would receive them.

use anyhow::Result;
use colored::*;

use crate::highlight::{MARK_CLOSE, MARK_OPEN};
use crate::indexer::{Artifact, BuildStats};
use crate::session::SearchResult;

/// Handles formatting and printing search results
pub struct ResultPrinter {
    json: bool,
}

impl ResultPrinter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn print_results(&self, query: &str, results: &[SearchResult]) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(results)?);
            return Ok(());
        }

        if results.is_empty() {
            println!("\n{}", format!("No results found for \"{}\"", query).yellow());
            println!("{}", "Try different keywords or check your spelling".dimmed());
            return Ok(());
        }

        println!(
            "\n{} {}",
            "Found".green().bold(),
            format!("{} result{}:", results.len(), if results.len() == 1 { "" } else { "s" }).green()
        );
        println!();

        for (i, result) in results.iter().enumerate() {
            self.print_result(i + 1, result);
        }

        Ok(())
    }

    fn print_result(&self, index: usize, result: &SearchResult) {
        println!(
            "{} {} {} {}",
            format!("[{}]", index).cyan().bold(),
            render_marks(&result.highlights.title).bold(),
            result.doc.category.replace('-', " ").to_uppercase().dimmed(),
            format!("score: {}", result.score).dimmed()
        );
        println!("    {}", result.doc.slug.blue());

        if !result.highlights.description.is_empty() {
            println!("    {}", render_marks(&result.highlights.description));
        }
        if !result.highlights.content.is_empty() {
            println!("    {}", render_marks(&result.highlights.content).dimmed());
        }
        println!();
    }
}

/// Replace `<mark>` spans with coloured text
fn render_marks(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut rest = fragment;

    while let Some(open) = rest.find(MARK_OPEN) {
        out.push_str(&rest[..open]);
        let after = &rest[open + MARK_OPEN.len()..];
        match after.find(MARK_CLOSE) {
            Some(close) => {
                out.push_str(&after[..close].yellow().bold().to_string());
                rest = &after[close + MARK_CLOSE.len()..];
            }
            None => {
                rest = after;
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn print_build_stats(stats: &BuildStats) {
    println!("\n{}", "✨ Search index built!".green().bold());
    println!("   Documents: {}", stats.documents);
    if stats.skipped > 0 {
        println!("   Skipped: {}", stats.skipped.to_string().yellow());
    }
    println!("   Output: {}", stats.output.display());
    println!("   Size: {:.2} KB", stats.bytes as f64 / 1024.0);
    println!("   Time: {:.2}s", stats.duration_secs);
}

pub fn print_status(path: &std::path::Path, artifact: &Artifact, size_bytes: u64) {
    println!("\n{}", "📊 Search Artifact".bold());
    println!("   Path: {}", path.display());
    println!("   Version: {}", artifact.version);
    println!("   Generated: {}", artifact.generated);
    println!("   Documents: {}", artifact.total_docs);
    println!("   Size: {:.2} KB", size_bytes as f64 / 1024.0);
    let healthy = artifact.total_docs == artifact.docs.len();
    println!("   Healthy: {}", if healthy { "✅" } else { "❌" });
}
