//! docsearch - build-time search index and terminal front end
//!
//! `docsearch` with no arguments scans `content/docs` and writes
//! `public/search-index.json`, the artifact the site's search box loads.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use cli::{Cli, Commands};
use docsearch::output::{self, ResultPrinter};
use docsearch::watcher::ContentWatcher;
use docsearch::{Artifact, Config, FileSource, Indexer, SearchSession};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or_default() {
        Commands::Build {
            content,
            output,
            strict,
        } => {
            if let Some(dir) = content {
                config.build.content_dir = dir;
            }
            if let Some(path) = output {
                config.build.output_path = path;
            }
            config.build.strict |= strict;

            tracing::info!("Building search index from {:?}", config.build.content_dir);
            let stats = Indexer::new(config.build)
                .build()
                .context("Search index build failed")?;
            output::print_build_stats(&stats);
        }
        Commands::Search {
            query,
            index,
            limit,
            json,
        } => {
            let path = index.unwrap_or(config.build.output_path);
            if let Some(limit) = limit {
                config.engine.display_limit = limit;
            }
            tracing::debug!("Searching {:?} for: {}", path, query);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(async {
                let mut session = SearchSession::new(FileSource::new(path), config.engine);
                let state = session.open().await;
                if !state.is_ready() {
                    anyhow::bail!("Search {}", state);
                }
                let results = session.search_now(&query);
                ResultPrinter::new(json).print_results(&query, &results)
            })?;
        }
        Commands::Status { index } => {
            let path = index.unwrap_or(config.build.output_path);
            match fs::read(&path) {
                Ok(bytes) => {
                    let artifact = Artifact::from_slice(&bytes)
                        .with_context(|| format!("Invalid search artifact {:?}", path))?;
                    output::print_status(&path, &artifact, bytes.len() as u64);
                }
                Err(_) => {
                    println!("\n❌ No search artifact at {:?}. Run `docsearch build` first.", path);
                }
            }
        }
        Commands::Watch { content, output } => {
            if let Some(dir) = content {
                config.build.content_dir = dir;
            }
            if let Some(path) = output {
                config.build.output_path = path;
            }
            ContentWatcher::new(Indexer::new(config.build)).watch()?;
        }
    }

    Ok(())
}
