//! Content watcher that rebuilds the search artifact on change
//!
//! Uses the `notify` crate to watch the content tree. Bursts of events are
//! debounced, then the artifact is rebuilt from scratch; there is no
//! incremental update.

use anyhow::Result;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use crate::indexer::Indexer;

/// File system watcher that triggers full rebuilds
pub struct ContentWatcher {
    indexer: Indexer,
    debounce_ms: u64,
}

impl ContentWatcher {
    pub fn new(indexer: Indexer) -> Self {
        Self {
            indexer,
            debounce_ms: 500,
        }
    }

    /// Watch the content directory until the watcher channel closes
    pub fn watch(&self) -> Result<()> {
        let content_dir = self.indexer.config().content_dir.clone();
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                if let Ok(event) = res {
                    let _ = tx.send(event);
                }
            },
            Config::default(),
        )?;

        watcher.watch(&content_dir, RecursiveMode::Recursive)?;

        // some backends report absolute, symlink-resolved paths
        let mut roots = vec![content_dir.clone()];
        if let Ok(canonical) = content_dir.canonicalize() {
            roots.push(canonical);
        }

        println!(
            "🔍 Watching {} for changes... (Ctrl+C to stop)",
            content_dir.display()
        );
        println!("   Debounce: {}ms\n", self.debounce_ms);

        self.rebuild();

        let debounce_duration = Duration::from_millis(self.debounce_ms);
        let mut pending = 0usize;

        loop {
            match rx.recv_timeout(debounce_duration) {
                Ok(event) => {
                    if let EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) = event.kind {
                        pending += event
                            .paths
                            .iter()
                            .filter(|p| is_content(relative_to(p, &roots)))
                            .count();
                    }
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if pending > 0 {
                        println!("📝 {} change(s), rebuilding...", pending);
                        self.rebuild();
                        pending = 0;
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }

        Ok(())
    }

    fn rebuild(&self) {
        match self.indexer.build() {
            Ok(stats) => println!(
                "   ✨ Indexed {} documents in {:.2}s\n",
                stats.documents, stats.duration_secs
            ),
            Err(e) => {
                tracing::error!("Rebuild failed: {}", e);
                println!("   ❌ Index error: {}\n", e);
            }
        }
    }
}

/// The part of `path` below the first matching root. Paths outside every
/// root are reduced to their file name so ancestors never count as hidden.
fn relative_to<'a>(path: &'a Path, roots: &[PathBuf]) -> &'a Path {
    roots
        .iter()
        .find_map(|root| path.strip_prefix(root).ok())
        .or_else(|| path.file_name().map(Path::new))
        .unwrap_or(path)
}

/// Markdown files outside hidden directories
fn is_content(path: &Path) -> bool {
    let hidden = path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .map(|s| s.starts_with('.') && s.len() > 1 && s != "..")
            .unwrap_or(false)
    });
    if hidden {
        return false;
    }

    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md" | "mdx")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_content() {
        assert!(is_content(Path::new("content/docs/core/scheduler.mdx")));
        assert!(is_content(Path::new("content/docs/index.md")));
        assert!(!is_content(Path::new("content/docs/.drafts/wip.md")));
        assert!(!is_content(Path::new("content/docs/diagram.png")));
        assert!(is_content(Path::new("../docs/setup.md")));
    }

    #[test]
    fn test_hidden_ancestors_of_the_root_are_ignored() {
        let roots = vec![
            PathBuf::from("content/docs"),
            PathBuf::from("/home/dev/.sites/horus/content/docs"),
        ];

        let absolute = Path::new("/home/dev/.sites/horus/content/docs/core/scheduler.mdx");
        assert_eq!(relative_to(absolute, &roots), Path::new("core/scheduler.mdx"));
        assert!(is_content(relative_to(absolute, &roots)));

        let drafts = Path::new("/home/dev/.sites/horus/content/docs/.drafts/wip.md");
        assert!(!is_content(relative_to(drafts, &roots)));

        let elsewhere = Path::new("/srv/.cache/other/page.md");
        assert_eq!(relative_to(elsewhere, &roots), Path::new("page.md"));
        assert!(is_content(relative_to(Path::new("content/docs/index.md"), &roots)));
    }
}
