//! Build-time indexer for the documentation content tree
//!
//! Walks the content root depth-first, turns every markdown page into a
//! [`Document`] and writes the whole collection as one JSON artifact.
//! The artifact is rebuilt from scratch on every run.

pub mod markdown;
mod schema;

use chrono::Utc;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use crate::config::BuildConfig;
use crate::error::BuildError;

pub use schema::{Artifact, Document, ARTIFACT_VERSION};

const EXTENSIONS: [&str; 2] = ["md", "mdx"];
const INDEX_STEM: &str = "index";

/// Statistics from a build
#[derive(Debug, Default)]
pub struct BuildStats {
    pub documents: usize,
    /// Files that could not be read and were left out
    pub skipped: usize,
    pub bytes: u64,
    pub duration_secs: f64,
    pub output: PathBuf,
}

/// Documents plus the number of unreadable files encountered
#[derive(Debug, Default)]
pub struct Collected {
    pub docs: Vec<Document>,
    pub skipped: usize,
}

/// Turns a content tree into a search artifact
pub struct Indexer {
    config: BuildConfig,
}

impl Indexer {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Collect, serialize and write the artifact.
    ///
    /// Nothing is written unless the whole content tree was collected.
    pub fn build(&self) -> Result<BuildStats, BuildError> {
        let start = Instant::now();

        let collected = self.collect()?;
        let artifact = Artifact::new(collected.docs, Utc::now());
        let bytes = write_artifact(&self.config.output_path, &artifact)?;

        let stats = BuildStats {
            documents: artifact.total_docs,
            skipped: collected.skipped,
            bytes,
            duration_secs: start.elapsed().as_secs_f64(),
            output: self.config.output_path.clone(),
        };

        tracing::info!(
            "Built search artifact: {} documents, {} skipped, {} bytes",
            stats.documents,
            stats.skipped,
            stats.bytes
        );

        Ok(stats)
    }

    /// Scan the content root and return documents in scan order
    pub fn collect(&self) -> Result<Collected, BuildError> {
        let root = self.config.content_dir.as_path();

        // An unreadable root must fail the build, not produce an empty artifact
        fs::read_dir(root).map_err(|source| BuildError::ContentRoot {
            path: root.to_path_buf(),
            source,
        })?;

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut collected = Collected::default();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if self.config.strict {
                        return Err(BuildError::Walk(e));
                    }
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    collected.skipped += 1;
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) || !is_markdown(path) {
                continue;
            }

            let source = match fs::read_to_string(path) {
                Ok(source) => source,
                Err(source) => {
                    if self.config.strict {
                        return Err(BuildError::Document {
                            path: path.to_path_buf(),
                            source,
                        });
                    }
                    tracing::warn!("Skipping {:?}: {}", path, source);
                    collected.skipped += 1;
                    continue;
                }
            };

            let relative = path.strip_prefix(root).unwrap_or(path);
            // ids come from the push position, so skipped files leave no gaps
            let id = collected.docs.len() as u64;
            let doc = build_document(id, relative, &source, &self.config);
            tracing::debug!("Indexed {:?} as {} ({})", relative, doc.slug, doc.id);
            collected.docs.push(doc);
        }

        Ok(collected)
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext))
}

/// Build one document from a file's path relative to the content root
/// and its raw source.
pub fn build_document(id: u64, relative: &Path, source: &str, config: &BuildConfig) -> Document {
    let (front, body) = markdown::split_front_matter(source);

    let dirs: Vec<String> = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let slug = slug_for(&dirs, &stem);
    let category = dirs
        .first()
        .cloned()
        .unwrap_or_else(|| config.default_category.clone());

    Document {
        id,
        title: front.title.filter(|t| !t.trim().is_empty()).unwrap_or(stem),
        description: front.description.unwrap_or_default(),
        slug,
        content: markdown::normalize(body, config.max_content_chars),
        headings: markdown::extract_headings(body),
        category,
    }
}

/// `index` pages take their directory's slug; everything else appends its stem
fn slug_for(dirs: &[String], stem: &str) -> String {
    let mut segments: Vec<&str> = dirs.iter().map(String::as_str).collect();
    if stem != INDEX_STEM {
        segments.push(stem);
    }
    format!("/{}", segments.join("/"))
}

/// Write the artifact through a temporary sibling so readers never see a
/// half-written file. Returns the artifact size in bytes.
pub fn write_artifact(path: &Path, artifact: &Artifact) -> Result<u64, BuildError> {
    let json = artifact.to_json()?;
    let write_err = |source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &json).map_err(write_err)?;
    fs::rename(&tmp, path).map_err(write_err)?;

    Ok(json.len() as u64)
}
