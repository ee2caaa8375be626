//! In-memory full-text index over the artifact's documents
//!
//! Architecture Decision: a tantivy index in a RAM directory, one text field
//! per searchable document field. Query tokens are matched as prefixes of
//! indexed terms ("rob" finds "robot") so results are useful while the user
//! is still typing. Each field is searched on its own; fusing the per-field
//! answers is the ranker's job.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use tantivy::collector::DocSetCollector;
use tantivy::query::{BooleanQuery, FuzzyTermQuery, Occur, Query};
use tantivy::schema::*;
use tantivy::tokenizer::{LowerCaser, RemoveLongFilter, SimpleTokenizer, TextAnalyzer, TokenStream};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

use crate::error::SearchError;
use crate::indexer::Document;

const WRITER_HEAP_BYTES: usize = 50_000_000;

const TOKENIZER: &str = "docsearch";
/// Longest token kept, in bytes. The stock analyzer stops at 40, which makes
/// long identifiers unreachable even by prefix.
const MAX_TOKEN_BYTES: usize = 255;

/// The document fields the index answers queries on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Title,
    Description,
    Content,
    Headings,
}

impl SearchField {
    /// All fields, in the order they are searched
    pub const ALL: [SearchField; 4] = [
        SearchField::Title,
        SearchField::Description,
        SearchField::Content,
        SearchField::Headings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Description => "description",
            SearchField::Content => "content",
            SearchField::Headings => "headings",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    fn text<'a>(self, doc: &'a Document) -> &'a str {
        match self {
            SearchField::Title => &doc.title,
            SearchField::Description => &doc.description,
            SearchField::Content => &doc.content,
            SearchField::Headings => &doc.headings,
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-field search options
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Maximum hits returned per field
    pub limit: usize,
    /// Attach the stored document to every hit
    pub enrich: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 15,
            enrich: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Hit {
    pub id: u64,
    pub doc: Option<Document>,
}

/// Hits of one field, in index order
#[derive(Debug, Clone)]
pub struct FieldResult {
    pub field: SearchField,
    pub hits: Vec<Hit>,
}

struct Fields {
    id: Field,
    text: [(SearchField, Field); 4],
}

impl Fields {
    // `text` is laid out in `SearchField::ALL` order, which is declaration order
    fn get(&self, field: SearchField) -> Field {
        self.text[field as usize].1
    }
}

/// Split on non-alphanumerics and lowercase, for both documents and queries
fn analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(MAX_TOKEN_BYTES))
        .filter(LowerCaser)
        .build()
}

fn build_schema() -> (Schema, Fields) {
    let mut schema_builder = Schema::builder();

    let text_options = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(TOKENIZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    );

    let id = schema_builder.add_u64_field("id", STORED);
    let text = SearchField::ALL.map(|f| (f, schema_builder.add_text_field(f.name(), text_options.clone())));

    (schema_builder.build(), Fields { id, text })
}

/// Queryable index built once from the artifact's documents
pub struct QueryEngine {
    index: Index,
    reader: IndexReader,
    fields: Fields,
    docs: Vec<Document>,
    positions: HashMap<u64, usize>,
    executed: AtomicUsize,
}

impl QueryEngine {
    /// Index every document. Later lookups never touch the artifact again.
    pub fn build(docs: Vec<Document>) -> Result<Self, SearchError> {
        let (schema, fields) = build_schema();
        let index = Index::create_in_ram(schema);
        index.tokenizers().register(TOKENIZER, analyzer());

        // one thread and one commit keep everything in a single segment
        let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_HEAP_BYTES)?;
        for document in &docs {
            let mut tantivy_doc = doc!(fields.id => document.id);
            for (field, handle) in &fields.text {
                tantivy_doc.add_text(*handle, field.text(document));
            }
            writer.add_document(tantivy_doc)?;
        }
        writer.commit()?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        let positions = docs.iter().enumerate().map(|(pos, d)| (d.id, pos)).collect();

        tracing::info!("Search index ready: {} documents", docs.len());

        Ok(Self {
            index,
            reader,
            fields,
            docs,
            positions,
            executed: AtomicUsize::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn document(&self, id: u64) -> Option<&Document> {
        self.positions.get(&id).map(|&pos| &self.docs[pos])
    }

    /// Number of queries that actually reached the index
    pub fn executed_queries(&self) -> usize {
        self.executed.load(Ordering::Relaxed)
    }

    /// Lowercased query tokens, split the same way indexed text is
    pub fn tokenize(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let mut analyzer = self.index.tokenizer_for_field(self.fields.get(SearchField::Title))?;
        let mut tokens: Vec<String> = Vec::new();

        let mut stream = analyzer.token_stream(query);
        stream.process(&mut |token| {
            if !tokens.contains(&token.text) {
                tokens.push(token.text.clone());
            }
        });

        Ok(tokens)
    }

    /// Run `query` against every field independently.
    ///
    /// Within a field all query tokens must match, each as a prefix of some
    /// term. A blank query returns nothing without touching the index.
    pub fn search_fields(&self, query: &str, options: &SearchOptions) -> Result<Vec<FieldResult>, SearchError> {
        if query.trim().is_empty() || options.limit == 0 {
            return Ok(Vec::new());
        }

        let tokens = self.tokenize(query)?;
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        self.executed.fetch_add(1, Ordering::Relaxed);
        let searcher = self.reader.searcher();
        let mut results = Vec::with_capacity(SearchField::ALL.len());

        for field in SearchField::ALL {
            let handle = self.fields.get(field);
            let clauses: Vec<(Occur, Box<dyn Query>)> = tokens
                .iter()
                .map(|token| {
                    let term = Term::from_field_text(handle, token);
                    let prefix: Box<dyn Query> = Box::new(FuzzyTermQuery::new_prefix(term, 0, false));
                    (Occur::Must, prefix)
                })
                .collect();
            let field_query = BooleanQuery::new(clauses);

            let addresses = searcher.search(&field_query, &DocSetCollector)?;

            let mut ids = Vec::with_capacity(addresses.len());
            for address in addresses {
                let stored: TantivyDocument = searcher.doc(address)?;
                if let Some(id) = stored.get_first(self.fields.id).and_then(|v| v.as_u64()) {
                    ids.push(id);
                }
            }

            // prefix matches score alike, so index order decides
            ids.sort_by_key(|id| self.positions.get(id).copied().unwrap_or(usize::MAX));
            ids.truncate(options.limit);

            let hits = ids
                .into_iter()
                .map(|id| Hit {
                    id,
                    doc: if options.enrich {
                        self.document(id).cloned()
                    } else {
                        None
                    },
                })
                .collect::<Vec<_>>();

            tracing::debug!("Field {} matched {} documents", field, hits.len());
            if !hits.is_empty() {
                results.push(FieldResult { field, hits });
            }
        }

        Ok(results)
    }
}
