//! Field-weighted ranking of per-field search results
//!
//! The engine answers a query once per field. This module folds those
//! answers into one list: every field a document matched in contributes
//! that field's weight, so a title + content match scores 10 + 1 = 11.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::engine::{FieldResult, SearchField};
use crate::indexer::Document;

/// Weight table keyed by field name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: u32,
    pub headings: u32,
    pub description: u32,
    pub content: u32,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 10,
            headings: 5,
            description: 3,
            content: 1,
        }
    }
}

impl FieldWeights {
    pub fn for_field(&self, field: SearchField) -> u32 {
        match field {
            SearchField::Title => self.title,
            SearchField::Headings => self.headings,
            SearchField::Description => self.description,
            SearchField::Content => self.content,
        }
    }

    /// Look a weight up by field name. Unknown fields weigh 1.
    pub fn weight(&self, field: &str) -> u32 {
        SearchField::from_name(field)
            .map(|f| self.for_field(f))
            .unwrap_or(1)
    }
}

/// A document after fusion, before highlighting
#[derive(Debug, Clone)]
pub struct RankedDoc {
    pub id: u64,
    pub score: u32,
    pub doc: Option<Document>,
}

/// Merge per-field results into one list ordered by descending score.
///
/// Ties keep first-seen order: fields are visited in the order given and
/// hits in the order the index returned them.
pub fn rank(field_results: Vec<FieldResult>, weights: &FieldWeights, limit: usize) -> Vec<RankedDoc> {
    let mut positions: HashMap<u64, usize> = HashMap::new();
    let mut ranked: Vec<RankedDoc> = Vec::new();

    for field_result in field_results {
        let weight = weights.for_field(field_result.field);

        for hit in field_result.hits {
            match positions.get(&hit.id) {
                Some(&pos) => {
                    let entry = &mut ranked[pos];
                    entry.score += weight;
                    if entry.doc.is_none() {
                        entry.doc = hit.doc;
                    }
                }
                None => {
                    positions.insert(hit.id, ranked.len());
                    ranked.push(RankedDoc {
                        id: hit.id,
                        score: weight,
                        doc: hit.doc,
                    });
                }
            }
        }
    }

    // sort_by is stable, which is what keeps the tie order
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(limit);
    ranked
}
