//! Translation of querycraft queries into MongoDB filters and aggregation
//! pipelines.
//!
//! Everything hangs off [`Translator`], a pure value carrying the reference
//! instant used for relative dates. The free functions are shorthands that
//! build a translator reading the clock once.

mod buckets;
mod condition;
mod error;
mod filter;
mod pipeline;
mod query;
mod translator;

pub use buckets::{KeyTemplate, date_format};
pub use condition::Fragment;
pub use error::{Error, Result};
pub use filter::{FindBody, sort_order};
pub use translator::Translator;

pub use querycraft_query as ast;

use bson::Document;
use querycraft_query::{AggregationRequest, FilterSpec};

/// Translate a filter spec into a `{ filter, sort, limit }` find body.
pub fn to_mongo(spec: &FilterSpec) -> FindBody {
    Translator::new().find(spec)
}

/// Translate an aggregation chain into a MongoDB pipeline.
pub fn to_pipeline(requests: &[AggregationRequest]) -> Vec<Document> {
    Translator::new().pipeline(requests)
}

/// Decode a wire-form filter document and translate it.
pub fn find_from_document(doc: &Document) -> Result<FindBody> {
    Translator::new().find_from_document(doc)
}

/// Decode wire-form aggregation requests and translate them.
pub fn pipeline_from_documents(docs: &[Document]) -> Result<Vec<Document>> {
    Translator::new().pipeline_from_documents(docs)
}
