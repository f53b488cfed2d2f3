//! Bucket aggregations.
//!
//! A bucket spec compiles to a pipeline that groups once by the full compound
//! key (one component per nesting level), then collapses one level at a time
//! from the deepest up. Each level groups on the key prefix ending at its own
//! component, so the grouping of level `i + 1` must run before level `i`:
//!
//! ```text
//! $group by (f0, f1, ..., fn) counting documents
//! pre(0) pre(1) ... pre(n)          re-project key components
//! post(n) ... post(1) post(0)       $match on values, $group on the prefix
//! $project { id, value, buckets }
//! ```

use bson::{Bson, Document, doc};
use querycraft_query::{BucketSpec, Bucketing, DateInterval, SubFieldSelector};

use crate::translator::Translator;

/// `$dateToString` format truncating a date to the given granularity.
pub fn date_format(interval: DateInterval) -> &'static str {
    match interval {
        DateInterval::Year => "%Y-01-01T00:00:00.000",
        DateInterval::Month => "%Y-%m-01T00:00:00.000",
        DateInterval::Day => "%Y-%m-%dT00:00:00.000",
        DateInterval::Hour => "%Y-%m-%dT%H:00:00.000",
        DateInterval::Minutes => "%Y-%m-%dT%H:%M:00.000",
        DateInterval::Seconds => "%Y-%m-%dT%H:%M:%S.000",
        DateInterval::Milliseconds => "%Y-%m-%dT%H:%M:%S.%L",
    }
}

/// The compound grouping key: one `$field` reference per nesting depth.
///
/// Built once from the whole spec and shared read-only by every level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTemplate {
    sources: Vec<String>,
}

impl KeyTemplate {
    pub fn from_spec(spec: &BucketSpec) -> Self {
        Self {
            sources: spec
                .levels()
                .map(|level| format!("${}", level.field_id))
                .collect(),
        }
    }

    pub fn depth(&self) -> usize {
        self.sources.len()
    }

    /// `{ "0": "$f0", "1": "$f1", ... }`, keyed on the raw input fields.
    pub fn source_key(&self) -> Document {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, source)| (i.to_string(), Bson::String(source.clone())))
            .collect()
    }

    /// `{ "0": "$_id.0", ..., "i": "$_id.i" }`, the key of level `i`.
    pub fn prefix_key(&self, depth: usize) -> Document {
        (0..=depth)
            .map(|i| (i.to_string(), Bson::String(key_ref(i))))
            .collect()
    }

    /// Re-projection of component `depth`, keeping every other component.
    fn reproject(&self, depth: usize, expr: impl Into<Bson>) -> Document {
        let mut project = Document::new();
        project.insert(key_path(depth), expr.into());
        for other in (0..self.depth()).filter(|j| *j != depth) {
            project.insert(key_path(other), 1);
        }
        project.insert("id", 1);
        project.insert("value", 1);
        doc! { "$project": project }
    }
}

/// `_id.i`, the path of key component `i`.
fn key_path(depth: usize) -> String {
    format!("_id.{depth}")
}

/// `$_id.i`, a reference to key component `i`.
fn key_ref(depth: usize) -> String {
    format!("$_id.{depth}")
}

impl Translator {
    /// Compile a bucket spec into pipeline stages.
    ///
    /// Output documents are `{ id, value, buckets }`; leaves carry an empty
    /// `buckets` array. Bucket order within a level is unspecified.
    pub fn buckets(&self, spec: &BucketSpec) -> Vec<Document> {
        let template = KeyTemplate::from_spec(spec);

        let mut stages = vec![doc! {
            "$group": {
                "_id": template.source_key(),
                "value": { "$sum": 1 },
            }
        }];
        stages.extend(level_stages(spec, 0, &template));
        stages.push(doc! {
            "$project": { "_id": 0, "id": 1, "value": 1, "buckets": 1 }
        });

        tracing::debug!(
            field = %spec.field_id,
            depth = template.depth(),
            stages = stages.len(),
            "compiled bucket aggregation"
        );
        stages
    }
}

fn level_stages(node: &BucketSpec, depth: usize, template: &KeyTemplate) -> Vec<Document> {
    let mut stages = Vec::new();

    if let Some(selector) = &node.sub_field {
        stages.extend(select_sub_field(selector, depth, template));
    }

    match node.bucketing {
        Bucketing::Raw => {}
        Bucketing::Date(interval) => stages.push(template.reproject(
            depth,
            doc! {
                "$dateToString": {
                    "format": date_format(interval),
                    "date": key_ref(depth),
                }
            },
        )),
        Bucketing::Histogram { interval } => stages.push(template.reproject(
            depth,
            doc! {
                "$multiply": [
                    { "$trunc": { "$divide": [key_ref(depth), interval] } },
                    interval,
                ]
            },
        )),
    }

    if let Some(sub) = &node.sub_buckets {
        stages.extend(level_stages(sub, depth + 1, template));
    }

    if let Some(values) = &node.values {
        let mut filter = Document::new();
        filter.insert(key_path(depth), doc! { "$in": values.clone() });
        stages.push(doc! { "$match": filter });
    }

    stages.push(group_stage(node, depth, template));

    if node.sub_buckets.is_none() {
        stages.push(doc! {
            "$project": { "_id": 1, "id": 1, "value": 1, "buckets": [] }
        });
    }

    stages
}

/// Unwind the array component and keep only the selected elements' `prop`.
fn select_sub_field(
    selector: &SubFieldSelector,
    depth: usize,
    template: &KeyTemplate,
) -> [Document; 3] {
    let mut filter = Document::new();
    filter.insert(
        format!("{}.id", key_path(depth)),
        doc! { "$in": selector.ids.clone() },
    );

    [
        doc! { "$unwind": key_ref(depth) },
        doc! { "$match": filter },
        template.reproject(depth, format!("{}.{}", key_ref(depth), selector.prop)),
    ]
}

fn group_stage(node: &BucketSpec, depth: usize, template: &KeyTemplate) -> Document {
    let mut group = doc! {
        "_id": template.prefix_key(depth),
        "id": { "$first": { "$ifNull": [key_ref(depth), ""] } },
        "value": { "$sum": "$value" },
    };
    if node.sub_buckets.is_some() {
        group.insert(
            "buckets",
            doc! {
                "$push": { "id": "$id", "value": "$value", "buckets": "$buckets" }
            },
        );
    }
    doc! { "$group": group }
}
