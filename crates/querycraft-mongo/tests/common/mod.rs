#![allow(dead_code)]

use bson::{Bson, DateTime, Document, doc};
use querycraft_mongo::Translator;

pub const NOW_MILLIS: i64 = 1_700_000_000_000;

pub fn translator() -> Translator {
    Translator::at(DateTime::from_millis(NOW_MILLIS))
}

/// Documents with a single field set to each value.
pub fn docs_with(field: &str, values: impl IntoIterator<Item = Bson>) -> Vec<Document> {
    values
        .into_iter()
        .map(|value| {
            let mut doc = Document::new();
            doc.insert(field, value);
            doc
        })
        .collect()
}

pub fn number(value: &Bson) -> f64 {
    match value {
        Bson::Int32(n) => f64::from(*n),
        Bson::Int64(n) => *n as f64,
        Bson::Double(n) => *n,
        other => panic!("expected a number, got {other:?}"),
    }
}

/// `(id, value)` of each output bucket.
pub fn id_values(buckets: &[Document]) -> Vec<(Bson, f64)> {
    buckets
        .iter()
        .map(|b| (b.get("id").cloned().unwrap_or(Bson::Null), number(b.get("value").unwrap())))
        .collect()
}

pub fn find_bucket<'a>(buckets: &'a [Document], id: &Bson) -> &'a Document {
    buckets
        .iter()
        .find(|b| b.get("id") == Some(id))
        .unwrap_or_else(|| panic!("no bucket with id {id}"))
}

pub fn child_buckets(bucket: &Document) -> Vec<Document> {
    bucket
        .get_array("buckets")
        .unwrap()
        .iter()
        .map(|b| b.as_document().unwrap().clone())
        .collect()
}

// ── In-memory pipeline evaluator ─────────────────────────────────
//
// Covers only what the bucket builder emits: $group ($sum, $first, $push),
// $project, $match ($in or equality), $unwind, and the $ifNull, $multiply,
// $trunc, $divide and $dateToString expressions. Missing values are `None`
// and are omitted from object expressions, as MongoDB does.

pub fn aggregate(docs: &[Document], pipeline: &[Document]) -> Vec<Document> {
    let mut current = docs.to_vec();
    for stage in pipeline {
        let (name, spec) = stage.iter().next().expect("empty stage");
        current = match name.as_str() {
            "$group" => group(&current, spec.as_document().unwrap()),
            "$project" => {
                let spec = spec.as_document().unwrap();
                current.iter().map(|d| project(d, spec)).collect()
            }
            "$match" => {
                let spec = spec.as_document().unwrap();
                current.into_iter().filter(|d| matches(d, spec)).collect()
            }
            "$unwind" => unwind(current, spec.as_str().unwrap()),
            other => panic!("unsupported stage {other}"),
        };
    }
    current
}

fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Bson::Document(d) => d.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

fn set_path(doc: &mut Document, path: &str, value: Bson) {
    match path.split_once('.') {
        None => {
            doc.insert(path, value);
        }
        Some((head, rest)) => {
            if !matches!(doc.get(head), Some(Bson::Document(_))) {
                doc.insert(head, Document::new());
            }
            if let Some(Bson::Document(inner)) = doc.get_mut(head) {
                set_path(inner, rest, value);
            }
        }
    }
}

fn eval(doc: &Document, expr: &Bson) -> Option<Bson> {
    match expr {
        Bson::String(s) if s.starts_with('$') => get_path(doc, &s[1..]).cloned(),
        Bson::Document(d) => match d.iter().next() {
            Some((op, arg)) if op.starts_with('$') => eval_operator(doc, op, arg),
            _ => {
                let mut out = Document::new();
                for (key, value) in d {
                    if let Some(value) = eval(doc, value) {
                        out.insert(key.clone(), value);
                    }
                }
                Some(Bson::Document(out))
            }
        },
        Bson::Array(items) => Some(Bson::Array(
            items
                .iter()
                .map(|item| eval(doc, item).unwrap_or(Bson::Null))
                .collect(),
        )),
        literal => Some(literal.clone()),
    }
}

fn eval_args(doc: &Document, arg: &Bson) -> Vec<Option<Bson>> {
    match arg {
        Bson::Array(items) => items.iter().map(|item| eval(doc, item)).collect(),
        single => vec![eval(doc, single)],
    }
}

fn numeric_args(doc: &Document, arg: &Bson) -> Option<Vec<f64>> {
    eval_args(doc, arg)
        .into_iter()
        .map(|value| match value {
            Some(Bson::Null) | None => None,
            Some(value) => Some(number(&value)),
        })
        .collect()
}

fn eval_operator(doc: &Document, op: &str, arg: &Bson) -> Option<Bson> {
    match op {
        "$ifNull" => {
            let args = eval_args(doc, arg);
            let value = args[0].clone().filter(|v| *v != Bson::Null);
            value.or_else(|| args[1].clone())
        }
        "$multiply" => Some(match numeric_args(doc, arg) {
            Some(ns) => Bson::Double(ns.iter().product()),
            None => Bson::Null,
        }),
        "$divide" => Some(match numeric_args(doc, arg) {
            Some(ns) => Bson::Double(ns[0] / ns[1]),
            None => Bson::Null,
        }),
        "$trunc" => Some(match numeric_args(doc, arg) {
            Some(ns) => Bson::Double(ns[0].trunc()),
            None => Bson::Null,
        }),
        "$dateToString" => {
            let spec = arg.as_document().unwrap();
            let format = spec.get_str("format").unwrap();
            match eval(doc, spec.get("date").unwrap()) {
                Some(Bson::DateTime(date)) => Some(Bson::String(format_date(date, format))),
                _ => Some(Bson::Null),
            }
        }
        other => panic!("unsupported expression operator {other}"),
    }
}

fn group(docs: &[Document], spec: &Document) -> Vec<Document> {
    let key_expr = spec.get("_id").unwrap();
    let mut groups: Vec<(Bson, Vec<&Document>)> = Vec::new();
    for doc in docs {
        let key = eval(doc, key_expr).unwrap_or(Bson::Null);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(doc),
            None => groups.push((key, vec![doc])),
        }
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let mut out = doc! { "_id": key };
            for (field, accumulator) in spec.iter().filter(|(f, _)| *f != "_id") {
                let (op, arg) = accumulator.as_document().unwrap().iter().next().unwrap();
                let value = match op.as_str() {
                    "$sum" => sum(&members, arg),
                    "$first" => eval(members[0], arg).unwrap_or(Bson::Null),
                    "$push" => Bson::Array(
                        members
                            .iter()
                            .map(|m| eval(m, arg).unwrap_or(Bson::Null))
                            .collect(),
                    ),
                    other => panic!("unsupported accumulator {other}"),
                };
                out.insert(field.clone(), value);
            }
            out
        })
        .collect()
}

fn sum(members: &[&Document], arg: &Bson) -> Bson {
    let mut ints: i64 = 0;
    let mut floats: f64 = 0.0;
    let mut any_float = false;
    for member in members {
        match eval(member, arg) {
            Some(Bson::Int32(n)) => ints += i64::from(n),
            Some(Bson::Int64(n)) => ints += n,
            Some(Bson::Double(n)) => {
                floats += n;
                any_float = true;
            }
            _ => {}
        }
    }
    if any_float {
        Bson::Double(floats + ints as f64)
    } else {
        Bson::Int64(ints)
    }
}

fn project(doc: &Document, spec: &Document) -> Document {
    let mut out = Document::new();
    let mentions_id = spec.keys().any(|k| k == "_id" || k.starts_with("_id."));
    if !mentions_id {
        if let Some(id) = doc.get("_id") {
            out.insert("_id", id.clone());
        }
    }

    for (path, value) in spec {
        match value {
            Bson::Int32(0) | Bson::Boolean(false) => {}
            Bson::Int32(1) | Bson::Boolean(true) => {
                if let Some(v) = get_path(doc, path) {
                    set_path(&mut out, path, v.clone());
                }
            }
            expr => {
                if let Some(v) = eval(doc, expr) {
                    set_path(&mut out, path, v);
                }
            }
        }
    }
    out
}

fn matches(doc: &Document, spec: &Document) -> bool {
    spec.iter().all(|(path, condition)| {
        let value = get_path(doc, path);
        match condition {
            Bson::Document(op) if op.contains_key("$in") => {
                let allowed = op.get_array("$in").unwrap();
                let listed = |v: &Bson| allowed.iter().any(|a| same_value(a, v));
                match value {
                    Some(Bson::Array(items)) => items.iter().any(listed),
                    Some(v) => listed(v),
                    None => false,
                }
            }
            literal => value == Some(literal),
        }
    })
}

/// Equality as `$in` sees it: numbers compare by value across types.
fn same_value(a: &Bson, b: &Bson) -> bool {
    match (a, b) {
        (
            Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_),
            Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_),
        ) => number(a) == number(b),
        _ => a == b,
    }
}

fn unwind(docs: Vec<Document>, path: &str) -> Vec<Document> {
    let path = path.trim_start_matches('$');
    docs.into_iter()
        .flat_map(|doc| match get_path(&doc, path).cloned() {
            Some(Bson::Array(items)) => items
                .into_iter()
                .map(|item| {
                    let mut copy = doc.clone();
                    set_path(&mut copy, path, item);
                    copy
                })
                .collect::<Vec<_>>(),
            Some(Bson::Null) | None => Vec::new(),
            Some(_) => vec![doc],
        })
        .collect()
}

/// `$dateToString` in UTC. chrono spells MongoDB's `%L` (milliseconds) as `%3f`.
fn format_date(date: DateTime, format: &str) -> String {
    let date = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(date.timestamp_millis())
        .unwrap_or_else(|| panic!("date out of range: {date}"));
    date.format(&format.replace("%L", "%3f")).to_string()
}
