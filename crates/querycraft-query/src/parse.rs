//! Decoding of the querycraft wire form.
//!
//! Requests arrive as BSON documents (usually converted from JSON) in the
//! shape the query builder serializes to:
//!
//! - condition: `{ "op": "EQ", "value": ... }`; ordering values may be
//!   `{ "daysAgo": n }`, `ALL`/`ANY` take an array of conditions and
//!   `FIND`/`NFIND` take a query group
//! - query group: `{ "<fieldId>": <condition>, ... }`
//! - filter: `{ "statements": [[group, ...], ...], "sortFieldId", "sortDirection", "limit" }`
//! - buckets: `{ "fieldId", "values", "subBuckets", "subFieldIds", "subFieldProp", "interval", "dateInterval" }`
//! - aggregation: `{ "type": "filter" | "buckets", ... }` with the fields of
//!   the matching shape alongside `type`
//!
//! Explicit `null`s are treated as absent keys.

use bson::{Bson, Document};

use crate::aggregation::AggregationRequest;
use crate::buckets::{BucketSpec, Bucketing, SubFieldSelector};
use crate::condition::Condition;
use crate::error::ParseError;
use crate::filter::{Criteria, FilterSpec, Statement};
use crate::query::QueryGroup;
use crate::value::{OrderOp, OrderValue};

/// Parse a single condition document.
pub fn parse_condition(doc: &Document) -> Result<Condition, ParseError> {
    let op = match doc.get("op") {
        Some(Bson::String(op)) => op.as_str(),
        _ => return Err(ParseError::UnsupportedOperator(doc.clone())),
    };
    let value = present(doc, "value");

    let condition = match op {
        "EQ" => Condition::Eq(value.cloned().unwrap_or(Bson::Null)),
        "NEQ" => Condition::Neq(value.cloned().unwrap_or(Bson::Null)),
        "LT" => parse_order(OrderOp::Lt, value)?,
        "GT" => parse_order(OrderOp::Gt, value)?,
        "LTE" => parse_order(OrderOp::Lte, value)?,
        "GTE" => parse_order(OrderOp::Gte, value)?,
        "PREFIX" => match value {
            Some(Bson::String(s)) => Condition::Prefix(s.clone()),
            _ => return Err(ParseError::invalid("value", "a string for PREFIX")),
        },
        "ALL" => Condition::All(parse_condition_list(value)?),
        "ANY" => Condition::Any(parse_condition_list(value)?),
        "FIND" => Condition::Find(parse_nested_query(value)?),
        "NFIND" => Condition::NFind(parse_nested_query(value)?),
        _ => return Err(ParseError::UnsupportedOperator(doc.clone())),
    };

    Ok(condition)
}

/// Parse a `{ fieldId: condition }` document into a query group.
pub fn parse_query(doc: &Document) -> Result<QueryGroup, ParseError> {
    let mut group = QueryGroup::new();
    for (field, value) in doc {
        match value {
            Bson::Document(condition) => group.insert(field.clone(), parse_condition(condition)?),
            _ => return Err(ParseError::invalid(field.clone(), "a condition document")),
        }
    }
    Ok(group)
}

/// Parse a full filter document. Missing keys fall back to the defaults.
pub fn parse_filter(doc: &Document) -> Result<FilterSpec, ParseError> {
    let mut spec = FilterSpec {
        criteria: parse_criteria(doc)?,
        ..FilterSpec::default()
    };

    if let Some(field) = present(doc, "sortFieldId") {
        spec.sort.field = match field {
            Bson::String(s) => s.clone(),
            _ => return Err(ParseError::invalid("sortFieldId", "a string")),
        };
    }

    if let Some(direction) = present(doc, "sortDirection") {
        spec.sort.direction = match direction {
            Bson::String(s) => s.parse()?,
            _ => return Err(ParseError::invalid("sortDirection", "a string")),
        };
    }

    if let Some(limit) = present(doc, "limit") {
        spec.limit = as_i64(limit)
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| ParseError::invalid("limit", "a non-negative integer"))?;
    }

    Ok(spec)
}

/// Parse the `statements` key of a filter or filter aggregation.
pub fn parse_criteria(doc: &Document) -> Result<Criteria, ParseError> {
    let statements = match present(doc, "statements") {
        None => return Ok(Criteria::default()),
        Some(Bson::Array(statements)) => statements,
        Some(_) => return Err(ParseError::invalid("statements", "an array of arrays")),
    };

    let statements = statements
        .iter()
        .map(parse_statement)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Criteria { statements })
}

fn parse_statement(value: &Bson) -> Result<Statement, ParseError> {
    let groups = match value {
        Bson::Array(groups) => groups,
        _ => return Err(ParseError::invalid("statements", "an array of arrays")),
    };
    groups
        .iter()
        .map(|group| match group {
            Bson::Document(doc) => parse_query(doc),
            _ => Err(ParseError::invalid("statements", "arrays of query documents")),
        })
        .collect()
}

/// Parse a (possibly nested) bucket spec.
pub fn parse_buckets(doc: &Document) -> Result<BucketSpec, ParseError> {
    let field_id = match present(doc, "fieldId") {
        Some(Bson::String(s)) => s.clone(),
        Some(_) => return Err(ParseError::invalid("fieldId", "a string")),
        None => {
            return Err(ParseError::MissingField {
                field: "fieldId",
                context: "bucket spec",
            });
        }
    };

    let values = match present(doc, "values") {
        None => None,
        Some(Bson::Array(values)) => Some(values.clone()),
        Some(_) => return Err(ParseError::invalid("values", "an array")),
    };

    let sub_buckets = match present(doc, "subBuckets") {
        None => None,
        Some(Bson::Document(sub)) => Some(Box::new(parse_buckets(sub)?)),
        Some(_) => return Err(ParseError::invalid("subBuckets", "a bucket spec document")),
    };

    let sub_field = match (present(doc, "subFieldIds"), present(doc, "subFieldProp")) {
        (Some(ids), Some(prop)) => Some(parse_sub_field(ids, prop)?),
        _ => None,
    };

    let bucketing = match (present(doc, "interval"), present(doc, "dateInterval")) {
        (Some(_), Some(_)) => return Err(ParseError::ConflictingBucketing(doc.clone())),
        (Some(interval), None) => {
            let interval = as_f64(interval)
                .filter(|n| *n > 0.0)
                .ok_or_else(|| ParseError::invalid("interval", "a positive number"))?;
            Bucketing::Histogram { interval }
        }
        (None, Some(Bson::String(s))) => Bucketing::Date(s.parse()?),
        (None, Some(_)) => return Err(ParseError::invalid("dateInterval", "a string")),
        (None, None) => Bucketing::Raw,
    };

    Ok(BucketSpec {
        field_id,
        values,
        sub_buckets,
        sub_field,
        bucketing,
    })
}

fn parse_sub_field(ids: &Bson, prop: &Bson) -> Result<SubFieldSelector, ParseError> {
    let ids = match ids {
        Bson::Array(ids) => ids
            .iter()
            .map(|id| match id {
                Bson::String(s) => Ok(s.clone()),
                _ => Err(ParseError::invalid("subFieldIds", "an array of strings")),
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(ParseError::invalid("subFieldIds", "an array of strings")),
    };
    let prop = match prop {
        Bson::String(s) => s.clone(),
        _ => return Err(ParseError::invalid("subFieldProp", "a string")),
    };
    Ok(SubFieldSelector { ids, prop })
}

/// Parse one aggregation request, dispatching on its `type`.
pub fn parse_aggregation(doc: &Document) -> Result<AggregationRequest, ParseError> {
    match doc.get("type") {
        Some(Bson::String(kind)) if kind == "filter" => {
            Ok(AggregationRequest::Filter(parse_criteria(doc)?))
        }
        Some(Bson::String(kind)) if kind == "buckets" => {
            Ok(AggregationRequest::Buckets(parse_buckets(doc)?))
        }
        _ => Err(ParseError::UnsupportedAggregationType(doc.clone())),
    }
}

fn parse_order(op: OrderOp, value: Option<&Bson>) -> Result<Condition, ParseError> {
    let value = match value {
        Some(Bson::Document(d)) if d.contains_key("daysAgo") => {
            let days = d
                .get("daysAgo")
                .and_then(as_i64)
                .ok_or_else(|| ParseError::invalid("daysAgo", "an integer"))?;
            OrderValue::DaysAgo(days)
        }
        Some(literal) => OrderValue::Literal(literal.clone()),
        None => OrderValue::Literal(Bson::Null),
    };
    Ok(Condition::Order { op, value })
}

fn parse_condition_list(value: Option<&Bson>) -> Result<Vec<Condition>, ParseError> {
    match value {
        Some(Bson::Array(items)) => items
            .iter()
            .map(|item| match item {
                Bson::Document(doc) => parse_condition(doc),
                _ => Err(ParseError::invalid("value", "an array of condition documents")),
            })
            .collect(),
        _ => Err(ParseError::invalid("value", "an array of condition documents")),
    }
}

fn parse_nested_query(value: Option<&Bson>) -> Result<QueryGroup, ParseError> {
    match value {
        Some(Bson::Document(doc)) => parse_query(doc),
        _ => Err(ParseError::invalid("value", "a query document")),
    }
}

/// Get `key`, treating an explicit null as absent.
fn present<'a>(doc: &'a Document, key: &str) -> Option<&'a Bson> {
    match doc.get(key) {
        None | Some(Bson::Null) => None,
        Some(value) => Some(value),
    }
}

fn as_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        // 2^63 is exactly representable; anything at or past it would saturate.
        Bson::Double(n) if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n < i64::MAX as f64 => {
            Some(*n as i64)
        }
        _ => None,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}
