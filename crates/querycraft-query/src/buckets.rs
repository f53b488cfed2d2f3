use std::str::FromStr;

use bson::Bson;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Calendar granularity of a date bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateInterval {
    Year,
    Month,
    Day,
    Hour,
    Minutes,
    Seconds,
    Milliseconds,
}

impl DateInterval {
    pub const ALL: [DateInterval; 7] = [
        DateInterval::Year,
        DateInterval::Month,
        DateInterval::Day,
        DateInterval::Hour,
        DateInterval::Minutes,
        DateInterval::Seconds,
        DateInterval::Milliseconds,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateInterval::Year => "year",
            DateInterval::Month => "month",
            DateInterval::Day => "day",
            DateInterval::Hour => "hour",
            DateInterval::Minutes => "minutes",
            DateInterval::Seconds => "seconds",
            DateInterval::Milliseconds => "milliseconds",
        }
    }
}

impl FromStr for DateInterval {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateInterval::ALL
            .into_iter()
            .find(|interval| interval.as_str() == s)
            .ok_or_else(|| ParseError::UnknownDateInterval(s.to_string()))
    }
}

/// How raw field values map onto bucket keys.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Bucketing {
    /// One bucket per distinct value.
    #[default]
    Raw,
    /// Fixed-width numeric ranges keyed by `trunc(v / interval) * interval`.
    ///
    /// Truncation is toward zero, so `-3` with interval `10` lands in bucket
    /// `0` together with `3`, and `-13` lands in `-10`.
    Histogram { interval: f64 },
    /// Calendar truncation.
    Date(DateInterval),
}

/// Selects elements of an array-of-objects field by their `id`, bucketing
/// on `prop` of each selected element.
#[derive(Debug, Clone, PartialEq)]
pub struct SubFieldSelector {
    pub ids: Vec<String>,
    pub prop: String,
}

/// A group-and-count request, optionally nested one level per `sub_buckets`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketSpec {
    pub field_id: String,
    /// When set, only these bucket keys are kept.
    pub values: Option<Vec<Bson>>,
    pub sub_buckets: Option<Box<BucketSpec>>,
    pub sub_field: Option<SubFieldSelector>,
    pub bucketing: Bucketing,
}

impl BucketSpec {
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            ..Default::default()
        }
    }

    pub fn values(mut self, values: impl IntoIterator<Item = impl Into<Bson>>) -> Self {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn sub_buckets(mut self, sub: BucketSpec) -> Self {
        self.sub_buckets = Some(Box::new(sub));
        self
    }

    pub fn sub_field(
        mut self,
        ids: impl IntoIterator<Item = impl Into<String>>,
        prop: impl Into<String>,
    ) -> Self {
        self.sub_field = Some(SubFieldSelector {
            ids: ids.into_iter().map(Into::into).collect(),
            prop: prop.into(),
        });
        self
    }

    pub fn interval(mut self, interval: f64) -> Self {
        self.bucketing = Bucketing::Histogram { interval };
        self
    }

    pub fn date_interval(mut self, interval: DateInterval) -> Self {
        self.bucketing = Bucketing::Date(interval);
        self
    }

    /// Number of grouping levels, this node included.
    pub fn depth(&self) -> usize {
        1 + self.sub_buckets.as_ref().map_or(0, |sub| sub.depth())
    }

    /// This node followed by each nested sub-bucket node, outermost first.
    pub fn levels(&self) -> impl Iterator<Item = &BucketSpec> {
        std::iter::successors(Some(self), |node| node.sub_buckets.as_deref())
    }
}
