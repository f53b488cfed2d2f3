use crate::buckets::BucketSpec;
use crate::filter::Criteria;

/// One step of an aggregation chain.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationRequest {
    Filter(Criteria),
    Buckets(BucketSpec),
}

impl AggregationRequest {
    pub fn type_name(&self) -> &'static str {
        match self {
            AggregationRequest::Filter(_) => "filter",
            AggregationRequest::Buckets(_) => "buckets",
        }
    }
}

impl From<Criteria> for AggregationRequest {
    fn from(criteria: Criteria) -> Self {
        AggregationRequest::Filter(criteria)
    }
}

impl From<BucketSpec> for AggregationRequest {
    fn from(spec: BucketSpec) -> Self {
        AggregationRequest::Buckets(spec)
    }
}
