mod aggregation;
mod buckets;
mod condition;
mod error;
mod filter;
pub mod parse;
mod query;
mod sort;
mod value;

pub use aggregation::AggregationRequest;
pub use buckets::{BucketSpec, Bucketing, DateInterval, SubFieldSelector};
pub use condition::Condition;
pub use error::ParseError;
pub use filter::{Criteria, FilterSpec, Statement};
pub use parse::{
    parse_aggregation, parse_buckets, parse_condition, parse_criteria, parse_filter, parse_query,
};
pub use query::QueryGroup;
pub use sort::{Sort, SortDirection};
pub use value::{OrderOp, OrderValue};
