use bson::Document;

/// Failure decoding the wire form of a query, bucket spec or aggregation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported operator in condition: {0}")]
    UnsupportedOperator(Document),

    #[error("unsupported aggregation type: {0}")]
    UnsupportedAggregationType(Document),

    #[error("missing field `{field}` in {context}")]
    MissingField {
        field: &'static str,
        context: &'static str,
    },

    #[error("field `{field}` must be {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    #[error("bucket spec sets both interval and dateInterval: {0}")]
    ConflictingBucketing(Document),

    #[error("unknown date interval: {0}")]
    UnknownDateInterval(String),

    #[error("unknown sort direction: {0}")]
    UnknownSortDirection(String),
}

impl ParseError {
    pub(crate) fn invalid(field: impl Into<String>, expected: &'static str) -> Self {
        ParseError::InvalidField {
            field: field.into(),
            expected,
        }
    }
}
