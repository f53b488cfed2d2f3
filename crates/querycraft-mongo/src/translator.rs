use bson::{Bson, DateTime, Document};
use querycraft_query::{OrderValue, parse_aggregation, parse_filter};

use crate::error::Result;
use crate::filter::FindBody;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Translates querycraft trees into MongoDB documents.
///
/// Translation is pure apart from relative dates, which all resolve against
/// the single instant captured at construction. Reuse one translator for
/// every part of one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translator {
    now: DateTime,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    /// A translator anchored at the current time.
    pub fn new() -> Self {
        Self::at(DateTime::now())
    }

    /// A translator anchored at a fixed instant.
    pub fn at(now: DateTime) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime {
        self.now
    }

    /// Turn an ordering value into the literal the operator is applied to.
    ///
    /// `DaysAgo(n)` becomes the instant `n` whole days before `now`. The
    /// caller's operator is not flipped: `GT { daysAgo: 3 }` means "after the
    /// instant three days ago".
    pub(crate) fn resolve(&self, value: &OrderValue) -> Bson {
        match value {
            OrderValue::Literal(literal) => literal.clone(),
            OrderValue::DaysAgo(days) => {
                let millis = self
                    .now
                    .timestamp_millis()
                    .saturating_sub(days.saturating_mul(MILLIS_PER_DAY));
                tracing::trace!(days, millis, "resolved relative date");
                Bson::DateTime(DateTime::from_millis(millis))
            }
        }
    }

    /// Decode a wire-form filter document and translate it.
    pub fn find_from_document(&self, doc: &Document) -> Result<FindBody> {
        let spec = parse_filter(doc)?;
        Ok(self.find(&spec))
    }

    /// Decode wire-form aggregation requests and translate them.
    pub fn pipeline_from_documents(&self, docs: &[Document]) -> Result<Vec<Document>> {
        let requests = docs
            .iter()
            .map(parse_aggregation)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(self.pipeline(&requests))
    }
}
