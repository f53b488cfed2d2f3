use bson::{Document, doc};
use querycraft_query::AggregationRequest;

use crate::translator::Translator;

impl Translator {
    /// Assemble an aggregation chain into one pipeline.
    ///
    /// The chain is a stack: each request added to it wraps the ones before,
    /// so the most recently added request runs first. `[r1, r2, r3]` yields
    /// `stages(r3) ++ stages(r2) ++ stages(r1)`.
    pub fn pipeline(&self, requests: &[AggregationRequest]) -> Vec<Document> {
        let stages: Vec<Document> = requests
            .iter()
            .rev()
            .flat_map(|request| self.stages(request))
            .collect();

        tracing::debug!(
            requests = requests.len(),
            stages = stages.len(),
            "assembled aggregation pipeline"
        );
        stages
    }

    /// Stages for a single request.
    pub fn stages(&self, request: &AggregationRequest) -> Vec<Document> {
        let stages = match request {
            AggregationRequest::Filter(criteria) => {
                vec![doc! { "$match": self.criteria(criteria) }]
            }
            AggregationRequest::Buckets(spec) => self.buckets(spec),
        };
        tracing::debug!(
            kind = request.type_name(),
            stages = stages.len(),
            "translated aggregation request"
        );
        stages
    }
}
