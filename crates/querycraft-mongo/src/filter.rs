use bson::{Bson, Document, doc};
use querycraft_query::{Criteria, FilterSpec, QueryGroup, SortDirection};
use serde::Serialize;

use crate::translator::Translator;

/// The body of a find command: `{ filter, sort, limit }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindBody {
    pub filter: Document,
    pub sort: Document,
    pub limit: i64,
}

impl FindBody {
    pub fn into_document(self) -> Document {
        doc! {
            "filter": self.filter,
            "sort": self.sort,
            "limit": self.limit,
        }
    }
}

impl From<FindBody> for Document {
    fn from(body: FindBody) -> Self {
        body.into_document()
    }
}

/// MongoDB sort order for a direction.
pub fn sort_order(direction: SortDirection) -> i32 {
    match direction {
        SortDirection::Asc => 1,
        SortDirection::Desc => -1,
    }
}

impl Translator {
    /// Translate the condition portion of a filter.
    ///
    /// Statements without groups are skipped. The first remaining statement
    /// is the base document; each later one is appended to its `$and`,
    /// alongside any clauses the base already carries there. No statements
    /// at all yields `{}`.
    pub fn criteria(&self, criteria: &Criteria) -> Document {
        let mut statements = criteria
            .statements
            .iter()
            .filter(|statement| !statement.is_empty())
            .map(|statement| self.statement(statement));

        let Some(mut base) = statements.next() else {
            return Document::new();
        };

        let rest: Vec<Bson> = statements.map(Bson::Document).collect();
        if !rest.is_empty() {
            if let Some(Bson::Array(and)) = base.get_mut("$and") {
                and.extend(rest);
            } else {
                base.insert("$and", rest);
            }
        }
        base
    }

    /// One group is used as is; several are OR-ed.
    fn statement(&self, groups: &[QueryGroup]) -> Document {
        let docs: Vec<Document> = groups.iter().map(|group| self.query_group(group)).collect();
        match <[Document; 1]>::try_from(docs) {
            Ok([single]) => single,
            Err(docs) => doc! { "$or": docs },
        }
    }

    /// Translate a full filter spec into a find body.
    pub fn find(&self, spec: &FilterSpec) -> FindBody {
        let filter = self.criteria(&spec.criteria);

        let mut sort = Document::new();
        sort.insert(spec.sort.field.clone(), sort_order(spec.sort.direction));

        let limit = i64::try_from(spec.limit).unwrap_or(i64::MAX);

        tracing::debug!(
            statements = spec.criteria.statements.len(),
            sort = %spec.sort.field,
            limit,
            "translated filter"
        );

        FindBody {
            filter,
            sort,
            limit,
        }
    }
}
