use bson::{Bson, Document, doc};
use querycraft_query::QueryGroup;

use crate::condition::{Fragment, scope_all};
use crate::translator::Translator;

impl Translator {
    /// Translate one query group into a filter document.
    ///
    /// Plain fragments land directly under their field. Composites are
    /// re-scoped per field and collected into a top-level `$and`: an `ALL`
    /// contributes one clause per part, an `ANY` contributes a single `$or`
    /// clause. The `$and` key is left out when nothing was collected.
    pub fn query_group(&self, group: &QueryGroup) -> Document {
        let mut filter = Document::new();
        let mut and: Vec<Bson> = Vec::new();

        for (field, condition) in group.iter() {
            match self.condition(condition) {
                Fragment::Direct(value) => {
                    filter.insert(field, value);
                }
                Fragment::And(parts) => and.extend(scope_all(parts, field)),
                Fragment::Or(parts) => and.push(doc! { "$or": scope_all(parts, field) }.into()),
            }
        }

        if !and.is_empty() {
            filter.insert("$and", and);
        }
        filter
    }
}
