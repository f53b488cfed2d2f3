use bson::{Bson, Document, doc};
use querycraft_query::{Condition, OrderOp};

use crate::translator::Translator;

/// A translated condition, before it is attached to a field.
///
/// MongoDB cannot hang `$and`/`$or` off a field key, so composites stay
/// tagged until the query translator distributes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// An operator document or literal that goes directly under the field.
    Direct(Bson),
    /// Every sub-fragment must hold.
    And(Vec<Fragment>),
    /// Some sub-fragment must hold.
    Or(Vec<Fragment>),
}

impl Fragment {
    /// Attach this fragment to `field` as a single clause.
    pub fn scoped(self, field: &str) -> Document {
        match self {
            Fragment::Direct(value) => {
                let mut clause = Document::new();
                clause.insert(field, value);
                clause
            }
            Fragment::And(parts) => doc! { "$and": scope_all(parts, field) },
            Fragment::Or(parts) => doc! { "$or": scope_all(parts, field) },
        }
    }
}

pub(crate) fn scope_all(parts: Vec<Fragment>, field: &str) -> Vec<Bson> {
    parts
        .into_iter()
        .map(|part| Bson::Document(part.scoped(field)))
        .collect()
}

impl Translator {
    pub fn condition(&self, condition: &Condition) -> Fragment {
        match condition {
            Condition::Eq(value) => Fragment::Direct(value.clone()),
            Condition::Neq(value) => Fragment::Direct(doc! { "$ne": value.clone() }.into()),
            Condition::Order { op, value } => {
                let mut range = Document::new();
                range.insert(order_operator(*op), self.resolve(value));
                Fragment::Direct(range.into())
            }
            Condition::Prefix(prefix) => Fragment::Direct(prefix_regex(prefix).into()),
            Condition::All(conditions) => {
                Fragment::And(conditions.iter().map(|c| self.condition(c)).collect())
            }
            Condition::Any(conditions) => {
                Fragment::Or(conditions.iter().map(|c| self.condition(c)).collect())
            }
            Condition::Find(group) => {
                Fragment::Direct(doc! { "$elemMatch": self.query_group(group) }.into())
            }
            Condition::NFind(group) => Fragment::Direct(
                doc! { "$not": { "$elemMatch": self.query_group(group) } }.into(),
            ),
        }
    }
}

fn order_operator(op: OrderOp) -> &'static str {
    match op {
        OrderOp::Lt => "$lt",
        OrderOp::Gt => "$gt",
        OrderOp::Lte => "$lte",
        OrderOp::Gte => "$gte",
    }
}

/// Case-insensitive match on a literal prefix.
fn prefix_regex(prefix: &str) -> Document {
    doc! {
        "$regex": format!("^{}", regex::escape(prefix)),
        "$options": "i",
    }
}
