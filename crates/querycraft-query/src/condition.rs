use bson::Bson;

use crate::query::QueryGroup;
use crate::value::{OrderOp, OrderValue};

/// A predicate on a single field's value.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Bson),
    Neq(Bson),
    Order { op: OrderOp, value: OrderValue },
    /// Case-insensitive string prefix.
    Prefix(String),
    /// Every sub-condition holds.
    All(Vec<Condition>),
    /// At least one sub-condition holds.
    Any(Vec<Condition>),
    /// Some array element matches the nested group.
    Find(QueryGroup),
    /// No array element matches the nested group.
    NFind(QueryGroup),
}

impl Condition {
    pub fn eq(value: impl Into<Bson>) -> Self {
        Condition::Eq(value.into())
    }

    pub fn neq(value: impl Into<Bson>) -> Self {
        Condition::Neq(value.into())
    }

    pub fn is_null() -> Self {
        Condition::Eq(Bson::Null)
    }

    pub fn lt(value: impl Into<OrderValue>) -> Self {
        Self::order(OrderOp::Lt, value)
    }

    pub fn gt(value: impl Into<OrderValue>) -> Self {
        Self::order(OrderOp::Gt, value)
    }

    pub fn lte(value: impl Into<OrderValue>) -> Self {
        Self::order(OrderOp::Lte, value)
    }

    pub fn gte(value: impl Into<OrderValue>) -> Self {
        Self::order(OrderOp::Gte, value)
    }

    pub fn order(op: OrderOp, value: impl Into<OrderValue>) -> Self {
        Condition::Order {
            op,
            value: value.into(),
        }
    }

    /// Range condition against the instant `days` days before translation.
    pub fn days_ago(op: OrderOp, days: i64) -> Self {
        Condition::Order {
            op,
            value: OrderValue::DaysAgo(days),
        }
    }

    pub fn prefix(value: impl Into<String>) -> Self {
        Condition::Prefix(value.into())
    }

    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::All(conditions.into_iter().collect())
    }

    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Any(conditions.into_iter().collect())
    }

    pub fn find(group: QueryGroup) -> Self {
        Condition::Find(group)
    }

    pub fn nfind(group: QueryGroup) -> Self {
        Condition::NFind(group)
    }

    /// The wire tag of this condition's operator.
    pub fn op_name(&self) -> &'static str {
        match self {
            Condition::Eq(_) => "EQ",
            Condition::Neq(_) => "NEQ",
            Condition::Order { op, .. } => op.as_str(),
            Condition::Prefix(_) => "PREFIX",
            Condition::All(_) => "ALL",
            Condition::Any(_) => "ANY",
            Condition::Find(_) => "FIND",
            Condition::NFind(_) => "NFIND",
        }
    }
}
