use bson::Bson;
use serde::{Deserialize, Serialize};

/// Ordering comparison applied by a range condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderOp {
    Lt,
    Gt,
    Lte,
    Gte,
}

impl OrderOp {
    /// The wire tag, as used in the `op` key of a condition.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderOp::Lt => "LT",
            OrderOp::Gt => "GT",
            OrderOp::Lte => "LTE",
            OrderOp::Gte => "GTE",
        }
    }
}

/// The right-hand side of a range condition.
///
/// `DaysAgo` is relative: it only becomes a point in time once a translator
/// resolves it against its reference instant.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderValue {
    Literal(Bson),
    DaysAgo(i64),
}

impl From<Bson> for OrderValue {
    fn from(value: Bson) -> Self {
        OrderValue::Literal(value)
    }
}

impl From<bson::DateTime> for OrderValue {
    fn from(value: bson::DateTime) -> Self {
        OrderValue::Literal(Bson::DateTime(value))
    }
}

impl From<i32> for OrderValue {
    fn from(value: i32) -> Self {
        OrderValue::Literal(Bson::Int32(value))
    }
}

impl From<i64> for OrderValue {
    fn from(value: i64) -> Self {
        OrderValue::Literal(Bson::Int64(value))
    }
}

impl From<f64> for OrderValue {
    fn from(value: f64) -> Self {
        OrderValue::Literal(Bson::Double(value))
    }
}

impl From<&str> for OrderValue {
    fn from(value: &str) -> Self {
        OrderValue::Literal(Bson::String(value.to_string()))
    }
}
