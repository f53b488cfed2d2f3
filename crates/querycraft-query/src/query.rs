use crate::condition::Condition;

/// Per-field constraints that must all hold.
///
/// Field ids are opaque dot-paths. Insertion order is kept so translated
/// documents come out in the order the caller wrote them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryGroup {
    fields: Vec<(String, Condition)>,
}

impl QueryGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_field(field: impl Into<String>, condition: Condition) -> Self {
        Self::new().field(field, condition)
    }

    pub fn field(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.insert(field, condition);
        self
    }

    /// Set the condition for `field`, replacing any existing one in place.
    pub fn insert(&mut self, field: impl Into<String>, condition: Condition) {
        let field = field.into();
        match self.fields.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = condition,
            None => self.fields.push((field, condition)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.fields
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.fields.iter().map(|(f, c)| (f.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
