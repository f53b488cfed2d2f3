use bson::{Bson, Document};

use crate::condition::Condition;
use crate::query::QueryGroup;
use crate::sort::{Sort, SortDirection};

/// Groups that combine disjunctively.
pub type Statement = Vec<QueryGroup>;

/// The condition portion of a filter: statements that combine conjunctively.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    pub statements: Vec<Statement>,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            statements: vec![vec![QueryGroup::new()]],
        }
    }
}

impl Criteria {
    /// Criteria with no statements at all. Matches everything.
    pub fn empty() -> Self {
        Self { statements: vec![] }
    }

    /// Constrain `field` in the last group of the last statement.
    fn insert(&mut self, field: String, condition: Condition) {
        match self.statements.last_mut() {
            Some(statement) => match statement.last_mut() {
                Some(group) => group.insert(field, condition),
                None => statement.push(QueryGroup::where_field(field, condition)),
            },
            None => self
                .statements
                .push(vec![QueryGroup::where_field(field, condition)]),
        }
    }
}

/// A complete query: criteria plus ordering, limit and pagination state.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub criteria: Criteria,
    pub sort: Sort,
    pub limit: u64,
    /// Sort-field value of the last item of the previous page.
    pub cursor: Option<Bson>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            criteria: Criteria::default(),
            sort: Sort::default(),
            limit: Self::DEFAULT_LIMIT,
            cursor: None,
        }
    }
}

impl FilterSpec {
    pub const DEFAULT_LIMIT: u64 = 50;

    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain `field` in the current group.
    pub fn field(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.criteria.insert(field.into(), condition);
        self
    }

    /// Start a new group, OR-ed with the previous ones of the same statement.
    pub fn or(mut self) -> Self {
        match self.criteria.statements.last_mut() {
            Some(statement) => statement.push(QueryGroup::new()),
            None => self.criteria.statements.push(vec![QueryGroup::new()]),
        }
        self
    }

    /// Start a new statement, AND-ed with the previous ones.
    pub fn and(mut self) -> Self {
        self.criteria.statements.push(vec![QueryGroup::new()]);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Sort {
            field: field.into(),
            direction,
        };
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// The filter for the page following `last`.
    ///
    /// Adds a statement requiring the sort field to be strictly past the
    /// value `last` holds for it. Items sharing that exact value with `last`
    /// are skipped.
    pub fn paginated_after(&self, last: &Document) -> FilterSpec {
        let Some(value) = lookup_path(last, &self.sort.field) else {
            tracing::warn!(
                field = %self.sort.field,
                "last item has no value for the sort field; pagination ignored"
            );
            return self.clone();
        };

        let condition = match self.sort.direction {
            SortDirection::Asc => Condition::gt(value.clone()),
            SortDirection::Desc => Condition::lt(value.clone()),
        };

        let mut next = self.clone().and().field(self.sort.field.clone(), condition);
        next.cursor = Some(value.clone());
        next
    }
}

fn lookup_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Bson::Document(d) => d.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}
