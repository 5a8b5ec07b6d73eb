//! Store-agnostic query model.
//!
//! A query is a conjunction of equality conditions, an optional any-of group
//! (at least one must hold), ordering on a single field, a limit and a
//! start-after cursor naming a document id. Ties in ordering break on id.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use beatstore_core::types::DocId;

use crate::document::{Document, ID_FIELD};
use crate::error::StoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// `field == value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub value: Value,
}

impl Condition {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        if self.field == ID_FIELD {
            return self.value.as_str() == Some(doc.id.as_str());
        }
        doc.field(&self.field)
            .is_some_and(|v| values_equal(v, &self.value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub conditions: Vec<Condition>,
    pub any_of: Vec<Condition>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
    pub start_after: Option<DocId>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::eq(field, value));
        self
    }

    /// Add a condition only when `value` is present.
    pub fn where_eq_opt<V: Into<Value>>(self, field: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.where_eq(field, v),
            None => self,
        }
    }

    pub fn any_of(mut self, conditions: Vec<Condition>) -> Self {
        self.any_of = conditions;
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn start_after(mut self, id: impl Into<DocId>) -> Self {
        self.start_after = Some(id.into());
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(doc))
            && (self.any_of.is_empty() || self.any_of.iter().any(|c| c.matches(doc)))
    }

    /// Ordering between two documents under this query.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let primary = match &self.order_by {
            Some(order) => {
                let ord = compare_optional(a.field(&order.field), b.field(&order.field));
                match order.direction {
                    Direction::Asc => ord,
                    // Missing values stay last in both directions.
                    Direction::Desc => match (a.field(&order.field), b.field(&order.field)) {
                        (None, Some(_)) => Ordering::Greater,
                        (Some(_), None) => Ordering::Less,
                        _ => ord.reverse(),
                    },
                }
            }
            None => Ordering::Equal,
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// Evaluate against a full collection held in memory.
    pub fn evaluate<'a, I>(&self, docs: I) -> Result<Vec<Document>, StoreError>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let all: Vec<&Document> = docs.into_iter().collect();
        let cursor = match &self.start_after {
            Some(id) => Some(
                all.iter()
                    .find(|d| &d.id == id)
                    .copied()
                    .ok_or_else(|| StoreError::InvalidQuery(format!("unknown cursor '{id}'")))?,
            ),
            None => None,
        };

        let mut matched: Vec<&Document> = all.iter().copied().filter(|d| self.matches(d)).collect();
        matched.sort_by(|a, b| self.compare(a, b));

        let iter = matched
            .into_iter()
            .filter(|d| cursor.is_none_or(|c| self.compare(d, c) == Ordering::Greater));
        let limited: Vec<Document> = match self.limit {
            Some(n) => iter.take(n).cloned().collect(),
            None => iter.cloned().collect(),
        };
        Ok(limited)
    }
}

/// Equality with numbers compared by value, so `1` equals `1.0`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Number(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values, grouping by type first.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .unwrap_or_default()
            .total_cmp(&y.as_f64().unwrap_or_default()),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn compare_optional(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => compare_values(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn doc(id: &str, body: Value) -> Document {
        let Value::Object(map) = body else {
            panic!("object expected")
        };
        Document::new(id, map)
    }

    fn docs() -> Vec<Document> {
        vec![
            doc("a", json!({ "status": "published", "plays": 10, "genre": "trap" })),
            doc("b", json!({ "status": "draft", "plays": 30, "genre": "trap" })),
            doc("c", json!({ "status": "published", "plays": 20, "genre": "drill" })),
            doc("d", json!({ "status": "published", "genre": "afro" })),
        ]
    }

    fn ids(result: &[Document]) -> Vec<&str> {
        result.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn equality_conditions_are_anded() {
        let q = Query::new().where_eq("status", "published").where_eq("genre", "trap");
        assert_eq!(ids(&q.evaluate(&docs()).unwrap()), ["a"]);
    }

    #[test]
    fn any_of_group() {
        let q = Query::new().any_of(vec![
            Condition::eq("genre", "drill"),
            Condition::eq("genre", "afro"),
        ]);
        assert_eq!(ids(&q.evaluate(&docs()).unwrap()), ["c", "d"]);
    }

    #[test]
    fn ordering_keeps_missing_last() {
        let q = Query::new().order_by("plays", Direction::Desc);
        assert_eq!(ids(&q.evaluate(&docs()).unwrap()), ["b", "c", "a", "d"]);
        let q = Query::new().order_by("plays", Direction::Asc);
        assert_eq!(ids(&q.evaluate(&docs()).unwrap()), ["a", "c", "b", "d"]);
    }

    #[test]
    fn cursor_and_limit_page_through() {
        let q = Query::new().order_by("plays", Direction::Desc).limit(2);
        let first = q.evaluate(&docs()).unwrap();
        assert_eq!(ids(&first), ["b", "c"]);
        let next = q.clone().start_after("c").evaluate(&docs()).unwrap();
        assert_eq!(ids(&next), ["a", "d"]);
    }

    #[test]
    fn unknown_cursor_is_an_error() {
        let q = Query::new().start_after("zzz");
        assert_matches!(q.evaluate(&docs()), Err(StoreError::InvalidQuery(_)));
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!("1")));
    }

    #[test]
    fn id_condition_matches_document_id() {
        let q = Query::new().where_eq("id", "c");
        assert_eq!(ids(&q.evaluate(&docs()).unwrap()), ["c"]);
    }
}
