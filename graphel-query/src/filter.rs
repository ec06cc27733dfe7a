//! Filter predicate trees rendered as Hasura `bool_exp` objects.
//!
//! A [`Where`] is a recursive tree: leaves pair a column name with a
//! comparison, internal nodes combine sibling trees with `_and`, `_or`, or
//! `_not`. The tree renders to the exact JSON a Hasura endpoint expects as a
//! `<table>_bool_exp` variable -- the bound variable equals the predicate
//! verbatim, with no transformation on the way out.
//!
//! ```rust
//! use graphel_query::Where;
//! use serde_json::json;
//!
//! let filter = Where::and([
//!     Where::eq("status", "active"),
//!     Where::gte("age", 18),
//! ]);
//!
//! assert_eq!(
//!     filter.to_value(),
//!     json!({"_and": [
//!         {"status": {"_eq": "active"}},
//!         {"age": {"_gte": 18}},
//!     ]}),
//! );
//! ```

use serde_json::{Map, Value, json};

/// A comparison applied to a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmp {
    /// Equals the value (`_eq`).
    Eq(Value),
    /// Not equals the value (`_neq`).
    Neq(Value),
    /// Greater than (`_gt`).
    Gt(Value),
    /// Greater than or equal (`_gte`).
    Gte(Value),
    /// Less than (`_lt`).
    Lt(Value),
    /// Less than or equal (`_lte`).
    Lte(Value),
    /// In a list of values (`_in`).
    In(Vec<Value>),
    /// Not in a list of values (`_nin`).
    Nin(Vec<Value>),
    /// SQL LIKE pattern (`_like`).
    Like(String),
    /// Negated LIKE pattern (`_nlike`).
    Nlike(String),
    /// Case-insensitive LIKE pattern (`_ilike`).
    Ilike(String),
    /// Negated case-insensitive LIKE pattern (`_nilike`).
    Nilike(String),
    /// SQL SIMILAR TO pattern (`_similar`).
    Similar(String),
    /// Negated SIMILAR TO pattern (`_nsimilar`).
    Nsimilar(String),
    /// JSONB containment (`_contains`).
    Contains(Value),
    /// Reverse JSONB containment (`_contained_in`).
    ContainedIn(Value),
    /// Null check (`_is_null`), true for IS NULL, false for IS NOT NULL.
    IsNull(bool),
}

impl Cmp {
    /// The Hasura operator key for this comparison.
    pub fn operator(&self) -> &'static str {
        match self {
            Self::Eq(_) => "_eq",
            Self::Neq(_) => "_neq",
            Self::Gt(_) => "_gt",
            Self::Gte(_) => "_gte",
            Self::Lt(_) => "_lt",
            Self::Lte(_) => "_lte",
            Self::In(_) => "_in",
            Self::Nin(_) => "_nin",
            Self::Like(_) => "_like",
            Self::Nlike(_) => "_nlike",
            Self::Ilike(_) => "_ilike",
            Self::Nilike(_) => "_nilike",
            Self::Similar(_) => "_similar",
            Self::Nsimilar(_) => "_nsimilar",
            Self::Contains(_) => "_contains",
            Self::ContainedIn(_) => "_contained_in",
            Self::IsNull(_) => "_is_null",
        }
    }

    /// The comparison operand as a JSON value.
    pub fn operand(&self) -> Value {
        match self {
            Self::Eq(v)
            | Self::Neq(v)
            | Self::Gt(v)
            | Self::Gte(v)
            | Self::Lt(v)
            | Self::Lte(v)
            | Self::Contains(v)
            | Self::ContainedIn(v) => v.clone(),
            Self::In(vs) | Self::Nin(vs) => Value::Array(vs.clone()),
            Self::Like(s)
            | Self::Nlike(s)
            | Self::Ilike(s)
            | Self::Nilike(s)
            | Self::Similar(s)
            | Self::Nsimilar(s) => Value::String(s.clone()),
            Self::IsNull(b) => Value::Bool(*b),
        }
    }
}

/// A filter predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    /// A single column comparison.
    Field(String, Cmp),
    /// Logical AND over sibling predicates.
    And(Vec<Where>),
    /// Logical OR over sibling predicates.
    Or(Vec<Where>),
    /// Logical NOT of a predicate.
    Not(Box<Where>),
}

impl Where {
    /// A comparison on a single column.
    pub fn field(column: impl Into<String>, cmp: Cmp) -> Self {
        Self::Field(column.into(), cmp)
    }

    /// Column equals value.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field(column, Cmp::Eq(value.into()))
    }

    /// Column does not equal value.
    pub fn neq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field(column, Cmp::Neq(value.into()))
    }

    /// Column is greater than value.
    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field(column, Cmp::Gt(value.into()))
    }

    /// Column is greater than or equal to value.
    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field(column, Cmp::Gte(value.into()))
    }

    /// Column is less than value.
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field(column, Cmp::Lt(value.into()))
    }

    /// Column is less than or equal to value.
    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field(column, Cmp::Lte(value.into()))
    }

    /// Column is one of the given values.
    pub fn in_list<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::field(column, Cmp::In(values.into_iter().map(Into::into).collect()))
    }

    /// Column is none of the given values.
    pub fn not_in_list<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::field(
            column,
            Cmp::Nin(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Column matches a LIKE pattern.
    pub fn like(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::field(column, Cmp::Like(pattern.into()))
    }

    /// Column matches a case-insensitive LIKE pattern.
    pub fn ilike(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::field(column, Cmp::Ilike(pattern.into()))
    }

    /// Column is null.
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::field(column, Cmp::IsNull(true))
    }

    /// Column is not null.
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self::field(column, Cmp::IsNull(false))
    }

    /// Combine predicates with `_and`, collapsing singleton lists.
    pub fn and(predicates: impl IntoIterator<Item = Where>) -> Self {
        let mut predicates: Vec<_> = predicates.into_iter().collect();
        match predicates.len() {
            1 => predicates.remove(0),
            _ => Self::And(predicates),
        }
    }

    /// Combine predicates with `_or`, collapsing singleton lists.
    pub fn or(predicates: impl IntoIterator<Item = Where>) -> Self {
        let mut predicates: Vec<_> = predicates.into_iter().collect();
        match predicates.len() {
            1 => predicates.remove(0),
            _ => Self::Or(predicates),
        }
    }

    /// Negate a predicate with `_not`.
    pub fn not(predicate: Where) -> Self {
        Self::Not(Box::new(predicate))
    }

    /// Combine with another predicate using AND.
    pub fn and_then(self, other: Where) -> Self {
        match self {
            Self::And(mut predicates) => {
                predicates.push(other);
                Self::And(predicates)
            }
            _ => Self::And(vec![self, other]),
        }
    }

    /// Combine with another predicate using OR.
    pub fn or_else(self, other: Where) -> Self {
        match self {
            Self::Or(mut predicates) => {
                predicates.push(other);
                Self::Or(predicates)
            }
            _ => Self::Or(vec![self, other]),
        }
    }

    /// Whether this predicate is vacuous (zero keys once rendered).
    ///
    /// Mutations refuse vacuous predicates: a filter with no columns would
    /// match every row.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Field(..) => false,
            Self::And(predicates) | Self::Or(predicates) => {
                predicates.iter().all(Where::is_empty)
            }
            Self::Not(inner) => inner.is_empty(),
        }
    }

    /// Render the predicate as a Hasura `bool_exp` JSON object.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Field(column, cmp) => {
                let mut comparison = Map::new();
                comparison.insert(cmp.operator().to_string(), cmp.operand());
                let mut object = Map::new();
                object.insert(column.clone(), Value::Object(comparison));
                Value::Object(object)
            }
            Self::And(predicates) => {
                json!({ "_and": predicates.iter().map(Where::to_value).collect::<Vec<_>>() })
            }
            Self::Or(predicates) => {
                json!({ "_or": predicates.iter().map(Where::to_value).collect::<Vec<_>>() })
            }
            Self::Not(inner) => json!({ "_not": inner.to_value() }),
        }
    }
}

impl From<Where> for Value {
    fn from(predicate: Where) -> Value {
        predicate.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_renders_operator_object() {
        let filter = Where::eq("id", 5);
        assert_eq!(filter.to_value(), json!({"id": {"_eq": 5}}));
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            Where::gt("age", 18).to_value(),
            json!({"age": {"_gt": 18}})
        );
        assert_eq!(
            Where::ilike("name", "%smith%").to_value(),
            json!({"name": {"_ilike": "%smith%"}})
        );
        assert_eq!(
            Where::in_list("status", ["active", "pending"]).to_value(),
            json!({"status": {"_in": ["active", "pending"]}})
        );
        assert_eq!(
            Where::is_null("deleted_at").to_value(),
            json!({"deleted_at": {"_is_null": true}})
        );
        assert_eq!(
            Where::is_not_null("verified_at").to_value(),
            json!({"verified_at": {"_is_null": false}})
        );
    }

    #[test]
    fn test_and_renders_list() {
        let filter = Where::and([Where::eq("a", 1), Where::eq("b", 2)]);
        assert_eq!(
            filter.to_value(),
            json!({"_and": [{"a": {"_eq": 1}}, {"b": {"_eq": 2}}]})
        );
    }

    #[test]
    fn test_singleton_combinators_collapse() {
        assert_eq!(Where::and([Where::eq("a", 1)]), Where::eq("a", 1));
        assert_eq!(Where::or([Where::eq("a", 1)]), Where::eq("a", 1));
    }

    #[test]
    fn test_not_wraps() {
        let filter = Where::not(Where::eq("deleted", true));
        assert_eq!(
            filter.to_value(),
            json!({"_not": {"deleted": {"_eq": true}}})
        );
    }

    #[test]
    fn test_and_then_extends_existing_and() {
        let filter = Where::eq("a", 1)
            .and_then(Where::eq("b", 2))
            .and_then(Where::eq("c", 3));
        match &filter {
            Where::And(predicates) => assert_eq!(predicates.len(), 3),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn test_or_else_extends_existing_or() {
        let filter = Where::eq("a", 1)
            .or_else(Where::eq("b", 2))
            .or_else(Where::eq("c", 3));
        match &filter {
            Where::Or(predicates) => assert_eq!(predicates.len(), 3),
            other => panic!("expected Or, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_combinators_are_vacuous() {
        assert!(Where::And(vec![]).is_empty());
        assert!(Where::Or(vec![]).is_empty());
        assert!(Where::Not(Box::new(Where::And(vec![]))).is_empty());
        assert!(!Where::eq("id", 1).is_empty());
        assert!(!Where::and([Where::eq("id", 1)]).is_empty());
    }

    #[test]
    fn test_nested_tree_renders_verbatim() {
        let filter = Where::or([
            Where::and([Where::eq("role", "admin"), Where::is_null("deleted_at")]),
            Where::not(Where::in_list("id", [1, 2, 3])),
        ]);
        assert_eq!(
            filter.to_value(),
            json!({"_or": [
                {"_and": [
                    {"role": {"_eq": "admin"}},
                    {"deleted_at": {"_is_null": true}},
                ]},
                {"_not": {"id": {"_in": [1, 2, 3]}}},
            ]})
        );
    }
}
