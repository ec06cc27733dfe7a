//! Sort specification types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Sort direction for query results, with optional null ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
    /// Ascending, nulls sorted first.
    AscNullsFirst,
    /// Ascending, nulls sorted last.
    AscNullsLast,
    /// Descending, nulls sorted first.
    DescNullsFirst,
    /// Descending, nulls sorted last.
    DescNullsLast,
}

impl SortDirection {
    /// The Hasura `order_by` enum value for this direction.
    pub fn as_graphql(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
            Self::AscNullsFirst => "asc_nulls_first",
            Self::AscNullsLast => "asc_nulls_last",
            Self::DescNullsFirst => "desc_nulls_first",
            Self::DescNullsLast => "desc_nulls_last",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_graphql())
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Asc
    }
}

/// Order specification for a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The column to order by.
    pub column: String,
    /// The sort direction.
    pub direction: SortDirection,
}

impl OrderBy {
    /// Create a new order spec.
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Ascending order on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    /// Descending order on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Desc)
    }

    /// Render as the Hasura `order_by` variable value.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(
            self.column.clone(),
            Value::String(self.direction.as_graphql().to_string()),
        );
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direction_strings() {
        assert_eq!(SortDirection::Asc.as_graphql(), "asc");
        assert_eq!(SortDirection::Desc.as_graphql(), "desc");
        assert_eq!(
            SortDirection::AscNullsFirst.as_graphql(),
            "asc_nulls_first"
        );
        assert_eq!(
            SortDirection::DescNullsLast.as_graphql(),
            "desc_nulls_last"
        );
    }

    #[test]
    fn test_direction_serializes_as_graphql_string() {
        let direction = SortDirection::DescNullsFirst;
        assert_eq!(
            serde_json::to_value(direction).unwrap(),
            json!("desc_nulls_first")
        );
    }

    #[test]
    fn test_order_by_value() {
        let order = OrderBy::desc("created_at");
        assert_eq!(order.to_value(), json!({"created_at": "desc"}));
    }

    #[test]
    fn test_order_by_default_direction() {
        assert_eq!(SortDirection::default(), SortDirection::Asc);
    }
}
