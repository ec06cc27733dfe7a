//! Error types for query construction and execution.
//!
//! Two families of failures flow through this crate:
//!
//! - **Configuration errors** are raised before any network call and name the
//!   offending table. They represent programmer misuse of the builder (empty
//!   selection, a mutation without a payload, a vacuous filter) rather than a
//!   runtime condition.
//! - **Server and transport errors** surface asynchronously from the
//!   [`Transport`](crate::transport::Transport) layer. GraphQL errors reported
//!   by the server are carried verbatim; HTTP-level failures are reduced to a
//!   message. Neither is retried or classified further.
//!
//! ```rust
//! use graphel_query::{QueryError, QueryResult};
//!
//! let err = QueryError::empty_selection("users");
//! assert!(err.is_configuration());
//! assert!(err.to_string().contains("users"));
//! ```

use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors produced while building or executing a query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// An execution method was called with no column selection.
    #[error("no columns were selected on table \"{table}\"")]
    EmptySelection {
        /// The table the builder targets.
        table: String,
    },

    /// A builder whose query type is still `Select` was passed to a mutation.
    #[error("table \"{table}\" is not configured as a mutation")]
    NotAMutation {
        /// The table the builder targets.
        table: String,
    },

    /// An update mutation has no set payload.
    #[error("update on table \"{table}\" has no set payload")]
    MissingSetPayload {
        /// The table the builder targets.
        table: String,
    },

    /// An insert mutation has no rows.
    #[error("insert on table \"{table}\" has no rows")]
    MissingInsertRows {
        /// The table the builder targets.
        table: String,
    },

    /// An update or delete has neither a primary key nor a filter.
    #[error("{operation} on table \"{table}\" needs a primary key or a filter")]
    MissingMutationFilter {
        /// The table the builder targets.
        table: String,
        /// The mutation kind that was attempted.
        operation: &'static str,
    },

    /// A filter was supplied but contains no columns.
    #[error("filter on table \"{table}\" has no columns")]
    EmptyFilter {
        /// The table the builder targets.
        table: String,
    },

    /// The server responded with an `errors` array, carried verbatim.
    #[error("server reported {} GraphQL error(s)", .0.len())]
    GraphQl(Vec<serde_json::Value>),

    /// The HTTP layer failed before a GraphQL response was obtained.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A connection endpoint could not be parsed as a URL.
    #[error("invalid endpoint \"{0}\"")]
    InvalidEndpoint(String),
}

impl QueryError {
    /// An execution method was called with no column selection.
    pub fn empty_selection(table: impl Into<String>) -> Self {
        Self::EmptySelection {
            table: table.into(),
        }
    }

    /// A non-mutating builder was passed to a mutation path.
    pub fn not_a_mutation(table: impl Into<String>) -> Self {
        Self::NotAMutation {
            table: table.into(),
        }
    }

    /// An update mutation is missing its set payload.
    pub fn missing_set_payload(table: impl Into<String>) -> Self {
        Self::MissingSetPayload {
            table: table.into(),
        }
    }

    /// An insert mutation is missing its rows.
    pub fn missing_insert_rows(table: impl Into<String>) -> Self {
        Self::MissingInsertRows {
            table: table.into(),
        }
    }

    /// An update or delete is missing both primary key and filter.
    pub fn missing_mutation_filter(table: impl Into<String>, operation: &'static str) -> Self {
        Self::MissingMutationFilter {
            table: table.into(),
            operation,
        }
    }

    /// A filter was supplied but has zero keys.
    pub fn empty_filter(table: impl Into<String>) -> Self {
        Self::EmptyFilter {
            table: table.into(),
        }
    }

    /// A transport-level failure with the given message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Whether this error was raised locally, before any network call.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptySelection { .. }
                | Self::NotAMutation { .. }
                | Self::MissingSetPayload { .. }
                | Self::MissingInsertRows { .. }
                | Self::MissingMutationFilter { .. }
                | Self::EmptyFilter { .. }
        )
    }

    /// The server-reported GraphQL errors, if that is what this error carries.
    pub fn graphql_errors(&self) -> Option<&[serde_json::Value]> {
        match self {
            Self::GraphQl(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_configuration_errors_name_the_table() {
        let errors = [
            QueryError::empty_selection("users"),
            QueryError::not_a_mutation("users"),
            QueryError::missing_set_payload("users"),
            QueryError::missing_insert_rows("users"),
            QueryError::missing_mutation_filter("users", "update"),
            QueryError::empty_filter("users"),
        ];
        for err in errors {
            assert!(err.is_configuration());
            assert!(err.to_string().contains("users"), "{err}");
        }
    }

    #[test]
    fn test_graphql_errors_are_verbatim() {
        let payload = vec![json!({"message": "field not found", "path": ["users"]})];
        let err = QueryError::GraphQl(payload.clone());

        assert!(!err.is_configuration());
        assert_eq!(err.graphql_errors(), Some(payload.as_slice()));
        assert!(err.to_string().contains("1 GraphQL error"));
    }

    #[test]
    fn test_transport_error_keeps_message() {
        let err = QueryError::transport("connection refused");
        assert!(err.to_string().contains("connection refused"));
        assert!(err.graphql_errors().is_none());
    }
}
