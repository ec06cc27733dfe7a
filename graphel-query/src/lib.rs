//! # graphel-query
//!
//! Fluent GraphQL query construction for Hasura-style schemas.
//!
//! This crate provides the core query building functionality, including:
//! - Fluent API for building fetches (`get`, `first`, `count`, `exists`)
//! - Filter predicates rendered as `_bool_exp` variable payloads
//! - Insert / update / delete / upsert mutations with validation
//! - Combined multi-builder documents with indexed variable names
//! - Offset pagination with observable page snapshots
//!
//! ## Filters
//!
//! Build filter predicates for queries:
//!
//! ```rust
//! use graphel_query::Where;
//! use serde_json::json;
//!
//! // Equality filter
//! let filter = Where::eq("email", "test@example.com");
//!
//! // Greater than filter
//! let filter = Where::gt("age", 18);
//!
//! // Combine filters with AND/OR
//! let combined = Where::and([
//!     Where::eq("active", true),
//!     Where::gt("age", 18),
//! ]);
//!
//! let either = Where::or([
//!     Where::eq("role", "admin"),
//!     Where::eq("role", "moderator"),
//! ]);
//!
//! assert_eq!(
//!     combined.to_value(),
//!     json!({"_and": [
//!         {"active": {"_eq": true}},
//!         {"age": {"_gt": 18}},
//!     ]}),
//! );
//! ```
//!
//! ## Sorting
//!
//! ```rust
//! use graphel_query::{OrderBy, SortDirection};
//! use serde_json::json;
//!
//! let order = OrderBy::desc("created_at");
//! assert_eq!(order.to_value(), json!({"created_at": "desc"}));
//!
//! let order = OrderBy::new("name", SortDirection::AscNullsLast);
//! assert_eq!(order.to_value(), json!({"name": "asc_nulls_last"}));
//! ```
//!
//! ## Building queries
//!
//! A [`QueryBuilder`] accumulates intent through chained configuration calls,
//! then executes through any [`Transport`]:
//!
//! ```rust,ignore
//! let row = QueryBuilder::new(client)
//!     .table("users")
//!     .select("id, name, email")
//!     .filter(Where::eq("id", 5))
//!     .first()
//!     .await?;
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use graphel_query::QueryError;
//!
//! let err = QueryError::empty_selection("users");
//! assert!(err.is_configuration());
//! ```

pub mod builder;
pub mod document;
pub mod error;
pub mod filter;
pub mod logging;
pub mod pagination;
pub mod transport;
pub mod types;

pub use builder::{DEFAULT_LIMIT, QueryBuilder, QueryKind, UpsertConfig};
pub use error::{QueryError, QueryResult};
pub use filter::{Cmp, Where};
pub use pagination::{Page, PageFeed};
pub use transport::Transport;
pub use types::{OrderBy, SortDirection};

// Re-export logging utilities
pub use logging::{get_log_format, get_log_level, init as init_logging, is_debug_enabled};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builder::{QueryBuilder, QueryKind, UpsertConfig};
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::filter::{Cmp, Where};
    pub use crate::pagination::Page;
    pub use crate::transport::Transport;
    pub use crate::types::{OrderBy, SortDirection};
}
