//! # Graphel
//!
//! A fluent GraphQL query layer for Hasura-style endpoints.
//!
//! Graphel provides:
//! - A chainable query builder that renders parameterized GraphQL documents
//! - Filter, sort, and pagination primitives matching Hasura's conventions
//! - Insert, update, delete, and upsert mutations with pre-flight validation
//! - An HTTP transport client, swappable behind the [`Transport`] trait
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use graphel::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), graphel::QueryError> {
//!     let connection = Connection::new("https://api.example.com/v1/graphql")?
//!         .admin_secret(std::env::var("HASURA_SECRET").unwrap_or_default());
//!     let client = GraphQlClient::new(connection);
//!
//!     let admins = QueryBuilder::new(client)
//!         .table("users")
//!         .select("id, name, email")
//!         .filter(Where::eq("role", "admin"))
//!         .order_desc("created_at")
//!         .get()
//!         .await?;
//!
//!     println!("{admins}");
//!     Ok(())
//! }
//! ```
//!
//! The builder itself is transport-agnostic: anything implementing
//! [`Transport`] can execute documents, which is how tests substitute a stub
//! for the HTTP client.

#![deny(missing_docs)]

pub use graphel_client as client;
pub use graphel_query as query;

pub use graphel_client::{ADMIN_SECRET_HEADER, Connection, GraphQlClient};
pub use graphel_query::{
    DEFAULT_LIMIT, OrderBy, Page, QueryBuilder, QueryError, QueryKind, QueryResult,
    SortDirection, Transport, UpsertConfig, Where, init_logging,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use graphel_client::{Connection, GraphQlClient};
    pub use graphel_query::prelude::*;
}
