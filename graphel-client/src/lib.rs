//! # graphel-client
//!
//! HTTP transport for [`graphel-query`](graphel_query) builders.
//!
//! A [`GraphQlClient`] posts rendered documents to a Hasura-style endpoint
//! and hands the response `data` payload back to the builder. Endpoint and
//! header configuration live on [`Connection`]:
//!
//! ```rust,no_run
//! use graphel_client::{Connection, GraphQlClient};
//!
//! # fn main() -> Result<(), graphel_query::QueryError> {
//! let connection = Connection::new("https://api.example.com/v1/graphql")?
//!     .admin_secret("hunter2");
//! let client = GraphQlClient::new(connection);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod connection;

pub use client::GraphQlClient;
pub use connection::{ADMIN_SECRET_HEADER, Connection, DEFAULT_ADMIN_SECRET};
