//! The transport seam between the builder and the wire.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::QueryResult;

/// Executes a rendered GraphQL document against an endpoint.
///
/// The builder renders documents and variables; a `Transport` carries them to
/// a server and returns the response `data` payload, or the server-reported
/// errors as a rejection. Implementations perform exactly one round-trip per
/// call -- no retry, no coalescing, no cancellation.
///
/// The HTTP implementation lives in `graphel-client`; tests substitute a stub.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a document with the given variables.
    ///
    /// `variables` may be `Value::Null` when the document declares none.
    async fn execute(&self, document: &str, variables: Value) -> QueryResult<Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, document: &str, variables: Value) -> QueryResult<Value> {
        (**self).execute(document, variables).await
    }
}
