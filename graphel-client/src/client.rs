//! HTTP transport over reqwest.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use graphel_query::{QueryError, QueryResult, Transport};

use crate::connection::Connection;

/// The JSON body of a GraphQL POST request.
#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    query: &'a str,
    variables: &'a Value,
}

/// A [`Transport`] that posts documents to a GraphQL endpoint.
///
/// One round-trip per call: the response body is parsed, a non-empty `errors`
/// array rejects the call with the server's errors carried verbatim, and the
/// `data` payload is returned otherwise. No retries, no response caching.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: reqwest::Client,
    connection: Connection,
}

impl GraphQlClient {
    /// Create a client for the given connection.
    pub fn new(connection: Connection) -> Self {
        Self {
            http: reqwest::Client::new(),
            connection,
        }
    }

    /// The connection this client posts to.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

#[async_trait]
impl Transport for GraphQlClient {
    async fn execute(&self, document: &str, variables: Value) -> QueryResult<Value> {
        debug!(endpoint = %self.connection.endpoint(), "posting GraphQL document");

        let mut request = self.http.post(self.connection.endpoint().clone());
        for (name, value) in self.connection.headers() {
            request = request.header(name, value);
        }

        let response = request
            .json(&RequestBody {
                query: document,
                variables: &variables,
            })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "GraphQL request failed to send");
                QueryError::transport(e.to_string())
            })?;

        let body: Value = response.json().await.map_err(|e| {
            error!(error = %e, "GraphQL response was not valid JSON");
            QueryError::transport(e.to_string())
        })?;

        unwrap_response(body)
    }
}

/// Split a GraphQL response envelope into data or server-reported errors.
fn unwrap_response(body: Value) -> QueryResult<Value> {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            return Err(QueryError::GraphQl(errors.clone()));
        }
    }
    Ok(body.get("data").cloned().unwrap_or(Value::Null))
}
