//! Endpoint configuration for the HTTP client.

use indexmap::IndexMap;
use url::Url;

use graphel_query::{QueryError, QueryResult};

/// The header Hasura reads its admin secret from.
pub const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";

/// The placeholder secret sent until a real one is configured, matching the
/// Hasura development default.
pub const DEFAULT_ADMIN_SECRET: &str = "myadminsecretkey";

/// A validated GraphQL endpoint plus the headers sent with every request.
///
/// The admin-secret header is always present, seeded with
/// [`DEFAULT_ADMIN_SECRET`] until overridden. Headers keep insertion order,
/// so request construction is deterministic.
#[derive(Debug, Clone)]
pub struct Connection {
    endpoint: Url,
    headers: IndexMap<String, String>,
}

impl Connection {
    /// Parse and validate an endpoint URL.
    pub fn new(endpoint: impl AsRef<str>) -> QueryResult<Self> {
        let endpoint = Url::parse(endpoint.as_ref())
            .map_err(|_| QueryError::InvalidEndpoint(endpoint.as_ref().to_string()))?;
        let mut headers = IndexMap::new();
        headers.insert(
            ADMIN_SECRET_HEADER.to_string(),
            DEFAULT_ADMIN_SECRET.to_string(),
        );
        Ok(Self { endpoint, headers })
    }

    /// Authenticate with a Hasura admin secret.
    ///
    /// Shorthand for [`header`](Self::header) with [`ADMIN_SECRET_HEADER`].
    pub fn admin_secret(self, secret: impl Into<String>) -> Self {
        self.header(ADMIN_SECRET_HEADER, secret)
    }

    /// Add a header to every request. Re-adding a name replaces its value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// The endpoint requests are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The configured headers, in insertion order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_endpoint_parses_with_default_secret() {
        let conn = Connection::new("https://api.example.com/v1/graphql").unwrap();
        assert_eq!(conn.endpoint().as_str(), "https://api.example.com/v1/graphql");
        let headers: Vec<_> = conn.headers().collect();
        assert_eq!(headers, vec![(ADMIN_SECRET_HEADER, DEFAULT_ADMIN_SECRET)]);
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let err = Connection::new("not a url").unwrap_err();
        assert!(matches!(err, QueryError::InvalidEndpoint(ref raw) if raw == "not a url"));
    }

    #[test]
    fn test_admin_secret_replaces_the_default() {
        let conn = Connection::new("https://api.example.com/v1/graphql")
            .unwrap()
            .admin_secret("hunter2");
        let headers: Vec<_> = conn.headers().collect();
        assert_eq!(headers, vec![(ADMIN_SECRET_HEADER, "hunter2")]);
    }

    #[test]
    fn test_headers_keep_insertion_order_and_replace() {
        let conn = Connection::new("https://api.example.com/v1/graphql")
            .unwrap()
            .header("authorization", "Bearer a")
            .header("x-request-id", "1")
            .header("authorization", "Bearer b");
        let headers: Vec<_> = conn.headers().collect();
        assert_eq!(
            headers,
            vec![
                (ADMIN_SECRET_HEADER, DEFAULT_ADMIN_SECRET),
                ("authorization", "Bearer b"),
                ("x-request-id", "1"),
            ]
        );
    }
}
