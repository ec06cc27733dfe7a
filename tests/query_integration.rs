//! End-to-end query construction tests over a scripted transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use graphel::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

struct ScriptedTransport {
    responses: Mutex<VecDeque<QueryResult<Value>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    fn new(responses: impl IntoIterator<Item = QueryResult<Value>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, document: &str, variables: Value) -> QueryResult<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((document.to_string(), variables));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Value::Null))
    }
}

#[tokio::test]
async fn filtered_first_renders_one_parameterized_document() {
    let transport = ScriptedTransport::new([Ok(json!({
        "users": [{"id": 5, "name": "Ada", "email": "ada@example.com"}],
    }))]);

    let row = QueryBuilder::new(transport.clone())
        .table("users")
        .select("id, name, email")
        .filter(Where::eq("id", 5))
        .first()
        .await
        .unwrap();

    assert_eq!(row["name"], json!("Ada"));

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].0,
        "query ($where_0: users_bool_exp, $limit_0: Int, $offset_0: Int) {\n  \
         users(where: $where_0, limit: $limit_0, offset: $offset_0) { id, name, email }\n}"
    );
    assert_eq!(
        calls[0].1,
        json!({
            "where_0": {"id": {"_eq": 5}},
            "limit_0": 1,
            "offset_0": 0,
        })
    );
}

#[tokio::test]
async fn combined_query_keeps_builders_independent() {
    let transport = ScriptedTransport::new([Ok(json!({
        "people": [{"id": 1}],
        "resumes": [{"id": 9, "title": "CV"}],
    }))]);

    let people = QueryBuilder::new(transport.clone())
        .table_as("users", "people")
        .select("id")
        .filter(Where::eq("active", true));
    let resumes = QueryBuilder::new(transport.clone())
        .table("resumes")
        .select("id, title")
        .offset_limit(10, 5);

    let data = people.query_combined(&[&people, &resumes]).await.unwrap();
    assert_eq!(data["resumes"][0]["title"], json!("CV"));

    let calls = transport.calls();
    assert_eq!(
        calls[0].1,
        json!({
            "where_0": {"active": {"_eq": true}},
            "limit_0": 1000,
            "offset_0": 0,
            "where_1": null,
            "limit_1": 5,
            "offset_1": 10,
        })
    );
    assert!(calls[0].0.contains("people: users(where: $where_0"));
    assert!(calls[0].0.contains("resumes(where: $where_1"));
}

#[tokio::test]
async fn update_then_delete_flow_over_one_transport() {
    let transport = ScriptedTransport::new([
        Ok(json!({"users": {"affected_rows": 1, "returning": [{"id": 5}]}})),
        Ok(json!({"users": {"id": 5}})),
    ]);

    let update = QueryBuilder::new(transport.clone())
        .table("users")
        .select("id")
        .filter(Where::eq("id", 5))
        .set(json!({"name": "Grace"}));
    let updated = update.mutate().await.unwrap();
    assert_eq!(updated["users"]["affected_rows"], json!(1));

    let delete = QueryBuilder::new(transport.clone())
        .table("users")
        .select("id")
        .primary([("id", 5)])
        .delete_filter(Where::eq("id", 5));
    delete.mutate().await.unwrap();

    let calls = transport.calls();
    assert!(calls[0].0.starts_with("mutation ($set_0: users_set_input"));
    assert!(calls[1].0.contains("delete_users_by_pk(id: $primary_0_0)"));
}

#[tokio::test]
async fn server_errors_surface_verbatim() {
    let errors = vec![json!({"message": "permission denied", "path": ["users"]})];
    let transport = ScriptedTransport::new([Err(QueryError::GraphQl(errors.clone()))]);

    let err = QueryBuilder::new(transport)
        .table("users")
        .select("id")
        .get()
        .await
        .unwrap_err();

    assert_eq!(err.graphql_errors(), Some(errors.as_slice()));
}

#[tokio::test]
async fn configuration_errors_never_reach_the_transport() {
    let transport = ScriptedTransport::new([]);

    let no_selection = QueryBuilder::new(transport.clone()).table("users");
    assert!(no_selection.get().await.unwrap_err().is_configuration());

    let no_payload = QueryBuilder::new(transport.clone())
        .table("users")
        .select("id")
        .filter(Where::eq("id", 1))
        .set(json!({"name": "Ada"}))
        .insert(Vec::<Value>::new());
    assert!(matches!(
        no_payload.mutate().await.unwrap_err(),
        QueryError::MissingInsertRows { .. }
    ));

    assert!(transport.calls().is_empty());
}
