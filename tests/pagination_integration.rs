//! Pagination lifecycle tests over a scripted transport.

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

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn variables(&self, call: usize) -> Value {
        self.calls.lock().unwrap()[call].1.clone()
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

fn page_of(total: u64, ids: std::ops::Range<u64>) -> Value {
    json!({
        "count": {"aggregate": {"count": total}},
        "data": ids.map(|id| json!({"id": id})).collect::<Vec<_>>(),
    })
}

#[tokio::test]
async fn walking_pages_updates_snapshot_and_subscribers() {
    let transport = ScriptedTransport::new([
        Ok(page_of(7, 0..3)),
        Ok(page_of(7, 3..6)),
        Ok(page_of(7, 6..7)),
    ]);
    let mut qb = QueryBuilder::new(transport.clone())
        .table("resumes")
        .select("id")
        .limit(3)
        .order_asc("id");
    let pages = qb.pages();

    qb.paginate().await;
    let first = qb.last_page_state().unwrap().clone();
    assert_eq!((first.page, first.pages, first.count), (1, 3, 3));
    assert!(first.is_first && !first.is_last);

    qb.next_page().await;
    qb.next_page().await;
    let last = qb.last_page_state().unwrap().clone();
    assert_eq!((last.page, last.count, last.total), (3, 1, 7));
    assert!(last.is_last);
    assert_eq!(last.rows, vec![json!({"id": 6})]);

    // Subscribers observe only the latest snapshot.
    assert_eq!(pages.borrow().as_ref().unwrap().page, 3);

    assert_eq!(transport.variables(1)["offset"], json!(3));
    assert_eq!(transport.variables(2)["offset"], json!(6));
}

#[tokio::test]
async fn failed_repagination_keeps_the_previous_snapshot() {
    let transport = ScriptedTransport::new([
        Ok(page_of(7, 0..3)),
        Err(QueryError::transport("connection reset")),
        Ok(page_of(7, 3..6)),
    ]);
    let mut qb = QueryBuilder::new(transport.clone())
        .table("resumes")
        .select("id")
        .limit(3);
    let failures = qb.page_failures();

    qb.paginate().await;
    let before = qb.last_page_state().unwrap().clone();

    qb.next_page().await;
    assert_eq!(qb.last_page_state(), Some(&before));
    let failure = failures.borrow().clone().unwrap();
    assert!(failure.to_string().contains("connection reset"));

    // A later retry from the same offset succeeds and replaces the snapshot.
    qb.paginate().await;
    assert_eq!(qb.last_page_state().unwrap().page, 2);
}

#[tokio::test]
async fn jumping_past_the_end_clamps_to_the_last_page() {
    let transport = ScriptedTransport::new([Ok(page_of(10, 0..3)), Ok(page_of(10, 9..10))]);
    let mut qb = QueryBuilder::new(transport.clone())
        .table("resumes")
        .select("id")
        .limit(3);

    qb.paginate().await;
    qb.get_page(50).await;

    assert_eq!(qb.current_offset(), 9);
    assert_eq!(qb.last_page_state().unwrap().page, 4);
}

#[tokio::test]
async fn navigation_before_first_pagination_stays_local() {
    let transport = ScriptedTransport::new([]);
    let mut qb = QueryBuilder::new(transport.clone())
        .table("resumes")
        .select("id")
        .limit(3);

    qb.next_page().await;
    qb.previous_page().await;

    assert_eq!(transport.call_count(), 0);
    assert_eq!(qb.current_offset(), 0);
    assert!(qb.last_page_state().is_none());
}

#[tokio::test]
async fn last_page_without_a_snapshot_fetches_the_first() {
    let transport = ScriptedTransport::new([Ok(page_of(7, 0..3))]);
    let mut qb = QueryBuilder::new(transport.clone())
        .table("resumes")
        .select("id")
        .limit(3);

    qb.last_page().await;

    assert_eq!(qb.current_offset(), 0);
    assert_eq!(qb.last_page_state().unwrap().page, 1);
    assert_eq!(transport.variables(0)["offset"], json!(0));
}
