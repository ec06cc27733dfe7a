//! The fluent query builder.
//!
//! A [`QueryBuilder`] accumulates query intent -- table(s), selection,
//! filter, ordering, limit/offset, mutation payloads -- through chained
//! configuration calls that perform no I/O, then renders that intent into a
//! GraphQL document plus a variables mapping and executes it through a
//! [`Transport`]. Convenience operations (`count`, `exists`, `first`,
//! pagination) are built on the same execution path.
//!
//! A builder is created fresh per logical query. Selecting a new query type
//! (`set`, `insert`, `upsert`, `delete_filter`) resets the other
//! mutation-specific fields, so a reused builder cannot carry a stale payload
//! into an unrelated operation.
//!
//! ```rust,ignore
//! let row = QueryBuilder::new(client)
//!     .table("users")
//!     .select("id, name")
//!     .filter(Where::eq("id", 5))
//!     .first()
//!     .await?;
//! ```

use std::sync::Arc;

use serde_json::{Map, Value, json};
use smallvec::{SmallVec, smallvec};
use tokio::sync::watch;
use tracing::warn;

use crate::document::{ArgValue, Document, Field, OperationKind, VariableDef};
use crate::error::{QueryError, QueryResult};
use crate::filter::Where;
use crate::pagination::{Page, PageFeed};
use crate::transport::Transport;
use crate::types::{OrderBy, SortDirection};

/// Default row limit for fetches.
pub const DEFAULT_LIMIT: u64 = 1000;

/// The operation a builder's accumulated state represents.
///
/// Set the first time a mutation-affecting method is called; gates which
/// render path fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// A plain fetch.
    Select,
    /// An insert mutation.
    Insert,
    /// An update mutation.
    Update,
    /// A delete mutation.
    Delete,
    /// An insert with a conflict-triggered update path.
    Upsert,
}

impl QueryKind {
    /// The lowercase mutation prefix for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Upsert => "upsert",
        }
    }
}

/// Conflict configuration for an upsert.
///
/// A discriminated parameter object: the constraint is either named
/// explicitly or inferred as `<table>_pk`.
#[derive(Debug, Clone, Default)]
pub struct UpsertConfig {
    /// The uniqueness constraint that triggers the update path, or `None` to
    /// infer `<table>_pk`.
    pub constraint: Option<String>,
    /// The columns updated when the constraint fires.
    pub update_columns: Vec<String>,
    /// An optional filter scoping which conflicting rows are updated.
    pub filter: Option<Where>,
}

impl UpsertConfig {
    /// Upsert updating the given columns, with the constraint inferred from
    /// the table's primary key.
    pub fn new<C: Into<String>>(update_columns: impl IntoIterator<Item = C>) -> Self {
        Self {
            constraint: None,
            update_columns: update_columns.into_iter().map(Into::into).collect(),
            filter: None,
        }
    }

    /// Name the constraint that triggers the update path.
    pub fn constraint(mut self, name: impl Into<String>) -> Self {
        self.constraint = Some(name.into());
        self
    }

    /// Scope the update path with a filter.
    pub fn filter(mut self, filter: Where) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// A fluent accumulator of query intent, executed over a [`Transport`].
pub struct QueryBuilder<T> {
    transport: T,
    tables: SmallVec<[String; 2]>,
    alias: Option<String>,
    selection: String,
    filter: Option<Where>,
    distinct_on: Option<String>,
    order: Option<OrderBy>,
    limit: u64,
    offset: u64,
    primary: Option<Vec<(String, Value)>>,
    set_payload: Option<Value>,
    insert_rows: Vec<Value>,
    upsert: Option<UpsertConfig>,
    kind: QueryKind,
    debug: bool,
    feed: PageFeed,
    snapshot: Option<Page>,
}

impl<T: Transport> QueryBuilder<T> {
    /// Create a builder executing over the given transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            tables: SmallVec::new(),
            alias: None,
            selection: String::new(),
            filter: None,
            distinct_on: None,
            order: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
            primary: None,
            set_payload: None,
            insert_rows: Vec::new(),
            upsert: None,
            kind: QueryKind::Select,
            debug: false,
            feed: PageFeed::new(),
            snapshot: None,
        }
    }

    // ----- configuration -------------------------------------------------

    /// Set the base table.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.tables = smallvec![name.into()];
        self
    }

    /// Set the base table with a response alias.
    pub fn table_as(mut self, name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.tables = smallvec![name.into()];
        self.alias = Some(alias.into());
        self
    }

    /// Add further tables to an extended fetch.
    ///
    /// Each added table becomes its own sibling field sharing the builder's
    /// filter, limit, and offset; `get` unwraps the first table's alias.
    pub fn add_tables<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.tables.extend(names.into_iter().map(Into::into));
        self
    }

    /// Look rows up by primary key instead of a filter.
    ///
    /// Mutually exclusive with filter-based lookup: when set, fetches render
    /// a `_by_pk` field with one scalar variable per key and no
    /// where/limit/offset.
    pub fn primary<K, V>(mut self, keys: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.primary = Some(
            keys.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Set the column selection string.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.selection = columns.into();
        self
    }

    /// Set the filter predicate.
    pub fn filter(mut self, predicate: Where) -> Self {
        self.filter = Some(predicate);
        self
    }

    /// Configure a delete mutation scoped by the given filter.
    pub fn delete_filter(mut self, predicate: Where) -> Self {
        self.switch_kind(QueryKind::Delete);
        self.filter = Some(predicate);
        self
    }

    /// Set a column as distinct.
    pub fn distinct_on(mut self, column: impl Into<String>) -> Self {
        self.distinct_on = Some(column.into());
        self
    }

    /// Set the offset.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the offset and the limit together.
    pub fn offset_limit(mut self, offset: u64, limit: u64) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    /// Set the row limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Order results by a column.
    pub fn order(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order = Some(OrderBy::new(column, direction));
        self
    }

    /// Shorthand for ascending order.
    pub fn order_asc(self, column: impl Into<String>) -> Self {
        self.order(column, SortDirection::Asc)
    }

    /// Shorthand for descending order.
    pub fn order_desc(self, column: impl Into<String>) -> Self {
        self.order(column, SortDirection::Desc)
    }

    /// Set the payload for an update mutation.
    pub fn set(mut self, payload: impl Into<Value>) -> Self {
        self.switch_kind(QueryKind::Update);
        self.set_payload = Some(payload.into());
        self
    }

    /// Set the rows for an insert mutation.
    pub fn insert<R: Into<Value>>(mut self, rows: impl IntoIterator<Item = R>) -> Self {
        self.switch_kind(QueryKind::Insert);
        self.insert_rows = rows.into_iter().map(Into::into).collect();
        self
    }

    /// Set the rows and conflict configuration for an upsert mutation.
    pub fn upsert<R: Into<Value>>(
        mut self,
        rows: impl IntoIterator<Item = R>,
        config: UpsertConfig,
    ) -> Self {
        self.switch_kind(QueryKind::Upsert);
        self.insert_rows = rows.into_iter().map(Into::into).collect();
        self.upsert = Some(config);
        self
    }

    /// Turn on debug logging for this builder.
    ///
    /// Only effective in non-production builds; release builds compile the
    /// exchange dumps out entirely.
    pub fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Mutation-specific fields never survive a change of query type.
    fn switch_kind(&mut self, kind: QueryKind) {
        if self.kind != kind {
            self.set_payload = None;
            self.insert_rows.clear();
            self.upsert = None;
            self.kind = kind;
        }
    }

    // ----- accessors -----------------------------------------------------

    /// The base table name, or `""` if none was set.
    pub fn table_name(&self) -> &str {
        self.tables.first().map(String::as_str).unwrap_or("")
    }

    /// The response alias: the explicit alias, or the base table name.
    pub fn alias_name(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.table_name())
    }

    /// The operation the accumulated state represents.
    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// The current offset.
    pub fn current_offset(&self) -> u64 {
        self.offset
    }

    /// The current limit.
    pub fn current_limit(&self) -> u64 {
        self.limit
    }

    /// The last pagination snapshot, if `paginate` has succeeded.
    pub fn last_page_state(&self) -> Option<&Page> {
        self.snapshot.as_ref()
    }

    /// Subscribe to pagination snapshots.
    pub fn pages(&self) -> watch::Receiver<Option<Page>> {
        self.feed.pages()
    }

    /// Subscribe to pagination failures.
    ///
    /// `paginate` never re-raises a fetch failure; it logs, keeps the prior
    /// snapshot, and publishes the error here.
    pub fn page_failures(&self) -> watch::Receiver<Option<Arc<QueryError>>> {
        self.feed.failures()
    }

    // ----- validation ----------------------------------------------------

    fn require_selection(&self) -> QueryResult<()> {
        if self.selection.trim().is_empty() {
            return Err(QueryError::empty_selection(self.table_name()));
        }
        Ok(())
    }

    fn validate_mutation(&self) -> QueryResult<()> {
        let table = self.table_name();
        match self.kind {
            QueryKind::Select => return Err(QueryError::not_a_mutation(table)),
            QueryKind::Update if self.set_payload.is_none() => {
                return Err(QueryError::missing_set_payload(table));
            }
            QueryKind::Insert | QueryKind::Upsert if self.insert_rows.is_empty() => {
                return Err(QueryError::missing_insert_rows(table));
            }
            _ => {}
        }
        if matches!(self.kind, QueryKind::Update | QueryKind::Delete)
            && self.primary.is_none()
            && self.filter.is_none()
        {
            return Err(QueryError::missing_mutation_filter(
                table,
                self.kind.as_str(),
            ));
        }
        if let Some(filter) = &self.filter {
            if filter.is_empty() {
                return Err(QueryError::empty_filter(table));
            }
        }
        if let Some(config) = &self.upsert {
            if let Some(filter) = &config.filter {
                if filter.is_empty() {
                    return Err(QueryError::empty_filter(table));
                }
            }
        }
        Ok(())
    }

    // ----- document assembly ---------------------------------------------

    fn filter_value(&self) -> Value {
        self.filter.as_ref().map(Where::to_value).unwrap_or(Value::Null)
    }

    fn declare_primary(
        &self,
        idx: usize,
        primary: &[(String, Value)],
        doc: &mut Document,
        vars: &mut Map<String, Value>,
    ) {
        for (pi, (_, value)) in primary.iter().enumerate() {
            let name = format!("primary_{idx}_{pi}");
            doc.declare(VariableDef::new(&name, primary_gql_type(value)));
            vars.insert(name, value.clone());
        }
    }

    fn fetch_contrib(
        &self,
        idx: usize,
        limit_override: Option<u64>,
        doc: &mut Document,
        vars: &mut Map<String, Value>,
    ) {
        let table = self.table_name().to_string();
        if let Some(primary) = &self.primary {
            self.declare_primary(idx, primary, doc, vars);
            let mut field = Field::new(format!("{table}_by_pk")).alias(self.alias_name());
            for (pi, (key, _)) in primary.iter().enumerate() {
                field = field.arg(key.clone(), ArgValue::variable(format!("primary_{idx}_{pi}")));
            }
            doc.push(field.columns(self.selection.clone()));
        } else {
            let where_name = format!("where_{idx}");
            let limit_name = format!("limit_{idx}");
            let offset_name = format!("offset_{idx}");
            doc.declare(VariableDef::new(&where_name, format!("{table}_bool_exp")));
            doc.declare(VariableDef::new(&limit_name, "Int"));
            doc.declare(VariableDef::new(&offset_name, "Int"));
            vars.insert(where_name.clone(), self.filter_value());
            vars.insert(
                limit_name.clone(),
                limit_override.unwrap_or(self.limit).into(),
            );
            vars.insert(offset_name.clone(), self.offset.into());
            for (ti, sub_table) in self.tables.iter().enumerate() {
                let alias = if ti == 0 {
                    self.alias_name().to_string()
                } else {
                    sub_table.clone()
                };
                let mut field = Field::new(sub_table.clone())
                    .alias(alias)
                    .arg("where", ArgValue::variable(&where_name))
                    .arg("limit", ArgValue::variable(&limit_name))
                    .arg("offset", ArgValue::variable(&offset_name));
                if let Some(distinct) = &self.distinct_on {
                    field = field.arg("distinct_on", ArgValue::raw(distinct.clone()));
                }
                doc.push(field.columns(self.selection.clone()));
            }
        }
    }

    fn build_fetch(
        builders: &[&Self],
        limit_override: Option<u64>,
    ) -> QueryResult<(Document, Value)> {
        for builder in builders {
            builder.require_selection()?;
        }
        let mut doc = Document::new(OperationKind::Query);
        let mut vars = Map::new();
        for (idx, builder) in builders.iter().enumerate() {
            builder.fetch_contrib(idx, limit_override, &mut doc, &mut vars);
        }
        Ok((doc, Value::Object(vars)))
    }

    fn mutation_contrib(&self, idx: usize, doc: &mut Document, vars: &mut Map<String, Value>) {
        let table = self.table_name().to_string();
        let alias = self.alias_name().to_string();
        match self.kind {
            QueryKind::Insert | QueryKind::Upsert => {
                let insert_name = format!("insert_{idx}");
                let singular = self.insert_rows.len() == 1;
                if singular {
                    doc.declare(VariableDef::new(
                        &insert_name,
                        format!("{table}_insert_input!"),
                    ));
                    vars.insert(insert_name.clone(), self.insert_rows[0].clone());
                } else {
                    doc.declare(VariableDef::new(
                        &insert_name,
                        format!("[{table}_insert_input!]!"),
                    ));
                    vars.insert(insert_name.clone(), Value::Array(self.insert_rows.clone()));
                }
                let field_name = if singular {
                    format!("insert_{table}_one")
                } else {
                    format!("insert_{table}")
                };
                let object_arg = if singular { "object" } else { "objects" };
                let mut field = Field::new(field_name)
                    .alias(&alias)
                    .arg(object_arg, ArgValue::variable(&insert_name));
                if self.kind == QueryKind::Upsert {
                    if let Some(config) = &self.upsert {
                        let constraint_name = format!("constraint_{idx}");
                        let cols_name = format!("conflict_cols_{idx}");
                        doc.declare(VariableDef::new(
                            &constraint_name,
                            format!("{table}_constraint!"),
                        ));
                        doc.declare(VariableDef::new(
                            &cols_name,
                            format!("[{table}_update_column!]!"),
                        ));
                        let constraint = config
                            .constraint
                            .clone()
                            .unwrap_or_else(|| format!("{table}_pk"));
                        vars.insert(constraint_name.clone(), Value::String(constraint));
                        vars.insert(
                            cols_name.clone(),
                            Value::Array(
                                config
                                    .update_columns
                                    .iter()
                                    .map(|c| Value::String(c.clone()))
                                    .collect(),
                            ),
                        );
                        let mut entries = vec![
                            (
                                "constraint".to_string(),
                                ArgValue::variable(&constraint_name),
                            ),
                            ("update_columns".to_string(), ArgValue::variable(&cols_name)),
                        ];
                        if let Some(filter) = &config.filter {
                            let where_name = format!("where_{idx}");
                            doc.declare(VariableDef::new(
                                &where_name,
                                format!("{table}_bool_exp!"),
                            ));
                            vars.insert(where_name.clone(), filter.to_value());
                            entries.push(("where".to_string(), ArgValue::variable(&where_name)));
                        }
                        field = field.arg("on_conflict", ArgValue::Object(entries));
                    }
                }
                doc.push(field.columns(self.selection.clone()));
            }
            QueryKind::Update => {
                let set_name = format!("set_{idx}");
                doc.declare(VariableDef::new(&set_name, format!("{table}_set_input")));
                vars.insert(
                    set_name.clone(),
                    self.set_payload.clone().unwrap_or(Value::Null),
                );
                if let Some(primary) = &self.primary {
                    self.declare_primary(idx, primary, doc, vars);
                    let pk_entries = primary
                        .iter()
                        .enumerate()
                        .map(|(pi, (key, _))| {
                            (
                                key.clone(),
                                ArgValue::variable(format!("primary_{idx}_{pi}")),
                            )
                        })
                        .collect();
                    doc.push(
                        Field::new(format!("update_{table}_by_pk"))
                            .alias(&alias)
                            .arg("pk_columns", ArgValue::Object(pk_entries))
                            .arg("_set", ArgValue::variable(&set_name))
                            .columns(self.selection.clone()),
                    );
                } else {
                    let where_name = format!("where_{idx}");
                    doc.declare(VariableDef::new(&where_name, format!("{table}_bool_exp!")));
                    vars.insert(where_name.clone(), self.filter_value());
                    doc.push(
                        Field::new(format!("update_{table}"))
                            .alias(&alias)
                            .arg("where", ArgValue::variable(&where_name))
                            .arg("_set", ArgValue::variable(&set_name))
                            .fields(vec![
                                Field::new("affected_rows"),
                                Field::new("returning").columns(self.selection.clone()),
                            ]),
                    );
                }
            }
            QueryKind::Delete => {
                if let Some(primary) = &self.primary {
                    self.declare_primary(idx, primary, doc, vars);
                    let mut field = Field::new(format!("delete_{table}_by_pk")).alias(&alias);
                    for (pi, (key, _)) in primary.iter().enumerate() {
                        field = field
                            .arg(key.clone(), ArgValue::variable(format!("primary_{idx}_{pi}")));
                    }
                    doc.push(field.columns(self.selection.clone()));
                } else {
                    let where_name = format!("where_{idx}");
                    doc.declare(VariableDef::new(&where_name, format!("{table}_bool_exp!")));
                    vars.insert(where_name.clone(), self.filter_value());
                    doc.push(
                        Field::new(format!("delete_{table}"))
                            .alias(&alias)
                            .arg("where", ArgValue::variable(&where_name))
                            .fields(vec![
                                Field::new("affected_rows"),
                                Field::new("returning").columns(self.selection.clone()),
                            ]),
                    );
                }
            }
            // Rejected by validate_mutation before rendering.
            QueryKind::Select => {}
        }
    }

    fn build_mutation(builders: &[&Self]) -> QueryResult<(Document, Value)> {
        for builder in builders {
            builder.require_selection()?;
            builder.validate_mutation()?;
        }
        let mut doc = Document::new(OperationKind::Mutation);
        let mut vars = Map::new();
        for (idx, builder) in builders.iter().enumerate() {
            builder.mutation_contrib(idx, &mut doc, &mut vars);
        }
        Ok((doc, Value::Object(vars)))
    }

    // ----- execution -----------------------------------------------------

    async fn run(&self, document: String, variables: Value) -> QueryResult<Value> {
        #[cfg(debug_assertions)]
        let log_vars = if self.debug {
            Some(variables.clone())
        } else {
            None
        };
        let result = self.transport.execute(&document, variables).await;
        #[cfg(debug_assertions)]
        if let Some(log_vars) = log_vars {
            match &result {
                Ok(value) => crate::logging::log_exchange(&document, &log_vars, Ok(value)),
                Err(error) => crate::logging::log_exchange(&document, &log_vars, Err(error)),
            }
        }
        result
    }

    /// Count the rows matching the current filter (and distinct column).
    pub async fn count(&self) -> QueryResult<u64> {
        let table = self.table_name().to_string();
        let mut doc = Document::new(OperationKind::Query);
        doc.declare(VariableDef::new("where", format!("{table}_bool_exp")));
        let mut field = Field::new(format!("{table}_aggregate"))
            .alias("count")
            .arg("where", ArgValue::variable("where"));
        if let Some(distinct) = &self.distinct_on {
            field = field.arg("distinct_on", ArgValue::raw(distinct.clone()));
        }
        doc.push(field.fields(vec![
            Field::new("aggregate").fields(vec![Field::new("count")]),
        ]));
        let vars = json!({ "where": self.filter_value() });
        let data = self.run(doc.render(), vars).await?;
        Ok(data
            .pointer("/count/aggregate/count")
            .and_then(Value::as_u64)
            .unwrap_or(0))
    }

    /// Whether at least one row matches the current filter.
    pub async fn exists(&self) -> QueryResult<bool> {
        Ok(self.count().await? > 0)
    }

    /// Run the built fetch and unwrap the result by alias.
    ///
    /// With a primary key set, renders a `_by_pk` lookup instead of a
    /// filtered fetch.
    pub async fn get(&self) -> QueryResult<Value> {
        let (doc, vars) = Self::build_fetch(std::slice::from_ref(&self), None)?;
        let data = self.run(doc.render(), vars).await?;
        Ok(data.get(self.alias_name()).cloned().unwrap_or(Value::Null))
    }

    /// Fetch the first matching row, or an empty object when none match.
    ///
    /// The limit is forced to 1 for this fetch only; the stored limit is
    /// untouched.
    pub async fn first(&self) -> QueryResult<Value> {
        let (doc, vars) = Self::build_fetch(std::slice::from_ref(&self), Some(1))?;
        let data = self.run(doc.render(), vars).await?;
        let unwrapped = data.get(self.alias_name()).cloned().unwrap_or(Value::Null);
        Ok(match unwrapped {
            Value::Array(rows) => rows
                .into_iter()
                .next()
                .unwrap_or_else(|| Value::Object(Map::new())),
            Value::Null => Value::Object(Map::new()),
            other => other,
        })
    }

    /// Merge several builders' fetch specs into one document and execute it.
    ///
    /// Each builder gets its own `$where_i`/`$limit_i`/`$offset_i` (or
    /// primary-key) variable set. Fails before any network call if a builder
    /// has an empty selection.
    pub async fn query_combined(&self, builders: &[&Self]) -> QueryResult<Value> {
        let (doc, vars) = Self::build_fetch(builders, None)?;
        self.run(doc.render(), vars).await
    }

    /// Merge several builders' mutation specs into one document and execute it.
    ///
    /// Every builder is validated before rendering; configuration errors are
    /// raised without touching the network.
    pub async fn mutate_combined(&self, builders: &[&Self]) -> QueryResult<Value> {
        let (doc, vars) = Self::build_mutation(builders)?;
        self.run(doc.render(), vars).await
    }

    /// Run this builder's mutation.
    pub async fn mutate(&self) -> QueryResult<Value> {
        self.mutate_combined(std::slice::from_ref(&self)).await
    }

    /// Run an aggregation alongside the row-level selection.
    pub async fn aggregate(
        &self,
        expression: &str,
        alias: Option<&str>,
    ) -> QueryResult<Value> {
        self.require_selection()?;
        let table = self.table_name().to_string();
        let mut doc = Document::new(OperationKind::Query);
        doc.push(
            Field::new(format!("{table}_aggregate"))
                .alias(alias.unwrap_or(&table))
                .fields(vec![
                    Field::new("aggregate").columns(expression),
                    Field::new("nodes").columns(self.selection.clone()),
                ]),
        );
        self.run(doc.render(), Value::Null).await
    }

    // ----- pagination ----------------------------------------------------

    /// Run a combined count+data query and recompute the pagination snapshot.
    ///
    /// On success the new snapshot is stored and published to subscribers.
    /// On failure the prior snapshot is left untouched; the error is logged
    /// and published on [`page_failures`](Self::page_failures) only.
    pub async fn paginate(&mut self) {
        match self.try_paginate().await {
            Ok(page) => {
                self.snapshot = Some(page.clone());
                self.feed.publish(page);
            }
            Err(error) => {
                warn!(
                    table = self.table_name(),
                    error = %error,
                    "paginate failed, keeping previous page state"
                );
                self.feed.publish_failure(Arc::new(error));
            }
        }
    }

    async fn try_paginate(&self) -> QueryResult<Page> {
        self.require_selection()?;
        let table = self.table_name().to_string();
        let mut doc = Document::new(OperationKind::Query);
        doc.declare(VariableDef::new("limit", "Int!"));
        doc.declare(VariableDef::new("offset", "Int!"));
        doc.declare(VariableDef::new("order", format!("[{table}_order_by!]")));
        doc.declare(VariableDef::new("where", format!("{table}_bool_exp")));
        doc.push(
            Field::new(format!("{table}_aggregate"))
                .alias("count")
                .arg("where", ArgValue::variable("where"))
                .fields(vec![
                    Field::new("aggregate").fields(vec![Field::new("count")]),
                ]),
        );
        doc.push(
            Field::new(table)
                .alias("data")
                .arg("where", ArgValue::variable("where"))
                .arg("limit", ArgValue::variable("limit"))
                .arg("offset", ArgValue::variable("offset"))
                .arg("order_by", ArgValue::variable("order"))
                .columns(self.selection.clone()),
        );
        let vars = json!({
            "limit": self.limit,
            "offset": self.offset,
            "where": self.filter_value(),
            "order": self.order.as_ref().map(OrderBy::to_value).unwrap_or(Value::Null),
        });
        let data = self.run(doc.render(), vars).await?;
        let total = data
            .pointer("/count/aggregate/count")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let rows = data
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(Page::compute(rows, total, self.offset, self.limit))
    }

    /// Jump to a page and repaginate.
    ///
    /// `0 < n < pages` sets the offset to `(n-1) * limit`; `n >= pages`
    /// clamps to the last page; `n <= 0` resets to the first. Before the
    /// first pagination the page count is unknown and the jump is taken
    /// literally.
    pub async fn get_page(&mut self, page: i64) {
        let pages = self.snapshot.as_ref().map(|p| p.pages);
        if page <= 0 {
            self.first_page().await;
        } else if let Some(pages) = pages {
            if (page as u64) < pages {
                self.offset = (page as u64 - 1) * self.limit;
                self.paginate().await;
            } else {
                self.last_page().await;
            }
        } else {
            self.offset = (page as u64 - 1) * self.limit;
            self.paginate().await;
        }
    }

    /// Advance one page and repaginate.
    ///
    /// No-op (no network call) unless pagination has already run.
    pub async fn next_page(&mut self) {
        if self.snapshot.is_some() {
            self.offset += self.limit;
            self.paginate().await;
        }
    }

    /// Step back one page (clamped at the first) and repaginate.
    ///
    /// No-op (no network call) unless pagination has already run.
    pub async fn previous_page(&mut self) {
        if self.snapshot.is_some() {
            self.offset = self.offset.saturating_sub(self.limit);
            self.paginate().await;
        }
    }

    /// Jump to the first page and repaginate.
    pub async fn first_page(&mut self) {
        self.offset = 0;
        self.paginate().await;
    }

    /// Jump to the last page and repaginate.
    ///
    /// Behaves as [`first_page`](Self::first_page) before any pagination,
    /// when the page count is unknown.
    pub async fn last_page(&mut self) {
        match &self.snapshot {
            Some(page) => {
                self.offset = page.pages.saturating_sub(1) * self.limit;
                self.paginate().await;
            }
            None => self.first_page().await,
        }
    }
}

/// Infer the GraphQL scalar type of a primary-key value.
fn primary_gql_type(value: &Value) -> &'static str {
    match value {
        Value::Number(_) => "Int!",
        _ => "String!",
    }
}
