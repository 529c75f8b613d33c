//! Fluent dialect builder.
//!
//! A [`Builder`] accumulates ordered SQL text fragments and positional
//! bindings through fluent calls, then executes them inside a transaction
//! via [`build`](Builder::build). Fragments are concatenated in call order
//! rather than assembled from a clause tree, so a legal statement depends on
//! the caller invoking methods in a legal order; the builder warns about the
//! obvious misuse (clauses before a verb starter) but does not reject it.
//!
//! # Example
//!
//! ```ignore
//! let mut builder = Builder::new(driver);
//! let result = builder
//!     .select(&["id", "username"])
//!     .from("users")
//!     .where_clause(&[cond!("status", "=", "active")])?
//!     .order_by(&[&["created_at", "DESC"]])?
//!     .limit(Some(10), Some(0))
//!     .build()
//!     .await?;
//! ```

use crate::condition::{Condition, comparison_operator};
use crate::config::Config;
use crate::dialect::Dialect;
use crate::driver::{Connection, Driver};
use crate::error::{MapperError, MapperResult};
use crate::result::ResultSet;
use crate::runner;
use crate::statement::{Operation, Statement};
use crate::value::Value;

/// Where the builder is in a statement lifecycle.
///
/// A verb starter moves the builder to `Composing`; `build()` returns it to
/// `Idle` whether execution succeeded or not.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Composing,
}

/// Dialect-specific statement builder with transactional execution.
///
/// One builder owns one statement state and (once opened) one connection.
/// It is not safe for concurrent use; give each logical caller its own
/// builder instead of sharing one.
#[derive(Debug)]
pub struct Builder<D: Driver> {
    driver: D,
    config: Config,
    connection: Option<D::Conn>,
    state: Statement,
    phase: Phase,
}

impl<D: Driver> Builder<D> {
    /// Create a builder reading configuration from the process environment.
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, Config::from_env())
    }

    /// Create a builder with an explicit configuration snapshot.
    pub fn with_config(driver: D, config: Config) -> Self {
        Self {
            driver,
            config,
            connection: None,
            state: Statement::new(),
            phase: Phase::Idle,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.driver.dialect()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Read-only view of the accumulated statement state.
    pub fn statement(&self) -> &Statement {
        &self.state
    }

    // ==================== Identity passthroughs ====================
    //
    // Carried for callers doing single-record work; never rendered into SQL.

    pub fn table(&self) -> Option<&str> {
        self.state.table()
    }

    pub fn set_table(&mut self, table: &str) -> &mut Self {
        self.state.set_table(table);
        self
    }

    pub fn index_column(&self) -> Option<&str> {
        self.state.index_column()
    }

    pub fn set_index_column(&mut self, column: &str) -> &mut Self {
        self.state.set_index_column(column);
        self
    }

    pub fn index_value(&self) -> Option<&str> {
        self.state.index_value()
    }

    pub fn set_index_value(&mut self, value: &str) -> &mut Self {
        self.state.set_index_value(value);
        self
    }

    /// Abandon the chain entirely, clearing every statement field.
    pub fn reset(&mut self) -> &mut Self {
        self.state.reset_all();
        self.phase = Phase::Idle;
        self
    }

    // ==================== Verb starters ====================

    fn start(&mut self, operation: Operation, first_fragment: String) {
        // Last write wins: a second verb starter silently discards the
        // statement accumulated so far.
        self.state.clear_statement();
        self.state.set_operation(operation);
        self.state.push_fragment(first_fragment);
        self.phase = Phase::Composing;
    }

    /// Start a SELECT. An empty field list selects `*`.
    pub fn select<S: AsRef<str>>(&mut self, fields: &[S]) -> &mut Self {
        self.start(Operation::Read, format!("SELECT {}", field_list(fields)));
        self
    }

    /// Start a SELECT COUNT over the given fields.
    pub fn count<S: AsRef<str>>(&mut self, fields: &[S]) -> &mut Self {
        self.select(&[format!("COUNT({})", field_list(fields))])
    }

    /// Start an INSERT into the given table.
    pub fn insert(&mut self, table: &str) -> &mut Self {
        self.start(Operation::Create, format!("INSERT INTO {table} "));
        self
    }

    /// Start an UPDATE of the given table.
    pub fn update(&mut self, table: &str) -> &mut Self {
        self.start(Operation::Update, format!("UPDATE {table} "));
        self
    }

    /// Start a DELETE; the table comes from a following `from` call.
    pub fn delete(&mut self) -> &mut Self {
        self.start(Operation::Delete, "DELETE ".to_string());
        self
    }

    // ==================== Clauses ====================

    /// Append a FROM clause and record the table name.
    pub fn from(&mut self, table: &str) -> &mut Self {
        self.warn_if_idle("from");
        self.state.set_table(table);
        self.state.push_fragment(format!(" FROM {table}"));
        self
    }

    /// Append an AS alias for the preceding expression.
    pub fn alias(&mut self, alias: &str) -> &mut Self {
        self.warn_if_idle("alias");
        self.state.push_fragment(format!(" AS {alias} "));
        self
    }

    fn join(&mut self, kind: &str, table: &str, on: &str) -> &mut Self {
        self.warn_if_idle("join");
        // `on` is trusted raw SQL from the caller; it is emitted unescaped.
        self.state
            .push_fragment(format!(" {kind} JOIN {table} ON {on} "));
        self
    }

    pub fn inner_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.join("INNER", table, on)
    }

    pub fn left_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.join("LEFT", table, on)
    }

    pub fn right_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.join("RIGHT", table, on)
    }

    pub fn full_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.join("FULL OUTER", table, on)
    }

    /// Append conditions joined to the statement with `WHERE`, or with
    /// `AND` when a WHERE clause already exists.
    ///
    /// Conditions passed in one call form a parenthesised group joined by
    /// `AND`. An empty call is a no-op. A condition that is not a
    /// `[field, operator, value]` triple fails with
    /// [`MapperError::MalformedCondition`] and leaves the statement
    /// untouched, so the caller can correct the input and retry.
    pub fn where_clause(&mut self, conditions: &[Condition]) -> MapperResult<&mut Self> {
        self.attach("AND", conditions)
    }

    /// Like [`where_clause`](Builder::where_clause), but an existing WHERE
    /// clause is continued with `OR`.
    pub fn or_where(&mut self, conditions: &[Condition]) -> MapperResult<&mut Self> {
        self.attach("OR", conditions)
    }

    fn attach(&mut self, logical: &str, conditions: &[Condition]) -> MapperResult<&mut Self> {
        if conditions.is_empty() || (conditions.len() == 1 && conditions[0].parts().is_empty()) {
            return Ok(self);
        }
        self.warn_if_idle("where");

        let grouped = conditions.len() > 1;
        let mut clause = String::new();
        let mut bound = Vec::with_capacity(conditions.len());
        if grouped {
            clause.push('(');
        }
        for (index, condition) in conditions.iter().enumerate() {
            let (field, operator, value) = match condition.parts() {
                [field, operator, value] => (field, operator, value),
                parts => return Err(MapperError::MalformedCondition(parts.len())),
            };
            if index > 0 {
                clause.push_str(" AND ");
            }
            clause.push_str(&format!(
                "{field} {} ?",
                comparison_operator(&operator.to_string())
            ));
            bound.push(value.clone());
        }
        if grouped {
            clause.push(')');
        }

        let lead = if self.state.has_fragment_containing("WHERE") {
            format!(" {logical} ")
        } else {
            " WHERE ".to_string()
        };
        self.state.push_fragment(format!("{lead}{clause}"));
        for value in bound {
            self.state.push_binding(value);
        }
        Ok(self)
    }

    /// Append sorts, each a `[field]` or `[field, direction]` slice.
    ///
    /// Multiple sorts are comma-joined; the `ORDER BY` keyword is emitted
    /// only when no ORDER BY fragment exists yet, so later calls continue
    /// the existing sort list. No default direction is injected. Any other
    /// sort length fails with [`MapperError::MalformedSort`].
    pub fn order_by(&mut self, sorts: &[&[&str]]) -> MapperResult<&mut Self> {
        self.warn_if_idle("order_by");
        let multiple = sorts.len() > 1;
        let last = sorts.len().saturating_sub(1);
        let mut clause = String::new();
        for (index, sort) in sorts.iter().enumerate() {
            let (field, direction) = match *sort {
                [field] => (*field, ""),
                [field, direction] => (*field, *direction),
                parts => return Err(MapperError::MalformedSort(parts.len())),
            };
            clause.push_str(&format!(" {field} {direction} "));
            if multiple && index != last {
                clause.push(',');
            }
        }
        let fragment = if self.state.has_fragment_containing("ORDER BY") {
            format!(" {clause} ")
        } else {
            format!(" ORDER BY {clause} ")
        };
        self.state.push_fragment(fragment);
        Ok(self)
    }

    /// Append `LIMIT n` and `OFFSET m`; each part is independently optional.
    pub fn limit(&mut self, limit: Option<i64>, offset: Option<i64>) -> &mut Self {
        self.warn_if_idle("limit");
        if let Some(limit) = limit {
            self.state.push_fragment(format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset {
            self.state.push_fragment(format!(" OFFSET {offset}"));
        }
        self
    }

    /// Append the insert column/value lists from ordered pairs.
    ///
    /// This **replaces** the bindings with the pair values, in pair order.
    pub fn values(&mut self, values: &[(&str, Value)]) -> &mut Self {
        self.warn_if_idle("values");
        let fields: Vec<&str> = values.iter().map(|(field, _)| *field).collect();
        let placeholders = vec!["?"; values.len()].join(", ");
        self.state
            .set_bindings(values.iter().map(|(_, value)| value.clone()).collect());
        self.state.push_fragment(format!(
            "({}) VALUES ({placeholders})",
            fields.join(", ")
        ));
        self
    }

    /// Append the update SET list from ordered pairs; values are appended
    /// to the bindings in pair order.
    pub fn set(&mut self, values: &[(&str, Value)]) -> &mut Self {
        self.warn_if_idle("set");
        let mut assignments = Vec::with_capacity(values.len());
        for (field, value) in values {
            self.state.push_binding(value.clone());
            assignments.push(format!("{field} = ?"));
        }
        self.state
            .push_fragment(format!(" SET {} ", assignments.join(", ")));
        self
    }

    // ==================== Connection lifecycle ====================

    /// Open the connection if it is not open yet.
    ///
    /// Order: driver-presence check, configuration-key resolution, connect,
    /// dialect session-setup statement. The first two fail with
    /// [`MapperError::DriverUnavailable`] and
    /// [`MapperError::ConfigurationMissing`] respectively, before any
    /// connection attempt.
    pub async fn initialize(&mut self) -> MapperResult<()> {
        if self.connection.is_some() {
            return Ok(());
        }
        let dialect = self.driver.dialect();
        if !self.driver.is_available() {
            return Err(MapperError::DriverUnavailable(dialect.driver_name()));
        }
        let params = dialect.connect_params(&self.config)?;
        let mut connection = self.driver.connect(&params).await?;
        if let Some(statement) = dialect.session_setup() {
            connection.execute(statement, &[]).await?;
        }
        tracing::debug!(dialect = dialect.label(), "connection opened");
        self.connection = Some(connection);
        Ok(())
    }

    /// Drop the connection. The next `build()` reopens it.
    pub fn terminate(&mut self) {
        self.connection = None;
    }

    /// Execute the accumulated statement inside a transaction.
    ///
    /// On success the result snapshot carries the rows, the affected count
    /// and (create only) the generated identifier. On failure the open
    /// transaction is rolled back, a diagnostic record is logged, and a
    /// [`MapperError::BuilderFailure`] with the original message is
    /// returned. Statement, bindings and operation are cleared on **both**
    /// outcomes; every chain starts from a fresh verb starter.
    pub async fn build(&mut self) -> MapperResult<ResultSet> {
        if self.phase == Phase::Idle || self.state.operation().is_none() {
            // Discard anything pre-verb clause calls may have appended.
            self.state.clear_statement();
            self.state.clear_operation();
            return Err(MapperError::builder(
                "no statement started; call a verb starter first",
            ));
        }
        let result = match self.initialize().await {
            Ok(()) => match self.connection.as_mut() {
                Some(connection) => runner::run(connection, &self.state).await,
                None => Err(MapperError::builder("connection is not initialized")),
            },
            // Preflight errors keep their own shape; anything else from the
            // bootstrap (refused connect, failed session setup) is a backend
            // failure and takes the same log-and-wrap path as execution.
            Err(
                error @ (MapperError::ConfigurationMissing { .. }
                | MapperError::DriverUnavailable(_)),
            ) => Err(error),
            Err(error) => Err(runner::report(&self.state, error.to_string())),
        };
        self.state.clear_statement();
        self.state.clear_operation();
        self.phase = Phase::Idle;
        result
    }

    fn warn_if_idle(&self, call: &str) {
        if self.phase == Phase::Idle {
            tracing::warn!(call, "clause before a verb starter; the fragments will not form a complete statement");
        }
    }
}

fn field_list<S: AsRef<str>>(fields: &[S]) -> String {
    if fields.is_empty() {
        "*".to_string()
    } else {
        fields
            .iter()
            .map(|field| field.as_ref())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
