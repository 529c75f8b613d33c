//! The backend seam.
//!
//! The crate builds statements and runs the transactional protocol; actually
//! talking to a database is an external concern. A backend integrates by
//! implementing [`Driver`] and [`Connection`] over its own client library.
//! Statements arrive as one SQL string with `?`-style positional
//! placeholders plus the matching bindings, and come back as rows,
//! an affected-row count and (where the backend reports one) a generated
//! identifier.

use crate::dialect::Dialect;
use crate::error::MapperResult;
use crate::row::Row;
use crate::value::Value;
use std::future::Future;

/// Resolved connection parameters for one dialect.
///
/// SQLite leaves `user` and `password` empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectParams {
    pub dsn: String,
    pub user: String,
    pub password: String,
}

/// What one executed statement produced.
#[derive(Clone, Debug, Default)]
pub struct QueryOutcome {
    /// Returned rows, as field → value maps.
    pub rows: Vec<Row>,
    /// Affected-row count as the backend reports it.
    pub affected: u64,
    /// Backend-generated identifier, when the backend exposes one.
    pub last_insert_id: Option<i64>,
}

/// One open backend connection.
///
/// A connection is exclusively owned by its builder and released when the
/// builder drops it; it is not safe to share without external
/// synchronisation. Every operation blocks its caller until the backend
/// responds.
pub trait Connection: Send {
    /// Open a transaction.
    fn begin(&mut self) -> impl Future<Output = MapperResult<()>> + Send;

    /// Prepare and run one statement with positional bindings.
    ///
    /// Binding *i* feeds the *i*-th `?` placeholder, left to right. A
    /// count mismatch is the backend's error to raise, not checked here.
    fn execute(
        &mut self,
        sql: &str,
        bindings: &[Value],
    ) -> impl Future<Output = MapperResult<QueryOutcome>> + Send;

    /// Commit the open transaction.
    fn commit(&mut self) -> impl Future<Output = MapperResult<()>> + Send;

    /// Roll back the open transaction.
    fn rollback(&mut self) -> impl Future<Output = MapperResult<()>> + Send;

    /// Whether a transaction begun on this connection is still open.
    fn in_transaction(&self) -> bool;
}

/// A loadable backend driver for one dialect.
pub trait Driver: Send {
    type Conn: Connection;

    fn dialect(&self) -> Dialect;

    /// Driver-presence precondition, checked before configuration is read.
    fn is_available(&self) -> bool {
        true
    }

    /// Open a connection with the resolved parameters.
    fn connect(
        &self,
        params: &ConnectParams,
    ) -> impl Future<Output = MapperResult<Self::Conn>> + Send;
}
