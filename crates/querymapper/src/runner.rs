//! Transactional execution of an accumulated statement.
//!
//! The protocol: begin, execute the joined fragments with the bindings,
//! capture rows / affected count / generated id, commit if the transaction
//! is still open. On any failure the open transaction is rolled back, a
//! diagnostic record goes to the log, and the caller sees a single
//! [`MapperError::BuilderFailure`] carrying only the original message.

use crate::driver::{Connection, QueryOutcome};
use crate::error::{MapperError, MapperResult};
use crate::result::ResultSet;
use crate::statement::{Operation, Statement};

pub(crate) async fn run<C: Connection>(
    connection: &mut C,
    statement: &Statement,
) -> MapperResult<ResultSet> {
    match drive(connection, statement).await {
        Ok(result) => Ok(result),
        Err(error) => {
            let message = error.to_string();
            if connection.in_transaction() {
                if let Err(rollback_error) = connection.rollback().await {
                    tracing::warn!(error = %rollback_error, "rollback failed");
                }
            }
            Err(report(statement, message))
        }
    }
}

/// Emit the diagnostic record for a failed build and wrap the message as a
/// [`MapperError::BuilderFailure`]. Also used for failures before any
/// transaction exists, such as a refused connect.
pub(crate) fn report(statement: &Statement, message: String) -> MapperError {
    // Diagnostic record shape kept from the pre-existing log sink:
    // fragments and bindings are joined with no separator.
    tracing::error!(
        "Exception: {message}\nQuery: {}\nBindings: {}",
        statement.sql_compact(),
        statement.bindings_compact(),
    );
    MapperError::BuilderFailure(message)
}

async fn drive<C: Connection>(
    connection: &mut C,
    statement: &Statement,
) -> MapperResult<ResultSet> {
    connection.begin().await?;
    tracing::debug!(sql = %statement.sql(), bindings = statement.bindings().len(), "executing");
    let QueryOutcome {
        rows,
        affected,
        last_insert_id,
    } = connection
        .execute(&statement.sql(), statement.bindings())
        .await?;

    // The generated id is only meaningful for creates; drivers may report
    // stale ids for other operations.
    let generated = match statement.operation() {
        Some(Operation::Create) => last_insert_id,
        _ => None,
    };

    if connection.in_transaction() {
        connection.commit().await?;
    }
    Ok(ResultSet::new(rows, affected, generated))
}
