//! `SchemaExecutor` Module
//!
//! Provides the `SchemaExecutor` trait that abstracts statement execution, and the
//! apply loop that generates, prints and executes one `CREATE TABLE` per entity.
//!
//! Statements run one at a time over a single connection. There is no enclosing
//! transaction: the loop stops at the first failing statement and tables created
//! before it stay in place.

use crate::connection::{ConnectionError, MssqlConnection};
use crate::model::EntityModel;
use crate::sql_generator::generate_create_table_sql;
use std::io::{self, Write};
use std::time::Instant;

/// `SchemaExecutor` error type
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// Error reported by SQL Server or the driver
    #[error("SQL Server error: {0}")]
    Mssql(#[from] tiberius::error::Error),
    /// Failure reported by a [`SchemaExecutor`] not backed by SQL Server,
    /// such as a recording or replaying executor
    #[error("Execution error: {0}")]
    Other(String),
}

/// Failure of the apply loop
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    /// Writing a statement to the output sink failed
    #[error("Failed to write SQL output: {0}")]
    Output(#[from] io::Error),
    /// A statement was rejected; earlier statements remain applied
    #[error("Failed to create table '{table}': {source}")]
    Statement {
        table: String,
        sql: String,
        #[source]
        source: ExecError,
    },
}

/// Trait for executing DDL statements
///
/// Implemented for SQL Server by [`MssqlExecutor`]; tests substitute their own.
pub trait SchemaExecutor {
    /// Execute a statement that returns no rows and return the rows affected
    fn execute(&mut self, sql: &str) -> Result<u64, ExecError>;
}

/// Implementation of `SchemaExecutor` over an [`MssqlConnection`]
pub struct MssqlExecutor {
    connection: MssqlConnection,
}

impl MssqlExecutor {
    pub fn new(connection: MssqlConnection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &MssqlConnection {
        &self.connection
    }

    /// Close the underlying connection
    pub fn close(self) -> Result<(), ConnectionError> {
        self.connection.close()
    }
}

impl SchemaExecutor for MssqlExecutor {
    fn execute(&mut self, sql: &str) -> Result<u64, ExecError> {
        let start = Instant::now();
        let rows = self.connection.execute(sql)?;
        log::debug!("Executed in {:?} ({} rows affected)", start.elapsed(), rows);
        Ok(rows)
    }
}

/// Generate and execute the DDL for every entity, in order.
///
/// Each statement is written (and flushed) to `out` before it is executed. The
/// first failure is returned and nothing after it is attempted.
///
/// Returns the number of statements executed.
pub fn apply_schema<E, W>(
    entities: &[EntityModel],
    executor: &mut E,
    out: &mut W,
) -> Result<usize, ApplyError>
where
    E: SchemaExecutor + ?Sized,
    W: Write + ?Sized,
{
    for entity in entities {
        let sql = generate_create_table_sql(entity);
        writeln!(out, "{}", sql)?;
        out.flush()?;

        if let Err(source) = executor.execute(&sql) {
            log::error!("CREATE TABLE {} failed: {}", entity.logical_name, source);
            return Err(ApplyError::Statement {
                table: entity.logical_name.clone(),
                sql,
                source,
            });
        }
        log::debug!("Created table {}", entity.logical_name);
    }

    log::info!("Created {} tables", entities.len());
    Ok(entities.len())
}

/// Write the DDL for every entity without executing anything
///
/// Returns the number of statements written.
pub fn render_schema<W>(entities: &[EntityModel], out: &mut W) -> io::Result<usize>
where
    W: Write + ?Sized,
{
    for entity in entities {
        writeln!(out, "{}", generate_create_table_sql(entity))?;
    }
    out.flush()?;
    Ok(entities.len())
}
