//! # dataverse-to-sql
//!
//! Reads entity metadata from a Dataverse `customizations.xml` export and creates
//! one SQL Server table per entity.
//!
//! The pipeline is linear: [`entity_loader`] builds the [`model`],
//! [`sql_generator`] renders one `CREATE TABLE` per entity, and [`executor`]
//! prints and runs the statements over one [`connection`].
//!
//! ```no_run
//! use dataverse_to_sql::{apply_schema, connect, load_entities, MssqlExecutor};
//! use std::path::Path;
//!
//! # fn main() -> dataverse_to_sql::Result<()> {
//! let entities = load_entities(Path::new("customizations.xml"))?;
//! let mut executor = MssqlExecutor::new(connect("Server=localhost;Database=crm;IntegratedSecurity=true")?);
//! apply_schema(&entities, &mut executor, &mut std::io::stdout())?;
//! executor.close()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod entity_loader;
pub mod error;
pub mod executor;
pub mod model;
pub mod sql_generator;

pub use crate::config::ToolConfig;
pub use connection::{connect, connect_with_timeout, ConnectionError, MssqlConnection};
pub use entity_loader::{load_entities, parse_entities, LoadError};
pub use error::{Error, Result};
pub use executor::{apply_schema, render_schema, ApplyError, ExecError, MssqlExecutor, SchemaExecutor};
pub use model::{EntityField, EntityModel};
pub use sql_generator::{generate_create_table_sql, SqlType};
