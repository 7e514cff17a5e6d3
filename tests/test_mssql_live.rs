//! Live SQL Server tests
//!
//! Require a reachable server. Run with:
//!
//! ```text
//! DATAVERSE_TO_SQL_TEST_CONNECTION="Server=tcp:localhost,1433;Database=tempdb;User Id=sa;Password=...;TrustServerCertificate=true" \
//!     cargo test --test test_mssql_live -- --ignored
//! ```

use dataverse_to_sql::connection::connect;
use dataverse_to_sql::executor::{apply_schema, ApplyError, MssqlExecutor, SchemaExecutor};
use dataverse_to_sql::model::{EntityField, EntityModel};
use std::env;

fn connection_string() -> Option<String> {
    env::var("DATAVERSE_TO_SQL_TEST_CONNECTION").ok()
}

#[test]
#[ignore]
fn test_create_tables_and_fail_on_rerun() {
    let Some(conn_str) = connection_string() else {
        eprintln!("DATAVERSE_TO_SQL_TEST_CONNECTION not set, skipping");
        return;
    };

    let table = format!("dts_live_{}", std::process::id());
    let entities = vec![EntityModel::new(
        table.clone(),
        vec![
            EntityField::new("id", "primarykey").with_required_level("systemrequired"),
            EntityField::new("name", "nvarchar").with_max_length(100),
            EntityField::new("created", "datetime"),
        ],
    )];

    let mut executor = MssqlExecutor::new(connect(&conn_str).unwrap());
    let mut out: Vec<u8> = Vec::new();
    assert_eq!(apply_schema(&entities, &mut executor, &mut out).unwrap(), 1);

    // Re-running is not idempotent
    let err = apply_schema(&entities, &mut executor, &mut out).unwrap_err();
    assert!(matches!(err, ApplyError::Statement { .. }));

    executor.execute(&format!("DROP TABLE {}", table)).unwrap();
    executor.close().unwrap();
}

#[test]
#[ignore]
fn test_invalid_sql_is_reported() {
    let Some(conn_str) = connection_string() else {
        eprintln!("DATAVERSE_TO_SQL_TEST_CONNECTION not set, skipping");
        return;
    };

    let mut executor = MssqlExecutor::new(connect(&conn_str).unwrap());
    assert!(executor.execute("CREATE TABLE select (x int NULL);").is_err());
    executor.close().unwrap();
}
