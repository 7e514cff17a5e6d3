//! Tests for the apply loop against a recording executor

use dataverse_to_sql::executor::{apply_schema, render_schema, ApplyError, ExecError, SchemaExecutor};
use dataverse_to_sql::model::{EntityField, EntityModel};

/// Records statements and optionally rejects the statement at `fail_at`
#[derive(Default)]
struct RecordingExecutor {
    executed: Vec<String>,
    fail_at: Option<usize>,
}

impl SchemaExecutor for RecordingExecutor {
    fn execute(&mut self, sql: &str) -> Result<u64, ExecError> {
        if self.fail_at == Some(self.executed.len()) {
            return Err(ExecError::Other(
                "There is already an object named 'contact' in the database.".to_string(),
            ));
        }
        self.executed.push(sql.to_string());
        Ok(0)
    }
}

fn entities() -> Vec<EntityModel> {
    vec![
        EntityModel::new(
            "account",
            vec![
                EntityField::new("accountid", "primarykey"),
                EntityField::new("name", "nvarchar")
                    .with_max_length(100)
                    .with_required_level("systemrequired"),
            ],
        ),
        EntityModel::new("contact", vec![EntityField::new("fullname", "nvarchar")]),
        EntityModel::new("lead", vec![EntityField::new("createdon", "datetime")]),
    ]
}

#[test]
fn test_apply_schema_executes_in_entity_order() {
    let mut executor = RecordingExecutor::default();
    let mut out: Vec<u8> = Vec::new();

    let applied = apply_schema(&entities(), &mut executor, &mut out).unwrap();

    assert_eq!(applied, 3);
    assert_eq!(
        executor.executed,
        vec![
            "CREATE TABLE account (accountid nvarchar(250) NULL, name nvarchar(100) NOT NULL, PRIMARY KEY (accountid));",
            "CREATE TABLE contact (fullname nvarchar(250) NULL);",
            "CREATE TABLE lead (createdon datetime NULL);",
        ]
    );
}

#[test]
fn test_apply_schema_prints_every_statement() {
    let mut executor = RecordingExecutor::default();
    let mut out: Vec<u8> = Vec::new();

    apply_schema(&entities(), &mut executor, &mut out).unwrap();

    let printed = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = printed.lines().collect();
    assert_eq!(lines, executor.executed);
}

#[test]
fn test_apply_schema_stops_at_first_failure() {
    let mut executor = RecordingExecutor {
        fail_at: Some(1),
        ..Default::default()
    };
    let mut out: Vec<u8> = Vec::new();

    let err = apply_schema(&entities(), &mut executor, &mut out).unwrap_err();

    match err {
        ApplyError::Statement { table, sql, source } => {
            assert_eq!(table, "contact");
            assert_eq!(sql, "CREATE TABLE contact (fullname nvarchar(250) NULL);");
            assert!(matches!(source, ExecError::Other(_)));
        }
        other => panic!("expected a statement error, got {other:?}"),
    }

    // The first table stays applied, the third is never attempted
    assert_eq!(executor.executed.len(), 1);
    assert!(executor.executed[0].starts_with("CREATE TABLE account"));

    // The failing statement was printed before it was run
    let printed = String::from_utf8(out).unwrap();
    assert_eq!(printed.lines().count(), 2);
    assert!(!printed.contains("CREATE TABLE lead"));
}

#[test]
fn test_apply_schema_with_trait_object() {
    let mut executor = RecordingExecutor::default();
    let dyn_executor: &mut dyn SchemaExecutor = &mut executor;
    let mut out: Vec<u8> = Vec::new();

    let applied = apply_schema(&entities()[..1], dyn_executor, &mut out).unwrap();
    assert_eq!(applied, 1);
    assert_eq!(executor.executed.len(), 1);
}

#[test]
fn test_apply_schema_no_entities() {
    let mut executor = RecordingExecutor::default();
    let mut out: Vec<u8> = Vec::new();

    assert_eq!(apply_schema(&[], &mut executor, &mut out).unwrap(), 0);
    assert!(executor.executed.is_empty());
    assert!(out.is_empty());
}

#[test]
fn test_render_schema_matches_apply_output() {
    let mut executor = RecordingExecutor::default();
    let mut applied_out: Vec<u8> = Vec::new();
    apply_schema(&entities(), &mut executor, &mut applied_out).unwrap();

    let mut rendered_out: Vec<u8> = Vec::new();
    let rendered = render_schema(&entities(), &mut rendered_out).unwrap();

    assert_eq!(rendered, 3);
    assert_eq!(rendered_out, applied_out);
}
