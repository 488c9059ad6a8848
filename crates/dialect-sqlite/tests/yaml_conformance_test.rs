use relmig_dialect_sqlite::SqliteDialect;
use relmig_testkit::{ScenarioResult, load_scenarios, run_scenario};

const SCENARIOS: &str = r#"
add_foreign_key_triggers_full_rebuild:
  source:
    entities:
      - name: T1
        properties:
          - { name: Id, kind: int32 }
      - name: T2
        properties:
          - { name: Id, kind: int32 }
          - { name: C, kind: int32 }
  target:
    entities:
      - name: T1
        properties:
          - { name: Id, kind: int32 }
      - name: T2
        properties:
          - { name: Id, kind: int32 }
          - { name: C, kind: int32 }
        foreign_keys:
          - name: FK1
            properties: [C]
            references: T1
            referenced_properties: [Id]
  expect_sql:
    - "ALTER TABLE \"T2\" RENAME TO \"__mig_tmp__T2\""
    - "CREATE TABLE \"T2\" (\n    \"Id\" INTEGER NOT NULL,\n    \"C\" INTEGER NOT NULL,\n    CONSTRAINT \"FK1\" FOREIGN KEY (\"C\") REFERENCES \"T1\" (\"Id\")\n)"
    - "INSERT INTO \"T2\" (\"Id\", \"C\") SELECT \"Id\", \"C\" FROM \"__mig_tmp__T2\""
    - "DROP TABLE \"__mig_tmp__T2\""

sequences_are_rejected:
  source: {}
  target:
    sequences:
      - name: Numbers
  expect_error: "not supported by the sqlite dialect"
"#;

#[test]
fn yaml_scenarios_pass_against_sqlite() {
    let scenarios = load_scenarios(SCENARIOS).expect("scenario yaml should parse");
    assert_eq!(scenarios.len(), 2);

    for (name, scenario) in &scenarios {
        let result = run_scenario(&SqliteDialect, scenario);
        assert_eq!(result, ScenarioResult::Passed, "scenario `{name}` failed");
    }
}
