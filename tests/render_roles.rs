use princess_scheduler::access::Role;
use princess_scheduler::config::CatalogFile;
use princess_scheduler::engine::{evaluate, SessionOptions};
use princess_scheduler::types::OutputFormat;
use princess_test_utils::builders::{CatalogBuilder, StageBuilder};
use princess_test_utils::date;

fn catalog() -> CatalogFile {
    CatalogBuilder::new(date("2025-01-01"))
        .named("Acme rebrand")
        .with_stage(StageBuilder::new("S1").name("Kickoff").category("Discovery").days(3).build())
        .with_stage(
            StageBuilder::new("S2")
                .name("Brand Strategy Review")
                .category("Strategy")
                .days(2)
                .after("S1")
                .deliverable()
                .build(),
        )
        .with_stage(StageBuilder::new("S3").name("Logo Concepts").days(5).after("S2").deliverable().build())
        .with_override("S3", date("2025-01-06"), true)
        .build()
}

fn options(role: Role, format: OutputFormat) -> SessionOptions {
    SessionOptions {
        role,
        format,
        ..SessionOptions::default()
    }
}

#[test]
fn agency_table_shows_every_stage_with_flags() {
    let out = evaluate(&catalog(), &options(Role::Agency, OutputFormat::Table))
        .unwrap()
        .output;

    assert!(out.starts_with("Acme rebrand: 2025-01-01 -> 2025-01-11 (3 stages)"));
    assert!(out.contains("Kickoff"));
    assert!(out.contains("Brand Strategy Review"));

    let s3 = out.lines().find(|l| l.contains("Logo Concepts")).unwrap();
    assert!(s3.contains("2025-01-06"));
    assert!(s3.ends_with("DOL!"));

    assert!(out.contains("conflict: 'S3' is pinned (locked) to 2025-01-06"));
}

#[test]
fn client_only_sees_deliverables() {
    let out = evaluate(&catalog(), &options(Role::Client, OutputFormat::Table))
        .unwrap()
        .output;

    assert!(!out.contains("Kickoff"));
    assert!(out.contains("Brand Strategy Review"));
    assert!(out.contains("(2 stages)"));
}

#[test]
fn json_output_is_machine_readable() {
    let out = evaluate(&catalog(), &options(Role::Admin, OutputFormat::Json))
        .unwrap()
        .output;

    let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(doc["project"], "Acme rebrand");
    assert_eq!(doc["role"], "admin");
    assert_eq!(doc["end_date"], "2025-01-11");

    let stages = doc["stages"].as_array().unwrap();
    assert_eq!(stages.len(), 3);
    assert_eq!(stages[1]["start_date"], "2025-01-05");
    assert_eq!(stages[2]["placement"]["kind"], "override");
    assert_eq!(stages[2]["placement"]["locked"], true);
    assert_eq!(doc["conflicts"][0]["earliest_allowed"], "2025-01-08");
}

#[test]
fn lenient_mode_skips_conflict_reporting() {
    let opts = SessionOptions {
        lenient: true,
        ..options(Role::Agency, OutputFormat::Table)
    };
    let evaluation = evaluate(&catalog(), &opts).unwrap();

    assert!(evaluation.schedule.conflicts().is_empty());
    assert_eq!(
        evaluation.schedule.get("S3").unwrap().start_date,
        date("2025-01-06")
    );
}

fn catalog_with_internal_conflict() -> CatalogFile {
    CatalogBuilder::new(date("2025-01-01"))
        .drop_unknown_dependencies()
        .with_stage(StageBuilder::new("Kickoff").days(5).build())
        .with_stage(
            StageBuilder::new("SecretInternalReview")
                .days(2)
                .after("Kickoff")
                .after("ghost")
                .build(),
        )
        .with_stage(StageBuilder::new("Logo").days(3).after("Kickoff").deliverable().build())
        .with_override("SecretInternalReview", date("2025-01-02"), false)
        .build()
}

#[test]
fn client_table_hides_conflicts_and_warnings_of_internal_stages() {
    let catalog = catalog_with_internal_conflict();

    let agency = evaluate(&catalog, &options(Role::Agency, OutputFormat::Table))
        .unwrap()
        .output;
    assert!(agency.contains("conflict: 'SecretInternalReview'"));
    assert!(agency.contains("warning: dropped dependency of 'SecretInternalReview'"));

    let client = evaluate(&catalog, &options(Role::Client, OutputFormat::Table))
        .unwrap()
        .output;
    assert!(client.contains("Logo"));
    assert!(!client.contains("SecretInternalReview"));
    assert!(!client.contains("conflict:"));
    assert!(!client.contains("warning:"));
}

#[test]
fn client_json_hides_conflicts_and_warnings_of_internal_stages() {
    let out = evaluate(
        &catalog_with_internal_conflict(),
        &options(Role::Client, OutputFormat::Json),
    )
    .unwrap()
    .output;

    assert!(!out.contains("SecretInternalReview"));
    let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(doc["stages"].as_array().unwrap().len(), 1);
    assert!(doc["conflicts"].as_array().unwrap().is_empty());
    assert!(doc["warnings"].as_array().unwrap().is_empty());
}
