use std::io::Write;

use tempfile::NamedTempFile;
use princess_scheduler::config::{load_and_validate, CatalogFile};
use princess_scheduler::errors::{PrincessError, ScheduleError};
use princess_test_utils::builders::{CatalogBuilder, StageBuilder};
use princess_test_utils::date;

fn catalog_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[project]\nstart_date = \"2025-01-01\"\n{body}").unwrap();
    file
}

#[test]
fn valid_catalog_loads_with_defaults() {
    let file = catalog_file(
        r#"
[[stage]]
id = "S1"
name = "Kickoff"
category = "Discovery"
estimated_duration_days = 3

[[stage]]
id = "S2"
dependencies = ["S1"]
is_deliverable = true

[override.S2]
date = "2025-01-20"
locked = true
"#,
    );

    let catalog = load_and_validate(file.path()).unwrap();

    assert_eq!(catalog.start_date(), date("2025-01-01"));
    assert_eq!(catalog.project.default_duration_days, 3);
    assert_eq!(catalog.cache_ttl.as_secs(), 600);
    assert_eq!(catalog.stages.len(), 2);

    let s2 = catalog.template("S2").unwrap();
    assert_eq!(s2.name, "S2");
    assert_eq!(s2.number_index, 2);
    assert!(s2.is_deliverable);
    assert_eq!(s2.estimated_duration_days, None);

    let o = catalog.overrides["S2"];
    assert_eq!(o.date, date("2025-01-20"));
    assert!(o.locked);
}

#[test]
fn cycle_returns_structured_error() {
    let file = catalog_file(
        r#"
[[stage]]
id = "A"
dependencies = ["B"]

[[stage]]
id = "B"
dependencies = ["A"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(PrincessError::Schedule(ScheduleError::CycleDetected { stage })) => {
            assert!(stage == "A" || stage == "B");
        }
        Err(e) => panic!("Expected CycleDetected error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_dependency_fails_by_default() {
    let file = catalog_file(
        r#"
[[stage]]
id = "A"
dependencies = ["NonExistent"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(PrincessError::Schedule(ScheduleError::UnknownDependency { stage, dependency })) => {
            assert_eq!(stage, "A");
            assert_eq!(dependency, "NonExistent");
        }
        Err(e) => panic!("Expected UnknownDependency, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_dependency_is_accepted_when_dropping() {
    let raw = CatalogBuilder::new(date("2025-01-01"))
        .drop_unknown_dependencies()
        .with_stage(StageBuilder::new("A").after("ghost").build())
        .raw();

    assert!(CatalogFile::try_from(raw).is_ok());
}

#[test]
fn negative_duration_is_invalid() {
    let raw = CatalogBuilder::new(date("2025-01-01"))
        .with_stage(StageBuilder::new("A").days(-2).build())
        .raw();

    match CatalogFile::try_from(raw) {
        Err(PrincessError::Schedule(ScheduleError::InvalidDuration { stage, days, .. })) => {
            assert_eq!(stage, "A");
            assert_eq!(days, -2);
        }
        other => panic!("Expected InvalidDuration, got: {:?}", other),
    }
}

#[test]
fn duplicate_ids_self_dependencies_and_orphan_overrides_are_rejected() {
    let dup = CatalogBuilder::new(date("2025-01-01"))
        .with_stage(StageBuilder::new("A").build())
        .with_stage(StageBuilder::new("A").build())
        .raw();
    assert!(matches!(
        CatalogFile::try_from(dup),
        Err(PrincessError::Schedule(ScheduleError::DuplicateStage { .. }))
    ));

    let self_dep = CatalogBuilder::new(date("2025-01-01"))
        .with_stage(StageBuilder::new("A").after("A").build())
        .raw();
    match CatalogFile::try_from(self_dep) {
        Err(PrincessError::ConfigError(msg)) => assert!(msg.contains("cannot depend on itself")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }

    let orphan = CatalogBuilder::new(date("2025-01-01"))
        .with_stage(StageBuilder::new("A").build())
        .with_override("Z", date("2025-02-01"), false)
        .raw();
    match CatalogFile::try_from(orphan) {
        Err(PrincessError::ConfigError(msg)) => assert!(msg.contains("unknown stage 'Z'")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn empty_catalog_and_bad_project_settings_are_rejected() {
    let empty = CatalogBuilder::new(date("2025-01-01")).raw();
    assert!(matches!(
        CatalogFile::try_from(empty),
        Err(PrincessError::ConfigError(_))
    ));

    let zero_default = CatalogBuilder::new(date("2025-01-01"))
        .default_duration_days(0)
        .with_stage(StageBuilder::new("A").build())
        .raw();
    assert!(matches!(
        CatalogFile::try_from(zero_default),
        Err(PrincessError::ConfigError(_))
    ));

    let file = catalog_file("[watch]\ncache_ttl = \"soon\"\n\n[[stage]]\nid = \"A\"\n");
    match load_and_validate(file.path()) {
        Err(PrincessError::ConfigError(msg)) => assert!(msg.contains("cache_ttl")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn overflowing_cache_ttl_is_a_config_error() {
    let file = catalog_file("[watch]\ncache_ttl = \"9999999999999999h\"\n\n[[stage]]\nid = \"A\"\n");
    match load_and_validate(file.path()) {
        Err(PrincessError::ConfigError(msg)) => {
            assert!(msg.contains("cache_ttl"), "{msg}");
            assert!(msg.contains("too large"), "{msg}");
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn malformed_toml_and_missing_file() {
    let file = catalog_file("[[stage]\nid = ");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(PrincessError::TomlError(_))
    ));

    assert!(matches!(
        load_and_validate("/definitely/not/here/Princess.toml"),
        Err(PrincessError::IoError(_))
    ));
}
