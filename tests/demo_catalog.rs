use std::path::PathBuf;

use princess_scheduler::access::Role;
use princess_scheduler::config::load_and_validate;
use princess_scheduler::dag::{Placement, StageGraph};
use princess_scheduler::engine::{evaluate, SessionOptions};
use princess_test_utils::date;

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/Princess.toml")
}

#[test]
fn demo_catalog_schedules_end_to_end() {
    let catalog = load_and_validate(demo_path()).unwrap();
    assert_eq!(catalog.stages.len(), 10);

    let evaluation = evaluate(&catalog, &SessionOptions::default()).unwrap();
    let schedule = &evaluation.schedule;

    // kickoff 01-06..01-07, interviews 01-08..01-13
    // audit is the next sequential stage after kickoff: 01-08..01-12
    let interviews = schedule.get("stakeholder-interviews").unwrap();
    assert_eq!(interviews.start_date, date("2025-01-08"));
    assert_eq!(schedule.get("competitor-audit").unwrap().start_date, date("2025-01-08"));

    // strategy waits for the later of the two
    let strategy = schedule.get("brand-strategy").unwrap();
    assert_eq!(strategy.start_date, date("2025-01-14"));
    assert_eq!(strategy.end_date, date("2025-01-19"));

    // naming uses the default duration
    let naming = schedule.get("naming").unwrap();
    assert_eq!((naming.end_date - naming.start_date).num_days(), 3);

    let concepts = schedule.get("logo-concepts").unwrap();
    assert_eq!(concepts.start_date, date("2025-02-03"));
    assert_eq!(concepts.placement, Placement::Override { locked: true });
    assert!(schedule.conflicts().is_empty());

    assert_eq!(schedule.get("handover").unwrap().end_date, schedule.project_end().unwrap());
}

#[test]
fn demo_catalog_cascade_and_client_view() {
    let catalog = load_and_validate(demo_path()).unwrap();

    let graph = StageGraph::from_templates(&catalog.stages);
    assert_eq!(
        graph.downstream_of("moodboards"),
        vec!["logo-concepts", "logo-refinement", "guidelines", "handover"]
    );

    let options = SessionOptions {
        role: Role::Client,
        ..SessionOptions::default()
    };
    let out = evaluate(&catalog, &options).unwrap().output;
    assert!(out.contains("Brand Guidelines"));
    assert!(!out.contains("Competitor Audit"));
}
