use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use proptest::prelude::*;
use princess_scheduler::dag::{Placement, StageScheduler};
use princess_scheduler::stage::{apply_override, Overrides, StageTemplate};

// Strategy to generate a valid, topologically sorted catalog.
// We ensure acyclicity by only allowing stage N to depend on stages 0..N-1.
fn catalog_strategy(max_stages: usize) -> impl Strategy<Value = Vec<StageTemplate>> {
    (1..=max_stages).prop_flat_map(|num_stages| {
        let deps_strat = proptest::collection::vec(
            (
                proptest::collection::vec(any::<usize>(), 0..4),
                0u32..10,
            ),
            num_stages,
        );

        deps_strat.prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (potential_deps, days))| {
                    // Sanitize dependencies: only allow deps < i
                    let deps: BTreeSet<usize> = if i == 0 {
                        BTreeSet::new()
                    } else {
                        potential_deps.into_iter().map(|d| d % i).collect()
                    };
                    let mut t = StageTemplate::new(format!("stage_{i}"), Some(days));
                    t.dependencies = deps.into_iter().map(|d| format!("stage_{d}")).collect();
                    t
                })
                .collect()
        })
    })
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

proptest! {
    #[test]
    fn unpinned_stages_respect_every_predecessor(catalog in catalog_strategy(30)) {
        let scheduler = StageScheduler::default();
        let out = scheduler.compute(&catalog, start(), &Overrides::new());
        let end: HashMap<&str, NaiveDate> =
            out.iter().map(|s| (s.stage_id.as_str(), s.end_date)).collect();

        prop_assert_eq!(out.len(), catalog.len());
        for (t, s) in catalog.iter().zip(&out) {
            prop_assert_eq!(&t.id, &s.stage_id);
            let days = i64::from(t.effective_duration_days(3));
            prop_assert_eq!((s.end_date - s.start_date).num_days(), days);
            for dep in &t.dependencies {
                prop_assert!(s.start_date > end[dep.as_str()]);
            }
            prop_assert!(s.start_date >= start());
        }
    }

    #[test]
    fn checked_and_lenient_agree_on_sorted_catalogs(
        catalog in catalog_strategy(30),
        pin in any::<prop::sample::Index>(),
        offset in 0u64..40,
        locked in any::<bool>(),
    ) {
        let target = &catalog[pin.index(catalog.len())].id;
        let pinned = start().checked_add_days(chrono::Days::new(offset)).unwrap();
        let overrides = apply_override(&Overrides::new(), target, pinned, locked);

        let scheduler = StageScheduler::default();
        let lenient = scheduler.compute(&catalog, start(), &overrides);
        let checked = scheduler.compute_checked(&catalog, start(), &overrides).unwrap();

        prop_assert_eq!(checked.stages(), lenient.as_slice());
        let pinned_stage = checked.get(target).unwrap();
        prop_assert_eq!(pinned_stage.start_date, pinned);
        prop_assert_eq!(pinned_stage.placement, Placement::Override { locked });
    }

    #[test]
    fn checked_path_respects_dependencies_in_any_order(catalog in catalog_strategy(20)) {
        let mut reversed = catalog.clone();
        reversed.reverse();

        let schedule = StageScheduler::default()
            .compute_checked(&reversed, start(), &Overrides::new())
            .unwrap();

        // Output follows the input order even though placement did not.
        let ids: Vec<&str> = schedule.stages().iter().map(|s| s.stage_id.as_str()).collect();
        let expected: Vec<&str> = reversed.iter().map(|t| t.id.as_str()).collect();
        prop_assert_eq!(ids, expected);

        for t in &reversed {
            let s = schedule.get(&t.id).unwrap();
            for dep in &t.dependencies {
                prop_assert!(s.start_date > schedule.get(dep).unwrap().end_date);
            }
        }
    }
}
