//! Property checks over seeded synthetic datasets.

mod common;

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng, rngs::StdRng};
use school_routes::model::{DeliveryMode, Holiday, Weekday};
use school_routes::plan::build_delivery_plans;
use school_routes::sample;

const SEEDS: std::ops::Range<u64> = 0..40;
const MODES: [DeliveryMode; 3] = [
    DeliveryMode::CourseStart,
    DeliveryMode::PerTerm,
    DeliveryMode::AdHoc,
];

/// Random subset of the reference week's weekdays declared as holidays.
fn random_holidays(seed: u64) -> Vec<Holiday> {
    let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    Weekday::ALL
        .into_iter()
        .filter(|_| rng.random_bool(0.25))
        .map(common::holiday_on)
        .collect()
}

#[test]
fn never_more_plans_than_schools() {
    for seed in SEEDS {
        let schools = sample::synthetic(seed, 25, common::week_monday());
        for mode in MODES {
            let plans = build_delivery_plans(&schools, common::week(), mode, &random_holidays(seed));
            assert!(plans.len() <= schools.len(), "seed {seed}, mode {mode}");
        }
    }
}

#[test]
fn identical_inputs_give_identical_outputs() {
    for seed in SEEDS {
        let schools = sample::synthetic(seed, 25, common::week_monday());
        let holidays = random_holidays(seed);
        for mode in MODES {
            let first = build_delivery_plans(&schools, common::week(), mode, &holidays);
            let second = build_delivery_plans(&schools, common::week(), mode, &holidays);
            assert_eq!(first, second, "seed {seed}, mode {mode}");
        }
    }
}

#[test]
fn plans_are_ordered_by_delivery_date() {
    for seed in SEEDS {
        let schools = sample::synthetic(seed, 25, common::week_monday());
        let plans = build_delivery_plans(
            &schools,
            common::week(),
            DeliveryMode::AdHoc,
            &random_holidays(seed),
        );
        assert!(
            plans.windows(2).all(|w| w[0].delivery_date <= w[1].delivery_date),
            "seed {seed}: plans out of order"
        );
    }
}

#[test]
fn consolidated_iff_multiple_source_weekdays() {
    for seed in SEEDS {
        let schools = sample::synthetic(seed, 25, common::week_monday());
        for mode in MODES {
            for plan in build_delivery_plans(&schools, common::week(), mode, &random_holidays(seed)) {
                let days: BTreeSet<Weekday> = plan.activities.iter().map(|a| a.weekday).collect();
                assert_eq!(plan.consolidated, days.len() >= 2, "seed {seed}, {}", plan.school.name);
            }
        }
    }
}

#[test]
fn delivery_day_is_earliest_active_non_holiday() {
    for seed in SEEDS {
        let schools = sample::synthetic(seed, 25, common::week_monday());
        let holidays = random_holidays(seed);
        for plan in build_delivery_plans(&schools, common::week(), DeliveryMode::PerTerm, &holidays) {
            assert!(common::week().contains(plan.delivery_date));
            assert!(!holidays.iter().any(|h| h.date == plan.delivery_date));

            let earliest = plan
                .source_weekdays()
                .into_iter()
                .find(|day| !holidays.iter().any(|h| h.date == common::week().date_of(*day)));
            assert_eq!(Some(plan.delivery_weekday), earliest, "seed {seed}");
        }
    }
}

#[test]
fn course_start_plans_only_carry_target_week_courses() {
    for seed in SEEDS {
        let schools = sample::synthetic(seed, 25, common::week_monday());
        for plan in build_delivery_plans(&schools, common::week(), DeliveryMode::CourseStart, &[]) {
            for (_, slots) in plan.school.iter() {
                assert!(slots.iter().all(|s| {
                    s.course_start.is_some_and(|d| common::week().contains(d))
                }));
            }
        }
    }
}

#[test]
fn full_holiday_week_is_always_empty() {
    for seed in SEEDS {
        let schools = sample::synthetic(seed, 25, common::week_monday());
        for mode in MODES {
            let plans =
                build_delivery_plans(&schools, common::week(), mode, &common::whole_week_holidays());
            assert!(plans.is_empty());
        }
    }
}
