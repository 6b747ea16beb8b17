//! Property tests for the assignment timeline.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use leave_engine::schedule::AssignmentTimeline;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

/// Builds a timeline whose assignments start `gaps` days after one another.
fn build_timeline(gaps: &[i64]) -> AssignmentTimeline {
    let mut timeline = AssignmentTimeline::default();
    let mut start = base_date();
    for (i, gap) in gaps.iter().enumerate() {
        start += Duration::days(*gap);
        timeline.append("DGS", &format!("WC{}", i), start);
    }
    timeline
}

proptest! {
    #[test]
    fn appended_timelines_are_contiguous(gaps in prop::collection::vec(1i64..120, 1..12)) {
        let timeline = build_timeline(&gaps);

        prop_assert_eq!(timeline.len(), gaps.len());
        prop_assert!(timeline.is_contiguous());
        prop_assert!(timeline.last().unwrap().is_open());
        let ids: Vec<u32> = timeline.iter().map(|a| a.id).collect();
        let expected: Vec<u32> = (1..=gaps.len() as u32).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn removal_keeps_timeline_contiguous(
        gaps in prop::collection::vec(1i64..120, 1..12),
        removals in prop::collection::vec(0u32..14, 0..8),
    ) {
        let mut timeline = build_timeline(&gaps);

        for id in removals {
            let before = timeline.len();
            let removed = timeline.remove(id);
            if id <= 1 {
                prop_assert!(removed.is_none());
            }
            let expected = if removed.is_some() { before - 1 } else { before };
            prop_assert_eq!(timeline.len(), expected);
            prop_assert!(timeline.is_contiguous());
            prop_assert!(timeline.last().unwrap().is_open());
            prop_assert_eq!(timeline.iter().next().unwrap().start_date, base_date() + Duration::days(gaps[0]));
        }
    }

    #[test]
    fn covering_finds_exactly_one_assignment(
        gaps in prop::collection::vec(1i64..120, 1..12),
        probe in 0i64..1500,
    ) {
        let timeline = build_timeline(&gaps);
        let date = base_date() + Duration::days(probe);

        let covering: Vec<u32> = timeline.iter().filter(|a| a.covers(date)).map(|a| a.id).collect();
        match timeline.covering(date) {
            Some(asgmt) => prop_assert_eq!(covering, vec![asgmt.id]),
            None => prop_assert!(covering.is_empty()),
        }
    }

    #[test]
    fn stale_appends_are_rejected(gaps in prop::collection::vec(1i64..120, 1..12), back in 0i64..200) {
        let mut timeline = build_timeline(&gaps);
        let last_start = timeline.last().unwrap().start_date;

        prop_assert_eq!(timeline.append("DGS", "LATE", last_start - Duration::days(back)), None);
        prop_assert_eq!(timeline.len(), gaps.len());
        prop_assert!(timeline.is_contiguous());
    }
}
