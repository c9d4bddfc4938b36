#![no_main]
use itertools::Itertools;
use kairos_libs::time::{CommonFree, Owner, TimePoint};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<(u16, u8)>, u16)| {
    let duration = data.1;
    let timeline = data
        .0
        .into_iter()
        .map(|(timestamp, owner)| TimePoint::new(timestamp, Owner(usize::from(owner % 8))))
        .sorted_by_key(|point| point.timestamp)
        .collect::<Vec<_>>();

    let periods = timeline.iter().common_free(duration);

    assert!(
        periods.iter().all(|p| p.start() < p.end() && p.len() >= duration),
        "Every period should be non-empty and long enough"
    );
    assert!(
        periods
            .iter()
            .tuple_windows()
            .all(|(left, right)| left.end() <= right.start()),
        "Periods should be ascending and disjoint"
    );
    assert!(
        periods.iter().all(|p| timeline
            .iter()
            .all(|point| point.timestamp <= p.start() || point.timestamp >= p.end())),
        "No timeline point should fall inside a period"
    );
});
