#![no_main]
use kairos_libs::{get_appropriate_moment, Crew, WorkingHours, TRY_LATER_DELAY_MS};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Crew, WorkingHours, u16)| {
    #[cfg(feature = "log")]
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply();

    let (crew, working_hours, duration) = data;
    let duration = duration % 600;
    let duration_ms = i64::from(duration) * 60 * 1000;

    let mut moment = get_appropriate_moment(&crew, u32::from(duration), &working_hours)
        .expect("Generated schedules are always well-formed");

    assert_eq!(
        moment.exists(),
        !moment.periods().is_empty(),
        "A fresh moment exists iff some period was found"
    );

    let template = "%DD %HH:%MM";
    while let Some(before) = moment.current() {
        let position = moment.position();
        let formatted = moment.format(template);
        assert_eq!(formatted, moment.format(template), "Formatting should be stable");

        if !moment.try_later() {
            assert_eq!(moment.current(), Some(before), "Failing to move should change nothing");
            break;
        }

        let after = moment.current().expect("A successful move lands on a period");
        assert!(moment.position() >= position, "Position should never go back");
        assert!(
            after.start() >= before.start() + TRY_LATER_DELAY_MS,
            "Moving later should move at least the delay"
        );
        assert!(
            after.start() + duration_ms <= after.end(),
            "The moved moment should still fit"
        );
    }
});
