//! Property tests: ISO-8601 duration parsing.

use proptest::prelude::*;
use sbmod_types::IsoDuration;
use std::time::Duration;

proptest! {
    #[test]
    fn day_time_components_sum(
        days in 0u64..400,
        hours in 0u64..24,
        minutes in 0u64..60,
        seconds in 0u64..60,
    ) {
        let text = format!("P{}DT{}H{}M{}S", days, hours, minutes, seconds);
        let parsed = IsoDuration::parse(&text).unwrap();

        let expected = ((days * 24 + hours) * 60 + minutes) * 60 + seconds;
        prop_assert_eq!(parsed.as_duration(), Duration::from_secs(expected));
        prop_assert_eq!(parsed.as_str(), text.as_str());
    }

    #[test]
    fn canonical_form_reparses(secs in 0u64..10_000_000) {
        let canonical = IsoDuration::from_secs(secs);
        let reparsed = IsoDuration::parse(canonical.as_str()).unwrap();
        prop_assert_eq!(reparsed.as_duration(), Duration::from_secs(secs));
    }

    #[test]
    fn text_without_designator_rejected(text in "[0-9]{1,4}[DHMS]") {
        prop_assert!(IsoDuration::parse(&text).is_err());
    }
}
