//! Splitting an event into per-hour fragments.
//!
//! The first fragment runs from the event start to the next hour boundary,
//! every later fragment covers a whole hour, and the last one holds whatever
//! is left. Hours wrap at midnight; an event longer than a day simply visits
//! the same hour index again.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::blocks::HOURS_PER_DAY;
use crate::error::{CoreError, Result};

/// The part of an event that falls into one hour block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub hour: u8,
    pub minutes: u32,
    pub label: String,
}

/// Event length in whole minutes, rounded up.
pub fn total_minutes(start: NaiveDateTime, end: NaiveDateTime) -> u64 {
    let ms = (end - start).num_milliseconds().max(0) as u64;
    ms.div_ceil(60_000)
}

/// Cut `start..end` into ordered hour fragments labelled from `label`.
///
/// Events longer than an hour get a ` (i/n)` suffix on every fragment, with
/// `n` the number of started hours in the total length.
pub fn distribute(start: NaiveDateTime, end: NaiveDateTime, label: &str) -> Result<Vec<Fragment>> {
    if end <= start {
        return Err(CoreError::InvalidEventRange { start, end });
    }

    let total = total_minutes(start, end);
    let parts = total.div_ceil(60);
    let numbered = total > 60;

    let mut fragments = Vec::new();
    let mut remaining = total;
    let mut hour = start.hour() as u8;
    let mut room = 60 - start.minute() as u64;

    while remaining > 0 {
        let minutes = remaining.min(room);
        let label = if numbered {
            format!("{label} ({}/{parts})", fragments.len() + 1)
        } else {
            label.to_string()
        };
        fragments.push(Fragment {
            hour,
            minutes: minutes as u32,
            label,
        });
        remaining -= minutes;
        hour = (hour + 1) % HOURS_PER_DAY;
        room = 60;
    }

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn frag(hour: u8, minutes: u32, label: &str) -> Fragment {
        Fragment {
            hour,
            minutes,
            label: label.into(),
        }
    }

    #[test]
    fn crosses_midnight() {
        let start = at(23, 30);
        let fragments = distribute(start, start + Duration::minutes(90), "X").unwrap();
        assert_eq!(fragments, vec![frag(23, 30, "X (1/2)"), frag(0, 60, "X (2/2)")]);
    }

    #[test]
    fn short_event_keeps_bare_label() {
        let fragments = distribute(at(10, 10), at(10, 55), "Standup").unwrap();
        assert_eq!(fragments, vec![frag(10, 45, "Standup")]);
    }

    #[test]
    fn hour_long_event_off_the_boundary_is_unnumbered() {
        let fragments = distribute(at(10, 30), at(11, 30), "Sync").unwrap();
        assert_eq!(fragments, vec![frag(10, 30, "Sync"), frag(11, 30, "Sync")]);
    }

    #[test]
    fn part_count_follows_total_length() {
        // 90 minutes from 10:45 touches three hours but is two started hours long.
        let fragments = distribute(at(10, 45), at(12, 15), "Workshop").unwrap();
        assert_eq!(
            fragments,
            vec![
                frag(10, 15, "Workshop (1/2)"),
                frag(11, 60, "Workshop (2/2)"),
                frag(12, 15, "Workshop (3/2)"),
            ]
        );
    }

    #[test]
    fn partial_minutes_round_up() {
        let start = at(9, 0);
        let fragments = distribute(start, start + Duration::seconds(61), "Call").unwrap();
        assert_eq!(fragments, vec![frag(9, 2, "Call")]);
    }

    #[test]
    fn multi_day_event_revisits_hours() {
        let start = at(8, 0);
        let fragments = distribute(start, start + Duration::hours(25), "Trip").unwrap();
        assert_eq!(fragments.len(), 25);
        assert_eq!(fragments[0].hour, 8);
        assert_eq!(fragments[24].hour, 8);
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(matches!(
            distribute(at(10, 0), at(9, 0), "Bad"),
            Err(CoreError::InvalidEventRange { .. })
        ));
    }

    proptest! {
        #[test]
        fn fragments_cover_the_event_exactly(
            start_min in 0i64..(24 * 60),
            start_sec in 0i64..60,
            len_sec in 1i64..(3 * 24 * 3600),
        ) {
            let start = at(0, 0) + Duration::minutes(start_min) + Duration::seconds(start_sec);
            let end = start + Duration::seconds(len_sec);
            let fragments = distribute(start, end, "E").unwrap();

            let sum: u64 = fragments.iter().map(|f| f.minutes as u64).sum();
            prop_assert_eq!(sum, total_minutes(start, end));
            prop_assert!(fragments.iter().all(|f| f.minutes > 0 && f.minutes <= 60));
            prop_assert!(fragments.iter().all(|f| f.hour < 24));
            prop_assert_eq!(fragments[0].hour as u32, start.hour());
            for pair in fragments.windows(2) {
                prop_assert_eq!(pair[1].hour, (pair[0].hour + 1) % 24);
            }
            prop_assert_eq!(&fragments, &distribute(start, end, "E").unwrap());
        }
    }
}
