use time::{Duration, OffsetDateTime};

use super::model::Plant;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Summer,
    Winter,
}

/// Resolve the seasonal watering bucket for a point in time.
///
/// April through September are the warm months of the northern hemisphere.
/// A negative latitude inverts the mapping; unknown latitude defaults to
/// northern behavior.
pub fn resolve_season(now: OffsetDateTime, latitude: Option<f64>) -> Season {
    let month = now.month() as u8;
    let warm_months = (4..=9).contains(&month);
    let northern = latitude.map_or(true, |lat| lat >= 0.0);
    if warm_months == northern {
        Season::Summer
    } else {
        Season::Winter
    }
}

/// Computed watering state for one plant at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct WateringStatus {
    /// Whole days until the next watering is due. Negative when overdue.
    pub days_remaining: i64,
    pub is_urgent: bool,
    pub next_date: OffsetDateTime,
    /// Fraction of the interval already elapsed, clamped to [0, 1].
    pub progress: f64,
}

/// Compute the watering schedule for `plant` as of `now`.
///
/// Pure: takes `now` explicitly rather than reading a clock, so list and
/// detail renders within one logical instant agree, and tests are exact.
/// Baseline is the last watering, or the creation time before the first one.
pub fn watering_status(plant: &Plant, season: Season, now: OffsetDateTime) -> WateringStatus {
    let interval_days = match season {
        Season::Summer => plant.instructions.watering_summer,
        Season::Winter => plant.instructions.watering_winter,
    };
    let baseline = plant.last_watered_at.unwrap_or(plant.added_at);

    // Intervals are clamped to >= 1 at creation; stored data from before
    // that rule still must not divide by zero.
    if interval_days == 0 {
        return WateringStatus {
            days_remaining: 0,
            is_urgent: true,
            next_date: baseline,
            progress: 1.0,
        };
    }

    let next_date = baseline + Duration::days(i64::from(interval_days));
    let days_remaining = ceil_days(next_date - now);

    WateringStatus {
        days_remaining,
        is_urgent: days_remaining <= 0,
        next_date,
        progress: (1.0 - days_remaining as f64 / f64::from(interval_days)).clamp(0.0, 1.0),
    }
}

/// Ceiling of a duration in whole days, matching `Math.ceil(ms / 86400000)`.
fn ceil_days(d: Duration) -> i64 {
    let secs = d.whole_seconds();
    secs.div_euclid(SECONDS_PER_DAY) + i64::from(secs.rem_euclid(SECONDS_PER_DAY) > 0)
}

#[cfg(test)]
mod schedule_tests {
    use super::*;
    use crate::plants::model::sample_instructions;
    use time::macros::datetime;
    use uuid::Uuid;

    fn plant_added_at(added_at: OffsetDateTime) -> Plant {
        Plant {
            id: Uuid::new_v4(),
            name: "Poto".into(),
            species: "Epipremnum aureum".into(),
            image_url: String::new(),
            reference_image_url: String::new(),
            instructions: sample_instructions(),
            logs: vec![],
            last_watered_at: None,
            added_at,
        }
    }

    #[test]
    fn june_without_latitude_is_summer() {
        let june = datetime!(2024-06-15 12:00 UTC);
        assert_eq!(resolve_season(june, None), Season::Summer);
    }

    #[test]
    fn december_in_southern_hemisphere_is_summer() {
        let december = datetime!(2024-12-15 12:00 UTC);
        assert_eq!(resolve_season(december, Some(-34.0)), Season::Summer);
        assert_eq!(resolve_season(december, Some(40.0)), Season::Winter);
    }

    #[test]
    fn warm_month_in_southern_hemisphere_is_winter() {
        let june = datetime!(2024-06-15 12:00 UTC);
        assert_eq!(resolve_season(june, Some(-34.0)), Season::Winter);
    }

    #[test]
    fn hemisphere_boundary_counts_as_northern() {
        let june = datetime!(2024-06-15 12:00 UTC);
        assert_eq!(resolve_season(june, Some(0.0)), Season::Summer);
    }

    #[test]
    fn status_is_deterministic_for_identical_inputs() {
        let now = datetime!(2024-06-10 09:30 UTC);
        let plant = plant_added_at(datetime!(2024-06-01 00:00 UTC));
        let a = watering_status(&plant, Season::Summer, now);
        let b = watering_status(&plant, Season::Summer, now);
        assert_eq!(a, b);
    }

    #[test]
    fn baseline_falls_back_to_added_at() {
        let added = datetime!(2024-06-01 00:00 UTC);
        let plant = plant_added_at(added);
        let status = watering_status(&plant, Season::Summer, added);
        assert_eq!(status.next_date, added + Duration::days(7));
        assert_eq!(status.days_remaining, 7);
        assert!(!status.is_urgent);
    }

    #[test]
    fn freshly_watered_has_full_interval_remaining() {
        let now = datetime!(2024-06-10 09:30 UTC);
        let mut plant = plant_added_at(datetime!(2024-06-01 00:00 UTC));
        plant.last_watered_at = Some(now);
        let status = watering_status(&plant, Season::Summer, now);
        assert_eq!(status.days_remaining, 7);
        assert_eq!(status.progress, 0.0);

        let winter = watering_status(&plant, Season::Winter, now);
        assert_eq!(winter.days_remaining, 14);
    }

    #[test]
    fn due_exactly_at_interval_end_is_urgent() {
        let added = datetime!(2024-06-01 00:00 UTC);
        let plant = plant_added_at(added);
        let status = watering_status(&plant, Season::Summer, added + Duration::days(7));
        assert_eq!(status.days_remaining, 0);
        assert!(status.is_urgent);
        assert_eq!(status.progress, 1.0);
    }

    #[test]
    fn partial_day_rounds_up() {
        let added = datetime!(2024-06-01 00:00 UTC);
        let plant = plant_added_at(added);
        // 6.5 days in: half a day left, still "1 day" to the user.
        let status = watering_status(&plant, Season::Summer, added + Duration::hours(156));
        assert_eq!(status.days_remaining, 1);
        assert!(!status.is_urgent);
    }

    #[test]
    fn overdue_goes_negative_and_progress_clamps() {
        let added = datetime!(2024-06-01 00:00 UTC);
        let plant = plant_added_at(added);
        let status = watering_status(&plant, Season::Summer, added + Duration::days(21));
        assert_eq!(status.days_remaining, -14);
        assert!(status.is_urgent);
        assert_eq!(status.progress, 1.0);
    }

    #[test]
    fn progress_stays_in_unit_range() {
        let added = datetime!(2024-06-01 00:00 UTC);
        let plant = plant_added_at(added);
        for hours in (0..24 * 30).step_by(7) {
            let status = watering_status(&plant, Season::Summer, added + Duration::hours(hours));
            assert!((0.0..=1.0).contains(&status.progress), "at {hours}h");
        }
        // Before the baseline (clock skew) the fraction clamps at 0.
        let early = watering_status(&plant, Season::Summer, added - Duration::days(3));
        assert_eq!(early.progress, 0.0);
    }

    #[test]
    fn zero_interval_in_stored_data_is_fully_urgent() {
        let added = datetime!(2024-06-01 00:00 UTC);
        let mut plant = plant_added_at(added);
        plant.instructions.watering_summer = 0;
        let status = watering_status(&plant, Season::Summer, added);
        assert!(status.is_urgent);
        assert_eq!(status.progress, 1.0);
    }
}
