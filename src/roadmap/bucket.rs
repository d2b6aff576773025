//! Calendar bucketing for the roadmap.
//!
//! Cells are inclusive day ranges: a week runs Monday..Sunday, a month over
//! its calendar days, a quarter over three months starting Jan/Apr/Jul/Oct.
//! Working at day precision makes the end of a cell "end-of-day inclusive".

use crate::domain::{month_label, Milestone, RoadmapScale};
use chrono::{Datelike, Duration, NaiveDate};

/// Days of padding before the earliest and after the latest milestone
pub const PADDING_DAYS: i64 = 7;

/// One roadmap cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl Bucket {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Day of week with Monday = 0
pub fn weekday_index(date: NaiveDate) -> i64 {
    date.weekday().num_days_from_monday() as i64
}

/// Monday of the week containing `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(weekday_index(date))
}

/// First day of the month containing `date`
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

/// First day of the quarter containing `date`
pub fn start_of_quarter(date: NaiveDate) -> NaiveDate {
    let mut start = start_of_month(date);
    for _ in 0..(date.month0() % 3) {
        start = start_of_month(start - Duration::days(1));
    }
    start
}

/// ISO-8601 week as `(week-based year, week number)`.
///
/// The date is moved to the Thursday of its own week; that Thursday's year
/// owns the week, and the week number counts 7-day periods from January 1.
pub fn iso_week(date: NaiveDate) -> (i32, u32) {
    let thursday = date + Duration::days(3 - weekday_index(date));
    let year = thursday.year();
    let jan1 = thursday - Duration::days(thursday.ordinal0() as i64);
    let week = (thursday - jan1).num_days() / 7 + 1;
    (year, week as u32)
}

/// Start of the bucket containing `date`
pub fn bucket_start(scale: RoadmapScale, date: NaiveDate) -> NaiveDate {
    match scale {
        RoadmapScale::Weeks => start_of_week(date),
        RoadmapScale::Months => start_of_month(date),
        RoadmapScale::Quarters => start_of_quarter(date),
    }
}

/// Start of the bucket following the one beginning at `start`
pub fn next_bucket_start(scale: RoadmapScale, start: NaiveDate) -> NaiveDate {
    // Any month start + 31 days lands inside the following month
    let next_month = |d: NaiveDate| start_of_month(start_of_month(d) + Duration::days(31));
    match scale {
        RoadmapScale::Weeks => start_of_week(start) + Duration::days(7),
        RoadmapScale::Months => next_month(start),
        RoadmapScale::Quarters => next_month(next_month(next_month(start_of_quarter(start)))),
    }
}

pub fn bucket_label(scale: RoadmapScale, start: NaiveDate) -> String {
    match scale {
        RoadmapScale::Weeks => format!("W{}", iso_week(start).1),
        RoadmapScale::Months => month_label(start),
        RoadmapScale::Quarters => format!("Q{} {}", start.month0() / 3 + 1, start.year()),
    }
}

/// Contiguous cells covering `PADDING_DAYS` before the earliest date to
/// `PADDING_DAYS` after the latest one. Empty input gives no cells.
pub fn build_buckets(scale: RoadmapScale, dates: &[NaiveDate]) -> Vec<Bucket> {
    let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) else {
        return Vec::new();
    };
    let from = *first - Duration::days(PADDING_DAYS);
    let to = *last + Duration::days(PADDING_DAYS);

    let mut buckets = Vec::new();
    let mut start = bucket_start(scale, from);
    while start <= to {
        let next = next_bucket_start(scale, start);
        buckets.push(Bucket {
            start,
            end: next - Duration::days(1),
            label: bucket_label(scale, start),
        });
        start = next;
    }
    buckets
}

/// Index of the first bucket containing `date` (linear scan)
pub fn find_bucket(buckets: &[Bucket], date: NaiveDate) -> Option<usize> {
    buckets.iter().position(|b| b.contains(date))
}

/// Assign milestones to buckets; milestones without a valid date are dropped
pub fn assign_milestones<'a>(buckets: &[Bucket], milestones: &'a [Milestone]) -> Vec<Vec<&'a Milestone>> {
    let mut assigned: Vec<Vec<&Milestone>> = vec![Vec::new(); buckets.len()];
    for milestone in milestones {
        if let Some(index) = milestone.day().and_then(|d| find_bucket(buckets, d)) {
            assigned[index].push(milestone);
        }
    }
    assigned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_week_reference_dates() {
        assert_eq!(iso_week(date(2024, 1, 1)), (2024, 1));
        // Sunday, belongs to the last week of 2022
        assert_eq!(iso_week(date(2023, 1, 1)), (2022, 52));
        assert_eq!(iso_week(date(2020, 12, 31)), (2020, 53));
        assert_eq!(iso_week(date(2021, 1, 3)), (2020, 53));
        assert_eq!(iso_week(date(2019, 12, 30)), (2020, 1));
    }

    #[test]
    fn test_iso_week_matches_chrono_for_a_decade() {
        let mut day = date(2015, 1, 1);
        while day < date(2026, 1, 1) {
            let expected = day.iso_week();
            assert_eq!(iso_week(day), (expected.year(), expected.week()), "{}", day);
            day = day + Duration::days(1);
        }
    }

    #[test]
    fn test_bucket_starts() {
        // 2024-05-16 is a Thursday
        let d = date(2024, 5, 16);
        assert_eq!(bucket_start(RoadmapScale::Weeks, d), date(2024, 5, 13));
        assert_eq!(bucket_start(RoadmapScale::Months, d), date(2024, 5, 1));
        assert_eq!(bucket_start(RoadmapScale::Quarters, d), date(2024, 4, 1));
        assert_eq!(bucket_start(RoadmapScale::Quarters, date(2024, 12, 31)), date(2024, 10, 1));
        assert_eq!(bucket_start(RoadmapScale::Weeks, date(2024, 5, 13)), date(2024, 5, 13));
    }

    #[test]
    fn test_next_bucket_start() {
        assert_eq!(next_bucket_start(RoadmapScale::Months, date(2024, 1, 1)), date(2024, 2, 1));
        assert_eq!(next_bucket_start(RoadmapScale::Months, date(2024, 2, 1)), date(2024, 3, 1));
        assert_eq!(next_bucket_start(RoadmapScale::Months, date(2024, 12, 1)), date(2025, 1, 1));
        assert_eq!(next_bucket_start(RoadmapScale::Quarters, date(2024, 10, 1)), date(2025, 1, 1));
        assert_eq!(next_bucket_start(RoadmapScale::Weeks, date(2024, 12, 30)), date(2025, 1, 6));
    }

    #[test]
    fn test_labels() {
        assert_eq!(bucket_label(RoadmapScale::Weeks, date(2024, 1, 1)), "W1");
        assert_eq!(bucket_label(RoadmapScale::Weeks, date(2022, 12, 26)), "W52");
        assert_eq!(bucket_label(RoadmapScale::Months, date(2024, 8, 1)), "ago 2024");
        assert_eq!(bucket_label(RoadmapScale::Quarters, date(2024, 7, 1)), "Q3 2024");
    }

    #[test]
    fn test_no_dates_no_buckets() {
        assert!(build_buckets(RoadmapScale::Months, &[]).is_empty());
    }

    #[test]
    fn test_month_buckets_span_padding() {
        let buckets = build_buckets(RoadmapScale::Months, &[date(2024, 3, 3), date(2024, 5, 28)]);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        // 7 days before Mar 3 is Feb 25; 7 days after May 28 is Jun 4
        assert_eq!(labels, vec!["feb 2024", "mar 2024", "apr 2024", "mag 2024", "giu 2024"]);
        assert_eq!(buckets[0].end, date(2024, 2, 29));
    }

    #[test]
    fn test_buckets_contiguous_and_covering() {
        let dates = [date(2023, 12, 30), date(2024, 2, 14), date(2024, 9, 2), date(2025, 1, 1)];
        for scale in [RoadmapScale::Weeks, RoadmapScale::Months, RoadmapScale::Quarters] {
            let buckets = build_buckets(scale, &dates);
            assert!(!buckets.is_empty());
            for pair in buckets.windows(2) {
                assert_eq!(pair[0].end + Duration::days(1), pair[1].start);
                assert!(pair[0].start <= pair[0].end);
            }
            assert!(buckets[0].start <= date(2023, 12, 23));
            assert!(buckets.last().unwrap().end >= date(2025, 1, 8));
            for d in dates {
                assert_eq!(buckets.iter().filter(|b| b.contains(d)).count(), 1);
            }
        }
    }

    #[test]
    fn test_week_buckets_are_monday_to_sunday() {
        let buckets = build_buckets(RoadmapScale::Weeks, &[date(2024, 1, 10)]);
        for b in &buckets {
            assert_eq!(weekday_index(b.start), 0);
            assert_eq!(weekday_index(b.end), 6);
        }
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["W1", "W2", "W3"]);
    }

    #[test]
    fn test_assign_milestones() {
        let milestones = vec![
            Milestone::new("m1", "A", "2024-03-31", ""),
            Milestone::new("m2", "B", "garbage", ""),
            Milestone::new("m3", "C", "2024-04-01", ""),
        ];
        let buckets = build_buckets(RoadmapScale::Months, &[date(2024, 3, 31), date(2024, 4, 1)]);
        let assigned = assign_milestones(&buckets, &milestones);

        let march = find_bucket(&buckets, date(2024, 3, 15)).unwrap();
        assert_eq!(assigned[march].len(), 1);
        assert_eq!(assigned[march][0].id, "m1");
        assert_eq!(assigned[march + 1][0].id, "m3");
        let total: usize = assigned.iter().map(Vec::len).sum();
        assert_eq!(total, 2);
    }
}
