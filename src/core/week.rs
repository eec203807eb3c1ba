//! Release-week arithmetic
//!
//! A [`Week`] is a (year, ISO week number) pair with a Monday-start
//! convention. Weeks anchor release creation: previews build from the last
//! commit of the current week, snapshots from the last commit of the
//! previous one.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use std::fmt;

/// One Monday-to-Sunday calendar week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
  year: i32,
  number: u32,
}

impl Week {
  /// Week containing "now"
  pub fn current() -> Self {
    Self::containing(Utc::now())
  }

  /// Week containing the given instant
  ///
  /// Uses the ISO week-based year, so the returned pair is self-consistent
  /// in the first and last days of a calendar year.
  pub fn containing(at: DateTime<Utc>) -> Self {
    let iso = at.date_naive().iso_week();
    Self::new(iso.year(), iso.week())
  }

  /// Week from a (year, week number) pair
  ///
  /// A week number past the year's last ISO week rolls into the following
  /// year (week 53 of a 52-week year is week 1 of the next one), matching
  /// the calendar convention `previous()` relies on near year boundaries.
  pub fn new(year: i32, number: u32) -> Self {
    Self { year, number }
  }

  /// First second of the week (Monday 00:00:00 UTC)
  pub fn start(&self) -> DateTime<Utc> {
    // Week 1 exists for every ISO year; later numbers are consecutive
    // Mondays, which also gives out-of-range numbers their rollover
    // meaning.
    let first_monday = NaiveDate::from_isoywd_opt(self.year, 1, Weekday::Mon)
      .expect("ISO week 1 exists for every year");
    let monday = first_monday + Duration::weeks(i64::from(self.number) - 1);
    monday.and_hms_opt(0, 0, 0).expect("midnight is a valid time").and_utc()
  }

  /// Last second of the week (Sunday 23:59:59 UTC)
  pub fn end(&self) -> DateTime<Utc> {
    self.start() + Duration::weeks(1) - Duration::seconds(1)
  }

  /// The calendar week immediately preceding this one
  ///
  /// Derives a naive (calendar year, ISO week number) pair from the last
  /// second before `start()`, then verifies the constructed week actually
  /// contains that instant. The two disagree near year boundaries: the last
  /// days of December carry next year's week 1, and the first days of
  /// January carry the old year's week 52/53. The correction re-pairs the
  /// week number with the adjacent year.
  pub fn previous(&self) -> Week {
    let candidate = self.start() - Duration::seconds(1);

    let naive_year = candidate.year();
    let naive_number = candidate.date_naive().iso_week().week();
    let naive = Week::new(naive_year, naive_number);

    if candidate >= naive.start() && candidate <= naive.end() {
      return naive;
    }

    if candidate < naive.start() {
      // Early-January instant paired with the old year's high week number.
      return Week::new(naive_year - 1, naive_number);
    }

    // Late-December instant paired with the new year's week 1.
    Week::new(naive_year + 1, naive_number)
  }
}

impl fmt::Display for Week {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-W{:02}", self.year, self.number)
  }
}
