//! Prayer Time Computation Module
//!
//! Assembles the daily prayer set from the solar geometry solvers,
//! applies the configured method and madhab, resolves degenerate
//! high-latitude dates with the middle-of-the-night rule, and derives
//! the two night-fraction events from the following day's Fajr.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::method::{CalculationMethod, IshaRule, Madhab, MethodParameters};
use crate::solar::{RISE_SET_ANGLE, SolarDay};

// ===================== TYPES =====================

/// The ordered daily prayer set for one calendar date at one location.
///
/// All instants are UTC; conversion to a display zone happens once at the
/// output boundary. A set is created fresh per computation and never
/// patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrayerSet {
    pub fajr: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub dhuhr: DateTime<Utc>,
    pub asr: DateTime<Utc>,
    pub maghrib: DateTime<Utc>,
    pub isha: DateTime<Utc>,
    pub midnight: DateTime<Utc>,
    pub last_third_start: DateTime<Utc>,
}

impl PrayerSet {
    /// The eight events in chronological display order, labeled.
    pub fn events(&self) -> [(&'static str, DateTime<Utc>); 8] {
        [
            ("Fajr", self.fajr),
            ("Sunrise", self.sunrise),
            ("Dhuhr", self.dhuhr),
            ("Asr", self.asr),
            ("Maghrib", self.maghrib),
            ("Isha", self.isha),
            ("Midnight", self.midnight),
            ("Last Third of the Night", self.last_third_start),
        ]
    }
}

// ===================== COMPUTATION =====================

/// Compute the prayer set for a date and coordinate.
///
/// Pure and total over the coordinate domain: degenerate high-latitude
/// dates are resolved by the middle-of-the-night rule, never surfaced as
/// errors.
pub fn compute(
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    method: CalculationMethod,
    madhab: Madhab,
) -> PrayerSet {
    compute_with_params(date, latitude, longitude, &method.parameters(), madhab)
}

/// Like [`compute`] but with an explicit parameter record, which lets the
/// caller apply the Ramadan interval refinement first.
pub fn compute_with_params(
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    params: &MethodParameters,
    madhab: Madhab,
) -> PrayerSet {
    let today = day_times(date, latitude, longitude, params, madhab);

    // The night-fraction events need tomorrow's Fajr, so the whole solar
    // computation runs again for date+1. Cheap enough to stay stateless.
    let next_date = date.succ_opt().unwrap_or(date);
    let tomorrow = day_times(next_date, latitude, longitude, params, madhab);

    let maghrib = instant(date, today.maghrib);
    let next_fajr = instant(next_date, tomorrow.fajr);
    let night = next_fajr - maghrib;

    PrayerSet {
        fajr: instant(date, today.fajr),
        sunrise: instant(date, today.sunrise),
        dhuhr: instant(date, today.dhuhr),
        asr: instant(date, today.asr),
        maghrib,
        isha: instant(date, today.isha),
        midnight: maghrib + night / 2,
        last_third_start: next_fajr - night / 3,
    }
}

/// Single-day event times in fractional hours UTC.
struct DayTimes {
    fajr: f64,
    sunrise: f64,
    dhuhr: f64,
    asr: f64,
    maghrib: f64,
    isha: f64,
}

fn day_times(
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    params: &MethodParameters,
    madhab: Madhab,
) -> DayTimes {
    let day = SolarDay::new(date, latitude, longitude);

    let dhuhr = day.transit();
    let sunrise = day.morning_event_clamped(RISE_SET_ANGLE);
    let maghrib = day.evening_event_clamped(RISE_SET_ANGLE);
    let asr = day.shadow_event(madhab.shadow_ratio());

    // Middle-of-the-night rule: twilight events may not go deeper into
    // the night than half the sunset-to-sunrise span.
    let half_night = (24.0 - (maghrib - sunrise)) / 2.0;

    let fajr = match day.morning_event(params.fajr_angle) {
        Some(t) if sunrise - t <= half_night => t,
        _ => sunrise - half_night,
    };

    let isha = match params.isha {
        IshaRule::Angle(angle) => match day.evening_event(angle) {
            Some(t) if t - maghrib <= half_night => t,
            _ => maghrib + half_night,
        },
        IshaRule::Interval { minutes } => maghrib + minutes as f64 / 60.0,
    };

    DayTimes { fajr, sunrise, dhuhr, asr, maghrib, isha }
}

/// Materialize fractional hours UTC on a date as an instant.
///
/// Hours may fall outside 0..24 away from the Greenwich meridian; the
/// duration arithmetic places the instant on the neighboring UTC day
/// where that is the correct answer.
fn instant(date: NaiveDate, hours: f64) -> DateTime<Utc> {
    let midnight = date.and_hms_opt(0, 0, 0).expect("midnight always exists").and_utc();
    midnight + Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

// ===================== TESTS =====================
