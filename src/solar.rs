//! Solar Geometry Module
//!
//! Low-precision solar position (declination and equation of time) and
//! hour-angle solvers for depression-angle and shadow-ratio events.
//! Accurate to about a minute, which is enough for a prayer timetable;
//! no ephemeris lookup.

use chrono::{Datelike, NaiveDate};

// ===================== CONSTANTS =====================

/// Depression angle for sunrise/sunset in degrees.
///
/// Covers atmospheric refraction plus the solar disk semi-diameter.
pub const RISE_SET_ANGLE: f64 = 0.833;

/// J2000.0 epoch as a Julian day number.
const J2000: f64 = 2_451_545.0;

// ===================== ANGLE HELPERS =====================

fn wrap(value: f64, range: f64) -> f64 {
    let v = value - range * (value / range).floor();
    if v < 0.0 { v + range } else { v }
}

fn wrap_angle(degrees: f64) -> f64 {
    wrap(degrees, 360.0)
}

fn wrap_hour(hours: f64) -> f64 {
    wrap(hours, 24.0)
}

// ===================== SUN POSITION =====================

/// Julian day number for a calendar date at 0h UT.
pub fn julian_day(date: NaiveDate) -> f64 {
    let mut year = date.year();
    let mut month = date.month() as i32;
    let day = date.day() as f64;

    if month <= 2 {
        year -= 1;
        month += 12;
    }

    let a = (year as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (year as f64 + 4716.0)).floor()
        + (30.6001 * (month as f64 + 1.0)).floor()
        + day
        + b
        - 1524.5
}

/// Solar declination and equation of time for one instant.
#[derive(Debug, Clone, Copy)]
pub struct SunPosition {
    /// Declination in degrees.
    pub declination: f64,
    /// Equation of time in hours (apparent minus mean solar time).
    pub equation_of_time: f64,
}

/// Low-precision solar position for a Julian day.
///
/// Standard truncated series: mean anomaly and mean longitude advance
/// linearly from J2000, the ecliptic longitude carries the two largest
/// perturbation terms, and declination/right ascension follow from the
/// slowly drifting obliquity.
pub fn sun_position(jd: f64) -> SunPosition {
    let d = jd - J2000;

    let g = wrap_angle(357.529 + 0.985_600_28 * d);
    let q = wrap_angle(280.459 + 0.985_647_36 * d);
    let l = wrap_angle(q + 1.915 * g.to_radians().sin() + 0.020 * (2.0 * g).to_radians().sin());

    let e = 23.439 - 0.000_000_36 * d;

    let ra_hours = (e.to_radians().cos() * l.to_radians().sin())
        .atan2(l.to_radians().cos())
        .to_degrees()
        / 15.0;

    // Near the equinox wrap, mean longitude and right ascension sit on
    // opposite sides of the 24h seam; fold the difference back so the
    // equation of time stays a small correction.
    let mut eqt = q / 15.0 - wrap_hour(ra_hours);
    eqt -= 24.0 * (eqt / 24.0).round();

    SunPosition {
        declination: (e.to_radians().sin() * l.to_radians().sin()).asin().to_degrees(),
        equation_of_time: eqt,
    }
}

// ===================== SOLAR DAY CONTEXT =====================

/// Solar geometry for one observer on one calendar date.
///
/// All event solvers return fractional hours UTC on that date; values may
/// fall outside 0..24 away from the Greenwich meridian, and callers keep
/// them unwrapped so that instants land on the correct UTC day.
#[derive(Debug, Clone, Copy)]
pub struct SolarDay {
    pub latitude: f64,
    pub longitude: f64,
    position: SunPosition,
}

impl SolarDay {
    pub fn new(date: NaiveDate, latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude, position: sun_position(julian_day(date)) }
    }

    /// Solar noon (transit) in fractional hours UTC.
    pub fn transit(&self) -> f64 {
        12.0 - self.position.equation_of_time - self.longitude / 15.0
    }

    /// Half the time the sun spends above the `-angle` depression line,
    /// in hours, or `None` when the sun never crosses it on this date.
    fn depression_hour_angle(&self, angle: f64) -> Option<f64> {
        let cos_h = self.depression_cos(angle);
        if cos_h.abs() > 1.0 {
            return None;
        }
        Some(cos_h.acos().to_degrees() / 15.0)
    }

    /// Like [`Self::depression_hour_angle`] but clamped so a value always
    /// exists: polar night collapses the event onto the transit, polar
    /// day pushes it 12 hours out.
    fn depression_hour_angle_clamped(&self, angle: f64) -> f64 {
        self.depression_cos(angle).clamp(-1.0, 1.0).acos().to_degrees() / 15.0
    }

    fn depression_cos(&self, angle: f64) -> f64 {
        let lat = self.latitude.to_radians();
        let decl = self.position.declination.to_radians();
        (-angle.to_radians().sin() - decl.sin() * lat.sin()) / (decl.cos() * lat.cos())
    }

    /// Morning crossing of a depression angle (hours UTC), if any.
    pub fn morning_event(&self, angle: f64) -> Option<f64> {
        self.depression_hour_angle(angle).map(|t| self.transit() - t)
    }

    /// Evening crossing of a depression angle (hours UTC), if any.
    pub fn evening_event(&self, angle: f64) -> Option<f64> {
        self.depression_hour_angle(angle).map(|t| self.transit() + t)
    }

    /// Morning crossing with the clamped solver (total).
    pub fn morning_event_clamped(&self, angle: f64) -> f64 {
        self.transit() - self.depression_hour_angle_clamped(angle)
    }

    /// Evening crossing with the clamped solver (total).
    pub fn evening_event_clamped(&self, angle: f64) -> f64 {
        self.transit() + self.depression_hour_angle_clamped(angle)
    }

    /// Afternoon instant at which shadow length reaches
    /// `ratio × object height` beyond the noon shadow (hours UTC).
    ///
    /// The shadow-ratio condition converts to an elevation threshold via
    /// `cot(elevation) = ratio + tan|latitude - declination|`, which then
    /// feeds the same hour-angle solver as the twilight events.
    pub fn shadow_event(&self, ratio: f64) -> f64 {
        let offset = (self.latitude - self.position.declination).to_radians().abs();
        let elevation = (1.0 / (ratio + offset.tan())).atan().to_degrees();
        self.transit() + self.depression_hour_angle_clamped(-elevation)
    }
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_julian_day_epoch() {
        // J2000.0 is 2000-01-01 12:00; at 0h UT the value is .5 lower
        assert_eq!(julian_day(date(2000, 1, 1)), 2_451_544.5);
        assert_eq!(julian_day(date(2024, 6, 21)), 2_460_482.5);
    }

    #[test]
    fn test_declination_solstices_and_equinox() {
        let summer = sun_position(julian_day(date(2024, 6, 21)));
        assert!((summer.declination - 23.44).abs() < 0.1, "summer {}", summer.declination);

        let winter = sun_position(julian_day(date(2024, 12, 21)));
        assert!((winter.declination + 23.44).abs() < 0.1, "winter {}", winter.declination);

        let equinox = sun_position(julian_day(date(2024, 3, 20)));
        assert!(equinox.declination.abs() < 0.5, "equinox {}", equinox.declination);
    }

    #[test]
    fn test_equation_of_time_bounds() {
        // The equation of time stays within roughly ±17 minutes all year
        for day in 0..366 {
            let d = date(2024, 1, 1) + chrono::Duration::days(day);
            let eqt_minutes = sun_position(julian_day(d)).equation_of_time * 60.0;
            assert!(eqt_minutes.abs() < 17.5, "{}: {} min", d, eqt_minutes);
        }
    }

    #[test]
    fn test_equation_of_time_extremes() {
        // Early November: sun runs ~16 min fast; mid-February: ~14 min slow
        let november = sun_position(julian_day(date(2024, 11, 3))).equation_of_time * 60.0;
        assert!(november > 15.0 && november < 17.5, "november {}", november);

        let february = sun_position(julian_day(date(2024, 2, 12))).equation_of_time * 60.0;
        assert!(february < -13.0 && february > -15.5, "february {}", february);
    }

    #[test]
    fn test_transit_follows_longitude() {
        let d = date(2024, 3, 20);
        let greenwich = SolarDay::new(d, 51.5, 0.0);
        let cairo = SolarDay::new(d, 30.0, 31.24);

        // 31.24°E runs about 2h05m ahead of Greenwich in solar time
        let shift = greenwich.transit() - cairo.transit();
        assert!((shift - 31.24 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_equator_day_near_twelve_hours() {
        let day = SolarDay::new(date(2024, 3, 20), 0.0, 0.0);
        let sunrise = day.morning_event(RISE_SET_ANGLE).unwrap();
        let sunset = day.evening_event(RISE_SET_ANGLE).unwrap();

        // Refraction makes the day slightly longer than 12h at the equator
        let length = sunset - sunrise;
        assert!(length > 12.0 && length < 12.3, "day length {}", length);
    }

    #[test]
    fn test_no_astronomical_twilight_in_london_midsummer() {
        // London never reaches 18° depression around the June solstice
        let day = SolarDay::new(date(2024, 6, 21), 51.5074, -0.1278);
        assert!(day.morning_event(18.0).is_none());
        assert!(day.evening_event(18.0).is_none());

        // But civil dawn/dusk still exist
        assert!(day.morning_event(6.0).is_some());
        assert!(day.evening_event(6.0).is_some());
    }

    #[test]
    fn test_clamped_solver_polar_day() {
        // Tromsø under the midnight sun: the clamped solver degrades to
        // transit ± 12h instead of failing
        let day = SolarDay::new(date(2024, 6, 21), 69.6492, 18.9553);
        assert!(day.morning_event(RISE_SET_ANGLE).is_none());

        let sunrise = day.morning_event_clamped(RISE_SET_ANGLE);
        let sunset = day.evening_event_clamped(RISE_SET_ANGLE);
        assert!((sunset - sunrise - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_shadow_event_after_transit() {
        let day = SolarDay::new(date(2024, 6, 21), 51.5074, -0.1278);
        let asr_standard = day.shadow_event(1.0);
        let asr_hanafi = day.shadow_event(2.0);

        assert!(asr_standard > day.transit());
        // A longer shadow threshold is reached later in the afternoon
        assert!(asr_hanafi > asr_standard);
        assert!(asr_hanafi < day.evening_event(RISE_SET_ANGLE).unwrap());
    }
}
