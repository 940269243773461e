//! Output Formatting Module
//!
//! Renders a computed prayer set as a terminal table or a JSON
//! document. This is the only place instants leave UTC: each event is
//! converted to the display zone exactly once, here.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::geocode::GeoLocation;
use crate::method::{CalculationMethod, Madhab};
use crate::prayer::PrayerSet;
use crate::time::format_clock;

// ===================== TERMINAL TABLE =====================

/// Print the prayer table.
///
/// `now` carries the current instant only when the table is for today in
/// the display zone; the first event still ahead gets a `(next)` marker,
/// mirroring what a timetable on the wall would highlight.
pub fn print_table(
    set: &PrayerSet,
    date: NaiveDate,
    tz: Tz,
    location: &GeoLocation,
    method: CalculationMethod,
    madhab: Madhab,
    now: Option<DateTime<Utc>>,
) {
    let place = location
        .display_name
        .clone()
        .unwrap_or_else(|| crate::geocode::format_coords(location.latitude, location.longitude));

    println!("{} — {}", date.format("%A, %-d %B %Y"), place);
    println!("{} · {} · {}", method, madhab, tz.name());
    println!();

    let events = set.events();
    let next = now.and_then(|t| events.iter().position(|(_, e)| *e > t));

    let width = events.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (i, (label, event)) in events.iter().enumerate() {
        let marker = if Some(i) == next { "  (next)" } else { "" };
        println!("  {:<width$}  {}{}", label, format_clock(*event, tz), marker, width = width);
    }
}

// ===================== JSON DOCUMENT =====================

/// Build the `--json` document. Instants are RFC 3339 in the display
/// zone so downstream consumers keep both the wall time and the offset.
pub fn json_document(
    set: &PrayerSet,
    date: NaiveDate,
    tz: Tz,
    location: &GeoLocation,
    method: CalculationMethod,
    madhab: Madhab,
) -> serde_json::Value {
    let times: serde_json::Map<String, serde_json::Value> = [
        ("fajr", set.fajr),
        ("sunrise", set.sunrise),
        ("dhuhr", set.dhuhr),
        ("asr", set.asr),
        ("maghrib", set.maghrib),
        ("isha", set.isha),
        ("midnight", set.midnight),
        ("last_third_start", set.last_third_start),
    ]
    .into_iter()
    .map(|(key, event)| {
        (key.to_string(), serde_json::Value::String(event.with_timezone(&tz).to_rfc3339()))
    })
    .collect();

    serde_json::json!({
        "date": date.format("%Y-%m-%d").to_string(),
        "timezone": tz.name(),
        "method": method.key(),
        "madhab": madhab.key(),
        "location": location,
        "times": times,
    })
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prayer;

    fn sample() -> (PrayerSet, NaiveDate, GeoLocation) {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let set = prayer::compute(
            date,
            51.5074,
            -0.1278,
            CalculationMethod::MuslimWorldLeague,
            Madhab::Shafi,
        );
        let location = GeoLocation {
            latitude: 51.5074,
            longitude: -0.1278,
            timezone: Some("Europe/London".into()),
            display_name: Some("London, England, United Kingdom".into()),
            country: Some("United Kingdom".into()),
            admin1: Some("England".into()),
        };
        (set, date, location)
    }

    #[test]
    fn test_json_document_shape() {
        let (set, date, location) = sample();
        let doc = json_document(
            &set,
            date,
            chrono_tz::Europe::London,
            &location,
            CalculationMethod::MuslimWorldLeague,
            Madhab::Shafi,
        );

        assert_eq!(doc["date"], "2024-06-21");
        assert_eq!(doc["timezone"], "Europe/London");
        assert_eq!(doc["method"], "mwl");
        assert_eq!(doc["madhab"], "shafi");
        assert_eq!(doc["location"]["country"], "United Kingdom");

        let times = doc["times"].as_object().unwrap();
        assert_eq!(times.len(), 8);
        // RFC 3339 with the BST offset, not Z
        let dhuhr = times["dhuhr"].as_str().unwrap();
        assert!(dhuhr.starts_with("2024-06-21T13:0"), "dhuhr {}", dhuhr);
        assert!(dhuhr.ends_with("+01:00"), "dhuhr {}", dhuhr);
    }

    #[test]
    fn test_json_location_carries_partial_record() {
        let (set, date, _) = sample();
        let bare = GeoLocation::from_coordinates(51.5074, -0.1278);
        let doc = json_document(
            &set,
            date,
            chrono_tz::UTC,
            &bare,
            CalculationMethod::MuslimWorldLeague,
            Madhab::Shafi,
        );
        assert_eq!(doc["location"]["display_name"], "51.5074, -0.1278");
        assert_eq!(doc["location"]["timezone"], serde_json::Value::Null);
    }
}
