//! Time and Timezone Utilities Module
//!
//! Display-zone selection and clock formatting. There is no geodesic
//! coordinate-to-zone lookup here: the zone comes from the provider, an
//! explicit IANA name, or the system, in that order of specificity.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use iana_time_zone::get_timezone;

// ===================== TIMEZONE SELECTION =====================

/// Get the system's configured timezone.
///
/// Falls back to UTC if the system timezone cannot be determined.
pub fn system_timezone() -> Tz {
    get_timezone().ok().and_then(|s| s.parse().ok()).unwrap_or(Tz::UTC)
}

/// Pick the display timezone.
///
/// `choice` is the CLI value: "auto" takes the provider-supplied zone
/// when present, "system" the machine zone, anything else parses as an
/// IANA name. `utc` overrides everything. Unusable zone strings degrade
/// to the system zone with a notice on stderr rather than failing the
/// run.
pub fn select_timezone(choice: &str, utc: bool, provider_zone: Option<&str>) -> Tz {
    if utc {
        return Tz::UTC;
    }

    match choice {
        "system" => system_timezone(),
        "auto" => match provider_zone {
            Some(zone) => zone.parse().unwrap_or_else(|_| {
                eprintln!("Warning: unknown provider timezone '{}', using system zone", zone);
                system_timezone()
            }),
            None => system_timezone(),
        },
        explicit => explicit.parse().unwrap_or_else(|_| {
            eprintln!("Warning: unknown timezone '{}', using system zone", explicit);
            system_timezone()
        }),
    }
}

// ===================== FORMATTING =====================

/// Wall-clock "HH:MM" in the display zone.
pub fn format_clock(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}

// ===================== TESTS =====================
