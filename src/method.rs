//! Calculation Method Catalog Module
//!
//! Fixed parameter records for the published prayer-time calculation
//! methods, the madhab (Asr shadow ratio) setting, and the country-based
//! method suggestion heuristic.

use std::fmt;

// ===================== MADHAB =====================

/// Jurisprudential school governing the Asr shadow-ratio threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Madhab {
    Shafi,
    Hanafi,
}

impl Madhab {
    /// Shadow length (in object heights) beyond the noon shadow at Asr.
    pub fn shadow_ratio(self) -> f64 {
        match self {
            Self::Shafi => 1.0,
            Self::Hanafi => 2.0,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Shafi => "shafi",
            Self::Hanafi => "hanafi",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "shafi" => Some(Self::Shafi),
            "hanafi" => Some(Self::Hanafi),
            _ => None,
        }
    }
}

impl fmt::Display for Madhab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shafi => write!(f, "Shafi"),
            Self::Hanafi => write!(f, "Hanafi"),
        }
    }
}

// ===================== CALCULATION METHODS =====================

/// Closed set of supported calculation methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationMethod {
    MuslimWorldLeague,
    NorthAmerica,
    UmmAlQura,
    Egyptian,
    Karachi,
    MoonsightingCommittee,
    Dubai,
    Kuwait,
    Qatar,
    Singapore,
    Tehran,
    Turkey,
}

/// Stable CLI/persistence keys, in catalog order.
pub const METHOD_KEYS: [&str; 12] = [
    "mwl",
    "isna",
    "umm-al-qura",
    "egyptian",
    "karachi",
    "moonsighting",
    "dubai",
    "kuwait",
    "qatar",
    "singapore",
    "tehran",
    "turkey",
];

/// How a method defines the start of Isha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IshaRule {
    /// Depression angle in degrees below the horizon.
    Angle(f64),
    /// Fixed offset after Maghrib.
    Interval { minutes: i64 },
}

/// Fixed parameter record for one calculation method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodParameters {
    /// Fajr depression angle in degrees.
    pub fajr_angle: f64,
    pub isha: IshaRule,
    /// Marks interval methods whose authority publishes a longer Ramadan
    /// offset (Umm al-Qura: 90 min becomes 120 min).
    pub exception_region: bool,
}

impl MethodParameters {
    /// The same parameters with the Ramadan interval refinement applied.
    pub fn for_ramadan(self) -> Self {
        match self.isha {
            IshaRule::Interval { .. } if self.exception_region => {
                Self { isha: IshaRule::Interval { minutes: 120 }, ..self }
            }
            _ => self,
        }
    }
}

impl CalculationMethod {
    /// Published twilight parameters for this method.
    ///
    /// The values are fixed domain data; do not tune them. Two documented
    /// variants are deliberately not applied here: the Moonsighting
    /// Committee's seasonal UK/high-latitude adjustment (carried as plain
    /// 18°/18°) and the Shia convention of delaying Maghrib under the
    /// Tehran method (the angle table is applied uniformly).
    pub fn parameters(self) -> MethodParameters {
        match self {
            Self::MuslimWorldLeague => MethodParameters {
                fajr_angle: 18.0,
                isha: IshaRule::Angle(17.0),
                exception_region: false,
            },
            Self::NorthAmerica => MethodParameters {
                fajr_angle: 15.0,
                isha: IshaRule::Angle(15.0),
                exception_region: false,
            },
            Self::UmmAlQura => MethodParameters {
                fajr_angle: 18.5,
                isha: IshaRule::Interval { minutes: 90 },
                exception_region: true,
            },
            Self::Egyptian => MethodParameters {
                fajr_angle: 19.5,
                isha: IshaRule::Angle(17.5),
                exception_region: false,
            },
            Self::Karachi => MethodParameters {
                fajr_angle: 18.0,
                isha: IshaRule::Angle(18.0),
                exception_region: false,
            },
            Self::MoonsightingCommittee => MethodParameters {
                fajr_angle: 18.0,
                isha: IshaRule::Angle(18.0),
                exception_region: false,
            },
            Self::Dubai => MethodParameters {
                fajr_angle: 18.2,
                isha: IshaRule::Angle(18.2),
                exception_region: false,
            },
            Self::Kuwait => MethodParameters {
                fajr_angle: 18.0,
                isha: IshaRule::Angle(17.5),
                exception_region: false,
            },
            Self::Qatar => MethodParameters {
                fajr_angle: 18.0,
                isha: IshaRule::Interval { minutes: 90 },
                exception_region: false,
            },
            Self::Singapore => MethodParameters {
                fajr_angle: 20.0,
                isha: IshaRule::Angle(18.0),
                exception_region: false,
            },
            Self::Tehran => MethodParameters {
                fajr_angle: 17.7,
                isha: IshaRule::Angle(14.0),
                exception_region: false,
            },
            Self::Turkey => MethodParameters {
                fajr_angle: 18.0,
                isha: IshaRule::Angle(17.0),
                exception_region: false,
            },
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::MuslimWorldLeague => "mwl",
            Self::NorthAmerica => "isna",
            Self::UmmAlQura => "umm-al-qura",
            Self::Egyptian => "egyptian",
            Self::Karachi => "karachi",
            Self::MoonsightingCommittee => "moonsighting",
            Self::Dubai => "dubai",
            Self::Kuwait => "kuwait",
            Self::Qatar => "qatar",
            Self::Singapore => "singapore",
            Self::Tehran => "tehran",
            Self::Turkey => "turkey",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "mwl" => Some(Self::MuslimWorldLeague),
            "isna" => Some(Self::NorthAmerica),
            "umm-al-qura" => Some(Self::UmmAlQura),
            "egyptian" => Some(Self::Egyptian),
            "karachi" => Some(Self::Karachi),
            "moonsighting" => Some(Self::MoonsightingCommittee),
            "dubai" => Some(Self::Dubai),
            "kuwait" => Some(Self::Kuwait),
            "qatar" => Some(Self::Qatar),
            "singapore" => Some(Self::Singapore),
            "tehran" => Some(Self::Tehran),
            "turkey" => Some(Self::Turkey),
            _ => None,
        }
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MuslimWorldLeague => "Muslim World League",
            Self::NorthAmerica => "North America (ISNA)",
            Self::UmmAlQura => "Umm al-Qura",
            Self::Egyptian => "Egyptian General Authority",
            Self::Karachi => "University of Islamic Sciences, Karachi",
            Self::MoonsightingCommittee => "Moonsighting Committee",
            Self::Dubai => "Dubai",
            Self::Kuwait => "Kuwait",
            Self::Qatar => "Qatar",
            Self::Singapore => "Singapore (MUIS)",
            Self::Tehran => "Tehran (IOG)",
            Self::Turkey => "Turkey (Diyanet)",
        };
        write!(f, "{}", name)
    }
}

// ===================== METHOD SUGGESTION =====================

/// Country-name fragments in priority order; the first fragment found as
/// a substring wins.
const COUNTRY_FRAGMENTS: [(&str, CalculationMethod); 22] = [
    ("saudi", CalculationMethod::UmmAlQura),
    ("united arab emirates", CalculationMethod::Dubai),
    ("uae", CalculationMethod::Dubai),
    ("qatar", CalculationMethod::Qatar),
    ("kuwait", CalculationMethod::Kuwait),
    ("turkey", CalculationMethod::Turkey),
    ("türkiye", CalculationMethod::Turkey),
    ("iran", CalculationMethod::Tehran),
    ("pakistan", CalculationMethod::Karachi),
    ("india", CalculationMethod::Karachi),
    ("bangladesh", CalculationMethod::Karachi),
    ("singapore", CalculationMethod::Singapore),
    ("egypt", CalculationMethod::Egyptian),
    ("united states", CalculationMethod::NorthAmerica),
    ("usa", CalculationMethod::NorthAmerica),
    ("canada", CalculationMethod::NorthAmerica),
    ("united kingdom", CalculationMethod::MoonsightingCommittee),
    ("uk", CalculationMethod::MoonsightingCommittee),
    ("britain", CalculationMethod::MoonsightingCommittee),
    ("england", CalculationMethod::MoonsightingCommittee),
    ("indonesia", CalculationMethod::MoonsightingCommittee),
    ("malaysia", CalculationMethod::MoonsightingCommittee),
];

/// Recommend a calculation method for a country name.
///
/// Heuristic default, not authoritative; callers may always override.
/// Unknown or absent countries fall back to Muslim World League.
pub fn suggest_method(country: Option<&str>) -> CalculationMethod {
    let Some(country) = country else {
        return CalculationMethod::MuslimWorldLeague;
    };
    let country = country.to_lowercase();

    for (fragment, method) in COUNTRY_FRAGMENTS {
        if country.contains(fragment) {
            return method;
        }
    }
    CalculationMethod::MuslimWorldLeague
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_angles_exact() {
        let mwl = CalculationMethod::MuslimWorldLeague.parameters();
        assert_eq!(mwl.fajr_angle, 18.0);
        assert_eq!(mwl.isha, IshaRule::Angle(17.0));

        assert_eq!(CalculationMethod::NorthAmerica.parameters().fajr_angle, 15.0);
        assert_eq!(CalculationMethod::Egyptian.parameters().fajr_angle, 19.5);
        assert_eq!(CalculationMethod::Egyptian.parameters().isha, IshaRule::Angle(17.5));
        assert_eq!(CalculationMethod::Dubai.parameters().fajr_angle, 18.2);
        assert_eq!(CalculationMethod::Singapore.parameters().fajr_angle, 20.0);
        assert_eq!(CalculationMethod::Tehran.parameters().fajr_angle, 17.7);
        assert_eq!(CalculationMethod::Tehran.parameters().isha, IshaRule::Angle(14.0));
    }

    #[test]
    fn test_interval_methods() {
        let uaq = CalculationMethod::UmmAlQura.parameters();
        assert_eq!(uaq.fajr_angle, 18.5);
        assert_eq!(uaq.isha, IshaRule::Interval { minutes: 90 });
        assert!(uaq.exception_region);

        let qatar = CalculationMethod::Qatar.parameters();
        assert_eq!(qatar.isha, IshaRule::Interval { minutes: 90 });
        assert!(!qatar.exception_region);
    }

    #[test]
    fn test_ramadan_refinement() {
        let uaq = CalculationMethod::UmmAlQura.parameters().for_ramadan();
        assert_eq!(uaq.isha, IshaRule::Interval { minutes: 120 });

        // Qatar publishes no Ramadan variant; angle methods are untouched
        let qatar = CalculationMethod::Qatar.parameters().for_ramadan();
        assert_eq!(qatar.isha, IshaRule::Interval { minutes: 90 });
        let mwl = CalculationMethod::MuslimWorldLeague.parameters().for_ramadan();
        assert_eq!(mwl.isha, IshaRule::Angle(17.0));
    }

    #[test]
    fn test_keys_round_trip() {
        for key in METHOD_KEYS {
            let method = CalculationMethod::from_key(key).unwrap();
            assert_eq!(method.key(), key);
        }
        assert_eq!(CalculationMethod::from_key("nonsense"), None);
    }

    #[test]
    fn test_suggest_exact_countries() {
        assert_eq!(suggest_method(Some("Qatar")), CalculationMethod::Qatar);
        assert_eq!(suggest_method(Some("Saudi Arabia")), CalculationMethod::UmmAlQura);
        assert_eq!(suggest_method(Some("United Arab Emirates")), CalculationMethod::Dubai);
        assert_eq!(suggest_method(Some("Pakistan")), CalculationMethod::Karachi);
        assert_eq!(suggest_method(Some("Egypt")), CalculationMethod::Egyptian);
        assert_eq!(suggest_method(Some("United States")), CalculationMethod::NorthAmerica);
        assert_eq!(
            suggest_method(Some("United Kingdom")),
            CalculationMethod::MoonsightingCommittee
        );
    }

    #[test]
    fn test_suggest_case_insensitive_substring() {
        assert_eq!(suggest_method(Some("KINGDOM OF SAUDI ARABIA")), CalculationMethod::UmmAlQura);
        assert_eq!(suggest_method(Some("türkiye")), CalculationMethod::Turkey);
    }

    #[test]
    fn test_suggest_default() {
        assert_eq!(suggest_method(None), CalculationMethod::MuslimWorldLeague);
        assert_eq!(suggest_method(Some("")), CalculationMethod::MuslimWorldLeague);
        assert_eq!(suggest_method(Some("France")), CalculationMethod::MuslimWorldLeague);
    }

    #[test]
    fn test_madhab_shadow_ratio() {
        assert_eq!(Madhab::Shafi.shadow_ratio(), 1.0);
        assert_eq!(Madhab::Hanafi.shadow_ratio(), 2.0);
    }
}
