//! Command-Line Interface Module
//!
//! Argument parsing and validation. Coordinate and query validity is
//! enforced here, at the boundary: everything past this module works
//! with values already known to be in range.

use clap::Parser;

// ===================== CLI =====================

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Observer latitude in decimal degrees (-90 to 90)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_latitude,
          requires = "longitude", env = "ATHAN_LATITUDE")]
    pub latitude: Option<f64>,

    /// Observer longitude in decimal degrees (-180 to 180)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_longitude,
          requires = "latitude", env = "ATHAN_LONGITUDE")]
    pub longitude: Option<f64>,

    /// Resolve the location from a city name instead of coordinates
    #[arg(long, conflicts_with_all = ["latitude", "longitude"])]
    pub city: Option<String>,

    /// Calculation method; resolved from the location's country when omitted
    #[arg(long, value_parser = crate::method::METHOD_KEYS, env = "ATHAN_METHOD")]
    pub method: Option<String>,

    /// Madhab governing the Asr shadow ratio
    #[arg(long, value_parser = ["shafi", "hanafi"], env = "ATHAN_MADHAB")]
    pub madhab: Option<String>,

    /// Apply the Ramadan interval refinement (Umm al-Qura: Isha at
    /// Maghrib + 120 min instead of + 90)
    #[arg(long, env = "ATHAN_RAMADAN")]
    pub ramadan: bool,

    /// Date for calculations (e.g. "2024-12-25" or "tomorrow"); defaults to today
    #[arg(long)]
    pub date: Option<String>,

    /// Time zone: "auto" (provider zone), "system", or an IANA name
    #[arg(long, default_value = "auto", env = "ATHAN_TIMEZONE")]
    pub timezone: String,

    /// Use UTC for display regardless of --timezone
    #[arg(long)]
    pub utc: bool,

    /// Emit a JSON document instead of the table
    #[arg(long)]
    pub json: bool,

    /// Do not persist this run as the next default session
    #[arg(long)]
    pub no_save: bool,
}

// ===================== CLI VALUE PARSERS =====================

fn parse_latitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-90.0..=90.0).contains(&v) {
        return Err(format!("Latitude must be between -90 and 90, got {}", v));
    }
    Ok(v)
}

fn parse_longitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-180.0..=180.0).contains(&v) {
        return Err(format!("Longitude must be between -180 and 180, got {}", v));
    }
    Ok(v)
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_bounds() {
        assert!(parse_latitude("51.5074").is_ok());
        assert!(parse_latitude("-90").is_ok());
        assert!(parse_latitude("90.0001").is_err());
        assert!(parse_latitude("north").is_err());
    }

    #[test]
    fn test_longitude_bounds() {
        assert!(parse_longitude("-0.1278").is_ok());
        assert!(parse_longitude("180").is_ok());
        assert!(parse_longitude("-180.5").is_err());
    }

    #[test]
    fn test_city_conflicts_with_coordinates() {
        let result =
            Args::try_parse_from(["athan", "--city", "Cairo", "--latitude", "30", "--longitude", "31"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_latitude_requires_longitude() {
        assert!(Args::try_parse_from(["athan", "--latitude", "30"]).is_err());
        assert!(Args::try_parse_from(["athan", "--latitude", "30", "--longitude", "31"]).is_ok());
    }

    #[test]
    fn test_method_keys_accepted() {
        for key in crate::method::METHOD_KEYS {
            let args = Args::try_parse_from(["athan", "--method", key]).unwrap();
            assert_eq!(args.method.as_deref(), Some(key));
        }
        assert!(Args::try_parse_from(["athan", "--method", "fancy"]).is_err());
    }
}
