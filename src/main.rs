use chrono::Utc;
use chrono_english::{Dialect, parse_date_string};
use clap::Parser;

mod cli;
mod geocode;
mod method;
mod output;
mod prayer;
mod solar;
mod store;
mod time;

use cli::Args;
use geocode::{GeoLocation, Resolver};
use method::{CalculationMethod, Madhab};

// ===================== MAIN =====================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let state = store::load();
    let resolver = Resolver::new();

    // Location: explicit coordinates or city query win; otherwise the
    // previous session's location is reused as-is, without re-resolving.
    let location: GeoLocation = if let Some(query) = args.city.as_deref() {
        resolver.resolve_query(query)?
    } else if let (Some(latitude), Some(longitude)) = (args.latitude, args.longitude) {
        resolver.resolve_coordinates(latitude, longitude)
    } else if let Some(restored) = state.location() {
        restored
    } else {
        return Err("no location: pass --city NAME or --latitude/--longitude \
                    (after one successful run the location is remembered)"
            .into());
    };

    // Method: explicit, else last-used, else suggested from the country.
    let method = args
        .method
        .as_deref()
        .or(state.method.as_deref())
        .and_then(CalculationMethod::from_key)
        .unwrap_or_else(|| {
            let suggested = method::suggest_method(location.country.as_deref());
            if let Some(country) = location.country.as_deref() {
                eprintln!("Note: using the {} method (suggested for {})", suggested, country);
            }
            suggested
        });

    let madhab = args
        .madhab
        .as_deref()
        .or(state.madhab.as_deref())
        .and_then(Madhab::from_key)
        .unwrap_or(Madhab::Shafi);

    let tz = time::select_timezone(&args.timezone, args.utc, location.timezone.as_deref());

    // Anchor "today" to the display zone before parsing the date input.
    let now = Utc::now();
    let anchor = now.with_timezone(&tz);
    let date = match args.date.as_deref() {
        Some(s) => parse_date_string(s, anchor, Dialect::Us)?.date_naive(),
        None => anchor.date_naive(),
    };

    let mut params = method.parameters();
    if args.ramadan {
        params = params.for_ramadan();
    }
    let set = prayer::compute_with_params(date, location.latitude, location.longitude, &params, madhab);

    if args.json {
        let doc = output::json_document(&set, date, tz, &location, method, madhab);
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        // Only today's table gets the (next) marker
        let now_marker = if date == anchor.date_naive() { Some(now) } else { None };
        output::print_table(&set, date, tz, &location, method, madhab, now_marker);
    }

    if !args.no_save {
        store::save(&store::SessionState::from_run(&location, method.key(), madhab.key()));
    }

    Ok(())
}
