//! The public operations over token lists.
//!
//! Every operation takes an ordered sequence of textual tokens: the first
//! token is the base value, and each one after it is a modifier applied
//! in order. An empty list means "now". The operations differ only in how
//! the finished value is rendered.

use diff;
use modifier::apply_modifier;
use parse::parse_base_token;
use strftime::{layout_date, layout_date_time, layout_time, DateFormat};
use value::{instant_in_range, DateTime, Error, MS_PER_DAY, UNIX_EPOCH_SECONDS};


/// Builds a value from a token list: base token, then each modifier in
/// sequence, then the finalization checks.
fn resolve(tokens: &[&str]) -> Result<DateTime, Error> {
    let mut p = DateTime::empty();

    if tokens.is_empty() {
        p.set_to_current()?;
    }
    else {
        parse_base_token(tokens[0], &mut p)?;
        for (idx, token) in tokens.iter().enumerate().skip(1) {
            apply_modifier(token, idx, &mut p)?;
        }
    }

    p.compute_jd();
    if p.error || !instant_in_range(p.jd_ms) {
        return Err(Error::RangeOverflow);
    }

    // A bare overflowed date such as 2023-02-31 must render normalized
    // (2023-03-03), so its calendar cache is dropped here and re-derived
    // from the instant on demand.
    if tokens.len() == 1 && p.valid_ymd && p.day > 28 {
        p.valid_ymd = false;
    }
    Ok(p)
}


/// Resolves the token list to its day count: the number of days, as a
/// real number, since day 0 of the proleptic timeline.
///
/// ```
/// use datefn::julian_day;
///
/// assert_eq!(julian_day(&["2000-01-01"]), Ok(2451544.5));
/// assert_eq!(julian_day(&["1970-01-01"]), Ok(2440587.5));
/// ```
pub fn julian_day(tokens: &[&str]) -> Result<f64, Error> {
    let p = resolve(tokens)?;
    Ok(p.jd_ms as f64 / MS_PER_DAY as f64)
}

/// Resolves the token list and renders it as `YYYY-MM-DD HH:MM:SS`, with
/// three fractional second digits if subsecond display was requested.
///
/// ```
/// use datefn::date_time;
///
/// assert_eq!(date_time(&["2451544.5", "+12 hours"]),
///            Ok("2000-01-01 12:00:00".to_string()));
/// ```
pub fn date_time(tokens: &[&str]) -> Result<String, Error> {
    let mut p = resolve(tokens)?;
    Ok(layout_date_time(&mut p))
}

/// Resolves the token list and renders its date as `YYYY-MM-DD`.
pub fn date(tokens: &[&str]) -> Result<String, Error> {
    let mut p = resolve(tokens)?;
    Ok(layout_date(&mut p))
}

/// Resolves the token list and renders its time of day as `HH:MM:SS`.
pub fn time(tokens: &[&str]) -> Result<String, Error> {
    let mut p = resolve(tokens)?;
    Ok(layout_time(&mut p))
}

/// Resolves the token list to whole seconds since 1970-01-01T00:00:00Z.
pub fn unix_epoch(tokens: &[&str]) -> Result<i64, Error> {
    let p = resolve(tokens)?;
    Ok(p.jd_ms / 1000 - UNIX_EPOCH_SECONDS)
}

/// Renders the signed calendar delta that turns the second value into the
/// first, as `±YYYY-MM-DD HH:MM:SS.SSS` with a zero-based day field.
/// Each argument is a single base token; modifiers are not accepted here.
///
/// ```
/// use datefn::time_diff;
///
/// assert_eq!(time_diff("2024-01-02", "2024-01-01"),
///            Ok("+0000-00-01 00:00:00.000".to_string()));
/// ```
pub fn time_diff(first: &str, second: &str) -> Result<String, Error> {
    let mut d1 = resolve(&[first])?;
    let mut d2 = resolve(&[second])?;
    Ok(diff::between(&mut d1, &mut d2))
}

/// Resolves the token list and renders it through a `%`-directive format
/// string. The token list must not be empty here.
///
/// ```
/// use datefn::strftime;
///
/// assert_eq!(strftime("%Y day %j", &["2024-03-01"]),
///            Ok("2024 day 061".to_string()));
/// ```
pub fn strftime(format: &str, tokens: &[&str]) -> Result<String, Error> {
    if tokens.is_empty() {
        return Err(Error::MalformedToken);
    }

    let mut p = resolve(tokens)?;
    let parsed = DateFormat::parse(format)?;
    p.compute_ymd_hms();
    Ok(parsed.format(&p))
}
