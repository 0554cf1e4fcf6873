//! Conversions between the engine's timeline and the host's local clock.
//!
//! The engine holds instants in UTC; everything it knows about the local
//! zone (offset, DST, historical changes) comes from the host's timezone
//! database via `system::sys_localtime`. Going the other way has no
//! direct host facility, so the UTC instant is recovered by guessing and
//! refining against the forward conversion.

use system::{sys_localtime, LocalFields};
use value::{DateTime, Error, UNIX_EPOCH_SECONDS};


/// Lowest instant the host facility is trusted with: 1970-01-01.
const LOCALTIME_MIN_MS: i64 = 210_866_760_000_000;

/// Highest instant the host facility is trusted with: 2038-01-18.
const LOCALTIME_MAX_MS: i64 = 213_014_145_600_000;


/// Replaces the value's fields with the local wall-clock rendering of its
/// instant.
///
/// The host's localtime facility traditionally only works for years
/// between 1970 and 2037. Instants outside that window are mapped onto an
/// equivalent year inside it (same leap-year phase), converted, and
/// mapped back.
pub(crate) fn to_localtime(p: &mut DateTime) -> Result<(), Error> {
    p.compute_jd();

    let (t, year_diff) = if p.jd_ms < LOCALTIME_MIN_MS || p.jd_ms > LOCALTIME_MAX_MS {
        let mut x = *p;
        x.compute_ymd_hms();
        let diff = (2000 + x.year % 4) - x.year;
        x.year += diff;
        x.valid_jd = false;
        x.compute_jd();
        (x.jd_ms / 1000 - UNIX_EPOCH_SECONDS, diff)
    }
    else {
        (p.jd_ms / 1000 - UNIX_EPOCH_SECONDS, 0)
    };

    let fields: LocalFields = match sys_localtime(t) {
        Some(fields) => fields,
        None => return Err(Error::LocalTimeUnavailable),
    };

    p.year = i64::from(fields.year) - year_diff;
    p.month = fields.month;
    p.day = fields.day;
    p.hour = fields.hour;
    p.minute = fields.minute;
    p.seconds = f64::from(fields.second) + (p.jd_ms % 1000) as f64 * 0.001;
    p.valid_ymd = true;
    p.valid_hms = true;
    p.valid_jd = false;
    p.raw_number = false;
    p.tz_minutes = 0;
    p.error = false;
    Ok(())
}

/// Replaces the value with the UTC instant whose local rendering is the
/// value's current fields.
///
/// There is no inverse facility to ask the host, so this guesses the UTC
/// instant, converts the guess forward, and subtracts the observed error,
/// refining at most three times. The result is a fresh value carrying
/// only the refined instant and the UTC mark.
pub(crate) fn to_utc(p: &mut DateTime) -> Result<(), Error> {
    if p.is_utc {
        return Ok(());
    }

    p.compute_jd();
    let original = p.jd_ms;
    let mut guess = original;
    let mut err = 0;
    let mut refinements = 0;

    loop {
        guess -= err;

        let mut probe = DateTime::empty();
        probe.jd_ms = guess;
        probe.valid_jd = true;
        to_localtime(&mut probe)?;
        probe.compute_jd();

        err = probe.jd_ms - original;
        if err == 0 || refinements >= 3 {
            break;
        }
        refinements += 1;
    }

    *p = DateTime::empty();
    p.jd_ms = guess;
    p.valid_jd = true;
    p.is_utc = true;
    Ok(())
}


#[cfg(test)]
#[cfg(unix)]
mod test {
    use super::{to_localtime, to_utc};
    use value::{DateTime, UNIX_EPOCH_MS};

    fn at_instant(ms: i64) -> DateTime {
        let mut p = DateTime::empty();
        p.jd_ms = ms;
        p.valid_jd = true;
        p
    }

    #[test]
    fn localtime_fills_fields() {
        let mut p = at_instant(UNIX_EPOCH_MS + 86_400_000);
        to_localtime(&mut p).unwrap();
        assert!(p.valid_ymd && p.valid_hms && !p.valid_jd);
    }

    #[test]
    fn utc_of_utc_is_a_no_op() {
        let mut p = at_instant(UNIX_EPOCH_MS);
        p.is_utc = true;
        let before = p;
        to_utc(&mut p).unwrap();
        assert_eq!(before, p);
    }

    #[test]
    fn round_trip_through_local() {
        // A midsummer noon is outside every DST transition window, so
        // the refinement loop must land back on the exact instant.
        let mut p = at_instant(UNIX_EPOCH_MS + 16_612 * 86_400_000 + 43_200_000);
        let original = p.jd_ms;
        to_localtime(&mut p).unwrap();
        p.is_local = true;
        to_utc(&mut p).unwrap();
        assert_eq!(p.jd_ms, original);
    }

    #[test]
    fn remapped_years_stay_remapped() {
        // 9999-12-31 is far past the host facility's window; the year
        // must come back unclamped.
        let mut p = DateTime::empty();
        p.year = 9999;
        p.month = 12;
        p.day = 31;
        p.valid_ymd = true;
        p.compute_jd();
        to_localtime(&mut p).unwrap();
        assert_eq!(p.year, 9999);
    }
}
