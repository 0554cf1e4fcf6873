//! Calendar-aware differences between two values.

use value::DateTime;


/// The rebasing constant for decoding a difference: an instant offset
/// that lands on the start of year 0, so running the residual through the
/// ordinary instant-to-calendar path reads the delta's own year, month,
/// and day fields straight out of the decoded value.
const DELTA_EPOCH_MS: i64 = 148_699_540_800_000;


/// Renders the signed calendar delta that, applied as a modifier to the
/// second value, reproduces the first value's date and time of day.
///
/// The year and month components are walked on the calendar (so a "one
/// month" step covers however many days that month has); the leftover
/// whole days and time of day come straight off the instants. The day
/// field of the rendering is zero-based.
pub(crate) fn between(d1: &mut DateTime, d2: &mut DateTime) -> String {
    d1.compute_ymd_hms();
    d2.compute_ymd_hms();

    let sign;
    let mut years;
    let mut months;

    if d1.jd_ms >= d2.jd_ms {
        sign = '+';
        years = d1.year - d2.year;
        if years != 0 {
            d2.year = d1.year;
            d2.valid_jd = false;
            d2.compute_jd();
        }
        months = d1.month - d2.month;
        if months < 0 {
            years -= 1;
            months += 12;
        }
        if months != 0 {
            d2.month = d1.month;
            d2.valid_jd = false;
            d2.compute_jd();
        }

        // The month walk may have overshot past d1 (a 31st landing in a
        // shorter month); back the trial alignment off a month at a time
        // until it no longer does.
        while d1.jd_ms < d2.jd_ms {
            months -= 1;
            if months < 0 {
                months = 11;
                years -= 1;
            }
            d2.month -= 1;
            if d2.month < 1 {
                d2.month = 12;
                d2.year -= 1;
            }
            d2.valid_jd = false;
            d2.compute_jd();
        }

        d1.jd_ms -= d2.jd_ms;
        d1.jd_ms += DELTA_EPOCH_MS;
    }
    else {
        sign = '-';
        years = d2.year - d1.year;
        if years != 0 {
            d2.year = d1.year;
            d2.valid_jd = false;
            d2.compute_jd();
        }
        months = d2.month - d1.month;
        if months < 0 {
            years -= 1;
            months += 12;
        }
        if months != 0 {
            d2.month = d1.month;
            d2.valid_jd = false;
            d2.compute_jd();
        }

        while d1.jd_ms > d2.jd_ms {
            months -= 1;
            if months < 0 {
                months = 11;
                years -= 1;
            }
            d2.month += 1;
            if d2.month > 12 {
                d2.month = 1;
                d2.year += 1;
            }
            d2.valid_jd = false;
            d2.compute_jd();
        }

        d1.jd_ms = d2.jd_ms - d1.jd_ms;
        d1.jd_ms += DELTA_EPOCH_MS;
    }

    d1.clear_field_caches();
    d1.compute_ymd_hms();

    format!("{}{:04}-{:02}-{:02} {:02}:{:02}:{:06.3}",
            sign, years, months, d1.day - 1, d1.hour, d1.minute, d1.seconds)
}
