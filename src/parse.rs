//! Turning the base token of a token list into an initial value.
//!
//! The grammars here are deliberately strict: every numeric field has an
//! exact width and a closed range, and a token either matches one of the
//! alternatives completely or the whole parse fails. Modifier tokens go
//! through `modifier` instead; only the first token of a list lands here.

use util::RangeExt;
use value::{DateTime, Error};


/// Reads exactly `width` ASCII digits from the front of `z`, checks the
/// value against the closed bounds, and hands back the value along with
/// the rest of the input.
pub(crate) fn digits(z: &[u8], width: usize, min: i32, max: i32) -> Option<(i32, &[u8])> {
    if z.len() < width {
        return None;
    }

    let mut val = 0;
    for &c in &z[..width] {
        if !c.is_ascii_digit() {
            return None;
        }
        val = val * 10 + i32::from(c - b'0');
    }

    if val.is_within(min..max + 1) {
        Some((val, &z[width..]))
    }
    else {
        None
    }
}

/// Consumes one expected separator byte.
pub(crate) fn eat(z: &[u8], sep: u8) -> Option<&[u8]> {
    if z.first() == Some(&sep) {
        Some(&z[1..])
    }
    else {
        None
    }
}

fn skip_whitespace(mut z: &[u8]) -> &[u8] {
    while z.first().map_or(false, |c| c.is_ascii_whitespace()) {
        z = &z[1..];
    }
    z
}


/// Parses a timezone suffix on the end of a date or time: optional
/// whitespace, then either the zulu marker `Z`/`z` or `(+|-)HH:MM`, then
/// optional trailing whitespace and nothing else. A missing suffix is not
/// an error; leftover text is.
pub(crate) fn parse_timezone(z: &[u8], p: &mut DateTime) -> Result<(), Error> {
    let z = skip_whitespace(z);
    p.tz_minutes = 0;

    let sign = match z.first() {
        None => return Ok(()),
        Some(&b'-') => -1,
        Some(&b'+') => 1,
        Some(&b'Z') | Some(&b'z') => {
            p.is_local = false;
            p.is_utc = true;
            return expect_end(&z[1..]);
        }
        Some(_) => return Err(Error::MalformedToken),
    };

    let (hours, z) = digits(&z[1..], 2, 0, 14).ok_or(Error::MalformedToken)?;
    let z = eat(z, b':').ok_or(Error::MalformedToken)?;
    let (minutes, z) = digits(z, 2, 0, 59).ok_or(Error::MalformedToken)?;
    p.tz_minutes = sign * (minutes + hours * 60);
    expect_end(z)
}

fn expect_end(z: &[u8]) -> Result<(), Error> {
    if skip_whitespace(z).is_empty() {
        Ok(())
    }
    else {
        Err(Error::MalformedToken)
    }
}


/// Parses times of the form `HH:MM`, `HH:MM:SS`, or `HH:MM:SS.FFFF`,
/// plus an optional timezone suffix. The HH, MM, and SS must each be
/// exactly 2 digits; the fractional seconds can be any number of digits.
pub(crate) fn parse_hhmmss(z: &[u8], p: &mut DateTime) -> Result<(), Error> {
    let (hour, z) = digits(z, 2, 0, 24).ok_or(Error::MalformedToken)?;
    let z = eat(z, b':').ok_or(Error::MalformedToken)?;
    let (minute, mut z) = digits(z, 2, 0, 59).ok_or(Error::MalformedToken)?;

    let mut second = 0;
    let mut fraction = 0.0;
    if z.first() == Some(&b':') {
        let (s, mut rest) = digits(&z[1..], 2, 0, 59).ok_or(Error::MalformedToken)?;
        second = s;

        if rest.len() >= 2 && rest[0] == b'.' && rest[1].is_ascii_digit() {
            let mut scale = 1.0;
            rest = &rest[1..];
            while rest.first().map_or(false, |c| c.is_ascii_digit()) {
                fraction = fraction * 10.0 + f64::from(rest[0] - b'0');
                scale *= 10.0;
                rest = &rest[1..];
            }
            fraction /= scale;
        }
        z = rest;
    }

    p.valid_jd = false;
    p.raw_number = false;
    p.valid_hms = true;
    p.hour = hour;
    p.minute = minute;
    p.seconds = f64::from(second) + fraction;
    parse_timezone(z, p)
}


/// Parses dates of the form `[-]YYYY-MM-DD`, optionally followed by a run
/// of spaces or `T`s and a time-of-day per `parse_hhmmss`. The year is
/// exactly 4 digits (the sign is separate), month and day exactly 2.
pub(crate) fn parse_yyyymmdd(z: &[u8], p: &mut DateTime) -> Result<(), Error> {
    let (negative, z) = match z.first() {
        Some(&b'-') => (true, &z[1..]),
        _ => (false, z),
    };

    let (year, z) = digits(z, 4, 0, 9999).ok_or(Error::MalformedToken)?;
    let z = eat(z, b'-').ok_or(Error::MalformedToken)?;
    let (month, z) = digits(z, 2, 1, 12).ok_or(Error::MalformedToken)?;
    let z = eat(z, b'-').ok_or(Error::MalformedToken)?;
    let (day, mut z) = digits(z, 2, 1, 31).ok_or(Error::MalformedToken)?;

    while z.first().map_or(false, |&c| c.is_ascii_whitespace() || c == b'T') {
        z = &z[1..];
    }

    if z.is_empty() {
        p.valid_hms = false;
    }
    else {
        parse_hhmmss(z, p)?;
    }

    p.valid_jd = false;
    p.valid_ymd = true;
    p.year = if negative { -i64::from(year) } else { i64::from(year) };
    p.month = month;
    p.day = day;
    p.compute_floor();

    // A timezone makes the fields local; fold them into a UTC instant
    // right away.
    if p.tz_minutes != 0 {
        p.compute_jd();
    }
    Ok(())
}


/// A strict unsigned numeric literal: a digit first, then digits with at
/// most one decimal point among them.
fn is_numeric(z: &[u8]) -> bool {
    match z.first() {
        Some(c) if c.is_ascii_digit() => (),
        _ => return false,
    }

    let mut dots = 0;
    for &c in &z[1..] {
        if c == b'.' {
            dots += 1;
            if dots > 1 {
                return false;
            }
        }
        else if !c.is_ascii_digit() {
            return false;
        }
    }
    true
}


/// Parses the base token of a token list into `p`, trying in order: a
/// bare number (left ambiguous between day count and Unix seconds), an
/// ISO-like date, a bare time-of-day, and the literals `now` and
/// `subsec`/`subsecond`.
pub(crate) fn parse_base_token(token: &str, p: &mut DateTime) -> Result<(), Error> {
    let z = token.as_bytes();

    if is_numeric(z) {
        let r = token.parse::<f64>().map_err(|_| Error::MalformedToken)?;
        p.set_raw_number(r);
        return Ok(());
    }
    if parse_yyyymmdd(z, p).is_ok() {
        return Ok(());
    }
    if parse_hhmmss(z, p).is_ok() {
        return Ok(());
    }
    if token == "now" {
        return p.set_to_current();
    }
    if token == "subsec" || token == "subsecond" {
        p.subsec = true;
        return p.set_to_current();
    }
    Err(Error::MalformedToken)
}
