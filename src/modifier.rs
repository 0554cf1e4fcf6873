//! The modifier pipeline.
//!
//! Every token after the base value names one transformation of the
//! value, applied strictly left to right. A token is first recognized
//! into a `Modifier` (dispatching on its lowercased first byte) and then
//! applied as a single state transition. Three of the modifiers are only
//! legal as the very first one, because they settle how a bare number is
//! to be read.

use parse::{digits, eat, parse_hhmmss};
use util::RangeExt;
use value::{DateTime, Error, MS_PER_DAY, MS_PER_HALF_DAY, UNIX_EPOCH_MS};
use zone;


/// One recognized modifier, carrying whatever the token spelled out.
#[derive(PartialEq, Debug, Clone, Copy)]
pub(crate) enum Modifier {

    /// Classify a bare number as day count or epoch seconds by magnitude.
    Auto,

    /// Resolve day-of-month overflow by rolling forward (the default, so
    /// this only discards the caches and the floor counter).
    Ceiling,

    /// Resolve day-of-month overflow by rolling back to the end of the
    /// intended month.
    Floor,

    /// Insist the prior bare number was a day count.
    JulianDay,

    /// Shift to the host's local wall clock.
    LocalTime,

    /// Reinterpret the prior bare number as seconds since the Unix epoch.
    UnixEpoch,

    /// Shift a local value back to UTC.
    Utc,

    /// Advance to the next occurrence of this weekday (Sunday is 0).
    Weekday(i64),

    /// Truncate to the start of a period.
    StartOf(Boundary),

    /// Show subsecond precision on output.
    Subsec,

    /// `(+|-)YYYY-MM-DD [HH:MM[:SS[.F…]]]`: a calendar-aware delta.
    DateDelta {
        negative: bool,
        years: i64,
        months: i32,
        days: i64,
        clock_ms: Option<i64>,
    },

    /// `(+|-)HH:MM[:SS[.F…]]`: a within-a-day delta, in milliseconds.
    TimeDelta(i64),

    /// `NNN[.F…] <unit>`: a delta in a named unit.
    UnitDelta { amount: f64, unit: Unit },
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(crate) enum Boundary {
    Day,
    Month,
    Year,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(crate) enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl Unit {

    /// How many seconds one of this unit is worth. Months and years use
    /// their nominal lengths; their whole parts go through the calendar
    /// instead and only the fraction is charged at this rate.
    fn seconds(self) -> f64 {
        match self {
            Unit::Second => 1.0,
            Unit::Minute => 60.0,
            Unit::Hour   => 3600.0,
            Unit::Day    => 86400.0,
            Unit::Month  => 2_592_000.0,
            Unit::Year   => 31_536_000.0,
        }
    }
}


struct Transform {
    name: &'static str,
    limit: f64,
    unit: Unit,
}

/// The unit-delta table: name, largest accepted magnitude (exclusive),
/// and which unit it stands for. One trailing `s` on the token's unit
/// name is dropped before lookup.
static TRANSFORMS: [Transform; 6] = [
    Transform { name: "second", limit: 4.6427e14, unit: Unit::Second },
    Transform { name: "minute", limit: 7.7379e12, unit: Unit::Minute },
    Transform { name: "hour",   limit: 1.2897e11, unit: Unit::Hour },
    Transform { name: "day",    limit: 5_373_485.0, unit: Unit::Day },
    Transform { name: "month",  limit: 176_546.0, unit: Unit::Month },
    Transform { name: "year",   limit: 14_713.0, unit: Unit::Year },
];


/// Recognizes and applies one modifier token. `idx` is the token's
/// 1-based position in the whole token list (the base value is 0).
pub(crate) fn apply_modifier(token: &str, idx: usize, p: &mut DateTime) -> Result<(), Error> {
    let modifier = recognize(token, idx)?;
    apply(modifier, p)
}


pub(crate) fn recognize(token: &str, idx: usize) -> Result<Modifier, Error> {
    let first = match token.as_bytes().first() {
        Some(&c) => c.to_ascii_lowercase(),
        None => return Err(Error::UnknownModifier),
    };

    match first {
        b'a' if token == "auto"       => restrict_order(idx, Modifier::Auto),
        b'c' if token == "ceiling"    => Ok(Modifier::Ceiling),
        b'f' if token == "floor"      => Ok(Modifier::Floor),
        b'j' if token == "julianday"  => restrict_order(idx, Modifier::JulianDay),
        b'l' if token == "localtime"  => Ok(Modifier::LocalTime),
        b'u' if token == "unixepoch"  => restrict_order(idx, Modifier::UnixEpoch),
        b'u' if token == "utc"        => Ok(Modifier::Utc),
        b'w' if token.starts_with("weekday ") => weekday(&token[8..]),
        b's' if token.starts_with("start of ") => start_of(&token[9..]),
        b's' if token == "subsec" || token == "subsecond" => Ok(Modifier::Subsec),
        b'+' | b'-' | b'0'..=b'9' => numeric(token),
        _ => Err(Error::UnknownModifier),
    }
}

/// The classifying modifiers must be the very first modifier; anywhere
/// later in the list is an ordering error.
fn restrict_order(idx: usize, modifier: Modifier) -> Result<Modifier, Error> {
    if idx > 1 {
        Err(Error::ModifierOrder)
    }
    else {
        Ok(modifier)
    }
}

fn weekday(rest: &str) -> Result<Modifier, Error> {
    let n = rest.trim().parse::<f64>().map_err(|_| Error::UnknownModifier)?;
    if n.is_within(0.0..7.0) && n == (n as i64) as f64 {
        Ok(Modifier::Weekday(n as i64))
    }
    else {
        Err(Error::UnknownModifier)
    }
}

fn start_of(rest: &str) -> Result<Modifier, Error> {
    match rest {
        "day"   => Ok(Modifier::StartOf(Boundary::Day)),
        "month" => Ok(Modifier::StartOf(Boundary::Month)),
        "year"  => Ok(Modifier::StartOf(Boundary::Year)),
        _       => Err(Error::UnknownModifier),
    }
}

/// Recognizes the three numeric-leading modifier shapes.
fn numeric(token: &str) -> Result<Modifier, Error> {
    let z = token.as_bytes();
    let signed = z[0] == b'+' || z[0] == b'-';
    let negative = z[0] == b'-';

    // Find where the number stops being a plain number: a colon starts a
    // clock delta, whitespace starts a unit name, and a dash right after
    // a 4- or 5-digit year starts a calendar delta.
    let mut n = 1;
    while n < z.len() {
        let c = z[n];
        if c == b':' || c.is_ascii_whitespace() {
            break;
        }
        if c == b'-' {
            if n == 5 && digits(&z[1..], 4, 0, 14712).is_some() {
                break;
            }
            if n == 6 && digits(&z[1..], 5, 0, 14712).is_some() {
                break;
            }
        }
        n += 1;
    }

    let amount = match number_prefix(token) {
        Some(amount) => amount,
        None => return Err(Error::UnknownModifier),
    };

    if n < z.len() && z[n] == b'-' {
        if !signed {
            return Err(Error::UnknownModifier);
        }
        date_delta(&z[1..], n - 1, negative)
    }
    else if n < z.len() && z[n] == b':' {
        if !signed {
            return Err(Error::UnknownModifier);
        }
        let ms = clock_token_ms(&z[1..])?;
        Ok(Modifier::TimeDelta(if negative { -ms } else { ms }))
    }
    else {
        unit_delta(&z[n..], amount)
    }
}

/// The leading number of a numeric modifier: optional sign, digits with
/// at most one decimal point. Anything after it belongs to the rest of
/// the modifier's grammar.
fn number_prefix(token: &str) -> Option<f64> {
    let z = token.as_bytes();
    let mut end = if z[0] == b'+' || z[0] == b'-' { 1 } else { 0 };
    let mut saw_digit = false;
    let mut saw_dot = false;

    while end < z.len() {
        if z[end].is_ascii_digit() {
            saw_digit = true;
        }
        else if z[end] == b'.' && !saw_dot {
            saw_dot = true;
        }
        else {
            break;
        }
        end += 1;
    }

    if saw_digit {
        token[..end].parse().ok()
    }
    else {
        None
    }
}

/// `YYYY-MM-DD` or `YYYYY-MM-DD` after the mandatory sign. The month
/// component runs 0..=11 and the day component 0..=30; a single space
/// and a time-of-day may follow.
fn date_delta(body: &[u8], year_width: usize, negative: bool) -> Result<Modifier, Error> {
    let (years, rest) = digits(body, year_width, 0, 14712).ok_or(Error::UnknownModifier)?;
    let rest = eat(rest, b'-').ok_or(Error::UnknownModifier)?;
    let (months, rest) = digits(rest, 2, 0, 12).ok_or(Error::UnknownModifier)?;
    let rest = eat(rest, b'-').ok_or(Error::UnknownModifier)?;
    let (days, rest) = digits(rest, 2, 0, 31).ok_or(Error::UnknownModifier)?;

    if months >= 12 || days >= 31 {
        return Err(Error::UnknownModifier);
    }

    let clock_ms = if rest.is_empty() {
        None
    }
    else if rest[0].is_ascii_whitespace() {
        Some(clock_token_ms(&rest[1..])?)
    }
    else {
        return Err(Error::UnknownModifier);
    };

    Ok(Modifier::DateDelta {
        negative,
        years: i64::from(years),
        months,
        days: i64::from(days),
        clock_ms,
    })
}

/// Evaluates a time-of-day token to its millisecond offset within a day,
/// by anchoring it to the default date and taking the remainder.
fn clock_token_ms(z: &[u8]) -> Result<i64, Error> {
    let mut tx = DateTime::empty();
    parse_hhmmss(z, &mut tx).map_err(|_| Error::UnknownModifier)?;
    tx.compute_jd();

    let ms = tx.jd_ms - MS_PER_HALF_DAY;
    let day = ms / MS_PER_DAY;
    Ok(ms - day * MS_PER_DAY)
}

/// `NNN <unit>`: the rest of the token after the number is spaces, then
/// a unit name of 3 to 10 characters, less one optional trailing `s`.
fn unit_delta(rest: &[u8], amount: f64) -> Result<Modifier, Error> {
    let mut name = rest;
    while name.first().map_or(false, |c| c.is_ascii_whitespace()) {
        name = &name[1..];
    }

    if name.len() < 3 || name.len() > 10 {
        return Err(Error::UnknownModifier);
    }
    if name[name.len() - 1].to_ascii_lowercase() == b's' {
        name = &name[..name.len() - 1];
    }

    for transform in &TRANSFORMS {
        if transform.name.as_bytes() == name {
            if amount > -transform.limit && amount < transform.limit {
                return Ok(Modifier::UnitDelta { amount, unit: transform.unit });
            }
            return Err(Error::RangeOverflow);
        }
    }
    Err(Error::UnknownModifier)
}


fn apply(modifier: Modifier, p: &mut DateTime) -> Result<(), Error> {
    match modifier {
        Modifier::Auto => {
            if !p.raw_number || p.valid_jd {
                // Either not a number at all, or already installed as a
                // day count; the classification is settled.
                p.raw_number = false;
            }
            else if p.seconds >= -210_866_760_000.0 && p.seconds <= 253_402_300_799.0 {
                install_epoch_seconds(p);
            }
            Ok(())
        }

        Modifier::Ceiling => {
            p.compute_jd();
            p.clear_field_caches();
            p.floor_days = 0;
            Ok(())
        }

        Modifier::Floor => {
            p.compute_jd();
            p.jd_ms -= i64::from(p.floor_days) * MS_PER_DAY;
            p.clear_field_caches();
            Ok(())
        }

        Modifier::JulianDay => {
            if p.valid_jd && p.raw_number {
                p.raw_number = false;
                Ok(())
            }
            else {
                Err(Error::IllegalModifier)
            }
        }

        Modifier::LocalTime => {
            if !p.is_local {
                zone::to_localtime(p)?;
            }
            p.is_utc = false;
            p.is_local = true;
            Ok(())
        }

        Modifier::UnixEpoch => {
            if !p.raw_number {
                return Err(Error::IllegalModifier);
            }
            let r = p.seconds * 1000.0 + UNIX_EPOCH_MS as f64;
            if r >= 0.0 && r < 464_269_060_800_000.0 {
                install_epoch_seconds(p);
                Ok(())
            }
            else {
                Err(Error::RangeOverflow)
            }
        }

        Modifier::Utc => zone::to_utc(p),

        Modifier::Weekday(n) => {
            p.compute_ymd_hms();
            p.tz_minutes = 0;
            p.valid_jd = false;
            p.compute_jd();

            let z = p.days_after_sunday();
            let z = if z > n { z - 7 } else { z };
            p.jd_ms += (n - z) * MS_PER_DAY;
            p.clear_field_caches();
            Ok(())
        }

        Modifier::StartOf(boundary) => {
            if !p.valid_jd && !p.valid_ymd && !p.valid_hms {
                return Err(Error::IllegalModifier);
            }
            p.compute_ymd();
            p.valid_hms = true;
            p.hour = 0;
            p.minute = 0;
            p.seconds = 0.0;
            p.raw_number = false;
            p.tz_minutes = 0;
            p.valid_jd = false;
            match boundary {
                Boundary::Day => {}
                Boundary::Month => {
                    p.day = 1;
                }
                Boundary::Year => {
                    p.month = 1;
                    p.day = 1;
                }
            }
            Ok(())
        }

        Modifier::Subsec => {
            p.subsec = true;
            Ok(())
        }

        Modifier::DateDelta { negative, years, months, days, clock_ms } => {
            p.compute_ymd_hms();
            p.valid_jd = false;

            let days = if negative {
                p.year -= years;
                p.month -= months;
                -days
            }
            else {
                p.year += years;
                p.month += months;
                days
            };
            carry_months(p);
            p.compute_floor();
            p.compute_jd();
            p.valid_hms = false;
            p.valid_ymd = false;

            // The day component crosses month and year boundaries freely,
            // so it goes straight onto the instant.
            p.jd_ms += days * MS_PER_DAY;

            if let Some(ms) = clock_ms {
                p.clear_field_caches();
                p.jd_ms += if negative { -ms } else { ms };
            }
            Ok(())
        }

        Modifier::TimeDelta(ms) => {
            p.compute_jd();
            p.clear_field_caches();
            p.jd_ms += ms;
            Ok(())
        }

        Modifier::UnitDelta { amount, unit } => {
            p.compute_jd();
            let rounder = if amount < 0.0 { -0.5 } else { 0.5 };
            p.floor_days = 0;
            let mut remainder = amount;

            match unit {
                Unit::Month => {
                    p.compute_ymd_hms();
                    let whole = amount as i32;
                    p.month += whole;
                    carry_months(p);
                    p.compute_floor();
                    p.valid_jd = false;
                    remainder -= f64::from(whole);
                }
                Unit::Year => {
                    let whole = amount as i64;
                    p.compute_ymd_hms();
                    p.year += whole;
                    p.compute_floor();
                    p.valid_jd = false;
                    remainder -= whole as f64;
                }
                _ => {}
            }

            p.compute_jd();
            p.jd_ms += (remainder * 1000.0 * unit.seconds() + rounder) as i64;
            p.clear_field_caches();
            Ok(())
        }
    }
}

/// Normalizes an out-of-range month by carrying whole years, truncating
/// toward zero on both sides of the year boundary.
fn carry_months(p: &mut DateTime) {
    let x = if p.month > 0 { (p.month - 1) / 12 } else { (p.month - 12) / 12 };
    p.year += i64::from(x);
    p.month -= x * 12;
}

/// Installs the parked number as a count of seconds since the Unix epoch.
fn install_epoch_seconds(p: &mut DateTime) {
    let r = p.seconds * 1000.0 + UNIX_EPOCH_MS as f64;
    p.clear_field_caches();
    p.jd_ms = (r + 0.5) as i64;
    p.valid_jd = true;
    p.raw_number = false;
}
