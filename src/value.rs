//! The date/time value itself, and the calendar arithmetic that keeps its
//! three representations consistent.
//!
//! A `DateTime` carries up to three views of the same point in time: an
//! absolute instant (a count of milliseconds on the day-count timeline),
//! calendar fields (year, month, day), and clock fields (hour, minute,
//! seconds). Each view is only trusted while its validity flag is set;
//! the `compute_*` methods derive one view from another on demand.

use std::error::Error as ErrorTrait;
use std::fmt;

use system::sys_time;


/// Number of milliseconds in a day. As everywhere in this library, leap
/// seconds are simply ignored.
pub(crate) const MS_PER_DAY: i64 = 86_400_000;

/// Half a day of milliseconds. Day boundaries on the day-count timeline
/// fall at half-day marks (midnight is half a day before the noon the
/// count is anchored to), so clock fields are derived with this shift.
pub(crate) const MS_PER_HALF_DAY: i64 = 43_200_000;

/// The instant of **midnight, 1st January, 1970** on the day-count
/// timeline: day 2440587.5, in milliseconds.
pub(crate) const UNIX_EPOCH_MS: i64 = 210_866_760_000_000;

/// The same Unix epoch offset, in whole seconds.
pub(crate) const UNIX_EPOCH_SECONDS: i64 = 210_866_760_000;

/// The largest representable instant: 9999-12-31 23:59:59.999. Together
/// with instant 0 (noon, 24th November, 4714 BCE) this bounds every value
/// the engine will produce.
pub(crate) const MAX_INSTANT_MS: i64 = 464_269_060_799_999;


/// Returns whether an instant lies inside the representable timeline.
pub(crate) fn instant_in_range(ms: i64) -> bool {
    ms >= 0 && ms <= MAX_INSTANT_MS
}


/// A date/time value under construction.
///
/// The calendar fields are only meaningful while `valid_ymd` is set, the
/// clock fields while `valid_hms` is set, and the instant while `valid_jd`
/// is set; everything else is scratch space left over from earlier
/// derivations. A value that has overflowed the representable range is
/// parked in the error state and produces no output from any operation.
#[derive(PartialEq, Debug, Clone, Copy)]
pub(crate) struct DateTime {

    /// Milliseconds since day 0 of the day-count timeline.
    pub(crate) jd_ms: i64,

    /// Calendar fields. The year is signed (negative for BCE) and must
    /// stay within -4713..=9999 for the instant to be representable.
    pub(crate) year: i64,
    pub(crate) month: i32,
    pub(crate) day: i32,

    /// Clock fields. `seconds` carries the fraction.
    pub(crate) hour: i32,
    pub(crate) minute: i32,
    pub(crate) seconds: f64,

    /// A timezone shift, in minutes, that has been parsed but not yet
    /// folded into the instant.
    pub(crate) tz_minutes: i32,

    /// Days by which the calendar fields overflowed their month, kept so
    /// a later `floor` modifier can undo the roll-forward exactly.
    pub(crate) floor_days: i32,

    pub(crate) valid_jd: bool,
    pub(crate) valid_ymd: bool,
    pub(crate) valid_hms: bool,

    /// The value came from a bare number that has not yet been classified
    /// as a day count or a count of seconds since the Unix epoch. The
    /// number itself is parked in `seconds`.
    pub(crate) raw_number: bool,

    pub(crate) error: bool,

    /// Show subsecond precision when rendering.
    pub(crate) subsec: bool,

    pub(crate) is_utc: bool,
    pub(crate) is_local: bool,
}

impl DateTime {

    /// A value with no valid representation at all.
    pub(crate) fn empty() -> Self {
        DateTime {
            jd_ms: 0,
            year: 0, month: 0, day: 0,
            hour: 0, minute: 0, seconds: 0.0,
            tz_minutes: 0,
            floor_days: 0,
            valid_jd: false, valid_ymd: false, valid_hms: false,
            raw_number: false,
            error: false,
            subsec: false,
            is_utc: false, is_local: false,
        }
    }

    /// Wipes the value and parks it in the error state.
    pub(crate) fn set_error(&mut self) {
        *self = DateTime::empty();
        self.error = true;
    }

    /// Drops the calendar and clock caches along with any pending
    /// timezone shift, leaving the instant as the only trusted view.
    pub(crate) fn clear_field_caches(&mut self) {
        self.valid_ymd = false;
        self.valid_hms = false;
        self.tz_minutes = 0;
    }

    /// Materializes the instant from the calendar and clock fields.
    ///
    /// Missing calendar fields default to 2000-01-01. A pending timezone
    /// shift is folded in here (the fields were local, the instant is
    /// UTC), which invalidates the calendar and clock caches. A year
    /// outside -4713..=9999, or a number still awaiting classification,
    /// parks the value in the error state instead.
    pub(crate) fn compute_jd(&mut self) {
        if self.valid_jd {
            return;
        }

        let (y, m, d) = if self.valid_ymd {
            (self.year, i64::from(self.month), i64::from(self.day))
        }
        else {
            (2000, 1, 1)
        };

        if y < -4713 || y > 9999 || self.raw_number {
            self.set_error();
            return;
        }

        // The standard Gregorian formula: January and February count as
        // months 13 and 14 of the previous year, then the century terms
        // correct for the leap-year-every-400-years rule.
        let (y, m) = if m <= 2 { (y - 1, m + 12) } else { (y, m) };
        let a = (y + 4800) / 100;
        let b = 38 - a + a / 4;
        let x1 = 36525 * (y + 4716) / 100;
        let x2 = 306001 * (m + 1) / 10000;

        self.jd_ms = (((x1 + x2 + d + b) as f64 - 1524.5) * 86_400_000.0) as i64;
        self.valid_jd = true;

        if self.valid_hms {
            self.jd_ms += i64::from(self.hour) * 3_600_000
                        + i64::from(self.minute) * 60_000
                        + (self.seconds * 1000.0 + 0.5) as i64;

            if self.tz_minutes != 0 {
                self.jd_ms -= i64::from(self.tz_minutes) * 60_000;
                self.valid_ymd = false;
                self.valid_hms = false;
                self.tz_minutes = 0;
                self.is_utc = true;
                self.is_local = false;
            }
        }
    }

    /// Materializes the calendar fields from the instant.
    ///
    /// A missing instant defaults the fields to 2000-01-01; an instant
    /// outside the representable timeline parks the value in the error
    /// state.
    pub(crate) fn compute_ymd(&mut self) {
        if self.valid_ymd {
            return;
        }

        if !self.valid_jd {
            self.year = 2000;
            self.month = 1;
            self.day = 1;
        }
        else if !instant_in_range(self.jd_ms) {
            self.set_error();
            return;
        }
        else {
            // The inverse Gregorian chain, run on the whole-day number.
            let z = (self.jd_ms + MS_PER_HALF_DAY) / MS_PER_DAY;
            let alpha = ((z as f64 + 32044.75) / 36524.25) as i64 - 52;
            let a = z + 1 + alpha - (alpha + 100) / 4 + 25;
            let b = a + 1524;
            let c = ((b as f64 - 122.1) / 365.25) as i64;
            let d = 36525 * (c & 32767) / 100;
            let e = ((b - d) as f64 / 30.6001) as i64;
            let x1 = (30.6001 * e as f64) as i64;

            self.day = (b - d - x1) as i32;
            self.month = (if e < 14 { e - 1 } else { e - 13 }) as i32;
            self.year = if self.month > 2 { c - 4716 } else { c - 4715 };
        }

        self.valid_ymd = true;
    }

    /// Materializes the clock fields from the instant.
    pub(crate) fn compute_hms(&mut self) {
        if self.valid_hms {
            return;
        }

        self.compute_jd();
        let day_ms = ((self.jd_ms + MS_PER_HALF_DAY) % MS_PER_DAY) as i32;

        self.seconds = f64::from(day_ms % 60_000) / 1000.0;
        let day_min = day_ms / 60_000;
        self.minute = day_min % 60;
        self.hour = day_min / 60;

        self.raw_number = false;
        self.valid_hms = true;
    }

    /// Materializes both the calendar and the clock fields.
    pub(crate) fn compute_ymd_hms(&mut self) {
        self.compute_ymd();
        self.compute_hms();
    }

    /// Works out how far the current day-of-month overflows its month,
    /// storing the result in `floor_days`.
    ///
    /// The bitmask holds the seven 31-day months, in which no in-range
    /// day can overflow. February needs the leap-year rule; the four
    /// remaining months only overflow on day 31.
    pub(crate) fn compute_floor(&mut self) {
        if self.day <= 28 {
            self.floor_days = 0;
        }
        else if (1 << self.month) & 0x15aa != 0 {
            self.floor_days = 0;
        }
        else if self.month != 2 {
            self.floor_days = if self.day == 31 { 1 } else { 0 };
        }
        else if self.year % 4 != 0 || (self.year % 100 == 0 && self.year % 400 != 0) {
            self.floor_days = self.day - 28;
        }
        else {
            self.floor_days = self.day - 29;
        }
    }

    /// Installs a bare number that could be either a day count or a count
    /// of seconds since the Unix epoch. If it fits the day-count range it
    /// is provisionally installed as an instant; either way the raw flag
    /// stays up until a classifying modifier (or finalization) settles it.
    pub(crate) fn set_raw_number(&mut self, r: f64) {
        self.seconds = r;
        self.raw_number = true;
        if r >= 0.0 && r < 5_373_484.5 {
            self.jd_ms = (r * 86_400_000.0 + 0.5) as i64;
            self.valid_jd = true;
        }
    }

    /// Sets the value to the host clock's idea of now, in UTC.
    pub(crate) fn set_to_current(&mut self) -> Result<(), Error> {
        let (seconds, milliseconds) = unsafe { sys_time() };
        self.jd_ms = UNIX_EPOCH_MS + seconds * 1000 + i64::from(milliseconds);
        if self.jd_ms > 0 {
            self.valid_jd = true;
            self.is_utc = true;
            self.is_local = false;
            self.clear_field_caches();
            Ok(())
        }
        else {
            Err(Error::RangeOverflow)
        }
    }

    /// The zero-based day number within the current year: Jan 1st is 0,
    /// Dec 31st is 364 or 365. Requires materialized calendar fields and
    /// instant.
    pub(crate) fn days_after_jan01(&self) -> i64 {
        let mut jan01 = *self;
        jan01.valid_jd = false;
        jan01.month = 1;
        jan01.day = 1;
        jan01.compute_jd();
        (self.jd_ms - jan01.jd_ms + MS_PER_HALF_DAY) / MS_PER_DAY
    }

    /// The number of days after the most recent Monday: 0 is Monday, 6 is
    /// Sunday. Requires a materialized instant.
    pub(crate) fn days_after_monday(&self) -> i64 {
        ((self.jd_ms + MS_PER_HALF_DAY) / MS_PER_DAY) % 7
    }

    /// The number of days after the most recent Sunday: 0 is Sunday, 6 is
    /// Saturday. Requires a materialized instant.
    pub(crate) fn days_after_sunday(&self) -> i64 {
        ((self.jd_ms + 129_600_000) / MS_PER_DAY) % 7
    }
}


/// The ways a token list can fail to become a rendered value.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Error {

    /// The base token matches none of the recognized grammars.
    MalformedToken,

    /// A modifier token names no known transformation.
    UnknownModifier,

    /// An order-restricted modifier appeared after the first modifier
    /// position.
    ModifierOrder,

    /// A recognized modifier was applied to a value it cannot act on.
    IllegalModifier,

    /// The resulting year or instant left the representable range.
    RangeOverflow,

    /// The host's local-time facility failed.
    LocalTimeUnavailable,

    /// A format string contains an unsupported directive.
    BadFormatDirective,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::MalformedToken        => write!(f, "unrecognized date/time value"),
            Error::UnknownModifier       => write!(f, "unrecognized modifier"),
            Error::ModifierOrder         => write!(f, "modifier is only allowed first"),
            Error::IllegalModifier       => write!(f, "modifier cannot apply to this value"),
            Error::RangeOverflow         => write!(f, "date/time value out of range"),
            Error::LocalTimeUnavailable  => write!(f, "local time unavailable"),
            Error::BadFormatDirective    => write!(f, "unsupported format directive"),
        }
    }
}

impl ErrorTrait for Error {
}
