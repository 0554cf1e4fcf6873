//! Datetime-to-string routines: the fixed layouts and the `%`-directive
//! formatter.
//!
//! A format string is parsed once into a list of fields, with the literal
//! stretches kept as slices of the original input, and then rendered
//! against a fully materialized value. An unsupported directive fails the
//! parse, so a bad format string never produces partial output.

use pad::{Alignment, PadStr};

use value::{DateTime, Error, MS_PER_DAY, UNIX_EPOCH_MS, UNIX_EPOCH_SECONDS};


/// How a two-digit numeric field fills its width.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) enum Pad {
    Zero,
    Space,
}

/// One piece of a parsed format string. Which directive produces which
/// field is laid out in the parse table below; the `Pad` carried by the
/// two-digit fields distinguishes the zero-padded directive from its
/// space-padded twin (`%d`/`%e`, `%H`/`%k`, and so on).
#[derive(PartialEq, Clone, Copy, Debug)]
pub(crate) enum Field<'a> {
    Literal(&'a str),

    Day(Pad),
    FractionalSeconds,
    IsoDate,

    /// The year of the ISO week the value falls in, which near the turn
    /// of a year is not always the calendar year. `Pad::Space` stands in
    /// for the two-digit form here.
    IsoWeekYear(Pad),

    Hour(Pad),

    /// Hour on the 12-hour clock, where 0 renders as 12.
    Hour12(Pad),

    DayOfYear,

    /// The raw day count, as a real number.
    DayCount,

    Month,
    Minute,

    /// `Pad::Zero` is the uppercase AM/PM pair, `Pad::Space` the lowercase.
    AmPm(Pad),

    ClockHourMinute,
    UnixSeconds,
    Seconds,
    ClockFull,

    /// Weekday digit, Monday 1 through Sunday 7.
    WeekdayMonday1,

    /// Weekday digit, Sunday 0 through Saturday 6.
    WeekdaySunday0,

    /// Week of the year, counting from the first Sunday.
    WeekSunday,

    /// ISO week of the year, by the Thursday rule.
    WeekIso,

    /// Week of the year, counting from the first Monday.
    WeekMonday,

    Year,
}

impl<'a> Field<'a> {
    fn render(&self, when: &DateTime, out: &mut String) {
        match *self {
            Field::Literal(text) => out.push_str(text),
            Field::Day(pad) => push_2(out, when.day, pad),
            Field::FractionalSeconds => {
                let seconds = if when.seconds > 59.999 { 59.999 } else { when.seconds };
                out.push_str(&format!("{:06.3}", seconds));
            }
            Field::IsoDate => {
                out.push_str(&format!("{:04}-{:02}-{:02}", when.year, when.month, when.day));
            }
            Field::IsoWeekYear(pad) => {
                let year = thursday_of_week(when).year;
                match pad {
                    Pad::Zero => out.push_str(&format!("{:04}", year)),
                    Pad::Space => out.push_str(&format!("{:02}", year % 100)),
                }
            }
            Field::Hour(pad) => push_2(out, when.hour, pad),
            Field::Hour12(pad) => {
                let mut hour = when.hour;
                if hour > 12 {
                    hour -= 12;
                }
                if hour == 0 {
                    hour = 12;
                }
                push_2(out, hour, pad);
            }
            Field::DayOfYear => {
                out.push_str(&format!("{:03}", when.days_after_jan01() + 1));
            }
            Field::DayCount => {
                out.push_str(&format!("{}", when.jd_ms as f64 / MS_PER_DAY as f64));
            }
            Field::Month => out.push_str(&format!("{:02}", when.month)),
            Field::Minute => out.push_str(&format!("{:02}", when.minute)),
            Field::AmPm(pad) => {
                let half = match (when.hour >= 12, pad) {
                    (true, Pad::Zero)   => "PM",
                    (true, Pad::Space)  => "pm",
                    (false, Pad::Zero)  => "AM",
                    (false, Pad::Space) => "am",
                };
                out.push_str(half);
            }
            Field::ClockHourMinute => {
                out.push_str(&format!("{:02}:{:02}", when.hour, when.minute));
            }
            Field::UnixSeconds => {
                if when.subsec {
                    let seconds = (when.jd_ms - UNIX_EPOCH_MS) as f64 / 1000.0;
                    out.push_str(&format!("{:.3}", seconds));
                }
                else {
                    let seconds = when.jd_ms / 1000 - UNIX_EPOCH_SECONDS;
                    out.push_str(&seconds.to_string());
                }
            }
            Field::Seconds => out.push_str(&format!("{:02}", when.seconds as i64)),
            Field::ClockFull => {
                out.push_str(&format!("{:02}:{:02}:{:02}",
                                      when.hour, when.minute, when.seconds as i64));
            }
            Field::WeekdayMonday1 => {
                let day = when.days_after_sunday();
                out.push_str(&(if day == 0 { 7 } else { day }).to_string());
            }
            Field::WeekdaySunday0 => {
                out.push_str(&when.days_after_sunday().to_string());
            }
            Field::WeekSunday => {
                let week = (when.days_after_jan01() - when.days_after_sunday() + 7) / 7;
                out.push_str(&format!("{:02}", week));
            }
            Field::WeekIso => {
                let thursday = thursday_of_week(when);
                out.push_str(&format!("{:02}", thursday.days_after_jan01() / 7 + 1));
            }
            Field::WeekMonday => {
                let week = (when.days_after_jan01() - when.days_after_monday() + 7) / 7;
                out.push_str(&format!("{:02}", week));
            }
            Field::Year => out.push_str(&format!("{:04}", when.year)),
        }
    }
}

fn push_2(out: &mut String, value: i32, pad: Pad) {
    match pad {
        Pad::Zero => out.push_str(&format!("{:02}", value)),
        Pad::Space => out.push_str(&value.to_string().pad(2, ' ', Alignment::Right, false)),
    }
}

/// The value shifted to the Thursday of its ISO week, with the calendar
/// fields re-derived. Both the ISO week number and the ISO week-numbering
/// year read their fields off this shifted copy.
fn thursday_of_week(when: &DateTime) -> DateTime {
    let mut thursday = *when;
    thursday.jd_ms += (3 - when.days_after_monday()) * MS_PER_DAY;
    thursday.valid_ymd = false;
    thursday.compute_ymd();
    thursday
}


#[derive(PartialEq, Clone, Debug)]
pub(crate) struct DateFormat<'a> {
    pub(crate) fields: Vec<Field<'a>>,
}

impl<'a> DateFormat<'a> {

    /// Parses a format string into its fields. Literal stretches stay as
    /// slices of the input; `%%` becomes a literal percent; any other
    /// `%x` pair must be in the directive table above.
    pub(crate) fn parse(input: &'a str) -> Result<DateFormat<'a>, Error> {
        let bytes = input.as_bytes();
        let mut fields = Vec::new();
        let mut anchor = 0;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] != b'%' {
                i += 1;
                continue;
            }
            if anchor < i {
                fields.push(Field::Literal(&input[anchor..i]));
            }

            let field = match bytes.get(i + 1) {
                Some(&b'd') => Field::Day(Pad::Zero),
                Some(&b'e') => Field::Day(Pad::Space),
                Some(&b'f') => Field::FractionalSeconds,
                Some(&b'F') => Field::IsoDate,
                Some(&b'G') => Field::IsoWeekYear(Pad::Zero),
                Some(&b'g') => Field::IsoWeekYear(Pad::Space),
                Some(&b'H') => Field::Hour(Pad::Zero),
                Some(&b'k') => Field::Hour(Pad::Space),
                Some(&b'I') => Field::Hour12(Pad::Zero),
                Some(&b'l') => Field::Hour12(Pad::Space),
                Some(&b'j') => Field::DayOfYear,
                Some(&b'J') => Field::DayCount,
                Some(&b'm') => Field::Month,
                Some(&b'M') => Field::Minute,
                Some(&b'p') => Field::AmPm(Pad::Zero),
                Some(&b'P') => Field::AmPm(Pad::Space),
                Some(&b'R') => Field::ClockHourMinute,
                Some(&b's') => Field::UnixSeconds,
                Some(&b'S') => Field::Seconds,
                Some(&b'T') => Field::ClockFull,
                Some(&b'u') => Field::WeekdayMonday1,
                Some(&b'w') => Field::WeekdaySunday0,
                Some(&b'U') => Field::WeekSunday,
                Some(&b'V') => Field::WeekIso,
                Some(&b'W') => Field::WeekMonday,
                Some(&b'Y') => Field::Year,
                Some(&b'%') => Field::Literal("%"),
                _ => return Err(Error::BadFormatDirective),
            };
            fields.push(field);
            i += 2;
            anchor = i;
        }

        if anchor < bytes.len() {
            fields.push(Field::Literal(&input[anchor..]));
        }
        Ok(DateFormat { fields })
    }

    /// Renders a fully materialized value through this format.
    pub(crate) fn format(&self, when: &DateTime) -> String {
        let mut out = String::new();
        for field in &self.fields {
            field.render(when, &mut out);
        }
        out
    }
}


/// The `YYYY-MM-DD` layout. Negative years render with a leading minus
/// and the zero-padded absolute year.
pub(crate) fn layout_date(p: &mut DateTime) -> String {
    p.compute_ymd();
    let sign = if p.year < 0 { "-" } else { "" };
    let year = if p.year < 0 { -p.year } else { p.year };
    format!("{}{:04}-{:02}-{:02}", sign, year, p.month, p.day)
}

/// The `HH:MM:SS` layout, with three fractional digits when the value
/// asked for subsecond display.
pub(crate) fn layout_time(p: &mut DateTime) -> String {
    p.compute_hms();
    clock_string(p)
}

/// The combined `YYYY-MM-DD HH:MM:SS` layout.
pub(crate) fn layout_date_time(p: &mut DateTime) -> String {
    p.compute_ymd_hms();
    let date = layout_date(p);
    format!("{} {}", date, clock_string(p))
}

fn clock_string(p: &DateTime) -> String {
    if p.subsec {
        let ms = (p.seconds * 1000.0 + 0.5) as i64;
        format!("{:02}:{:02}:{:02}.{:03}", p.hour, p.minute, ms / 1000, ms % 1000)
    }
    else {
        format!("{:02}:{:02}:{:02}", p.hour, p.minute, p.seconds as i64)
    }
}


#[cfg(test)]
mod test {
    pub(crate) use super::{DateFormat, Field, Pad};
    pub(crate) use value::{DateTime, Error};

    pub(crate) fn value_of(year: i64, month: i32, day: i32,
                           hour: i32, minute: i32, seconds: f64) -> DateTime {
        let mut p = DateTime::empty();
        p.year = year;
        p.month = month;
        p.day = day;
        p.valid_ymd = true;
        p.hour = hour;
        p.minute = minute;
        p.seconds = seconds;
        p.valid_hms = true;
        p.compute_jd();
        p
    }

    pub(crate) fn rendered(format: &str, p: &DateTime) -> String {
        DateFormat::parse(format).unwrap().format(p)
    }

    mod parsing {
        use super::*;
        use super::Field::*;

        macro_rules! test {
            ($name: ident: $input: expr => $result: expr) => {
                #[test]
                fn $name() {
                    assert_eq!(DateFormat::parse($input), $result)
                }
            };
        }

        test!(empty_string: ""        => Ok(DateFormat { fields: vec![] }));
        test!(entirely_literal: "Date!" => Ok(DateFormat { fields: vec![ Literal("Date!") ] }));
        test!(single_directive: "%Y"  => Ok(DateFormat { fields: vec![ Year ] }));
        test!(surrounded: "(%d)"      => Ok(DateFormat { fields: vec![ Literal("("), Day(Pad::Zero), Literal(")") ] }));
        test!(iso_pieces: "%Y-%m-%d"  => Ok(DateFormat { fields: vec![ Year, Literal("-"), Month, Literal("-"), Day(Pad::Zero) ] }));
        test!(escaped_percent: "100%%" => Ok(DateFormat { fields: vec![ Literal("100"), Literal("%") ] }));

        test!(unknown_directive: "%q" => Err(Error::BadFormatDirective));
        test!(trailing_percent: "ends %" => Err(Error::BadFormatDirective));
    }

    mod rendering {
        use super::*;

        #[test]
        fn calendar_fields() {
            let p = value_of(2009, 2, 5, 9, 5, 6.0);
            assert_eq!(rendered("%Y-%m-%d", &p), "2009-02-05");
            assert_eq!(rendered("%F", &p), "2009-02-05");
            assert_eq!(rendered("%e", &p), " 5");
        }

        #[test]
        fn clock_fields() {
            let p = value_of(2009, 2, 5, 9, 5, 6.0);
            assert_eq!(rendered("%H:%M:%S", &p), "09:05:06");
            assert_eq!(rendered("%k", &p), " 9");
            assert_eq!(rendered("%R", &p), "09:05");
            assert_eq!(rendered("%T", &p), "09:05:06");
        }

        #[test]
        fn twelve_hour_clock() {
            assert_eq!(rendered("%I%l", &value_of(2009, 2, 5, 15, 0, 0.0)), "03 3");
            assert_eq!(rendered("%I", &value_of(2009, 2, 5, 0, 0, 0.0)), "12");
            assert_eq!(rendered("%I", &value_of(2009, 2, 5, 12, 0, 0.0)), "12");
        }

        #[test]
        fn halves_of_the_day() {
            assert_eq!(rendered("%p %P", &value_of(2009, 2, 5, 15, 0, 0.0)), "PM pm");
            assert_eq!(rendered("%p %P", &value_of(2009, 2, 5, 9, 0, 0.0)), "AM am");
        }

        #[test]
        fn fractional_seconds() {
            let p = value_of(2009, 2, 5, 9, 5, 6.125);
            assert_eq!(rendered("%f", &p), "06.125");
        }

        #[test]
        fn day_of_year() {
            assert_eq!(rendered("%j", &value_of(2024, 1, 1, 0, 0, 0.0)), "001");
            assert_eq!(rendered("%j", &value_of(2004, 12, 30, 0, 0, 0.0)), "365");
        }

        #[test]
        fn day_count() {
            let p = value_of(2000, 1, 1, 0, 0, 0.0);
            assert_eq!(rendered("%J", &p), "2451544.5");
        }

        #[test]
        fn weekday_digits() {
            let monday = value_of(2024, 1, 1, 0, 0, 0.0);
            let sunday = value_of(2024, 1, 7, 0, 0, 0.0);
            assert_eq!(rendered("%u%w", &monday), "11");
            assert_eq!(rendered("%u%w", &sunday), "70");
        }

        #[test]
        fn week_numbers() {
            let new_year = value_of(2024, 1, 1, 0, 0, 0.0);
            assert_eq!(rendered("%U", &new_year), "00");
            assert_eq!(rendered("%W", &new_year), "01");
        }

        #[test]
        fn iso_weeks() {
            // 2004-01-01 is a Thursday, so it opens week 1 of its own year;
            // 2005-01-01 is a Saturday still hanging off week 53 of 2004.
            let thursday = value_of(2004, 1, 1, 0, 0, 0.0);
            let saturday = value_of(2005, 1, 1, 0, 0, 0.0);
            assert_eq!(rendered("%G-%V", &thursday), "2004-01");
            assert_eq!(rendered("%G-%V", &saturday), "2004-53");
            assert_eq!(rendered("%g", &saturday), "04");
        }

        #[test]
        fn unix_seconds() {
            let mut p = value_of(1970, 1, 2, 0, 0, 0.0);
            assert_eq!(rendered("%s", &p), "86400");
            p.subsec = true;
            assert_eq!(rendered("%s", &p), "86400.000");
        }

        #[test]
        fn literal_passthrough() {
            let p = value_of(2009, 2, 5, 9, 5, 6.0);
            assert_eq!(rendered("year: %Y, 100%%", &p), "year: 2009, 100%");
        }
    }

    mod layouts {
        use super::*;
        use super::super::{layout_date, layout_date_time, layout_time};

        #[test]
        fn date() {
            assert_eq!(layout_date(&mut value_of(2009, 2, 5, 0, 0, 0.0)), "2009-02-05");
        }

        #[test]
        fn bce_date() {
            assert_eq!(layout_date(&mut value_of(-753, 12, 1, 0, 0, 0.0)), "-0753-12-01");
        }

        #[test]
        fn time() {
            assert_eq!(layout_time(&mut value_of(2009, 2, 5, 23, 31, 30.25)), "23:31:30");
        }

        #[test]
        fn time_with_subseconds() {
            let mut p = value_of(2009, 2, 5, 23, 31, 30.25);
            p.subsec = true;
            assert_eq!(layout_time(&mut p), "23:31:30.250");
        }

        #[test]
        fn date_time() {
            let mut p = value_of(2009, 2, 13, 23, 31, 30.0);
            assert_eq!(layout_date_time(&mut p), "2009-02-13 23:31:30");
        }
    }
}
