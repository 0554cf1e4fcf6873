extern crate datefn;
use datefn::{strftime, Error};


#[test]
fn calendar_directives() {
    assert_eq!(strftime("%Y-%m-%d", &["2024-06-15"]), Ok("2024-06-15".to_string()));
    assert_eq!(strftime("%F", &["2024-06-15"]), Ok("2024-06-15".to_string()));
    assert_eq!(strftime("%d and %e", &["2024-06-05"]), Ok("05 and  5".to_string()));
}

#[test]
fn clock_directives() {
    assert_eq!(strftime("%H:%M:%S", &["2024-06-15 09:05:06"]),
               Ok("09:05:06".to_string()));
    assert_eq!(strftime("%R", &["2024-06-15 12:34:56"]), Ok("12:34".to_string()));
    assert_eq!(strftime("%T", &["2024-06-15 12:34:56"]), Ok("12:34:56".to_string()));
    assert_eq!(strftime("%k", &["2024-06-15 09:00"]), Ok(" 9".to_string()));
}

#[test]
fn twelve_hour_clock() {
    assert_eq!(strftime("%I %l %p %P", &["2024-06-15 15:00"]),
               Ok("03  3 PM pm".to_string()));
    assert_eq!(strftime("%I %p", &["2024-06-15 00:30"]), Ok("12 AM".to_string()));
    assert_eq!(strftime("%I %p", &["2024-06-15 12:30"]), Ok("12 PM".to_string()));
}

#[test]
fn fractional_seconds() {
    assert_eq!(strftime("%f", &["2024-06-15 00:00:06.125"]), Ok("06.125".to_string()));
}

#[test]
fn day_of_year() {
    assert_eq!(strftime("%j", &["2024-01-01"]), Ok("001".to_string()));
    assert_eq!(strftime("%j", &["2024-12-31"]), Ok("366".to_string()));
    assert_eq!(strftime("%j", &["2023-12-31"]), Ok("365".to_string()));
    assert_eq!(strftime("%Y day %j", &["2024-03-01"]), Ok("2024 day 061".to_string()));
}

#[test]
fn day_count() {
    assert_eq!(strftime("%J", &["2000-01-01"]), Ok("2451544.5".to_string()));
}

#[test]
fn unix_seconds() {
    assert_eq!(strftime("%s", &["1970-01-02"]), Ok("86400".to_string()));
    assert_eq!(strftime("%s", &["1970-01-02", "subsec"]), Ok("86400.000".to_string()));
}

#[test]
fn weekday_digits() {
    // The first week of 2024: Monday the 1st through Sunday the 7th.
    assert_eq!(strftime("%u %w", &["2024-01-01"]), Ok("1 1".to_string()));
    assert_eq!(strftime("%u %w", &["2024-01-06"]), Ok("6 6".to_string()));
    assert_eq!(strftime("%u %w", &["2024-01-07"]), Ok("7 0".to_string()));
}

#[test]
fn week_numbers() {
    assert_eq!(strftime("%U %W", &["2024-01-01"]), Ok("00 01".to_string()));
    assert_eq!(strftime("%U %W", &["2024-01-07"]), Ok("01 01".to_string()));
}

#[test]
fn iso_weeks() {
    // 2004-01-01 is a Thursday, so it opens week 1 of its own year;
    // 2005-01-01 is a Saturday still hanging off week 53 of 2004.
    assert_eq!(strftime("%G-W%V", &["2004-01-01"]), Ok("2004-W01".to_string()));
    assert_eq!(strftime("%G-W%V", &["2005-01-01"]), Ok("2004-W53".to_string()));
    assert_eq!(strftime("%g", &["2005-01-01"]), Ok("04".to_string()));
}

#[test]
fn escaped_percent() {
    assert_eq!(strftime("100%% done", &["2024-06-15"]), Ok("100% done".to_string()));
}

#[test]
fn literal_passthrough() {
    assert_eq!(strftime("the year is %Y!", &["2024-06-15"]),
               Ok("the year is 2024!".to_string()));
}

#[test]
fn bad_directives_produce_no_output() {
    assert_eq!(strftime("%Y %q", &["2024-06-15"]), Err(Error::BadFormatDirective));
    assert_eq!(strftime("ends in %", &["2024-06-15"]), Err(Error::BadFormatDirective));
}

#[test]
fn bad_values_fail_before_the_format_is_read() {
    assert_eq!(strftime("%Y", &["abc"]), Err(Error::MalformedToken));
    assert_eq!(strftime("%Y", &[]), Err(Error::MalformedToken));
}

#[test]
fn modifiers_apply_before_formatting() {
    assert_eq!(strftime("%Y-%m-%d %H:%M", &["2024-01-31", "+1 month", "floor", "+01:30"]),
               Ok("2024-02-29 01:30".to_string()));
}
