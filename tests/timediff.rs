extern crate datefn;
use datefn::{date_time, time_diff, Error};


#[test]
fn equal_values() {
    assert_eq!(time_diff("2024-01-01", "2024-01-01"),
               Ok("+0000-00-00 00:00:00.000".to_string()));
}

#[test]
fn whole_days() {
    assert_eq!(time_diff("2024-01-02", "2024-01-01"),
               Ok("+0000-00-01 00:00:00.000".to_string()));
    assert_eq!(time_diff("2024-01-01", "2024-01-02"),
               Ok("-0000-00-01 00:00:00.000".to_string()));
}

#[test]
fn years_months_and_days() {
    assert_eq!(time_diff("2023-03-15", "2022-01-10"),
               Ok("+0001-02-05 00:00:00.000".to_string()));
    assert_eq!(time_diff("2022-01-10", "2023-03-15"),
               Ok("-0001-02-05 00:00:00.000".to_string()));
}

#[test]
fn time_of_day() {
    assert_eq!(time_diff("2024-01-01 12:30:15.500", "2024-01-01 10:00:00"),
               Ok("+0000-00-00 02:30:15.500".to_string()));
    assert_eq!(time_diff("2024-01-01 00:00:00.250", "2024-01-01"),
               Ok("+0000-00-00 00:00:00.250".to_string()));
}

#[test]
fn month_steps_cover_unequal_month_lengths() {
    assert_eq!(time_diff("2024-03-31", "2024-02-29"),
               Ok("+0000-01-02 00:00:00.000".to_string()));
}

#[test]
fn overshot_months_back_off() {
    // From Jan 31st, one nominal month overshoots past Feb 28th, so the
    // walk settles on zero months and counts the days instead.
    assert_eq!(time_diff("2023-02-28", "2023-01-31"),
               Ok("+0000-00-28 00:00:00.000".to_string()));
}

#[test]
fn bad_tokens() {
    assert_eq!(time_diff("abc", "2024-01-01"), Err(Error::MalformedToken));
    assert_eq!(time_diff("2024-01-01", "abc"), Err(Error::MalformedToken));
}


/// The defining property of the delta encoding: applied as a modifier to
/// the second value, it lands exactly on the first.
#[test]
fn deltas_apply_back_onto_their_base() {
    let pairs = [
        ("2023-03-15 00:00:00", "2022-01-10 00:00:00"),
        ("2023-02-28 00:00:00", "2023-01-31 00:00:00"),
        ("2024-03-31 00:00:00", "2024-02-29 00:00:00"),
        ("2024-01-01 06:30:00", "2023-12-31 18:45:00"),
        ("2022-01-10 00:00:00", "2023-03-15 00:00:00"),
    ];

    for &(a, b) in &pairs {
        let delta = time_diff(a, b).unwrap();
        assert_eq!(date_time(&[b, delta.as_str()]), date_time(&[a]),
                   "applying {} to {} should reach {}", delta, b, a);
    }
}
