#![crate_name = "datefn"]
#![crate_type = "rlib"]
#![crate_type = "dylib"]

#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]

#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unused_qualifications)]
#![warn(unused_results)]

//! Library for [ date and time ](https://crates.io/crates/datefn) values
//! built from textual tokens.
//!
//! A value starts from one base token (an ISO-like date or time string, a
//! bare number, or `"now"`) and is then reshaped by an ordered list of
//! modifier tokens: calendar and clock deltas, timezone conversions,
//! truncation to period boundaries, and day-of-month overflow rules.
//!
//! # Examples
//!
//! ```
//! use datefn::{date, julian_day, strftime};
//!
//! assert_eq!(julian_day(&["2000-01-01"]), Ok(2451544.5));
//! assert_eq!(date(&["2024-01-31", "+1 month", "floor"]), Ok("2024-02-29".to_string()));
//! assert_eq!(strftime("%Y week %V", &["2004-01-01"]), Ok("2004 week 01".to_string()));
//! ```

extern crate libc;
extern crate pad;

#[cfg(windows)]
extern crate winapi;

#[cfg(target_os = "redox")]
extern crate syscall as redox_syscall;

pub mod funcs;

mod diff;
mod modifier;
mod parse;
mod strftime;
mod system;
mod util;
mod value;
mod zone;

pub use funcs::{date, date_time, julian_day, strftime, time, time_diff, unix_epoch};
pub use value::Error;
