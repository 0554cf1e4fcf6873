//! System-dependent functions, or anything that this library is unable to
//! do without help from the OS: reading the wall clock, and asking the
//! host's timezone database what an instant looks like on the local clock.

extern crate libc;

#[cfg(target_os = "redox")]
extern crate syscall as redox_syscall;

#[cfg(any(target_os = "macos", target_os = "ios"))]
extern {
    fn gettimeofday(tp: *mut libc::timeval, tzp: *mut libc::timezone) -> libc::c_int;
}

#[cfg(all(unix, not(target_os = "macos"), not(target_os = "ios"), not(target_os = "redox")))]
use libc::clock_gettime;


/// Returns the system’s current time, as a tuple of seconds elapsed since
/// the Unix epoch, and the millisecond of the second.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub(crate) unsafe fn sys_time() -> (i64, i16) {
    use std::ptr::null_mut;

    let mut tv = libc::timeval { tv_sec: 0, tv_usec: 0 };
    let _ = gettimeofday(&mut tv, null_mut());
    (tv.tv_sec, (tv.tv_usec / 1000) as i16)
}

#[cfg(windows)] use winapi::shared::minwindef::FILETIME;
#[cfg(windows)] const HECTONANOSECS_IN_SEC: i64 = 10_000_000;
#[cfg(windows)] const HECTONANOSEC_TO_UNIX_EPOCH: i64 = 11_644_473_600 * HECTONANOSECS_IN_SEC;

/// Returns the system’s current time, as a tuple of seconds elapsed since
/// the Unix epoch, and the millisecond of the second.
#[cfg(windows)]
pub(crate) unsafe fn sys_time() -> (i64, i16) {
    use std::mem;
    use winapi::um::sysinfoapi::GetSystemTimeAsFileTime;
    let mut ft = mem::zeroed();

    GetSystemTimeAsFileTime(&mut ft);
    (file_time_to_unix_seconds(&ft), (file_time_to_nsec(&ft) / 1000000) as i16)
}

#[cfg(windows)]
fn file_time_to_nsec(ft: &FILETIME) -> i32 {
    let t = file_time_as_u64(ft) as i64;
    ((t % HECTONANOSECS_IN_SEC) * 100) as i32
}

#[cfg(windows)]
fn file_time_to_unix_seconds(ft: &FILETIME) -> i64 {
    let t = file_time_as_u64(ft) as i64;
    (t - HECTONANOSEC_TO_UNIX_EPOCH) / HECTONANOSECS_IN_SEC
}

#[cfg(windows)]
fn file_time_as_u64(ft: &FILETIME) -> u64 {
    ((ft.dwHighDateTime as u64) << 32) | (ft.dwLowDateTime as u64)
}


/// Returns the system’s current time, as a tuple of seconds elapsed since
/// the Unix epoch, and the millisecond of the second.
#[cfg(all(unix, not(target_os = "macos"), not(target_os = "ios"), not(target_os = "redox")))]
pub(crate) unsafe fn sys_time() -> (i64, i16) {
    let mut tv = libc::timespec { tv_sec: 0, tv_nsec: 0 };
    let _ = clock_gettime(libc::CLOCK_REALTIME, &mut tv);
    (tv.tv_sec as i64, (tv.tv_nsec / 1000000) as i16)
}

/// Returns the system’s current time, as a tuple of seconds elapsed since
/// the Unix epoch, and the millisecond of the second.
#[cfg(target_os = "redox")]
pub(crate) unsafe fn sys_time() -> (i64, i16) {
    let mut ts = redox_syscall::TimeSpec::default();
    let realtime_clock = redox_syscall::CLOCK_REALTIME;
    let _ = redox_syscall::clock_gettime(realtime_clock, &mut ts);
    (ts.tv_sec, (ts.tv_nsec / 1000000) as i16)
}


/// The local calendar and clock fields the host's timezone database hands
/// back for an instant.
#[derive(PartialEq, Debug, Clone, Copy)]
pub(crate) struct LocalFields {
    pub(crate) year: i32,
    pub(crate) month: i32,
    pub(crate) day: i32,
    pub(crate) hour: i32,
    pub(crate) minute: i32,
    pub(crate) second: i32,
}

/// Asks the host's timezone database for the local wall-clock fields of
/// the given count of seconds since the Unix epoch. Returns `None` if the
/// facility fails.
#[cfg(unix)]
pub(crate) fn sys_localtime(t: i64) -> Option<LocalFields> {
    use std::mem;

    let time = t as libc::time_t;
    let mut tm: libc::tm = unsafe { mem::zeroed() };

    if unsafe { libc::localtime_r(&time, &mut tm) }.is_null() {
        return None;
    }

    Some(LocalFields {
        year:   tm.tm_year + 1900,
        month:  tm.tm_mon + 1,
        day:    tm.tm_mday,
        hour:   tm.tm_hour,
        minute: tm.tm_min,
        second: tm.tm_sec,
    })
}

/// There is no portable localtime facility off unix; callers report the
/// conversion as unavailable.
#[cfg(not(unix))]
pub(crate) fn sys_localtime(_t: i64) -> Option<LocalFields> {
    None
}
