//! Platform abstraction layer.
//!
//! Two OS services back the native status bridge: the system message table
//! (`system_message`) and the calling thread's last-error slot
//! (`last_error_code`). Implementations live in child modules.

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use self::windows as imp;

#[cfg(not(windows))]
mod unix;
#[cfg(not(windows))]
use self::unix as imp;

/// Looks up the OS-supplied message for `code`.
///
/// Returns `None` when the platform has no mapping. Trailing whitespace and
/// line breaks are stripped.
pub fn system_message(code: i32) -> Option<String> {
    imp::system_message(code)
}

/// Reads the last native error recorded for the calling thread.
///
/// The slot is overwritten by every native call on this thread, including
/// ones made by logging or allocation. Read it immediately after the call of
/// interest, on the same thread.
pub fn last_error_code() -> i32 {
    imp::last_error_code()
}
