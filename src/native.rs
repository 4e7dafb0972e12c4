//! Native call failure translation.
//!
//! The SDK reports failure through integer status codes: HRESULTs from its
//! COM-style entry points, and BOOL returns backed by the thread's last-error
//! slot from the Win32-style ones. This module turns a code into a
//! `NativeError` carrying the failing function's name, the raw code, and the
//! OS message for it.
//!
//! Nothing here retries or classifies codes. Whether a failure is fatal,
//! retryable or ignorable is the caller's decision.
//!
//! Last-error hazard: the last-error slot is per thread and every native call
//! overwrites it. `capture` reads it right after the wrapped call returns, on
//! the same thread, and hands it back with the call's result. Prefer it over
//! `last_error`, which reads whatever the slot holds at the time of the read.

use crate::platform;

// ---------------------------------------------------------------------------
// HRESULT helpers
// ---------------------------------------------------------------------------

/// Well-known HRESULTs the SDK returns.
pub mod hresult {
    pub const S_OK: i32 = 0;
    pub const S_FALSE: i32 = 1;
    pub const E_NOTIMPL: i32 = 0x8000_4001_u32 as i32;
    pub const E_NOINTERFACE: i32 = 0x8000_4002_u32 as i32;
    pub const E_POINTER: i32 = 0x8000_4003_u32 as i32;
    pub const E_ABORT: i32 = 0x8000_4004_u32 as i32;
    pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;
    pub const E_UNEXPECTED: i32 = 0x8000_FFFF_u32 as i32;
    pub const E_ACCESSDENIED: i32 = 0x8007_0005_u32 as i32;
    pub const E_HANDLE: i32 = 0x8007_0006_u32 as i32;
    pub const E_OUTOFMEMORY: i32 = 0x8007_000E_u32 as i32;
    pub const E_INVALIDARG: i32 = 0x8007_0057_u32 as i32;

    /// `FACILITY_WIN32`: the low 16 bits hold a Win32 error code.
    pub const FACILITY_WIN32: u16 = 7;

    /// Severity bit set.
    pub fn is_failure(code: i32) -> bool {
        code < 0
    }

    pub fn facility(code: i32) -> u16 {
        ((code as u32 >> 16) & 0x1FFF) as u16
    }

    /// Wraps a Win32 error code as an HRESULT (`HRESULT_FROM_WIN32`).
    pub fn from_win32(error: u32) -> i32 {
        if error as i32 <= 0 {
            error as i32
        } else {
            ((error & 0xFFFF) | ((FACILITY_WIN32 as u32) << 16) | 0x8000_0000) as i32
        }
    }

    /// Message text for the HRESULTs above, as worded in `winerror.h`.
    pub fn well_known_message(code: i32) -> Option<&'static str> {
        let text = match code {
            S_OK => "The operation completed successfully",
            S_FALSE => "The operation completed with a false result",
            E_NOTIMPL => "Not implemented",
            E_NOINTERFACE => "No such interface supported",
            E_POINTER => "Invalid pointer",
            E_ABORT => "Operation aborted",
            E_FAIL => "Unspecified error",
            E_UNEXPECTED => "Catastrophic failure",
            E_ACCESSDENIED => "General access denied error",
            E_HANDLE => "Invalid handle",
            E_OUTOFMEMORY => "Ran out of memory",
            E_INVALIDARG => "One or more arguments are invalid",
            _ => return None,
        };
        Some(text)
    }
}

// ---------------------------------------------------------------------------
// NativeError
// ---------------------------------------------------------------------------

/// A native call reported failure.
///
/// Produced as a value; returning it as an `Err` is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{function} failed with {code:#010x}: {message}")]
pub struct NativeError {
    function: String,
    code: i32,
    message: String,
}

impl NativeError {
    /// Name of the native function that failed.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Raw status code as returned by the call.
    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// Human-readable text for a status code. Never empty.
///
/// Success HRESULTs, and every code off Windows, go to the well-known HRESULT
/// table before the OS: `S_FALSE` is 1, which the OS would read as
/// `ERROR_INVALID_FUNCTION` or `EPERM`. Failure codes on Windows go to
/// `FormatMessageW` first. Falls back to `"unknown error 0x…"`.
pub fn describe(code: i32) -> String {
    let known = || hresult::well_known_message(code).map(str::to_owned);
    let message = if cfg!(windows) && hresult::is_failure(code) {
        platform::system_message(code).or_else(known)
    } else {
        known().or_else(|| platform::system_message(code))
    };
    message.unwrap_or_else(|| format!("unknown error {code:#010x}"))
}

/// Packages a failing call's name and status code into a `NativeError`.
pub fn to_error(function: impl Into<String>, code: i32) -> NativeError {
    let error = NativeError {
        function: function.into(),
        code,
        message: describe(code),
    };
    log::debug!("native: {}", error);
    error
}

/// Builds a `NativeError` from the calling thread's current last-error slot.
///
/// The slot belongs to whichever native call ran last on this thread. Call
/// this immediately after the failing call, before logging or anything else
/// that may touch the OS, or use `capture` instead.
pub fn last_error(function: impl Into<String>) -> NativeError {
    let code = platform::last_error_code();
    to_error(function, code)
}

/// `Err` for failure HRESULTs (severity bit set), `Ok` otherwise.
pub fn check_hresult(function: &str, code: i32) -> Result<(), NativeError> {
    if hresult::is_failure(code) {
        Err(to_error(function, code))
    } else {
        Ok(())
    }
}

/// Runs a BOOL-style native call; on `false`, reports the last error it set.
pub fn check_bool(function: &str, call: impl FnOnce() -> bool) -> Result<(), NativeError> {
    capture(call).into_result(function, |ok| !*ok).map(drop)
}

// ---------------------------------------------------------------------------
// Call-site capture
// ---------------------------------------------------------------------------

/// A native call's result together with the last-error code it left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Captured<T> {
    pub value: T,
    pub last_error: i32,
}

impl<T> Captured<T> {
    /// `Err` with the captured code when `failed` says the value is a failure.
    pub fn into_result(
        self,
        function: &str,
        failed: impl FnOnce(&T) -> bool,
    ) -> Result<T, NativeError> {
        if failed(&self.value) {
            Err(to_error(function, self.last_error))
        } else {
            Ok(self.value)
        }
    }

    pub fn error(&self, function: &str) -> NativeError {
        to_error(function, self.last_error)
    }
}

/// Runs `call` and reads the last-error slot before anything else can run.
///
/// The code is meaningful only when the call reported failure; successful
/// calls are not required to clear it.
pub fn capture<T>(call: impl FnOnce() -> T) -> Captured<T> {
    let value = call();
    let last_error = platform::last_error_code();
    log::trace!("native: captured last error {:#010x}", last_error);
    Captured { value, last_error }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
