//! Unix backend (Linux, macOS): `strerror` via `std::io::Error`, `errno`.
//!
//! Only positive codes are looked up; negative values are HRESULT-style
//! failures from the SDK, which the C library has no messages for. Unknown
//! errno values come back as "Unknown error N" (glibc, macOS) or "No error
//! information" (musl) and are reported as unmapped.

use std::io;

pub fn system_message(code: i32) -> Option<String> {
    if code < 0 {
        return None;
    }

    let rendered = io::Error::from_raw_os_error(code).to_string();
    // std renders "<message> (os error N)".
    let text = rendered
        .rsplit_once(" (os error")
        .map_or(rendered.as_str(), |(message, _)| message)
        .trim_end();

    if text.is_empty() || text.starts_with("Unknown error") || text == "No error information" {
        log::trace!("platform: no system message for {}", code);
        return None;
    }
    Some(text.to_owned())
}

pub fn last_error_code() -> i32 {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
