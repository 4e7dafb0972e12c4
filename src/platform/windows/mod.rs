//! Windows backend: `FormatMessageW` message lookup, `GetLastError`.
//!
//! `FormatMessageW` with `FORMAT_MESSAGE_FROM_SYSTEM` resolves both Win32
//! error codes (`ERROR_ACCESS_DENIED` = 5) and HRESULTs
//! (`E_ACCESSDENIED` = 0x80070005). Inserts are ignored: the SDK never passes
//! arguments, and messages with `%1` placeholders are returned verbatim.

use std::ptr;

use windows_sys::Win32::Foundation::GetLastError;
use windows_sys::Win32::System::Diagnostics::Debug::{
    FormatMessageW, FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS,
};

/// Longest system message we accept, in UTF-16 units.
const MESSAGE_CAPACITY: usize = 1024;

pub fn system_message(code: i32) -> Option<String> {
    let mut buffer = [0u16; MESSAGE_CAPACITY];

    // Language 0: let the system pick (thread, user, then system default).
    let len = unsafe {
        FormatMessageW(
            FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
            ptr::null(),
            code as u32,
            0,
            buffer.as_mut_ptr(),
            MESSAGE_CAPACITY as u32,
            ptr::null(),
        )
    };

    if len == 0 {
        log::trace!("platform: no system message for {:#010x}", code);
        return None;
    }

    let text = String::from_utf16_lossy(&buffer[..len as usize]);
    let text = text.trim_end();
    (!text.is_empty()).then(|| text.to_owned())
}

pub fn last_error_code() -> i32 {
    unsafe { GetLastError() as i32 }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
