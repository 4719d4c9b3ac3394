//! Last-error slot discipline.
//!
//! The C library reports most failures through the process's `errno`
//! slot, overwritten by every fallible call. Wrappers clear the slot
//! immediately before invoking the native operation so any value read
//! afterwards is attributable solely to that call, never to a stale
//! failure elsewhere. On glibc and musl the slot is thread-local, so the
//! clear-then-read sequence is race-free per thread.

use std::ffi::{CStr, c_char, c_int};

use safecall_core::SafeError;

#[cfg(target_os = "linux")]
fn errno_location() -> *mut c_int {
    // SAFETY: glibc/musl always return a valid per-thread pointer.
    unsafe { libc::__errno_location() }
}

#[cfg(target_os = "macos")]
fn errno_location() -> *mut c_int {
    // SAFETY: libSystem always returns a valid per-thread pointer.
    unsafe { libc::__error() }
}

/// Acknowledges any pending error so the next read reflects only the
/// upcoming call.
pub fn clear() {
    // SAFETY: the per-thread errno slot is valid for writes.
    unsafe { *errno_location() = 0 };
}

/// Reads the current errno value without clearing it.
pub fn current() -> i32 {
    // SAFETY: the per-thread errno slot is valid for reads.
    unsafe { *errno_location() }
}

/// Renders the system diagnostic for an errno value.
pub fn message(code: i32) -> String {
    let mut buf = [0 as c_char; 256];
    // SAFETY: buffer pointer and length describe valid writable storage.
    let rc = unsafe { libc::strerror_r(code, buf.as_mut_ptr(), buf.len()) };
    if rc != 0 {
        return format!("Unknown error {code}");
    }
    // SAFETY: strerror_r NUL-terminates the buffer on success.
    let text = unsafe { CStr::from_ptr(buf.as_ptr()) };
    text.to_string_lossy().into_owned()
}

/// Builds the typed error for `operation` from whatever the slot holds
/// right now; falls back to the generic diagnostic when the slot is
/// empty.
pub fn capture(operation: &'static str) -> SafeError {
    let code = current();
    if code == 0 {
        SafeError::for_operation(operation, None, "")
    } else {
        SafeError::for_operation(operation, Some(code), message(code))
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_then_current() {
        clear();
        assert_eq!(current(), 0);
    }

    #[test]
    fn test_failed_call_populates_slot() {
        clear();
        // SAFETY: closing an invalid descriptor is harmless and sets EBADF.
        let rc = unsafe { libc::close(-1) };
        assert_eq!(rc, -1);
        assert_eq!(current(), libc::EBADF);
        clear();
        assert_eq!(current(), 0);
    }

    #[test]
    fn test_message_known_code() {
        let m = message(libc::ENOENT);
        assert!(!m.is_empty());
        assert_ne!(m, "Unknown error 2");
    }

    #[test]
    fn test_capture_empty_slot_uses_generic_message() {
        clear();
        let e = capture("gethostname");
        assert_eq!(e.message(), safecall_core::error::GENERIC_FAILURE);
        assert_eq!(e.code(), None);
    }

    #[test]
    fn test_capture_carries_code_and_text() {
        clear();
        // SAFETY: see above.
        unsafe { libc::close(-1) };
        let e = capture("gethostname");
        assert_eq!(e.code(), Some(libc::EBADF));
        assert!(!e.message().is_empty());
    }
}
