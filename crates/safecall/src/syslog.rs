//! System logger wrappers.
//!
//! These calls have no failure sentinel, so the fallible signature is
//! kept for interface uniformity and the error arm is unreachable in
//! practice.
//!
//! `openlog` retains the identity pointer it is handed rather than
//! copying the string, so the current identity is kept alive here for
//! as long as the log is open. A mutex serializes the open/close pair
//! against that retained storage.

use std::ffi::{CString, c_int};

use parking_lot::Mutex;

use safecall_core::SafeResult;

use crate::errno;

/// Identity string currently on loan to the logger. Must outlive the
/// open log; replaced atomically under the lock.
static IDENT: Mutex<Option<CString>> = Mutex::new(None);

/// Severity levels, mirroring the `LOG_*` priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl Priority {
    fn as_raw(self) -> c_int {
        match self {
            Priority::Emergency => libc::LOG_EMERG,
            Priority::Alert => libc::LOG_ALERT,
            Priority::Critical => libc::LOG_CRIT,
            Priority::Error => libc::LOG_ERR,
            Priority::Warning => libc::LOG_WARNING,
            Priority::Notice => libc::LOG_NOTICE,
            Priority::Info => libc::LOG_INFO,
            Priority::Debug => libc::LOG_DEBUG,
        }
    }
}

/// Opens a connection to the system logger with the given identity,
/// option bits (`LOG_PID` and friends) and facility.
pub fn open_log(ident: &str, option: i32, facility: i32) -> SafeResult<()> {
    let cident = CString::new(ident.replace('\0', ""))
        .unwrap_or_default();
    let mut slot = IDENT.lock();
    errno::clear();
    // SAFETY: the identity string is stored in the slot below and stays
    // alive until the next open_log/close_log replaces it.
    unsafe { libc::openlog(cident.as_ptr(), option, facility) };
    *slot = Some(cident);
    Ok(())
}

/// Submits one message to the system logger.
pub fn log(priority: Priority, message: &str) -> SafeResult<()> {
    let cmsg = CString::new(message.replace('\0', "")).unwrap_or_default();
    errno::clear();
    // SAFETY: the format string is static and the message is a valid
    // NUL-terminated string; %s keeps message bytes from being
    // interpreted as conversions.
    unsafe { libc::syslog(priority.as_raw(), c"%s".as_ptr(), cmsg.as_ptr()) };
    Ok(())
}

/// Closes the logger connection and releases the retained identity.
pub fn close_log() -> SafeResult<()> {
    let mut slot = IDENT.lock();
    errno::clear();
    // SAFETY: closelog takes no arguments and has no failure mode.
    unsafe { libc::closelog() };
    *slot = None;
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_then_close() {
        open_log("safecall-test", libc::LOG_PID, libc::LOG_USER).unwrap();
        log(Priority::Debug, "open/log/close cycle").unwrap();
        close_log().unwrap();
    }

    #[test]
    fn test_log_without_open_uses_defaults() {
        // syslog(3) opens the connection lazily when needed.
        log(Priority::Debug, "implicit open").unwrap();
    }

    #[test]
    fn test_embedded_nul_is_stripped_not_fatal() {
        log(Priority::Debug, "before\0after").unwrap();
    }

    #[test]
    fn test_priority_mapping() {
        assert_eq!(Priority::Error.as_raw(), libc::LOG_ERR);
        assert_eq!(Priority::Debug.as_raw(), libc::LOG_DEBUG);
    }
}
