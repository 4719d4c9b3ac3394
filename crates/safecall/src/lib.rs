//! # safecall
//!
//! Drop-in wrappers for native operations whose failure is signaled by a
//! sentinel return value (`-1`, `NULL`, an error code) instead of an
//! error. Each wrapper calls the native operation unchanged, classifies
//! the result with the operation's registered failure rule, and converts
//! a sentinel into a typed [`SafeError`] carrying the diagnostic the
//! runtime left behind. Success returns the genuine value; the sentinel
//! never escapes.
//!
//! The native collaborators are black boxes: the C library (via the
//! `libc` crate) for networking and syslog, the `regex` crate for
//! pattern matching. Nothing here reimplements them.
//!
//! Wrappers never retry, never log, and never swallow failures; every
//! error is the direct caller's to handle or propagate.

pub mod errno;
pub mod network;
pub mod pcre;
pub mod syslog;

pub use safecall_core::{SafeError, SafeResult, Subject};
