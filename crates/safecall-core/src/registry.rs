//! Declarative registry of wrapped operations and their failure sentinels.
//!
//! Each native operation signals failure its own way: a `-1` integer, a
//! `NULL` pointer, a nonzero error code, an engine error value, or no
//! failure signal at all. The rule is operation-specific and documented
//! per function, so it lives in one auditable table instead of being
//! re-derived at every call site. Wrapper code classifies results by
//! consulting this table; the error constructor uses it to pick the
//! domain variant.

/// Functional domain of a wrapped operation; maps 1:1 to an error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Pattern matching / text processing.
    Pcre,
    /// Networking, name resolution, sockets, syslog.
    Network,
}

/// How the underlying operation signals failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureRule {
    /// Returns `-1` on failure (errno-style integer syscalls).
    NegativeInt,
    /// Returns a null pointer on failure (netdb/address lookups).
    NullPointer,
    /// Returns a nonzero error code on failure (`getaddrinfo` family).
    NonZeroCode,
    /// The engine returns an error value directly (regex compilation).
    EngineError,
    /// Documented as never failing; the wrapper keeps a defensive check
    /// and raises the generic diagnostic if the nominal signal ever fires.
    Never,
}

/// One entry per wrapped operation.
#[derive(Debug, Clone, Copy)]
pub struct OpDescriptor {
    pub name: &'static str,
    pub domain: Domain,
    pub rule: FailureRule,
}

const fn op(name: &'static str, domain: Domain, rule: FailureRule) -> OpDescriptor {
    OpDescriptor { name, domain, rule }
}

/// The full table of wrapped operations.
pub static OPERATIONS: &[OpDescriptor] = &[
    // Pattern matching: the engine reports malformed patterns as an error
    // value at compile time; a non-match at run time is a legitimate result.
    op("grep", Domain::Pcre, FailureRule::EngineError),
    op("match_first", Domain::Pcre, FailureRule::EngineError),
    op("match_all", Domain::Pcre, FailureRule::EngineError),
    op("replace_callback", Domain::Pcre, FailureRule::EngineError),
    op(
        "replace_callback_array",
        Domain::Pcre,
        FailureRule::EngineError,
    ),
    op("split", Domain::Pcre, FailureRule::EngineError),
    op("quote", Domain::Pcre, FailureRule::Never),
    // Network: mixed sentinel conventions, looked up per operation.
    op("gethostname", Domain::Network, FailureRule::NegativeInt),
    op("getprotobyname", Domain::Network, FailureRule::NullPointer),
    op("getprotobynumber", Domain::Network, FailureRule::NullPointer),
    op("getservbyname", Domain::Network, FailureRule::NullPointer),
    op("getservbyport", Domain::Network, FailureRule::NullPointer),
    op("inet_ntop", Domain::Network, FailureRule::NullPointer),
    op("inet_pton", Domain::Network, FailureRule::NegativeInt),
    op("long2ip", Domain::Network, FailureRule::Never),
    op("dns_records", Domain::Network, FailureRule::NonZeroCode),
    op("connect_stream", Domain::Network, FailureRule::NegativeInt),
    op("interfaces", Domain::Network, FailureRule::NegativeInt),
    // Syslog: no failure signal in the native API; the wrappers only keep
    // the clear-before-call discipline.
    op("open_log", Domain::Network, FailureRule::Never),
    op("log", Domain::Network, FailureRule::Never),
    op("close_log", Domain::Network, FailureRule::Never),
];

/// Looks up the descriptor for a wrapped operation.
pub fn descriptor(name: &str) -> Option<&'static OpDescriptor> {
    OPERATIONS.iter().find(|d| d.name == name)
}

// ===========================================================================
// Tests
// ===========================================================================
