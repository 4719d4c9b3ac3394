//! # safecall-core
//!
//! Pure logic shared by the safecall wrapper layer: the typed error
//! taxonomy, the declarative failure-sentinel registry, subject shape
//! preservation, and text-shaping helpers for split/replace operations.
//!
//! No `unsafe` code is permitted at the crate level; everything here is
//! testable without touching a native engine.

#![deny(unsafe_code)]

pub mod error;
pub mod registry;
pub mod subject;
pub mod textops;

pub use error::{SafeError, SafeResult};
pub use registry::{Domain, FailureRule, OpDescriptor, descriptor};
pub use subject::Subject;
