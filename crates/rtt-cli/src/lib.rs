//! Shared CLI-adjacent plumbing: the readiness gate that every binary
//! (`rtt-batch`, `rtt-serve`, the debug tools) runs before touching the
//! network (`spec.md` §6 exit codes, §7 "readiness-gate" error policy).

pub mod readiness;

pub use readiness::{check, require, Requirements};
