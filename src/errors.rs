//! Construction-time error type.
//!
//! Per spec §7, nothing on the per-packet classification hot path
//! returns an error — a malformed or short packet just yields a
//! `FlowRecord` with fewer populated layers. `ClassifyError` only covers
//! `Config` validation: the only place this crate's public surface can
//! actually fail.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyError {
    /// `Config::capacity_per_generation` was set to zero.
    ZeroCapacity,
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::ZeroCapacity => write!(f, "capacity_per_generation must be greater than zero"),
        }
    }
}

impl std::error::Error for ClassifyError {}
