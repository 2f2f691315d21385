//! Foundational low-level utilities shared across LogLine crates.
//!
//! Provides the UTC timestamp rendering used by emitted records, the
//! filesystem-safe name transform used by the record store, and the
//! temp-file + rename writer that persists records.

pub mod atomic_io;
pub mod time_utils;

pub use atomic_io::write_text_atomic;
pub use time_utils::{
    current_unix_timestamp_ms, current_utc_iso_timestamp, filesystem_safe_name,
};
