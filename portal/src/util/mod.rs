//! Small display utilities.

pub mod format;
