//! Process exit codes.
//!
//! A batch that ran to the end exits with `SUCCESS` even when some files or
//! lines failed; the summary on stderr carries the counts.

pub const SUCCESS: i32 = 0;
pub const CONFIG_ERROR: i32 = 2; // Bad flags/config, unreadable input directory
