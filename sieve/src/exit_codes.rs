//! Stable exit codes for sieve CLI commands.

/// Command succeeded, or `sieve run` tested every candidate.
pub const OK: i32 = 0;
/// Command failed due to invalid config, input or session, or other errors.
pub const INVALID: i32 = 1;
/// `sieve run` found no candidates left to test.
pub const NOTHING_TO_TEST: i32 = 2;
/// `sieve run` paused (Ctrl-C, `--pause-after`, or unavailable target).
pub const PAUSED: i32 = 3;
