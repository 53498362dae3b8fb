//! Sequential candidate tester with pause/resume.
//!
//! Loads a wordlist of candidates, classifies them one per tick with a
//! pluggable probe, and keeps the rejected ones in a bin. The architecture
//! enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (loading, the evaluator state
//!   machine, reporting). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config, wordlist storage, session
//!   snapshots).
//!
//! [`driver`] supplies the timed tick source, and [`session`] coordinates core
//! logic with I/O to implement CLI commands.

pub mod core;
pub mod driver;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
