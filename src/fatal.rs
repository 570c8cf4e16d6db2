// src/fatal.rs

//! Hard-stop escape hatch for watchdog expiry.
//!
//! A hung external tool must not leave the host waiting indefinitely, so
//! watchdog expiry terminates the whole process abnormally instead of
//! returning an error. This is the one deliberate exception to the
//! crate's error-propagation policy. Call sites must escalate the child
//! kill first so no process tree is left behind.

/// Exit code used when the watchdog takes the host down.
pub const TIMEOUT_EXIT_CODE: i32 = 1;

/// Abort the host after a run deadline was exceeded. Never returns.
pub fn timed_out_abort() -> ! {
    std::process::exit(TIMEOUT_EXIT_CODE)
}
