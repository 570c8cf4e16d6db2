// src/protocol/mod.rs

//! Output-protocol core: line reassembly, marker classification, and
//! payload extraction.
//!
//! - [`line`] turns arbitrary byte chunks into complete lines, carrying a
//!   trailing fragment across chunk boundaries.
//! - [`marker`] decides whether a line is a protocol sentinel that must be
//!   hidden from the visible log.
//! - [`extract`] scans the raw stdout text for the begin/end sentinel pair
//!   and returns the payload strictly between them.
//!
//! This module is pure: no IO, no channels, no processes. The supervision
//! layer in [`crate::supervise`] feeds it and acts on its results.

pub mod extract;
pub mod line;
pub mod marker;

pub use extract::extract_payload;
pub use line::LineReassembler;
pub use marker::{classify, LineClass, MarkerRole, BEGIN_SENTINEL, END_SENTINEL};
