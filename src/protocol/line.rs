// src/protocol/line.rs

//! Reassembles complete lines from an arbitrary stream of byte chunks.
//!
//! Process pipes deliver output in whatever chunk sizes the OS feels like,
//! so a line may arrive split across several reads, and a read may end in
//! the middle of a multi-byte UTF-8 sequence. `LineReassembler` buffers the
//! incomplete tail and prefixes it to the next chunk, so callers only ever
//! see whole lines.

/// Splits incoming chunks into complete lines, carrying the trailing
/// fragment forward until the next chunk or the final [`flush`].
///
/// A line is terminated by `\n`; a `\r` immediately before the `\n` is part
/// of the terminator and is not included in the emitted line. Working on
/// bytes keeps the carry-over correct even when a chunk boundary lands
/// inside a multi-byte character (`\n` never occurs inside one).
///
/// [`flush`]: LineReassembler::flush
#[derive(Debug, Default)]
pub struct LineReassembler {
    remainder: Vec<u8>,
}

impl LineReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and get back every line completed by it, in order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for &byte in chunk {
            if byte == b'\n' {
                if self.remainder.last() == Some(&b'\r') {
                    self.remainder.pop();
                }
                lines.push(String::from_utf8_lossy(&self.remainder).into_owned());
                self.remainder.clear();
            } else {
                self.remainder.push(byte);
            }
        }

        lines
    }

    /// Return the retained fragment if any. Called once at stream end; a
    /// stream whose last line had no terminator still surfaces that line.
    pub fn flush(&mut self) -> Option<String> {
        if self.remainder.is_empty() {
            return None;
        }
        let fragment = String::from_utf8_lossy(&self.remainder).into_owned();
        self.remainder.clear();
        Some(fragment)
    }
}
