// src/protocol/extract.rs

//! Payload extraction from the raw stdout text.

use super::marker::{classify, LineClass, MarkerRole};

/// Extract the payload delimited by the begin/end sentinels.
///
/// `raw` is the full, unfiltered stdout text in arrival order (markers
/// included). The scan takes the *first* line classifying as the begin
/// sentinel and the *first* line classifying as the end sentinel, each
/// searched from the top. Extraction succeeds only when both are present
/// and at least one line sits strictly between them; the payload is those
/// lines joined with `\n`, original (non-stripped) content preserved.
///
/// `None` is "no payload": a valid no-op outcome, not an error. Callers
/// must not touch any existing target value when they receive it.
pub fn extract_payload(raw: &str) -> Option<String> {
    let lines: Vec<&str> = split_lines(raw);

    let begin = lines
        .iter()
        .position(|line| classify(line) == LineClass::Marker(MarkerRole::Begin))?;
    let end = lines
        .iter()
        .position(|line| classify(line) == LineClass::Marker(MarkerRole::End))?;

    if end <= begin + 1 {
        return None;
    }

    Some(lines[begin + 1..end].join("\n"))
}

/// Split on `\n`, treating a preceding `\r` as part of the terminator.
///
/// Mirrors the splitting rule of [`super::line::LineReassembler`] so that
/// extraction over the raw buffer sees the same lines the streaming path
/// saw.
fn split_lines(raw: &str) -> Vec<&str> {
    raw.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}
