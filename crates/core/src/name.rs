// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Name sanitization for session identifiers.
//!
//! Agent and session names become file names and tmux command
//! arguments; anything outside `[A-Za-z0-9_.-]` is replaced before it
//! reaches either surface.

/// Replace every character outside `[A-Za-z0-9_.-]` with `-`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Whether a name is already safe to use verbatim.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
