// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;

use crate::keys::model::Key;

/// Failure parsing a key file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: prototype line has no preceding top-level key")]
    PrototypeBeforeTopLevel { line: usize },
}

/// Parses indentation-structured key-file text into an ordered list of
/// top-level keys, promoting a top-level key to a discovery rule the moment
/// an indented prototype line follows it.
///
/// Key-file lines receive no `{%VAR}` environment substitution; only the
/// single `--key` CLI argument goes through [`crate::keys::build_key_from_arg`].
/// This split is preserved deliberately from the source behavior (see
/// DESIGN.md) rather than unified.
pub fn parse(input: &str) -> Result<Vec<Key>, ParseError> {
    let mut keys: Vec<Key> = Vec::new();
    let mut parent: Option<usize> = None;

    for (idx, line) in input.lines().enumerate() {
        if is_blank_or_comment(line) {
            continue;
        }

        let starts_with_whitespace =
            line.chars().next().is_some_and(char::is_whitespace);

        if starts_with_whitespace {
            let parent_idx = match parent {
                Some(idx) => idx,
                None => {
                    let last = keys.len().checked_sub(1).ok_or(
                        ParseError::PrototypeBeforeTopLevel { line: idx + 1 },
                    )?;
                    keys[last].promote_to_discovery_rule();
                    parent = Some(last);
                    last
                },
            };
            keys[parent_idx]
                .children
                .push(Key::prototype(line.trim_start().to_string()));
        } else {
            parent = None;
            keys.push(Key::item(line.trim_start().to_string()));
        }
    }

    Ok(keys)
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}
