// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Builds the item key used for the single `--key` CLI argument: substitutes
/// `{%NAME}` occurrences with the process environment value of `NAME`
/// (empty string if unset, case-sensitive, non-recursive), then strips
/// leading whitespace.
///
/// No `regex` dependency is pulled in for this: the delimiter is fixed and a
/// small hand-written scanner is all the pattern needs.
pub fn build_key_from_arg(raw: &str) -> String {
    substitute_env(raw).trim_start().to_string()
}

fn substitute_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("{%") {
        out.push_str(&rest[..start]);
        let after_marker = &rest[start + 2..];
        match after_marker.find('}') {
            Some(end) => {
                let name = &after_marker[..end];
                let value = std::env::var(name).unwrap_or_default();
                out.push_str(&value);
                rest = &after_marker[end + 1..];
            },
            None => {
                out.push_str(&rest[start..]);
                rest = "";
                break;
            },
        }
    }
    out.push_str(rest);
    out
}
