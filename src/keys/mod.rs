// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Item keys, the hierarchical key-file format, and `{%VAR}` environment
//! substitution for the single `--key` CLI argument.

mod envsubst;
mod model;
mod parser;

pub use envsubst::build_key_from_arg;
pub use model::Key;
pub use parser::{ParseError, parse};
