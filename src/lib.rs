#![deny(unused_must_use)]
#![warn(clippy::pedantic)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod ast;
pub mod codegen;
pub mod emission;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbols;
pub mod types;

use std::io::Write;

pub use error::{CompileError, Result};

/// Compile `source` into `out`, returning the sink on success.
///
/// Output is written as it is generated, so on failure `out` may hold a
/// partial program. Callers that must not leave one behind should compile
/// into a buffer first.
pub fn compile<W: Write>(source: &str, out: W) -> Result<W> {
    parser::Parser::new(source, out).compile()
}

pub fn compile_to_string(source: &str) -> Result<String> {
    let buf = compile(source, Vec::new())?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
