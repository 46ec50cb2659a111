use clap::Parser;
use std::path::PathBuf;

/// Single-pass compiler from a small C-like language to x86-64 assembly
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Source file to compile
    pub input: PathBuf,

    /// Where to write the assembly
    #[arg(short, long, default_value = "out.s")]
    pub output: PathBuf,

    /// Dump the token stream and stop
    #[arg(long)]
    pub lex: bool,

    /// Log declarations and generated functions
    #[arg(short, long)]
    pub verbose: bool,
}
