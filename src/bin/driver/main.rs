mod args;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use scc::lexer;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn tokenize(source: &str) -> Result<()> {
    let tokens = lexer::lex(source)?;
    for token in &tokens {
        println!("{:>4}: {:?}", token.get_line(), token.get_inner());
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("unable to open {}", args.input.display()))?;

    if args.lex {
        return tokenize(&source);
    }

    // nothing touches the output file unless the whole unit compiled
    let asm = scc::compile(&source, Vec::new())?;
    fs::write(&args.output, asm)
        .with_context(|| format!("unable to write {}", args.output.display()))?;
    info!(output = %args.output.display(), "assembly written");
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(&args) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
