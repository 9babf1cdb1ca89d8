//! Liny Compiler command line
//!
//! Usage: linyc [OPTIONS] [input] [-o <output>]

use anyhow::Result;
use clap::Parser as ClapParser;
use codespan_reporting::term::termcolor::ColorChoice;
use liny_compiler::{compile_file, CompileStatus, DiagnosticReporter, FrontendConfig};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(ClapParser, Debug)]
#[command(name = "linyc")]
#[command(author = "LinyCompiler Team")]
#[command(version)]
#[command(about = "Compiler front end for the Liny C-like language", long_about = None)]
struct Args {
    /// Input source file
    #[arg(default_value = "./test.c")]
    input: PathBuf,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Show bracket capture text in the token dump
    #[arg(long, requires = "dump_tokens")]
    dump_captures: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(CompileStatus::FileCompleteOk) => println!("compilation finished"),
        Ok(CompileStatus::FailedWithErrors) => {
            eprintln!("compilation failed with errors");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

fn run(args: &Args) -> Result<CompileStatus> {
    init_logging(args.verbose, args.no_color)?;

    let color = if args.no_color { ColorChoice::Never } else { ColorChoice::Auto };
    let mut reporter = DiagnosticReporter::with_color(color);

    let config = FrontendConfig {
        dump_tokens: args.dump_tokens,
        dump_captures: args.dump_captures,
    };

    tracing::debug!(
        input = %args.input.display(),
        output = ?args.output,
        "compiling"
    );

    Ok(compile_file(&args.input, args.output.as_deref(), &config, &mut reporter))
}
