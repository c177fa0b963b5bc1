//! The Vela compiler CLI.
//!
//! This binary provides the `vela check` and `vela emit` commands and
//! delegates pipeline orchestration to the driver module. Running and
//! native compilation belong to the JIT/AOT collaborators that consume
//! the emitted IR.

use clap::{Parser, Subcommand};

mod diagnostics;
mod driver;

/// Command-line interface for the Vela compiler front-end.
#[derive(Parser)]
#[command(name = "vela")]
#[command(about = "The Vela programming language front-end", long_about = None)]
struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run the lexer, parser, and type checker over a source file.
    Check {
        /// The source file to check (e.g., `hello.vela`).
        file: String,
    },
    /// Compile a source file and emit the textual IR module.
    Emit {
        /// The source file to compile (e.g., `hello.vela`).
        file: String,

        /// Output path for the IR text. Prints to stdout if not given.
        #[arg(short = 'o', long = "output")]
        output: Option<String>,
    },
}

/// Entry point for the Vela compiler.
fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { file } => driver::check(&file),
        Commands::Emit { file, output } => driver::emit(&file, output.as_deref()),
    };

    if let Err(error) = result {
        diagnostics::report_error(error.filename(), error.source(), error.error());
        std::process::exit(1);
    }
}
