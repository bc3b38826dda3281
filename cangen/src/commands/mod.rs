mod common;
mod completions;
mod generate_c_source;
mod generate_java_code;

use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate_c_source::GenerateCSourceCommand;
use generate_java_code::GenerateJavaCodeCommand;

/// Extension trait for exiting on database errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for cangen_dbc::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "cangen")]
#[command(version)]
#[command(about = "Generate C, Java, JNI and CMake sources from CAN databases")]
pub(crate) struct Cli {
    /// Print debug logs to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::GenerateJavaCode(cmd) => cmd.run(),
            Commands::GenerateCSource(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Java, JNI, C and CMake sources for Android or desktop JVMs
    GenerateJavaCode(GenerateJavaCodeCommand),

    /// Generate C source code from a database
    GenerateCSource(GenerateCSourceCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
