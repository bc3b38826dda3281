use std::path::PathBuf;

use cangen_codegen::{
    ArtifactGenerator, FailurePolicy, GenerationOptions, GenerationRequest, JavaPackage,
};
use cangen_core::DatabaseName;
use cangen_dbc::{Encoding, LoadOptions, load_file};
use clap::Args;
use eyre::{Context, Result, bail};
use tracing::debug;

use super::UnwrapOrExit;
use crate::{
    config::Config,
    ops,
    reports::{Report, TerminalOutput},
};

/// Options shared by every generating command.
#[derive(Args)]
pub struct CommonArgs {
    /// Database file
    pub infile: PathBuf,

    /// The database name; uses the input file name by default
    #[arg(long)]
    pub database_name: Option<String>,

    /// Only generate code for messages sent or received by this node
    #[arg(long)]
    pub node: Option<String>,

    /// Directory in which to write output files [default: .]
    #[arg(short = 'o', long)]
    pub output_directory: Option<PathBuf>,

    /// File encoding
    #[arg(short, long, default_value = "utf-8", value_parser = parse_encoding)]
    pub encoding: Encoding,

    /// Try to shorten the names of named signal choices
    #[arg(long)]
    pub prune: bool,

    /// Skip database consistency checks
    #[arg(long)]
    pub no_strict: bool,

    /// Use bit fields to minimize struct sizes
    #[arg(long)]
    pub bit_fields: bool,

    /// Use float instead of double for floating point generation
    #[arg(long)]
    pub use_float: bool,

    /// Remove all floating point conversions
    #[arg(long)]
    pub no_floating_point_numbers: bool,

    /// Delete every generated file when a generator fails
    #[arg(long)]
    pub all_or_nothing: bool,

    /// TOML file with default option values
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_encoding(s: &str) -> Result<Encoding, String> {
    s.parse().map_err(|e: Box<cangen_dbc::Error>| e.to_string())
}

/// Java specific settings, resolved against the config file by the caller.
pub struct JavaSettings {
    pub package: JavaPackage,
    pub android: bool,
}

impl CommonArgs {
    pub fn load_config(&self) -> Result<Config> {
        Config::load(self.config.as_deref())
    }

    /// Resolve the name, load the database and run `generators`.
    pub fn execute(
        &self,
        config: &Config,
        java: Option<JavaSettings>,
        generators: Vec<Box<dyn ArtifactGenerator>>,
    ) -> Result<()> {
        let explicit_name = self
            .database_name
            .as_deref()
            .or(config.database_name.as_deref());
        let names = DatabaseName::resolve(explicit_name, &self.infile)
            .wrap_err("failed to determine the database name")?;
        debug!(database = names.as_str(), "resolved database name");

        let load_options = LoadOptions {
            encoding: self.encoding,
            prune_choices: self.prune,
            strict: !self.no_strict,
        };
        let database = load_file(&self.infile, &load_options).unwrap_or_exit();

        let output_dir = self
            .output_directory
            .clone()
            .or_else(|| config.output_directory.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let (package, android) = match java {
            Some(java) => (java.package, java.android),
            None => (JavaPackage::default(), false),
        };
        let options = GenerationOptions {
            android,
            node: self.node.clone().or_else(|| config.node.clone()),
            bit_fields: self.bit_fields,
            use_float: self.use_float,
            floating_point_numbers: !self.no_floating_point_numbers,
        };
        let request = GenerationRequest::new(database, names, output_dir)
            .with_package(package)
            .with_options(options);

        let policy = if self.all_or_nothing {
            FailurePolicy::AllOrNothing
        } else {
            FailurePolicy::Continue
        };

        let report = ops::generate(&request, generators, policy)?;
        report.render(&mut TerminalOutput::new());

        if !report.is_success() {
            bail!(
                "{} of {} generators failed",
                report.failures.len(),
                report.generators
            );
        }
        Ok(())
    }
}
