use cangen_codegen::{DEFAULT_PACKAGE, JavaPackage};
use cangen_codegen_java::java_generators;
use clap::Args;
use eyre::Result;

use super::common::{CommonArgs, JavaSettings};

#[derive(Args)]
pub struct GenerateJavaCodeCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Java package of the generated classes [default: can.tools]
    #[arg(long)]
    pub package: Option<String>,

    /// Generate code for Android
    #[arg(long)]
    pub android: bool,
}

impl GenerateJavaCodeCommand {
    pub fn run(&self) -> Result<()> {
        let config = self.common.load_config()?;

        let package = self
            .package
            .as_deref()
            .or(config.package.as_deref())
            .unwrap_or(DEFAULT_PACKAGE);
        let java = JavaSettings {
            package: JavaPackage::new(package)?,
            android: self.android || config.android.unwrap_or(false),
        };

        self.common.execute(&config, Some(java), java_generators())
    }
}
