use cangen_codegen_c::CSourceGenerator;
use clap::Args;
use eyre::Result;

use super::common::CommonArgs;

#[derive(Args)]
pub struct GenerateCSourceCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl GenerateCSourceCommand {
    pub fn run(&self) -> Result<()> {
        let config = self.common.load_config()?;
        self.common
            .execute(&config, None, vec![Box::new(CSourceGenerator)])
    }
}
