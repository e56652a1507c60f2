use anyhow::Result;
use clap::Args;

use crate::cli::Output;

#[derive(Args, Default)]
pub struct VersionArgs {}

pub async fn execute(_args: VersionArgs, output: &Output) -> Result<()> {
    if output.is_quiet() {
        println!("{}", crate::VERSION);
        return Ok(());
    }

    output.header(&format!("{} v{}", crate::PKG_NAME, crate::VERSION));
    output.key_value("Description:", crate::PKG_DESCRIPTION, false);
    output.key_value("Cores:", &num_cpus::get().to_string(), false);
    output.key_value(
        "Profile:",
        if cfg!(debug_assertions) { "debug" } else { "release" },
        false,
    );
    output.verbose("Run 'unlatch --help' for usage information");

    Ok(())
}
