use super::ProjectArgs;
use crate::error::Result;
use clap::Parser;

#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Prints the version alone on stdout so it can be captured by scripts.
pub fn execute(args: ShowArgs) -> Result<()> {
    let project = args.project.open()?;
    println!("{}", project.get_version()?);
    Ok(())
}
