use super::{ProjectArgs, display_path};
use crate::error::Result;
use clap::Parser;
use colored::Colorize;

#[derive(Parser, Debug, Clone)]
pub struct SetArgs {
    /// Version string to write, used verbatim
    pub version: String,

    #[command(flatten)]
    pub project: ProjectArgs,

    /// Skip re-parsing the manifest after writing it
    ///
    /// By default the written file is parsed again and compared with the
    /// original; anything besides the version changing is an error.
    #[arg(long)]
    pub no_verify: bool,

    /// Show what would change without writing anything
    #[arg(long, short = 'n')]
    pub dry_run: bool,
}

pub fn execute(args: SetArgs) -> Result<()> {
    let project = args.project.open()?;
    let manifest = display_path(project.manifest_path());

    if args.dry_run {
        let current = project.get_version()?;
        println!("\n{}", "DRY RUN - No changes will be made".yellow().bold());
        if current == args.version {
            println!("   {} already at {}", manifest.dimmed(), current);
        } else {
            println!(
                "   {} {} → {}",
                manifest.dimmed(),
                current.yellow(),
                args.version.green()
            );
        }
        return Ok(());
    }

    if project.set_version(&args.version, !args.no_verify)? {
        println!(
            "{} {} to {} ({})",
            "✓ Updated".green().bold(),
            manifest,
            args.version.green().bold(),
            project.flavor()
        );
    } else {
        println!(
            "{} {} is already at {}",
            "No changes needed:".yellow(),
            manifest,
            args.version
        );
    }

    Ok(())
}
