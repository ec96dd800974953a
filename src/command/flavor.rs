use super::ProjectArgs;
use crate::error::Result;
use crate::flavor::{Role, registry};
use clap::Parser;
use colored::Colorize;

#[derive(Parser, Debug, Clone)]
pub struct FlavorArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// List every registered flavor in probing order instead
    #[arg(long, short = 'l')]
    pub list: bool,
}

pub fn execute(args: FlavorArgs) -> Result<()> {
    if args.list {
        return list();
    }

    let project = args.project.open()?;
    println!("{}\t{}", project.flavor(), project.project_type());
    Ok(())
}

fn list() -> Result<()> {
    let registry = registry::global()?;
    let here = std::env::current_dir()?;

    for entry in registry.all_flavors() {
        let project = registry.instantiate(entry, &here);
        let note = match entry.role() {
            Role::Synonym { of } => format!(" (preferred over {})", of),
            Role::Base { .. } => String::new(),
        };
        println!(
            "{:<20} {}{}",
            entry.id().bold(),
            project.project_type().dimmed(),
            note.dimmed()
        );
    }

    Ok(())
}
