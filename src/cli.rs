use crate::command::AvakasCommand;
use clap::{ArgAction, Parser};

#[derive(Parser)]
#[command(
    name = "avakas",
    version,
    about = "Detect a project's flavor and read or update its version"
)]
pub struct AvakasCli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: AvakasCommand,
}
