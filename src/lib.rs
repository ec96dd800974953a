#![doc = include_str!("../README.md")]

pub mod cli;
pub mod command;
pub mod error;
pub mod flavor;
pub mod manifest;
pub mod patch;

pub use error::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> Result<()> {
    use clap::Parser;
    use command::AvakasCommand;

    let cli = cli::AvakasCli::parse();
    init_logging(cli.verbose);

    match cli.command {
        AvakasCommand::Show(args) => command::show::execute(args),
        AvakasCommand::Set(args) => command::set::execute(args),
        AvakasCommand::Flavor(args) => command::flavor::execute(args),
    }
}

/// `RUST_LOG` wins over `-v`; without either only warnings are shown.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .format_timestamp(None)
    .format_target(false)
    .try_init();
}
