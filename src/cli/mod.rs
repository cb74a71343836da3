//! CLI module for guild-dash.
//!
//! The dispatcher runs early in `main()`, before any terminal setup:
//!
//! ```ignore
//! use guild_dash::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args())?;
//! let options = run_cli_command(command); // exits for --version / --help
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, CliOptions};
pub use version::{handle_help_command, handle_version_command, USAGE, VERSION};

/// Handle informational commands; returns the options for a dashboard run.
///
/// `Version` and `Help` print and exit.
pub fn run_cli_command(command: CliCommand) -> CliOptions {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => handle_help_command(),
        CliCommand::Run(options) => options,
    }
}
