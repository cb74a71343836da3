//! Version and usage output.

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const USAGE: &str = "\
Usage: guild-dash [OPTIONS]

Options:
  --url <URL>         Control panel base URL (env GUILD_DASH_URL)
  --guild <ID>        Guild to open (env GUILD_DASH_GUILD)
  --session <VALUE>   Panel session cookie (env GUILD_DASH_SESSION)
  --headless          Run without the terminal UI, log updates
  -V, --version       Print version
  -h, --help          Print this help";

/// Prints the version string and exits successfully.
pub fn handle_version_command() -> ! {
    println!("guild-dash {}", VERSION);
    std::process::exit(0)
}

pub fn handle_help_command() -> ! {
    println!("guild-dash {}\n\n{}", VERSION, USAGE);
    std::process::exit(0)
}
