//! Command-line argument parsing for guild-dash.
//!
//! Flags override the environment; see [`CliOptions::apply`].

use thiserror::Error;

use crate::config::DashboardConfig;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Run the dashboard (default)
    Run(CliOptions),
}

/// Overrides collected from the command line
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOptions {
    pub url: Option<String>,
    pub guild: Option<String>,
    pub session: Option<String>,
    pub headless: bool,
}

impl CliOptions {
    /// Layer these options over `config`.
    pub fn apply(self, mut config: DashboardConfig) -> DashboardConfig {
        if let Some(url) = self.url {
            config = config.with_base_url(url);
        }
        if let Some(guild) = self.guild {
            config = config.with_guild_id(guild);
        }
        if let Some(session) = self.session {
            config = config.with_session_cookie(session);
        }
        if self.headless {
            config = config.with_headless(true);
        }
        config
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(String),
    #[error("unknown argument: {0}")]
    Unknown(String),
}

/// Parse command-line arguments, program name first.
///
/// # Examples
///
/// ```
/// use guild_dash::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["guild-dash".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        // Accept both `--flag value` and `--flag=value`
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => {
                (flag.to_string(), Some(value.to_string()))
            }
            _ => (arg.clone(), None),
        };

        let mut value = |flag: &str| {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
        };

        match flag.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--headless" => options.headless = true,
            "--url" => options.url = Some(value("--url")?),
            "--guild" => options.guild = Some(value("--guild")?),
            "--session" => options.session = Some(value("--session")?),
            _ => return Err(ArgsError::Unknown(arg)),
        }
    }

    Ok(CliCommand::Run(options))
}
