//! Command-line arguments and their resolution against configuration

use clap::{CommandFactory, Parser};
use dataverse_to_sql::{Error, Result, ToolConfig};
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

const DESCRIPTION: &str = "\
Description:
  This utility reads a customizations.xml file containing metadata about entities and generates
  a SQL database schema. It connects to a specified SQL Server instance and creates tables based
  on the entity definitions in the XML file. Users can specify the connection string and XML file
  path via command-line arguments.";

#[derive(Parser, Debug)]
#[command(name = "dataverse-to-sql")]
#[command(about = "Create SQL Server tables from a Dataverse customizations.xml file")]
#[command(version)]
#[command(after_help = DESCRIPTION)]
pub struct Cli {
    /// SQL connection string
    #[arg(long, value_name = "STRING", num_args = 0..=1, default_missing_value = "")]
    pub connection: Option<String>,

    /// Path to the customizations.xml file
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "")]
    pub xml: Option<PathBuf>,

    /// Print the generated SQL without connecting to the database
    #[arg(long)]
    pub dry_run: bool,

    /// Exit without waiting for a key press
    #[arg(long)]
    pub no_pause: bool,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    pub quiet: bool,
}

/// What the command line asks for
#[derive(Debug)]
pub enum Invocation {
    Run(Cli),
    /// Rendered usage text
    Help(String),
}

/// Parse the raw process arguments (program name first).
///
/// `-h`/`--help` anywhere after the program name wins over every other
/// argument, malformed ones included.
pub fn parse_args<I, T>(args: I) -> std::result::Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    if args.iter().skip(1).any(|a| a == "--help" || a == "-h") {
        let help = Cli::command().render_help().to_string();
        return Ok(Invocation::Help(help));
    }

    Cli::try_parse_from(args).map(Invocation::Run)
}

/// Validated inputs for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Absent only in dry-run mode
    pub connection: Option<String>,
    pub xml: PathBuf,
    pub connect_timeout: Duration,
    pub dry_run: bool,
    pub pause: bool,
}

impl Cli {
    /// Default log filter for the verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Merge with configuration (command line wins) and validate.
    ///
    /// Checks run in a fixed order: connection string, XML path, XML file on disk.
    pub fn resolve(self, config: ToolConfig) -> Result<Settings> {
        let connection = non_empty(self.connection).or_else(|| non_empty(config.connection.clone()));
        if connection.is_none() && !self.dry_run {
            return Err(Error::MissingConnection);
        }

        let xml = self
            .xml
            .filter(|p| !p.as_os_str().is_empty())
            .or(config.xml.clone().filter(|p| !p.as_os_str().is_empty()))
            .ok_or(Error::MissingXmlPath)?;

        if !xml.is_file() {
            return Err(Error::XmlNotFound(xml));
        }

        Ok(Settings {
            connection,
            xml,
            connect_timeout: config.connect_timeout(),
            dry_run: self.dry_run,
            pause: !self.no_pause,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
