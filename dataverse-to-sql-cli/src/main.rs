//! dataverse-to-sql CLI Tool
//!
//! Creates SQL Server tables from the entity metadata in a Dataverse
//! `customizations.xml` export.

mod cli;

use cli::{Cli, Invocation, Settings};
use colored::Colorize;
use dataverse_to_sql::{
    apply_schema, connect_with_timeout, load_entities, render_schema, EntityModel, Error,
    MssqlExecutor, Result, ToolConfig,
};
use std::io::{self, BufRead, IsTerminal, Write};
use std::process;

fn main() {
    dotenv::dotenv().ok();

    let cli = match cli::parse_args(std::env::args_os()) {
        Ok(Invocation::Run(cli)) => cli,
        Ok(Invocation::Help(help)) => {
            print!("{}", help);
            process::exit(0);
        }
        Err(e) => e.exit(),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let result = run(cli, &mut io::stdout().lock());
    let code = match result {
        Ok(()) => 0,
        Err(e) => {
            report(&e, &mut io::stdout(), &mut io::stderr()).ok();
            e.exit_code()
        }
    };
    process::exit(code);
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config = ToolConfig::load()?;
    run_with_config(cli, config, out)
}

fn run_with_config(cli: Cli, config: ToolConfig, out: &mut impl Write) -> Result<()> {
    let settings = cli.resolve(config)?;

    let entities = load_entities(&settings.xml)?;

    if settings.dry_run {
        let count = render_schema(&entities, out)?;
        writeln!(out, "Dry run complete: {} statement(s) generated.", count)?;
        out.flush()?;
        return Ok(());
    }

    apply(&settings, &entities, out)?;

    writeln!(out, "Database generation complete. Press any key to exit ...")?;
    out.flush()?;

    if settings.pause && io::stdin().is_terminal() {
        wait_for_key()?;
    }
    Ok(())
}

fn apply(
    settings: &Settings,
    entities: &[EntityModel],
    out: &mut impl Write,
) -> Result<()> {
    let connection_string = settings
        .connection
        .as_deref()
        .ok_or(Error::MissingConnection)?;

    let connection = connect_with_timeout(connection_string, settings.connect_timeout)?;
    let mut executor = MssqlExecutor::new(connection);
    log::info!(
        "Creating {} tables on {}",
        entities.len(),
        executor.connection().addr()
    );

    // On failure the executor is dropped here, which releases the connection
    apply_schema(entities, &mut executor, out)?;
    executor.close()?;
    Ok(())
}

/// Block until the user presses Enter.
///
/// The prompt says "any key" but stdin is line-buffered, so only Enter (or
/// end of input) releases the wait.
fn wait_for_key() -> Result<()> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

/// Argument errors go to `out` as plain text, everything else to `err`
fn report(error: &Error, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
    if error.is_usage() {
        writeln!(out, "Error: {}", error)?;
        out.flush()
    } else {
        writeln!(err, "{} {}", "Error:".red().bold(), error)?;
        err.flush()
    }
}
