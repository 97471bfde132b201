// anonymask/src/main.rs
//! Anonymask entry point.
//!
//! Parses the command line, sets up logging and the theme, and runs the
//! selected command. Errors are reported on stderr with a non-zero exit code.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use log::info;

use anonymask::cli::Cli;
use anonymask::ui::output_format::print_error_message;
use anonymask::ui::theme::{build_theme_map, ThemeMap, ThemeStyle};
use anonymask::{dispatch, logger};

fn run(cli: &Cli) -> Result<()> {
    let theme: ThemeMap = build_theme_map(cli.theme.as_ref()).context("Theme error")?;
    dispatch(cli, &theme)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));
    info!("anonymask started. Version: {}", env!("CARGO_PKG_VERSION"));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let theme = ThemeStyle::default_theme_map();
            let stderr_supports_color = io::stderr().is_terminal();
            let _ = print_error_message(&mut io::stderr(), &format!("{:#}", err), &theme, stderr_supports_color);
            ExitCode::FAILURE
        }
    }
}
