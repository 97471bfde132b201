//! Command implementations and the dispatcher used by `main`.

pub mod categories;
pub mod common;
pub mod highlight;
pub mod mask;

use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::ui::theme::ThemeMap;

/// Runs the parsed command.
pub fn dispatch(cli: &Cli, theme: &ThemeMap) -> Result<()> {
    match &cli.command {
        Commands::Mask(cmd) => mask::run_mask(cmd, theme, cli.quiet),
        Commands::Highlight(cmd) => highlight::run_highlight(cmd, theme, cli.quiet),
        Commands::Categories => categories::run_categories(),
    }
}
