//! Input handling shared by `mask` and `highlight`.

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anonymask_core::{merge_config, tagger_from_json, AnonymizeConfig, Category, Tagger};

use crate::cli::{AnonymizeArgs, SourceArg};
use crate::ui::output_format::print_warn_message;
use crate::ui::theme::ThemeMap;

/// Reads the whole input from `path`, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            info!("Reading input from file: {}", path.display());
            fs::read_to_string(path).with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            info!("Reading input from stdin...");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// The configuration file (if any) with command-line flags layered on top.
pub fn build_config(args: &AnonymizeArgs) -> Result<AnonymizeConfig> {
    let base = match &args.config {
        Some(path) => AnonymizeConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration file: {}", path.display()))?,
        None => AnonymizeConfig::default(),
    };

    let categories = args
        .categories
        .iter()
        .filter(|c| !c.trim().is_empty())
        .map(|c| c.parse::<Category>())
        .collect::<Result<Vec<_>, _>>()?;

    let overrides = AnonymizeConfig {
        policy: args.policy.map(Into::into),
        categories,
        custom_patterns: args.patterns.clone(),
        name_labels: (!args.name_labels.is_empty()).then(|| args.name_labels.clone()),
    };

    let config = merge_config(base, Some(overrides));
    config.validate()?;
    debug!(
        "Effective configuration: policy={:?}, categories={:?}, {} custom pattern(s).",
        config.policy,
        config.selected_categories(),
        config.custom_patterns.len()
    );
    Ok(config)
}

/// Loads every `--source` file into a tagger. Source names must be unique.
pub fn load_taggers(sources: &[SourceArg]) -> Result<Vec<Box<dyn Tagger>>> {
    let mut seen = HashSet::new();
    let mut taggers = Vec::with_capacity(sources.len());
    for source in sources {
        if !seen.insert(source.name.as_str()) {
            bail!("Source name '{}' is given more than once", source.name);
        }
        let json = fs::read_to_string(&source.path)
            .with_context(|| format!("Failed to read tagger output for '{}': {}", source.name, source.path.display()))?;
        let tagger = tagger_from_json(&source.name, &json)?;
        debug!("Loaded source '{}' from {}.", source.name, source.path.display());
        taggers.push(tagger);
    }
    Ok(taggers)
}

/// True when a run would pass the input through untouched.
pub fn nothing_selected(config: &AnonymizeConfig, source_count: usize) -> bool {
    source_count == 0 && config.categories.is_empty() && config.custom_patterns.is_empty()
}

/// Warns on stderr that nothing will be masked, unless `quiet`.
pub fn warn_if_nothing_selected(config: &AnonymizeConfig, source_count: usize, theme: &ThemeMap, quiet: bool) -> Result<()> {
    if quiet || !nothing_selected(config, source_count) {
        return Ok(());
    }
    let stderr_supports_color = io::stderr().is_terminal();
    print_warn_message(
        &mut io::stderr(),
        "No sources, categories or patterns were given; the input is passed through unchanged.",
        theme,
        stderr_supports_color,
    )?;
    Ok(())
}

/// Writes `content` to `path` or stdout, ending with exactly one newline
/// unless the content already ends with one.
pub fn write_text(path: Option<&Path>, content: &str) -> Result<()> {
    let newline = if content.ends_with('\n') { "" } else { "\n" };
    match path {
        Some(path) => {
            info!("Writing masked content to file: {}", path.display());
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write!(file, "{}{}", content, newline)?;
        }
        None => {
            info!("Writing masked content to stdout.");
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write!(writer, "{}{}", content, newline)?;
        }
    }
    Ok(())
}
