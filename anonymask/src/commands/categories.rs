//! The `categories` command: lists the built-in catalogue.

use anyhow::Result;
use comfy_table::presets::ASCII_FULL;
use comfy_table::Table;

use anonymask_core::CategoryCatalogue;

/// Builds the catalogue table: index, name, display name, replacement, pattern count.
pub fn catalogue_table(catalogue: &CategoryCatalogue) -> Table {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["#", "Category", "Description", "Replacement", "Patterns"]);
    for entry in &catalogue.categories {
        table.add_row(vec![
            entry.category.index().to_string(),
            entry.category.name().to_string(),
            entry.display_name.clone(),
            entry.replacement.clone(),
            entry.patterns.len().to_string(),
        ]);
    }
    table
}

pub fn run_categories() -> Result<()> {
    let catalogue = CategoryCatalogue::load_default()?;
    println!("{}", catalogue_table(&catalogue));
    Ok(())
}
