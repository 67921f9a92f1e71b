//! Export and import command implementations

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use spendwise_core::{Database, ExportFormat, ImportPayload};

pub fn cmd_export(db: &Database, user: &str, format: &str, output: Option<&Path>) -> Result<()> {
    let format: ExportFormat = format.parse().map_err(|e: String| anyhow!(e))?;

    let content = match format {
        ExportFormat::Json => db.export_json(user)?,
        ExportFormat::Csv => db.export_csv(user)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Exported data to {}", path.display());
        }
        None => print!("{}", content),
    }

    Ok(())
}

pub fn cmd_import(db: &Database, user: &str, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let payload: ImportPayload =
        serde_json::from_str(&content).context("Import file is not valid JSON")?;

    let stats = db.import_data(user, &payload)?;

    println!("✅ Import complete");
    println!("   Expenses: {}", stats.expenses);
    println!("   Income:   {}", stats.income);
    println!("   Budgets:  {}", stats.budgets);
    if stats.budgets_skipped > 0 {
        println!(
            "   Skipped {} budget(s) that already exist",
            stats.budgets_skipped
        );
    }

    Ok(())
}
