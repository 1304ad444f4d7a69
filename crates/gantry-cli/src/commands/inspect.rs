//! `gantry inspect` — print a module's declared surface.
//!
//! Compiles (validates) the image but never instantiates it, so it
//! works even when the import table the module wants is not configured.
//! Useful for diagnosing instantiation failures.

use gantry_core::config::{GantryConfig, ModuleConfig};
use gantry_runtime::{ModuleSummary, Runner};

pub fn inspect(module_path: &str, format: &str) -> anyhow::Result<()> {
    let config = GantryConfig {
        module: Some(ModuleConfig {
            path: module_path.to_string(),
            entry: None,
        }),
        ..GantryConfig::default()
    };

    let runner = Runner::new()?;
    let module = runner.load(&config)?;
    let summary = module.summary();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => print_text(&summary),
    }
    Ok(())
}

fn print_text(summary: &ModuleSummary) {
    println!("module: {}", summary.name);

    println!("imports ({}):", summary.imports.len());
    for import in &summary.imports {
        println!("  {}.{}: {}", import.namespace, import.name, import.kind);
    }

    println!("exports ({}):", summary.exports.len());
    for export in &summary.exports {
        println!("  {}: {}", export.name, export.kind);
    }
}
