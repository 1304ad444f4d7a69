//! `gantry run` — the single instantiate-and-invoke cycle.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use wasmtime::Val;

use gantry_core::config::{GantryConfig, ModuleConfig};
use gantry_host::sink::StdoutSink;
use gantry_runtime::{Outcome, Runner};

const DEFAULT_CONFIG_FILE: &str = "gantry.toml";

/// Resolve config (file plus flag overrides), then run the pipeline.
///
/// On failure the reason is logged and propagated, so the process exits
/// non-zero; on success the guest's output has already been written
/// through the stdout sink and any entry-point return values are printed.
pub async fn run(
    config_path: Option<&Path>,
    module_path: Option<&str>,
    entry: Option<&str>,
    raw_args: &[String],
) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(path) = module_path {
        match config.module.as_mut() {
            Some(module) => module.path = path.to_string(),
            None => {
                config.module = Some(ModuleConfig {
                    path: path.to_string(),
                    entry: None,
                });
            }
        }
    }
    if let Some(entry) = entry {
        match config.module.as_mut() {
            Some(module) => module.entry = Some(entry.to_string()),
            None => bail!("--entry given but no module path configured"),
        }
    }
    if config.module.is_none() {
        bail!("no module image given: pass a path or a [module] section in {DEFAULT_CONFIG_FILE}");
    }

    let args = parse_args(raw_args)?;

    let runner = Runner::new()?;
    match runner.run(&config, &args, Arc::new(StdoutSink)).await {
        Outcome::Success(results) => {
            if !results.is_empty() {
                let rendered: Vec<String> = results.iter().map(render_val).collect();
                println!("{}", rendered.join(" "));
            }
            Ok(())
        }
        Outcome::Failure(err) => {
            tracing::error!(kind = err.kind(), "run failed");
            Err(err.into())
        }
    }
}

fn load_config(config_path: Option<&Path>) -> anyhow::Result<GantryConfig> {
    match config_path {
        Some(path) => GantryConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                GantryConfig::from_file(default)
                    .with_context(|| format!("failed to load {DEFAULT_CONFIG_FILE}"))
            } else {
                Ok(GantryConfig::default())
            }
        }
    }
}

/// Parse CLI entry-point arguments. Plain integers are i32; `i64`,
/// `f32`, and `f64` suffixes select the other core value types.
fn parse_args(raw: &[String]) -> anyhow::Result<Vec<Val>> {
    raw.iter().map(|s| parse_val(s)).collect()
}

fn parse_val(raw: &str) -> anyhow::Result<Val> {
    if let Some(v) = raw.strip_suffix("i64") {
        return Ok(Val::I64(v.parse().with_context(|| format!("bad i64 arg: {raw}"))?));
    }
    if let Some(v) = raw.strip_suffix("f32") {
        let v: f32 = v.parse().with_context(|| format!("bad f32 arg: {raw}"))?;
        return Ok(Val::F32(v.to_bits()));
    }
    if let Some(v) = raw.strip_suffix("f64") {
        let v: f64 = v.parse().with_context(|| format!("bad f64 arg: {raw}"))?;
        return Ok(Val::F64(v.to_bits()));
    }
    let v = raw.strip_suffix("i32").unwrap_or(raw);
    Ok(Val::I32(v.parse().with_context(|| format!("bad i32 arg: {raw}"))?))
}

fn render_val(val: &Val) -> String {
    match val {
        Val::I32(v) => v.to_string(),
        Val::I64(v) => v.to_string(),
        Val::F32(bits) => f32::from_bits(*bits).to_string(),
        Val::F64(bits) => f64::from_bits(*bits).to_string(),
        other => format!("{other:?}"),
    }
}
