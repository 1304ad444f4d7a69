//! gantry.toml configuration parser.
//!
//! The import table is configuration-driven: the same binary serves a
//! module that wants a single `js.import1` logging callable and one that
//! wants `env.printInt` / `env.printString`, with no rebuild.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Namespace used when the config does not name one.
pub const DEFAULT_NAMESPACE: &str = "env";
/// Entry point used when the config does not name one.
pub const DEFAULT_ENTRY: &str = "main";
/// Message emitted by the logging callable when none is configured.
pub const DEFAULT_LOG_MESSAGE: &str = "Hello, world!";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GantryConfig {
    pub module: Option<ModuleConfig>,
    pub imports: Option<ImportsConfig>,
    pub limits: Option<LimitsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Locator of the module image (bare path or `file://` URI).
    pub path: String,
    /// Exported entry point to invoke (default: `main`).
    pub entry: Option<String>,
}

/// Which host callables the import table carries, and under what names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportsConfig {
    /// Import namespace the guest links against (default: `env`).
    pub namespace: Option<String>,
    /// No-argument logging callable.
    pub log: Option<LogImport>,
    /// `(i32) -> ()` integer-printing callable.
    pub print_int: Option<PrintImport>,
    /// `(offset: u32, len: u32) -> ()` string-printing callable that
    /// decodes UTF-8 from the instance's linear memory.
    pub print_string: Option<PrintImport>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogImport {
    /// Import name (default: `log`).
    pub name: Option<String>,
    /// Message to emit on each call (default: `Hello, world!`).
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrintImport {
    /// Import name (defaults: `printInt` / `printString`).
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Linear memory cap in bytes (default: 64 MiB).
    pub memory_bytes: Option<usize>,
    /// Table element cap (default: 10_000).
    pub table_elements: Option<usize>,
}

impl LimitsConfig {
    pub fn memory_bytes(&self) -> usize {
        self.memory_bytes.unwrap_or(64 * 1024 * 1024)
    }

    pub fn table_elements(&self) -> usize {
        self.table_elements.unwrap_or(10_000)
    }
}

impl GantryConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: GantryConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The entry point to invoke, after defaulting.
    pub fn entry(&self) -> &str {
        self.module
            .as_ref()
            .and_then(|m| m.entry.as_deref())
            .unwrap_or(DEFAULT_ENTRY)
    }

    /// Resolve the import table this run will be linked against.
    pub fn import_table(&self) -> ImportTableSpec {
        ImportTableSpec::from_config(self.imports.as_ref())
    }
}

// ── Resolved import table ──────────────────────────────────────────

/// A fully-resolved host function entry: every name and message has been
/// defaulted, so downstream registration needs no further config access.
#[derive(Debug, Clone, PartialEq)]
pub enum HostFnSpec {
    /// `() -> ()`: emit a fixed message.
    Log { message: String },
    /// `(i32) -> ()`: emit the decimal rendering of the argument.
    PrintInt,
    /// `(u32, u32) -> ()`: bounds-check, read, UTF-8-decode, emit.
    PrintString,
}

/// The import table the instance is linked against. Built once before
/// instantiation and never mutated afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportTableSpec {
    pub namespace: String,
    /// (import name, callable) pairs, ordered by name.
    pub functions: BTreeMap<String, HostFnSpec>,
}

impl ImportTableSpec {
    pub fn from_config(imports: Option<&ImportsConfig>) -> Self {
        let mut functions = BTreeMap::new();
        let namespace = imports
            .and_then(|i| i.namespace.clone())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        if let Some(imports) = imports {
            if let Some(log) = &imports.log {
                let name = log.name.clone().unwrap_or_else(|| "log".to_string());
                let message = log
                    .message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LOG_MESSAGE.to_string());
                functions.insert(name, HostFnSpec::Log { message });
            }
            if let Some(print_int) = &imports.print_int {
                let name = print_int
                    .name
                    .clone()
                    .unwrap_or_else(|| "printInt".to_string());
                functions.insert(name, HostFnSpec::PrintInt);
            }
            if let Some(print_string) = &imports.print_string {
                let name = print_string
                    .name
                    .clone()
                    .unwrap_or_else(|| "printString".to_string());
                functions.insert(name, HostFnSpec::PrintString);
            }
        }

        Self { namespace, functions }
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
