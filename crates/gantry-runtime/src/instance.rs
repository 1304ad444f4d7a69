//! Compiled modules and live instances.
//!
//! `CompiledModule` wraps a validated `wasmtime::Module`; `ModuleInstance`
//! owns the `Store` and the linked instance for one run. Instances are
//! single-owner, single-use: nothing survives past the entry-point call.

use std::sync::Arc;

use serde::Serialize;
use wasmtime::{ExternType, Module, Store, Val};

use gantry_core::config::{ImportTableSpec, LimitsConfig};
use gantry_core::error::GantryError;
use gantry_core::image::ModuleImage;

use gantry_host::engine::{GantryEngine, HostState};
use gantry_host::imports::register_imports;
use gantry_host::sink::OutputSink;

/// A structurally validated module, ready to instantiate.
#[derive(Clone)]
pub struct CompiledModule {
    module: Module,
    name: String,
}

impl CompiledModule {
    /// Compile and validate an image.
    ///
    /// A malformed image fails here with [`GantryError::Instantiation`];
    /// the shim itself never interprets the bytes.
    pub fn compile(engine: &GantryEngine, image: &ModuleImage) -> Result<Self, GantryError> {
        let module = Module::from_binary(engine.engine(), image.bytes())
            .map_err(|err| GantryError::Instantiation(format!("{err:#}")))?;
        tracing::info!(
            name = %image.name(),
            digest = %image.digest(),
            bytes = image.len(),
            "compiled module image"
        );
        Ok(Self {
            module,
            name: image.name().to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Declared imports and exports, for diagnostics.
    pub fn summary(&self) -> ModuleSummary {
        let imports = self
            .module
            .imports()
            .map(|import| ImportSummary {
                namespace: import.module().to_string(),
                name: import.name().to_string(),
                kind: describe_extern(&import.ty()),
            })
            .collect();
        let exports = self
            .module
            .exports()
            .map(|export| ExportSummary {
                name: export.name().to_string(),
                kind: describe_extern(&export.ty()),
            })
            .collect();
        ModuleSummary {
            name: self.name.clone(),
            imports,
            exports,
        }
    }
}

/// Declared surface of a module, without instantiating it.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub name: String,
    pub imports: Vec<ImportSummary>,
    pub exports: Vec<ExportSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub namespace: String,
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub name: String,
    pub kind: String,
}

fn describe_extern(ty: &ExternType) -> String {
    match ty {
        ExternType::Func(func) => {
            let params: Vec<String> = func.params().map(|p| p.to_string()).collect();
            let results: Vec<String> = func.results().map(|r| r.to_string()).collect();
            format!("func({}) -> ({})", params.join(", "), results.join(", "))
        }
        ExternType::Memory(_) => "memory".to_string(),
        ExternType::Global(_) => "global".to_string(),
        ExternType::Table(_) => "table".to_string(),
        _ => "other".to_string(),
    }
}

/// A linked, executable instance. Owns its store; discarded after use.
pub struct ModuleInstance {
    store: Store<HostState>,
    instance: wasmtime::Instance,
    name: String,
}

impl ModuleInstance {
    /// Instantiate a compiled module against the configured import table.
    ///
    /// This is the pipeline's one suspension point: instantiation runs
    /// asynchronously and a missing or signature-incompatible import
    /// fails here with [`GantryError::Instantiation`], before the entry
    /// point is ever looked up.
    pub async fn new(
        engine: &GantryEngine,
        module: &CompiledModule,
        table: &ImportTableSpec,
        limits: &LimitsConfig,
        sink: Arc<dyn OutputSink>,
    ) -> Result<Self, GantryError> {
        let linker = register_imports(engine.engine(), table)
            .map_err(|err| GantryError::Instantiation(format!("{err:#}")))?;

        let state = engine.build_host_state(sink, limits);
        let mut store = Store::new(engine.engine(), state);
        store.limiter(|data| &mut data.limiter);

        let instance = linker
            .instantiate_async(&mut store, module.module())
            .await
            .map_err(|err| GantryError::Instantiation(format!("{err:#}")))?;

        tracing::info!(name = %module.name(), "module instance created");

        Ok(Self {
            store,
            instance,
            name: module.name().to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up and call an exported entry point.
    ///
    /// An absent export fails with [`GantryError::ExportNotFound`] before
    /// any call is attempted; a guest trap or a host-callable error during
    /// the call is classified by [`classify_call_error`].
    pub async fn invoke(
        &mut self,
        export: &str,
        args: &[Val],
    ) -> Result<Vec<Val>, GantryError> {
        let func = self
            .instance
            .get_func(&mut self.store, export)
            .ok_or_else(|| GantryError::ExportNotFound(export.to_string()))?;

        let result_count = func.ty(&self.store).results().len();
        let mut results = vec![Val::I32(0); result_count];

        tracing::debug!(name = %self.name, %export, args = args.len(), "invoking entry point");
        func.call_async(&mut self.store, args, &mut results)
            .await
            .map_err(classify_call_error)?;

        Ok(results)
    }
}

/// Recover the host-side error a callable raised, if any; everything
/// else (traps included) is a guest runtime fault.
fn classify_call_error(err: anyhow::Error) -> GantryError {
    let err = match err.downcast::<GantryError>() {
        Ok(host_err) => return host_err,
        Err(err) => err,
    };
    if let Some(trap) = err.downcast_ref::<wasmtime::Trap>() {
        GantryError::Runtime(trap.to_string())
    } else {
        GantryError::Runtime(format!("{err:#}"))
    }
}
