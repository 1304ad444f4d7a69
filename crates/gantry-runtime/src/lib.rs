//! gantry-runtime — the load → link → instantiate → invoke pipeline.
//!
//! The [`Runner`] drives one full cycle: resolve the image locator, read
//! the image, compile it, build the configured import table, instantiate
//! asynchronously, and call the entry export. Every stage fails closed;
//! the first error aborts the rest of the pipeline and becomes the
//! [`Outcome::Failure`] reason.
//!
//! ```text
//! Runner
//!   ├── GantryEngine (shared wasmtime::Engine, async)
//!   ├── ModuleImage  (bytes + digest, read once)
//!   ├── CompiledModule (validated wasmtime::Module)
//!   └── ModuleInstance (Store + Instance, single use)
//! ```

pub mod instance;
pub mod outcome;

use std::sync::Arc;

use wasmtime::Val;

use gantry_core::config::GantryConfig;
use gantry_core::error::GantryError;
use gantry_core::image::ModuleImage;
use gantry_core::locator::ImageLocator;

use gantry_host::engine::GantryEngine;
use gantry_host::sink::OutputSink;

pub use instance::{CompiledModule, ModuleInstance, ModuleSummary};
pub use outcome::Outcome;

/// Drives one instantiate-and-invoke cycle per call.
pub struct Runner {
    engine: GantryEngine,
}

impl Runner {
    pub fn new() -> anyhow::Result<Self> {
        let engine = GantryEngine::new()?;
        Ok(Self { engine })
    }

    pub fn engine(&self) -> &GantryEngine {
        &self.engine
    }

    /// Load and compile the image a config names, without running it.
    pub fn load(&self, config: &GantryConfig) -> Result<CompiledModule, GantryError> {
        let image = self.load_image(config)?;
        CompiledModule::compile(&self.engine, &image)
    }

    /// Run the full pipeline for one config: load, link, instantiate,
    /// invoke the entry point with `args`.
    pub async fn run(
        &self,
        config: &GantryConfig,
        args: &[Val],
        sink: Arc<dyn OutputSink>,
    ) -> Outcome {
        self.try_run(config, args, sink).await.into()
    }

    async fn try_run(
        &self,
        config: &GantryConfig,
        args: &[Val],
        sink: Arc<dyn OutputSink>,
    ) -> Result<Vec<Val>, GantryError> {
        let image = self.load_image(config)?;
        let module = CompiledModule::compile(&self.engine, &image)?;

        let table = config.import_table();
        let limits = config.limits.clone().unwrap_or_default();
        let mut instance =
            ModuleInstance::new(&self.engine, &module, &table, &limits, sink).await?;

        instance.invoke(config.entry(), args).await
    }

    fn load_image(&self, config: &GantryConfig) -> Result<ModuleImage, GantryError> {
        let module_config = config.module.as_ref().ok_or_else(|| {
            GantryError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "no module path configured",
            ))
        })?;
        let locator = ImageLocator::parse(&module_config.path)?;
        let image = ModuleImage::from_locator(&locator)?;
        tracing::info!(
            name = %image.name(),
            digest = %image.digest(),
            bytes = image.len(),
            "loaded module image"
        );
        Ok(image)
    }
}
