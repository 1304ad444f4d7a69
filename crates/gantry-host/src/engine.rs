//! GantryEngine — shared wasmtime engine and per-run host state.
//!
//! The engine is configured once with async support; instantiation later
//! suspends on `instantiate_async` without pinning a host thread. Each
//! run gets a fresh `HostState` carrying its output sink and resource
//! limits, so nothing about a run leaks into the next.

use std::sync::Arc;

use wasmtime::{Config, Engine, StoreLimits, StoreLimitsBuilder};

use gantry_core::config::LimitsConfig;

use crate::sink::OutputSink;

/// Per-run host state, stored in the instance's `Store`.
///
/// Host callables reach the sink through `Caller::data()`; they never
/// read it from ambient scope, so there is no order-of-initialization
/// hazard between table construction and instantiation.
pub struct HostState {
    pub sink: Arc<dyn OutputSink>,
    /// Memory/table growth caps, enforced via `Store::limiter`.
    pub limiter: StoreLimits,
}

/// Wasmtime engine wrapper. Cheap to clone (`Engine` is `Arc`-backed).
#[derive(Clone)]
pub struct GantryEngine {
    engine: Engine,
}

impl GantryEngine {
    /// Create an engine with async instantiation enabled.
    pub fn new() -> anyhow::Result<Self> {
        let mut config = Config::new();
        config.async_support(true);

        let engine = Engine::new(&config)?;
        tracing::debug!("gantry engine initialized");

        Ok(Self { engine })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Build the host state for one run.
    pub fn build_host_state(
        &self,
        sink: Arc<dyn OutputSink>,
        limits: &LimitsConfig,
    ) -> HostState {
        let limiter = StoreLimitsBuilder::new()
            .memory_size(limits.memory_bytes())
            .table_elements(limits.table_elements())
            .build();
        HostState { sink, limiter }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CaptureSink;

    #[test]
    fn engine_creates_successfully() {
        let engine = GantryEngine::new();
        assert!(engine.is_ok());
    }

    #[test]
    fn host_state_carries_the_sink() {
        let engine = GantryEngine::new().unwrap();
        let sink = Arc::new(CaptureSink::new());
        let state = engine.build_host_state(sink.clone(), &LimitsConfig::default());

        state.sink.write_line("hello");
        assert_eq!(sink.lines(), vec!["hello"]);
    }
}
