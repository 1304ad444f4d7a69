//! gantry-host — the host side of the guest/host trust boundary.
//!
//! Provides:
//! - **sink**: where host callables send their output (stdout, or an
//!   in-memory capture for tests and embedders)
//! - **engine**: `GantryEngine`, a `wasmtime::Engine` configured for
//!   async instantiation, plus per-run `HostState`
//! - **imports**: registration of the configured host callables on a
//!   `wasmtime::Linker`, including the bounds-checked linear-memory
//!   reads behind the string-printing callable

pub mod engine;
pub mod imports;
pub mod sink;

pub use engine::{GantryEngine, HostState};
pub use sink::{CaptureSink, OutputSink, StdoutSink};
