//! Import table registration and guest memory access.
//!
//! The resolved `ImportTableSpec` is turned into a `wasmtime::Linker`
//! here, one `func_wrap` per configured callable. The string-printing
//! callable is the one place host and guest cross a memory trust
//! boundary: the (offset, len) pair comes from the guest and is
//! validated against the memory's current size before a single byte is
//! read.

use wasmtime::{Caller, Engine, Extern, Linker, Memory};

use gantry_core::config::{HostFnSpec, ImportTableSpec};
use gantry_core::error::GantryError;

use crate::engine::HostState;

/// Build a linker carrying exactly the callables the table names.
///
/// The linker is built once per run and never mutated after
/// instantiation.
pub fn register_imports(
    engine: &Engine,
    table: &ImportTableSpec,
) -> anyhow::Result<Linker<HostState>> {
    let mut linker = Linker::new(engine);
    let ns = table.namespace.clone();

    for (name, spec) in &table.functions {
        match spec {
            HostFnSpec::Log { message } => {
                let message = message.clone();
                linker.func_wrap(&ns, name, move |caller: Caller<'_, HostState>| {
                    caller.data().sink.write_line(&message);
                })?;
            }
            HostFnSpec::PrintInt => {
                linker.func_wrap(
                    &ns,
                    name,
                    |caller: Caller<'_, HostState>, value: i32| {
                        caller.data().sink.write_line(&value.to_string());
                    },
                )?;
            }
            HostFnSpec::PrintString => {
                linker.func_wrap(
                    &ns,
                    name,
                    |mut caller: Caller<'_, HostState>, offset: u32, len: u32| -> anyhow::Result<()> {
                        let text = read_guest_str(&mut caller, offset, len)?;
                        caller.data().sink.write_line(&text);
                        Ok(())
                    },
                )?;
            }
        }
    }

    tracing::debug!(
        namespace = %table.namespace,
        functions = table.functions.len(),
        "import table registered"
    );

    Ok(linker)
}

/// The instance's exported linear memory.
///
/// Absence is an export lookup failure, same as a missing entry point.
fn guest_memory(caller: &mut Caller<'_, HostState>) -> Result<Memory, GantryError> {
    caller
        .get_export("memory")
        .and_then(Extern::into_memory)
        .ok_or_else(|| GantryError::ExportNotFound("memory".to_string()))
}

/// Read `len` bytes at `offset` from the guest's linear memory.
///
/// The pair is untrusted input: it is checked against the memory's
/// current size first, and an out-of-range pair fails with
/// [`GantryError::Bounds`] without reading anything.
pub fn read_guest_bytes(
    caller: &mut Caller<'_, HostState>,
    offset: u32,
    len: u32,
) -> Result<Vec<u8>, GantryError> {
    let memory = guest_memory(caller)?;
    let data = memory.data(&caller);
    let size = data.len() as u64;
    // Two u32s cannot overflow a u64 sum.
    let end = u64::from(offset) + u64::from(len);
    if end > size {
        return Err(GantryError::Bounds {
            offset: u64::from(offset),
            len: u64::from(len),
            size,
        });
    }
    Ok(data[offset as usize..end as usize].to_vec())
}

/// Read and UTF-8-decode a guest string.
pub fn read_guest_str(
    caller: &mut Caller<'_, HostState>,
    offset: u32,
    len: u32,
) -> Result<String, GantryError> {
    let bytes = read_guest_bytes(caller, offset, len)?;
    let text = std::str::from_utf8(&bytes)?;
    Ok(text.to_string())
}
