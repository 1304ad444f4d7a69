//! Integration tests for the full load → instantiate → invoke pipeline.
//!
//! Guest modules are assembled from inline WAT, written to a temp
//! directory, and run through `Runner` exactly the way the CLI does,
//! with a `CaptureSink` standing in for stdout so guest-visible side
//! effects can be asserted on.

use std::path::PathBuf;
use std::sync::Arc;

use wasmtime::Val;

use gantry_core::config::GantryConfig;
use gantry_host::sink::CaptureSink;
use gantry_runtime::Runner;

// ── Fixture helpers ───────────────────────────────────────────────

fn write_module(dir: &tempfile::TempDir, name: &str, wat_src: &str) -> PathBuf {
    let bytes = wat::parse_str(wat_src).expect("fixture wat compiles");
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("fixture write");
    path
}

fn config(toml: &str) -> GantryConfig {
    GantryConfig::from_toml_str(toml).expect("fixture config parses")
}

async fn run(config: &GantryConfig, args: &[Val], sink: Arc<CaptureSink>) -> gantry_runtime::Outcome {
    let runner = Runner::new().unwrap();
    runner.run(config, args, sink).await
}

// ── The two observed import-table configurations ──────────────────

#[tokio::test(flavor = "multi_thread")]
async fn log_module_calls_the_callable_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_module(
        &dir,
        "log.wasm",
        r#"(module
            (import "js" "import1" (func $log))
            (func (export "main") (call $log)))"#,
    );

    let config = config(&format!(
        r#"
[module]
path = "{}"

[imports]
namespace = "js"

[imports.log]
name = "import1"
"#,
        path.display()
    ));

    let sink = Arc::new(CaptureSink::new());
    let outcome = run(&config, &[], sink.clone()).await;

    assert!(outcome.is_success());
    assert_eq!(sink.lines(), vec!["Hello, world!"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn print_int_renders_decimal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_module(
        &dir,
        "print-int.wasm",
        r#"(module
            (import "env" "printInt" (func $pi (param i32)))
            (func (export "main")
                (call $pi (i32.const 42))
                (call $pi (i32.const -7))))"#,
    );

    let config = config(&format!(
        r#"
[module]
path = "{}"

[imports]
print_int = {{}}
"#,
        path.display()
    ));

    let sink = Arc::new(CaptureSink::new());
    let outcome = run(&config, &[], sink.clone()).await;

    assert!(outcome.is_success());
    assert_eq!(sink.lines(), vec!["42", "-7"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn in_bounds_string_read_decodes_utf8() {
    let dir = tempfile::tempdir().unwrap();
    // "h\c3\a9llo" is "héllo", 6 bytes, at offset 16.
    let path = write_module(
        &dir,
        "print-string.wasm",
        r#"(module
            (import "env" "printString" (func $ps (param i32 i32)))
            (memory (export "memory") 1)
            (data (i32.const 16) "h\c3\a9llo")
            (func (export "main") (call $ps (i32.const 16) (i32.const 6))))"#,
    );

    let config = config(&format!(
        r#"
[module]
path = "{}"

[imports]
print_string = {{}}
"#,
        path.display()
    ));

    let sink = Arc::new(CaptureSink::new());
    let outcome = run(&config, &[], sink.clone()).await;

    assert!(outcome.is_success());
    assert_eq!(sink.lines(), vec!["héllo"]);
}

// ── Trust-boundary failures ───────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn out_of_bounds_read_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    // One memory page is 65536 bytes; 65530 + 100 is out of range.
    let path = write_module(
        &dir,
        "oob.wasm",
        r#"(module
            (import "env" "printString" (func $ps (param i32 i32)))
            (memory (export "memory") 1)
            (func (export "main") (call $ps (i32.const 65530) (i32.const 100))))"#,
    );

    let config = config(&format!(
        r#"
[module]
path = "{}"

[imports]
print_string = {{}}
"#,
        path.display()
    ));

    let sink = Arc::new(CaptureSink::new());
    let outcome = run(&config, &[], sink.clone()).await;

    let err = outcome.into_result().unwrap_err();
    assert_eq!(err.kind(), "bounds");
    assert!(sink.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_utf8_is_reported_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_module(
        &dir,
        "bad-utf8.wasm",
        r#"(module
            (import "env" "printString" (func $ps (param i32 i32)))
            (memory (export "memory") 1)
            (data (i32.const 0) "\ff\fe\fd")
            (func (export "main") (call $ps (i32.const 0) (i32.const 3))))"#,
    );

    let config = config(&format!(
        r#"
[module]
path = "{}"

[imports]
print_string = {{}}
"#,
        path.display()
    ));

    let sink = Arc::new(CaptureSink::new());
    let outcome = run(&config, &[], sink.clone()).await;

    let err = outcome.into_result().unwrap_err();
    assert_eq!(err.kind(), "utf8");
    assert!(sink.is_empty());
}

// ── Pipeline stages fail closed ───────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn missing_image_path_fails_before_instantiation() {
    let config = config(
        r#"
[module]
path = "/nonexistent/guest.wasm"

[imports]
print_int = {}
"#,
    );

    let sink = Arc::new(CaptureSink::new());
    let outcome = run(&config, &[], sink.clone()).await;

    let err = outcome.into_result().unwrap_err();
    assert_eq!(err.kind(), "io");
    assert!(sink.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn undeclared_import_fails_instantiation() {
    let dir = tempfile::tempdir().unwrap();
    // Guest wants printString, table only carries printInt.
    let path = write_module(
        &dir,
        "unmet-import.wasm",
        r#"(module
            (import "env" "printString" (func $ps (param i32 i32)))
            (memory (export "memory") 1)
            (func (export "main") (call $ps (i32.const 0) (i32.const 1))))"#,
    );

    let config = config(&format!(
        r#"
[module]
path = "{}"

[imports]
print_int = {{}}
"#,
        path.display()
    ));

    let sink = Arc::new(CaptureSink::new());
    let outcome = run(&config, &[], sink.clone()).await;

    let err = outcome.into_result().unwrap_err();
    assert_eq!(err.kind(), "instantiation");
    // The entry point was never invoked.
    assert!(sink.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn signature_mismatch_fails_instantiation() {
    let dir = tempfile::tempdir().unwrap();
    // Guest declares printInt with the wrong arity.
    let path = write_module(
        &dir,
        "bad-signature.wasm",
        r#"(module
            (import "env" "printInt" (func $pi (param i32 i32)))
            (func (export "main") (call $pi (i32.const 1) (i32.const 2))))"#,
    );

    let config = config(&format!(
        r#"
[module]
path = "{}"

[imports]
print_int = {{}}
"#,
        path.display()
    ));

    let sink = Arc::new(CaptureSink::new());
    let outcome = run(&config, &[], sink.clone()).await;

    assert_eq!(outcome.into_result().unwrap_err().kind(), "instantiation");
    assert!(sink.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn absent_entry_export_fails_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_module(
        &dir,
        "no-main.wasm",
        r#"(module
            (import "js" "import1" (func $log))
            (func (export "start") (call $log)))"#,
    );

    let config = config(&format!(
        r#"
[module]
path = "{}"

[imports]
namespace = "js"

[imports.log]
name = "import1"
"#,
        path.display()
    ));

    let sink = Arc::new(CaptureSink::new());
    let outcome = run(&config, &[], sink.clone()).await;

    let err = outcome.into_result().unwrap_err();
    assert_eq!(err.kind(), "export-not-found");
    // No call was attempted, so no side effects either.
    assert!(sink.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn guest_trap_is_a_runtime_fault() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_module(
        &dir,
        "trap.wasm",
        r#"(module (func (export "main") unreachable))"#,
    );

    let config = config(&format!(
        r#"
[module]
path = "{}"
"#,
        path.display()
    ));

    let sink = Arc::new(CaptureSink::new());
    let outcome = run(&config, &[], sink.clone()).await;

    assert_eq!(outcome.into_result().unwrap_err().kind(), "runtime-fault");
}

// ── Entry points with arguments and results ───────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn entry_point_args_flow_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_module(
        &dir,
        "add.wasm",
        r#"(module
            (func (export "add") (param i32 i32) (result i32)
                (i32.add (local.get 0) (local.get 1))))"#,
    );

    let config = config(&format!(
        r#"
[module]
path = "{}"
entry = "add"
"#,
        path.display()
    ));

    let sink = Arc::new(CaptureSink::new());
    let outcome = run(&config, &[Val::I32(2), Val::I32(40)], sink).await;

    let results = outcome.into_result().unwrap();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Val::I32(42)));
}

#[tokio::test(flavor = "multi_thread")]
async fn load_without_running_reports_declared_surface() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_module(
        &dir,
        "surface.wasm",
        r#"(module
            (import "env" "printString" (func $ps (param i32 i32)))
            (memory (export "memory") 1)
            (func (export "main") (call $ps (i32.const 0) (i32.const 0))))"#,
    );

    let config = config(&format!(
        r#"
[module]
path = "{}"
"#,
        path.display()
    ));

    let runner = Runner::new().unwrap();
    let module = runner.load(&config).unwrap();
    let summary = module.summary();

    assert_eq!(summary.imports.len(), 1);
    assert_eq!(summary.imports[0].namespace, "env");
    assert_eq!(summary.imports[0].name, "printString");
    assert!(summary.imports[0].kind.starts_with("func"));

    let export_names: Vec<&str> = summary.exports.iter().map(|e| e.name.as_str()).collect();
    assert!(export_names.contains(&"main"));
    assert!(export_names.contains(&"memory"));
}
