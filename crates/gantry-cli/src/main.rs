use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "gantry",
    about = "Gantry — run a Wasm module image against a configured host import table",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a module image, instantiate it, and invoke its entry point.
    ///
    /// The import table comes from gantry.toml; flags override file
    /// values. With no config file and no flags the table is empty and
    /// the entry point defaults to `main`.
    Run {
        /// Module image path (overrides [module].path from the config)
        module: Option<String>,
        /// Config file (default: ./gantry.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Entry point export to invoke (overrides [module].entry)
        #[arg(short, long)]
        entry: Option<String>,
        /// Entry point argument; repeatable. Plain integers are i32;
        /// use suffixes for other types: 7i64, 2.5f32, 2.5f64
        #[arg(long = "arg", value_name = "VAL")]
        args: Vec<String>,
    },
    /// Print a module's declared imports and exports without running it
    Inspect {
        /// Module image path
        module: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gantry=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            module,
            config,
            entry,
            args,
        } => {
            commands::run::run(
                config.as_deref(),
                module.as_deref(),
                entry.as_deref(),
                &args,
            )
            .await
        }
        Commands::Inspect { module, format } => commands::inspect::inspect(&module, &format),
    }
}
