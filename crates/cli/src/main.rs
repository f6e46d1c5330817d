use std::path::PathBuf;

use anyhow::Context;
use bookshelf_app::bootstrap;
use bookshelf_kernel::settings::{Settings, StorageBackend};
use clap::{Parser, Subcommand};

/// Bookshelf service administration
#[derive(Parser, Debug)]
#[command(name = "bookshelf-cli", version, about)]
struct Cli {
    /// Directory holding base.toml and <env>.toml (overrides BOOKSHELF_CONFIG_DIR)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Environment overlay to load: local, staging or production (overrides BOOKSHELF_ENV)
    #[arg(long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Print the effective settings as JSON, secrets redacted
    Config,
    /// Print every documented API path and its methods
    Routes,
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    Settings::load_with(cli.config_dir.as_deref(), cli.env.as_deref())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli).with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;
    tracing::debug!(environment = ?settings.environment, command = ?cli.command, "settings loaded");

    match cli.command {
        Command::Serve => bootstrap::serve(&settings).await,
        Command::Migrate => {
            let app = bootstrap::build_app(&settings).await?;
            let applied = bootstrap::migrate(&app).await?;
            if let Some(pool) = app.pool {
                pool.close().await;
            }
            println!("applied {} migration(s)", applied);
            Ok(())
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings.redacted())
                .context("failed to render settings")?;
            println!("{}", rendered);
            Ok(())
        }
        Command::Routes => {
            // Route listing never needs a live database
            let mut offline = settings.clone();
            offline.database.backend = StorageBackend::Memory;
            let app = bootstrap::build_app(&offline).await?;

            let spec =
                bookshelf_http::router::merged_openapi(&app.registry, &settings.server.api_prefix);
            if let Some(paths) = spec["paths"].as_object() {
                for (path, item) in paths {
                    let methods: Vec<String> = item
                        .as_object()
                        .map(|ops| {
                            ops.keys()
                                .filter(|key| key.as_str() != "parameters")
                                .map(|key| key.to_uppercase())
                                .collect()
                        })
                        .unwrap_or_default();
                    println!("{:<28} {}", path, methods.join(", "));
                }
            }
            Ok(())
        }
    }
}
