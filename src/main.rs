use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use scanbridge::config::AppConfig;
use scanbridge::converters::{self, DefaultProjectSettings};
use scanbridge::models::reports::Reports;
use scanbridge::models::settings::ScanSettings;
use scanbridge::server::ServerVersion;
use scanbridge::services::file_ops::LocalFileOperations;
use scanbridge::services::offline::OfflineReportServer;
use scanbridge::services::reports::{ReportsTasks, ServerReportsTasks};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(name = "scanbridge", version, about = "CI bridge to SAST/DAST servers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the create-project request for a settings file.
    Convert {
        #[arg(long)]
        settings: PathBuf,
        /// Default project settings returned by the server.
        #[arg(long)]
        defaults: PathBuf,
        #[arg(long)]
        server_version: Option<ServerVersion>,
    },
    /// Generate locally rendered artifacts from a scan result.
    Export {
        #[arg(long)]
        scan_result: PathBuf,
        #[arg(long)]
        reports: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "scanbridge=info".into()))
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let cli = Cli::parse();

    match cli.command {
        Command::Convert {
            settings,
            defaults,
            server_version,
        } => {
            let version = server_version.unwrap_or(config.server_version);
            let data = std::fs::read_to_string(&settings)
                .with_context(|| format!("reading {}", settings.display()))?;
            let settings = ScanSettings::load(&data)?;
            let data =
                std::fs::read(&defaults).with_context(|| format!("reading {}", defaults.display()))?;
            let defaults = DefaultProjectSettings::from_json(version, &data)?;

            let request = converters::convert(&settings, &defaults)?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Command::Export {
            scan_result,
            reports,
            output,
        } => {
            let data = std::fs::read_to_string(&reports)
                .with_context(|| format!("reading {}", reports.display()))?;
            let reports = Reports::load(&data)?;
            let output = output.unwrap_or(config.output_dir);

            let server = OfflineReportServer::new(config.server_version, scan_result);
            let tasks = ServerReportsTasks::new(server, config.default_locale);
            let file_ops = LocalFileOperations::new(&output);
            tasks.generate_all(Uuid::nil(), Uuid::nil(), &reports, &file_ops)?;

            tracing::info!(count = reports.len(), output = %output.display(), "Export finished");
        }
    }

    Ok(())
}
