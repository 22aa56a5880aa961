use anyhow::Context;
use catalog_etl::utils::error::ErrorSeverity;
use catalog_etl::utils::{logger, validation::Validate};
use catalog_etl::{CliConfig, EtlEngine, TracingDiagnostics};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("❌ Configuration validation failed: {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    logger::init_cli_logger(cli.verbose, config.logging.format, config.log_file())
        .context("failed to open the processing log")?;

    tracing::info!("🚀 Starting catalog-etl");
    if cli.verbose {
        tracing::debug!("Effective config: {:?}", config);
    }

    let engine = EtlEngine::with_options(config.transform_options(), TracingDiagnostics);

    match engine.run_files(&config) {
        Ok(summary) => {
            if summary.failed() > 0 {
                tracing::warn!(
                    "⚠️ {} row(s) were skipped, see the log for details",
                    summary.failed()
                );
            }
            println!(
                "✅ Converted {} item(s) into {}",
                summary.processed, config.files.output
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
