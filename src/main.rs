use clap::Parser;
use cep_lookup::utils::{logger, validation::Validate};
use cep_lookup::{CepBatch, CepError, CliConfig};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_logger(config.verbose, config.log_format);

    tracing::info!("Starting cep-lookup");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(config).await {
        tracing::error!("❌ {} (exit code {})", e, e.exit_code());
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }
}

async fn run(config: CliConfig) -> Result<(), CepError> {
    let settings = config.into_settings()?;
    settings.validate()?;

    let batch = CepBatch::from_config(&settings)?;
    let report = batch.run().await?;

    match &report.output_path {
        Some(path) => {
            tracing::info!("📁 Output saved to: {}", path);
            println!("✅ Finished! Output saved to '{}'", path);
        }
        None => println!("⚠️  Empty CEP list, no output written"),
    }

    Ok(())
}
