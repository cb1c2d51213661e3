use clap::Parser;
use lambda_testnet::utils::{logger, validation::Validate};
use lambda_testnet::{CliConfig, NetworkFile, StartableDockerContainer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting lambda-testnet");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let network_file = match NetworkFile::from_file(&config.config)
        .and_then(|file| file.validate().map(|_| file))
    {
        Ok(file) => file,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let mut network = network_file.build_network();
    if let Some(delay) = config.start_delay_override() {
        network.start_delay = delay;
    }

    if let Err(e) = network.start().await {
        tracing::error!("❌ Starting network failed: {}", e);
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        if let Err(stop_err) = network.stop().await {
            tracing::error!("❌ Cleaning up after failed start: {}", stop_err);
        }
        std::process::exit(1);
    }

    println!("✅ Network is up");
    for container in network.network.containers() {
        match container.mapped_port().await {
            Ok(port) => println!("   {:<12} localhost:{}", container.hostname(), port),
            Err(_) => println!("   {:<12} (no exposed port)", container.hostname()),
        }
    }
    println!("Press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("Stopping network");
    network.stop().await?;
    println!("✅ Network stopped");

    Ok(())
}
