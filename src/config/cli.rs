use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "lambda-testnet")]
#[command(about = "Boot a network of Docker containers around a Lambda function")]
pub struct CliConfig {
    #[arg(long, short, default_value = "network.toml", help = "Network file to boot")]
    pub config: PathBuf,

    #[arg(long, help = "Seconds to wait after starting containers (overrides the network file)")]
    pub start_delay: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn start_delay_override(&self) -> Option<Duration> {
        self.start_delay.map(Duration::from_secs)
    }
}
