use clap::Parser;
use liveness_server::config::{Cli, GatewayConfig};
use liveness_server::{init_tracing, start_server};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = GatewayConfig::from_cli(cli)?;
    start_server(config).await
}
