use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use liveness_core::RemoteConfig;

use crate::auth::OperatorCredentials;

#[derive(Parser, Debug)]
#[command(
    name = "liveness-gateway",
    version,
    about = "Authenticated gateway for face-liveness sessions"
)]
pub struct Cli {
    /// Operator username
    #[arg(long, env = "FACE_AUTH_USER", hide_env_values = true, default_value = "")]
    pub auth_user: String,

    /// Operator password
    #[arg(long, env = "FACE_AUTH_PASS", hide_env_values = true, default_value = "")]
    pub auth_pass: String,

    #[arg(long, env = "LIVENESS_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Directory holding captured records and reference images
    #[arg(long, env = "LIVENESS_FILES_DIR", default_value = "files")]
    pub files_dir: PathBuf,

    #[arg(long, env = "LIVENESS_REGION", default_value = "eu-west-1")]
    pub region: String,

    /// Endpoint override (defaults to the regional service endpoint)
    #[arg(long, env = "LIVENESS_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(long, env = "LIVENESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Remote request timeout in seconds
    #[arg(long = "timeout", env = "LIVENESS_TIMEOUT", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind: SocketAddr,
    pub files_dir: PathBuf,
    pub operator: OperatorCredentials,
    pub remote: RemoteConfig,
}

impl GatewayConfig {
    /// Fails when operator credentials are missing; the gateway never runs unguarded.
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let operator = OperatorCredentials::new(cli.auth_user, cli.auth_pass)?;

        let mut remote = RemoteConfig::default()
            .with_region(cli.region)
            .with_timeout(cli.timeout_secs);
        if let Some(endpoint) = cli.endpoint.filter(|v| !v.is_empty()) {
            remote = remote.with_endpoint(endpoint);
        }
        if let Some(token) = cli.token.filter(|v| !v.is_empty()) {
            remote = remote.with_token(token);
        }

        Ok(Self {
            bind: cli.bind,
            files_dir: cli.files_dir,
            operator,
            remote,
        })
    }
}
