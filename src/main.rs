//! ActionKit MCP server - main entry point.
//!
//! Issues a credential, fetches the project's action catalog, registers one
//! tool per action and serves them over stdio. Any construction failure is
//! logged and ends the process with a non-zero status.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use actionkit_bridge::actionkit::{ActionKitClient, CredentialIssuer};
use actionkit_bridge::mcp::StdioServer;
use actionkit_bridge::tools::ActionBridge;
use actionkit_bridge::types::{
    BuildPolicy, Config, StringLengthMode, SubjectId, DEFAULT_BASE_URL,
};
use actionkit_bridge::{Error, Result};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Abort,
    Skip,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LengthModeArg {
    Max,
    Exact,
}

/// Expose ActionKit actions as MCP tools over stdio.
#[derive(Debug, Parser)]
#[command(name = "actionkit-mcp", version)]
struct Args {
    /// ActionKit project id.
    #[arg(long, env = "PARAGON_PROJECT_ID")]
    project_id: String,

    /// Subject the credential is issued for.
    #[arg(long, env = "ACTIONKIT_SUBJECT")]
    subject: String,

    /// Environment variable holding the PEM-encoded RSA signing key.
    #[arg(long, env = "ACTIONKIT_SIGNING_KEY_VAR", default_value = "SIGNING_KEY")]
    signing_key_var: String,

    /// ActionKit API root.
    #[arg(long, env = "ACTIONKIT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Timeout for each outbound request, in seconds.
    #[arg(long, env = "ACTIONKIT_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// What to do with actions that cannot be registered.
    #[arg(long, env = "ACTIONKIT_BUILD_POLICY", value_enum, default_value = "abort")]
    build_policy: PolicyArg,

    /// How the string length limit is enforced.
    #[arg(long, env = "ACTIONKIT_STRING_LENGTH_MODE", value_enum, default_value = "max")]
    string_length_mode: LengthModeArg,
}

impl Args {
    fn to_config(&self) -> Config {
        let mut config = Config::default();
        config.actionkit.project_id = self.project_id.clone();
        config.actionkit.base_url = self.base_url.clone();
        config.actionkit.request_timeout = Duration::from_secs(self.request_timeout_secs);
        config.credential.subject = self.subject.clone();
        config.bridge.policy = match self.build_policy {
            PolicyArg::Abort => BuildPolicy::Abort,
            PolicyArg::Skip => BuildPolicy::Skip,
        };
        config.schema.string_length_mode = match self.string_length_mode {
            LengthModeArg::Max => StringLengthMode::Max,
            LengthModeArg::Exact => StringLengthMode::Exact,
        };
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    actionkit_bridge::observability::init_tracing();

    let args = Args::parse();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal error in main(): {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    let config = args.to_config();
    tracing::debug!(?config, "Loaded configuration");

    let subject = SubjectId::from_string(config.credential.subject.clone()).map_err(Error::config)?;
    let issuer = CredentialIssuer::from_env(&args.signing_key_var, config.credential.validity)?;
    let credential = issuer.issue(&subject)?;

    let client = ActionKitClient::new(&config.actionkit)?;
    let bridge = ActionBridge::from_config(Arc::new(client.clone()), &config);
    let tools = bridge.hydrate(&client, credential).await?;

    let server = Arc::new(StdioServer::new(Arc::new(tools), config.server.clone()));
    tracing::info!("ActionKit MCP Server running on stdio");

    let interrupt = tokio::spawn({
        let server = Arc::clone(&server);
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, shutting down");
                server.shutdown();
            }
        }
    });

    let result = server.serve_stdio().await;
    interrupt.abort();
    result?;

    Ok(())
}
