//! Demo MCP Server
//!
//! Run with: demo-mcp-server

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use demo_mcp::catalog::{build_server, WidgetAssets};
use demo_mcp::storage::SnippetStore;
use demo_mcp::transport::HttpTransport;
use demo_mcp::types::*;

#[derive(Parser, Debug)]
#[command(name = "demo-mcp-server")]
#[command(about = "Demo MCP server with snippet storage and HTML widgets")]
#[command(version)]
struct Args {
    /// Listening port
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Listening address
    #[arg(long, env = "MCP_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Snippet store path
    #[arg(long, env = "SNIPPETS_FILE", default_value = "snippets.json")]
    data_file: String,

    /// Response framing (json or sse)
    #[arg(long, env = "MCP_RESPONSE_MODE", default_value = "json")]
    response_mode: ResponseMode,

    /// Prebuilt widget script (ES module)
    #[arg(long, env = "WIDGET_SCRIPT_PATH")]
    widget_script: Option<String>,

    /// Prebuilt widget stylesheet
    #[arg(long, env = "WIDGET_STYLE_PATH")]
    widget_style: Option<String>,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let expand = |p: String| PathBuf::from(shellexpand::tilde(&p).to_string());
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            data_file: expand(self.data_file),
            response_mode: self.response_mode,
            widget_assets: WidgetAssetPaths {
                script: self.widget_script.map(expand),
                style: self.widget_style.map(expand),
            },
        }
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let assets =
        WidgetAssets::load(&config.widget_assets).context("Failed to load widget assets")?;
    let store = SnippetStore::open(&config.data_file);
    tracing::info!(path = %store.path().display(), "Using snippet store");

    let server = build_server(store, assets).context("Failed to register catalog")?;

    HttpTransport::new(Arc::new(server), config.response_mode, config.bind_addr)
        .start()
        .await
        .with_context(|| format!("Server error on {}", config.bind_addr))
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Args::parse().into_config();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // Read declared defaults from the command itself; parsing would pick up
    // whatever PORT / SNIPPETS_FILE / MCP_* happen to be set in the environment
    fn default_of(id: &str) -> Option<String> {
        Args::command()
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .and_then(|arg| arg.get_default_values().first())
            .map(|v| v.to_string_lossy().into_owned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(default_of("port"), Some(DEFAULT_PORT.to_string()));
        assert_eq!(default_of("host").as_deref(), Some("0.0.0.0"));
        assert_eq!(default_of("data_file").as_deref(), Some("snippets.json"));
        assert_eq!(default_of("response_mode").as_deref(), Some("json"));
        assert_eq!(default_of("widget_script"), None);
        assert_eq!("json".parse::<ResponseMode>(), Ok(ResponseMode::Json));
    }

    #[test]
    fn test_env_fallbacks_declared() {
        let command = Args::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(|v| v.to_string_lossy().into_owned())
        };
        assert_eq!(env_of("port").as_deref(), Some("PORT"));
        assert_eq!(env_of("data_file").as_deref(), Some("SNIPPETS_FILE"));
        assert_eq!(env_of("response_mode").as_deref(), Some("MCP_RESPONSE_MODE"));
        assert_eq!(env_of("widget_script").as_deref(), Some("WIDGET_SCRIPT_PATH"));
    }

    #[test]
    fn test_flags() {
        let config = Args::parse_from([
            "demo-mcp-server",
            "--port",
            "8123",
            "--host",
            "127.0.0.1",
            "--response-mode",
            "sse",
            "--widget-script",
            "dist/index.js",
        ])
        .into_config();
        assert_eq!(config.bind_addr, "127.0.0.1:8123".parse().unwrap());
        assert_eq!(config.response_mode, ResponseMode::Sse);
        assert_eq!(
            config.widget_assets.script,
            Some(PathBuf::from("dist/index.js"))
        );
    }
}
