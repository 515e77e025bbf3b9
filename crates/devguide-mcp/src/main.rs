//! GitHub Issue Developer MCP server: entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use devguide_mcp::config::{resolve_http_addr, resolve_log_level, TransportMode};
use devguide_mcp::prompts::PromptRegistry;
use devguide_mcp::server::McpServer;
use devguide_mcp::types::InitializeResult;

#[derive(Parser)]
#[command(
    name = "github-issue-developer-mcp",
    about = "MCP server serving Git and GitHub workflow guidance prompts",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). Defaults to $LOG_LEVEL, then info.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server (default). Uses stdio unless an HTTP address is set.
    Serve {
        /// HTTP listen address (host:port or :port). Overrides $MCP_HTTP_ADDR.
        #[arg(long)]
        http_addr: Option<String>,
    },

    /// List the available prompts.
    List,

    /// Print the text of one prompt.
    Show {
        /// Prompt name, e.g. commit-message-format.
        name: String,
    },

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = resolve_log_level(cli.log_level.as_deref());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve { http_addr: None }) {
        Commands::Serve { http_addr } => {
            let addr = resolve_http_addr(http_addr.as_deref());
            let mode = TransportMode::from_http_addr(addr.as_deref());
            let registry = PromptRegistry::builtin()?;
            McpServer::new(registry, mode).run().await?;
        }

        Commands::List => {
            for guide in devguide::all_guides() {
                println!("{:<26} {}", guide.name, guide.summary);
            }
        }

        Commands::Show { name } => {
            let guide = devguide::find_guide(&name)?;
            println!("{}", guide.body);
        }

        Commands::Info => {
            let init = InitializeResult::default_result();
            let prompts: Vec<devguide::GuideSummary> = devguide::all_guides()
                .iter()
                .map(devguide::GuideSummary::from)
                .collect();
            let info = serde_json::json!({
                "server": init.server_info,
                "protocol_version": init.protocol_version,
                "capabilities": init.capabilities,
                "prompts": prompts,
                "prompt_count": prompts.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(
                shell,
                &mut cmd,
                "github-issue-developer-mcp",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}
