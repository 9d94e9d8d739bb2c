use matvec_mcp::server::{PROTOCOL_VERSION, SERVER_VERSION};
use matvec_mcp::{process_line, ServerConfig};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // stdout is the protocol channel, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = ServerConfig::from_env();
    info!(
        version = SERVER_VERSION,
        protocol = PROTOCOL_VERSION,
        mode = ?config.matrix_mode,
        max_dim = config.max_dim,
        "matvec MCP server started"
    );

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("client disconnected (EOF)");
                break;
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(bytes = line.len(), "received");

        let Some(response) = process_line(&config, line) else {
            continue;
        };

        let mut payload = match serde_json::to_vec(&response) {
            Ok(p) => p,
            Err(e) => {
                error!(error = %e, "error encoding response");
                continue;
            }
        };
        payload.push(b'\n');

        if let Err(e) = stdout.write_all(&payload).await {
            error!(error = %e, "error writing response");
            break;
        }
        if let Err(e) = stdout.flush().await {
            error!(error = %e, "error flushing stdout");
            break;
        }
    }

    info!("server shutting down");
}
