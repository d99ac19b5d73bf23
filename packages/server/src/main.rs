#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Heatmap analysis API server.
//!
//! ```text
//! heatmap_server [--bind-addr <ADDR>] [--port <PORT>] [--interactive]
//! ```
//!
//! Settings not given on the command line are read from the environment
//! (see [`heatmap_server::ServerConfig::from_env`]).

use clap::Parser;
use heatmap_server::ServerConfig;

#[derive(Parser)]
#[command(name = "heatmap_server", about = "Serve synthetic heatmap analytics")]
struct Cli {
    /// Address to bind (overrides `BIND_ADDR`)
    #[arg(long)]
    bind_addr: Option<String>,
    /// Port to bind (overrides `PORT`)
    #[arg(long)]
    port: Option<u16>,
    /// Prompt for settings before starting
    #[arg(long)]
    interactive: bool,
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(bind_addr) = cli.bind_addr {
        config.bind_addr = bind_addr;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    heatmap_server::init_logger(config.debug);

    if cli.interactive {
        heatmap_server::interactive::run(config).await?;
    } else {
        heatmap_server::run_server(config).await?;
    }

    Ok(())
}
