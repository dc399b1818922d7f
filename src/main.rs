#![cfg_attr(not(test), deny(clippy::panic))]

use clap::Parser;
use std::net::SocketAddr;
use worm_arena_server::config;
use worm_arena_server::logging;
use worm_arena_server::websocket::run_server;

/// Worm Arena -- authoritative simulation and broadcast server for a
/// massively multiplayer slithering-worm arcade game.
#[derive(Parser, Debug)]
#[command(name = "worm-arena-server")]
#[command(about = "Authoritative simulation and broadcast server for a slithering-worm arcade game")]
#[command(version)]
struct Cli {
    /// Validate configuration and exit without starting the server.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load();

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    let validation_result = config::validate_config(&cfg);

    if cli.validate_config {
        match validation_result {
            Ok(()) => {
                println!("Configuration validation passed");
                println!();
                println!("Configuration summary:");
                println!("  Port: {}", cfg.port);
                println!("  Tick rate: {} Hz", cfg.server.tick_hz);
                println!("  Broadcast rate: {} Hz", cfg.server.broadcast_hz);
                println!("  Max players per room: {}", cfg.default_room.max_players);
                return Ok(());
            }
            Err(e) => {
                eprintln!("Configuration validation failed:\n{e}");
                std::process::exit(1);
            }
        }
    }
    validation_result?;

    // The admin surface is not wired to an HTTP route in this build, but it
    // still gates startup on the token being present.
    config::require_admin_token()?;

    logging::init_with_config(&cfg.logging);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!(%addr, "starting worm arena server");

    run_server(addr, cfg).await
}
