//! Crawler Trap Reverse Proxy
//!
//! A reverse proxy built with Tokio and Axum that inspects the declared
//! `User-Agent` of every request. Unwanted clients receive a bundled,
//! precompressed decoy payload; everyone else is forwarded to the
//! configured upstream.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────┐
//!                   │                CRAWLER TRAP                   │
//!                   │                                               │
//!  Client Request   │  ┌───────┐   ┌────────────┐   ┌───────────┐  │
//!  ─────────────────┼─▶│ http  │──▶│   rules    │──▶│  forward  │──┼──▶ Upstream
//!                   │  │server │   │  engine    │   │  handler  │  │
//!                   │  └───────┘   └─────┬──────┘   └───────────┘  │
//!                   │                    │ blocked                  │
//!                   │                    ▼                          │
//!  Decoy Response   │              ┌───────────┐   ┌───────────┐   │
//!  ◀────────────────┼──────────────│   http    │◀──│   bombs   │   │
//!                   │              │   bomb    │   │ registry/ │   │
//!                   │              └───────────┘   │ resolver  │   │
//!                   │                              └───────────┘   │
//!                   │  ┌─────────────────────────────────────────┐ │
//!                   │  │          Cross-Cutting Concerns          │ │
//!                   │  │  ┌────────┐ ┌───────────┐ ┌───────────┐ │ │
//!                   │  │  │ config │ │ observa-  │ │ lifecycle │ │ │
//!                   │  │  │        │ │ bility    │ │           │ │ │
//!                   │  │  └────────┘ └───────────┘ └───────────┘ │ │
//!                   │  └─────────────────────────────────────────┘ │
//!                   └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use crawler_trap::bombs::registry;
use crawler_trap::config;
use crawler_trap::http::HttpServer;
use crawler_trap::lifecycle::Shutdown;
use crawler_trap::observability;

#[derive(Debug, Parser)]
#[command(name = "crawler-trap")]
#[command(about = "Reverse proxy serving decoy payloads to unwanted crawlers")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "crawler-trap.toml")]
    config: PathBuf,

    /// Validate the configuration and rules, then exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Configuration problems are fatal before anything else starts; the
    // subscriber is not up yet, so report them on stderr directly.
    let config = match config::load_config(&args.config) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::FAILURE;
        }
    };
    let rules = match config.build_ruleset() {
        Ok(rules) => rules,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::FAILURE;
        }
    };

    if args.check {
        println!("configuration OK");
        return ExitCode::SUCCESS;
    }

    observability::logging::init(&config.observability.log_level);

    tracing::info!("crawler-trap v0.1.0 starting");

    let counts = rules.counts();
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        bomb = %rules.bomb,
        exact_rules = counts.exact,
        fragment_rules = counts.fragments,
        pattern_rules = counts.patterns,
        public_patterns = counts.public,
        "Configuration loaded"
    );

    // A dangling payload reference only surfaces per request; flag it
    // early so operators notice before the first hit.
    if !registry::exists(&rules.bomb) && !std::path::Path::new(&rules.bomb).is_file() {
        tracing::warn!(
            bomb = %rules.bomb,
            "payload reference matches neither a bundled payload nor an existing file"
        );
    }

    let listener = match TcpListener::bind(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(bind_address = %config.listener.bind_address, %error, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        tracing::info!("Shutdown signal received");
        signal_shutdown.trigger();
    });

    let server = HttpServer::new(&config, rules);
    if let Err(error) = server.run(listener, shutdown).await {
        tracing::error!(%error, "server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
