//! # HTTP Fixture Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de fixtures.
//!
//! El filtro de logging sale de `RUST_LOG` si está definido; si no, de
//! `--log-level` / `LOG_LEVEL`.

use http_fixture_server::config::Config;
use http_fixture_server::server::Server;
use tracing_subscriber::EnvFilter;

fn main() {
    // Crear configuración desde CLI y variables de entorno
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(2);
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    tracing::info!(
        host = %config.host,
        port = config.port,
        max_body_bytes = config.max_body_bytes,
        io_timeout_ms = config.io_timeout_ms,
        "starting http_fixture_server"
    );

    let mut server = Server::new(config);

    // Iniciar el servidor (esto bloqueará el thread)
    if let Err(e) = server.run() {
        tracing::error!(error = %e, "fatal server error");
        std::process::exit(1);
    }
}
