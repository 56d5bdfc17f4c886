//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor de fixtures con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./http_fixture_server --port 3003 \
//!   --retry-retention-secs 3600 \
//!   --read-timeout-delay-ms 500
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! FIXTURE_PORT=3003 FIXTURE_HOST=0.0.0.0 ./http_fixture_server
//! ```

use crate::error::ConfigError;
use crate::handlers::DEFAULT_READ_TIMEOUT_DELAY;
use crate::retry::DEFAULT_RETENTION;
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Configuración del servidor de fixtures
#[derive(Debug, Clone, Parser)]
#[command(name = "http_fixture_server")]
#[command(about = "Servidor HTTP de fixtures para probar clientes HTTP")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = puerto efímero)
    #[arg(short, long, default_value = "3003", env = "FIXTURE_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "FIXTURE_HOST")]
    pub host: String,

    // === Simulaciones ===
    /// Segundos que sobrevive un contador de reintentos
    #[arg(long = "retry-retention-secs", default_value = "3600", env = "RETRY_RETENTION_SECS")]
    pub retry_retention_secs: u64,

    /// Demora de /read-timeout en milisegundos
    #[arg(long = "read-timeout-delay-ms", default_value = "500", env = "READ_TIMEOUT_DELAY_MS")]
    pub read_timeout_delay_ms: u64,

    // === Límites ===
    /// Tamaño máximo de un body recibido (y de un body gzip ya descomprimido)
    #[arg(long = "max-body-bytes", default_value = "16777216", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Timeout de lectura/escritura del socket en milisegundos
    #[arg(long = "io-timeout-ms", default_value = "30000", env = "IO_TIMEOUT_MS")]
    pub io_timeout_ms: u64,

    // === Logging ===
    /// Filtro de tracing cuando RUST_LOG no está definido
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use http_fixture_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:3003");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn retry_retention(&self) -> Duration {
        Duration::from_secs(self.retry_retention_secs)
    }

    pub fn read_timeout_delay(&self) -> Duration {
        Duration::from_millis(self.read_timeout_delay_ms)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_retention_secs == 0 {
            return Err(ConfigError::Zero("retry retention"));
        }
        if self.read_timeout_delay_ms == 0 {
            return Err(ConfigError::Zero("read-timeout delay"));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Zero("max body bytes"));
        }
        if self.io_timeout_ms == 0 {
            return Err(ConfigError::Zero("io timeout"));
        }
        if EnvFilter::try_new(&self.log_level).is_err() {
            return Err(ConfigError::LogLevel(self.log_level.clone()));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3003,
            host: "127.0.0.1".to_string(),
            retry_retention_secs: DEFAULT_RETENTION.as_secs(),
            read_timeout_delay_ms: DEFAULT_READ_TIMEOUT_DELAY.as_millis() as u64,
            max_body_bytes: 16 * 1024 * 1024,
            io_timeout_ms: 30_000,
            log_level: "info".to_string(),
        }
    }
}
